//! Error types for the logic circuit front end.
//!
//! [`LogsimError`] covers operational failures: reading a definition file,
//! resolving a symbol id, rejecting a definition. Problems *inside* a
//! definition are never returned as errors; they are streamed as
//! [`Diagnostic`](crate::dsl::Diagnostic)s while parsing continues.
//!
//! The result codes of the builder collaborators live here as well, since
//! they are the `Err` side of the builder traits.

use thiserror::Error;

/// Result type alias using [`LogsimError`].
pub type Result<T> = std::result::Result<T, LogsimError>;

/// Unified error type for all operational failures.
#[derive(Error, Debug)]
pub enum LogsimError {
    /// Error reading a circuit definition file
    #[error("Failed to read circuit definition '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Symbol id that the symbol table never assigned
    #[error("Symbol id {id} was never assigned")]
    InvalidSymbolId { id: usize },

    /// The definition parsed with errors
    #[error("Circuit definition '{path}' contains {errors} error(s)")]
    DefinitionRejected { path: String, errors: usize },
}

impl LogsimError {
    /// Create an invalid symbol id error
    pub fn invalid_symbol(id: usize) -> Self {
        Self::InvalidSymbolId { id }
    }
}

/// Reasons a device builder refuses a device declaration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    #[error("invalid device kind")]
    BadDeviceKind,
    #[error("a device with this name already exists")]
    DeviceAlreadyExists,
    #[error("this device kind needs a parameter")]
    QualifierRequired,
    #[error("this device kind takes no parameter")]
    QualifierNotAllowed,
    #[error("parameter is out of range for this device kind")]
    InvalidQualifier,
}

/// Reasons a connection builder refuses a connection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("device has not been declared")]
    DeviceNotDefined,
    #[error("device has no such port")]
    PortNotFound,
    #[error("an input is connected to an input, connections must go output -> input")]
    InputToInput,
    #[error("an output is connected to an output, connections must go output -> input")]
    OutputToOutput,
    #[error("input is already connected")]
    InputAlreadyConnected,
}

/// Reasons a monitor builder refuses a monitor point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    #[error("device has not been declared")]
    DeviceNotDefined,
    #[error("only outputs can be monitored")]
    PortNotAnOutput,
    #[error("this output is already monitored")]
    AlreadyMonitored,
}
