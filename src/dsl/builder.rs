//! Interfaces of the semantic model builders driven by the parser.
//!
//! The parser checks token shape only. Everything that depends on what has
//! been declared so far (duplicate names, port directions, qualifiers) is
//! decided by a builder and relayed back as a diagnostic.

use super::names::SymbolId;
use crate::error::{ConnectionError, DeviceError, MonitorError};

/// The named ports of one declared device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevicePorts {
    pub inputs: Vec<SymbolId>,
    pub outputs: Vec<SymbolId>,
}

impl DevicePorts {
    pub fn has_input(&self, port: SymbolId) -> bool {
        self.inputs.contains(&port)
    }

    pub fn has_output(&self, port: SymbolId) -> bool {
        self.outputs.contains(&port)
    }
}

/// Builds the device table.
pub trait DeviceBuilder {
    /// Device-kind keywords this builder understands. They become reserved
    /// words of the language.
    fn device_kinds(&self) -> &[&str];

    /// Declare a device.
    fn make_device(
        &mut self,
        name: SymbolId,
        kind: SymbolId,
        parameter: Option<u64>,
    ) -> Result<(), DeviceError>;

    /// Ports of an already declared device.
    fn get_device(&self, device: SymbolId) -> Option<DevicePorts>;
}

/// Builds the connection graph.
pub trait ConnectionBuilder {
    /// Connect two device ports. A `None` port names the device's single
    /// unnamed output.
    fn make_connection(
        &mut self,
        source: SymbolId,
        source_port: Option<SymbolId>,
        target: SymbolId,
        target_port: Option<SymbolId>,
    ) -> Result<(), ConnectionError>;

    /// Check that every declared input is connected.
    fn check_network(&self) -> bool;
}

/// Builds the monitor registry.
pub trait MonitorBuilder {
    fn make_monitor(&mut self, device: SymbolId, port: Option<SymbolId>)
        -> Result<(), MonitorError>;
}

/// Everything the parser needs from its collaborators.
pub trait CircuitBuilder: DeviceBuilder + ConnectionBuilder + MonitorBuilder {}

impl<T: DeviceBuilder + ConnectionBuilder + MonitorBuilder> CircuitBuilder for T {}
