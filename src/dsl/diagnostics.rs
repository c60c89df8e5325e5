//! Error taxonomy and the diagnostic reporter.
//!
//! Every problem found in a definition becomes one [`Diagnostic`]: an
//! [`ErrorKind`] plus, for errors tied to a token, the token's source line
//! with a caret under it. Diagnostics are streamed to a [`DiagnosticSink`] the
//! moment they are found.

use std::fmt;
use std::io::Write;

use thiserror::Error;
use tracing::{debug, warn};

use super::lexer::Token;
use crate::error::{ConnectionError, DeviceError, MonitorError};

/// Errors detectable from token shape alone.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("expected section header 'DEVICES'")]
    MissingDeviceKeyword,
    #[error("expected section header 'CONNECTIONS'")]
    MissingConnectionsKeyword,
    #[error("found a third section without the 'MONITOR' header")]
    MissingMonitorKeyword,
    #[error("expected a colon after the section header")]
    MissingColon,
    #[error("expected a semicolon at the end of the list")]
    MissingSemicolon,
    #[error("expected a comma between list items or a semicolon after the last one")]
    MissingDelimiter,
    #[error("expected '->' between the two ends of a connection")]
    MissingArrow,
    #[error("expected a port name after the dot")]
    PortMissing,
    #[error("expected a device name: a letter followed by letters or digits, not a reserved word")]
    InvalidDeviceName,
    #[error("unexpected symbol")]
    UnexpectedSymbol,
    #[error("found a comma instead of a semicolon at the end of the list")]
    CommaNotSemicolon,
    #[error("file ended abruptly")]
    PrematureEof,
}

/// Errors that depend on what has been declared.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error("port is not an input of this device")]
    InvalidInput,
    #[error("port is not an output of this device")]
    InvalidOutput,
    #[error("not all inputs in the network are connected")]
    NotAllInputsConnected,
}

/// Every kind of error a definition can contain.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl ErrorKind {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

impl From<DeviceError> for ErrorKind {
    fn from(err: DeviceError) -> Self {
        Self::Semantic(err.into())
    }
}

impl From<ConnectionError> for ErrorKind {
    fn from(err: ConnectionError) -> Self {
        Self::Semantic(err.into())
    }
}

impl From<MonitorError> for ErrorKind {
    fn from(err: MonitorError) -> Self {
        Self::Semantic(err.into())
    }
}

/// Which token a diagnostic points at.
///
/// Some errors only show up one token late, e.g. a missing colon is noticed
/// on the token after the header, so the caret goes under the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Current,
    Previous,
    /// Global property of the circuit, no caret.
    Unplaced,
}

/// Where in the source a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column of the token's first character (1-indexed)
    pub column: usize,
    /// The full text of the token's line
    pub source_line: String,
}

impl Location {
    /// Locate `token` inside `source`.
    pub fn of(source: &str, token: &Token) -> Self {
        let start = token.span.start.min(source.len());
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[start..]
            .find('\n')
            .map_or(source.len(), |i| start + i);
        Self {
            line: token.line,
            column: token.column,
            source_line: source[line_start..line_end]
                .trim_end_matches('\r')
                .to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tabs are kept so the caret lines up however the terminal expands them.
        let padding: String = self
            .source_line
            .chars()
            .take(self.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        write!(f, "{}\n{}^", self.source_line, padding)
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub location: Option<Location>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "Error on line {}: {}\n{}",
                location.line, self.kind, location
            ),
            None => write!(f, "Error: {}", self.kind),
        }
    }
}

/// Receives diagnostics as they are found.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Writes each diagnostic as text, followed by a blank line.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for WriterSink<W> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if let Err(err) = writeln!(self.writer, "{diagnostic}\n") {
            warn!(%err, "failed to write diagnostic");
        }
    }
}

/// Why the reporter stopped counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    PrematureEof,
}

/// Counting state of a reporter. Moves to `Suppressed` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCounting {
    Counting,
    Suppressed(Suppression),
}

/// Counts errors and forwards them to a sink.
pub struct Reporter<S> {
    sink: S,
    error_count: usize,
    counting: ErrorCounting,
}

impl<S: DiagnosticSink> Reporter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            error_count: 0,
            counting: ErrorCounting::Counting,
        }
    }

    /// Record an error. Does nothing once suppressed.
    pub fn report(&mut self, kind: ErrorKind, location: Option<Location>) {
        if self.counting != ErrorCounting::Counting {
            debug!(?kind, "suppressed diagnostic");
            return;
        }
        self.error_count += 1;
        debug!(?kind, line = ?location.as_ref().map(|l| l.line), "diagnostic");
        self.sink.emit(Diagnostic { kind, location });
    }

    /// Record that the input ended early and stop counting for good.
    pub fn premature_eof(&mut self) {
        self.report(SyntaxError::PrematureEof.into(), None);
        self.counting = ErrorCounting::Suppressed(Suppression::PrematureEof);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }
}
