//! Front end for the circuit definition language.
//!
//! A definition declares devices, wires their ports together and names the
//! outputs to watch. The lexer, parser and diagnostic reporter live here; the
//! meaning of devices and connections is left to a [`CircuitBuilder`].
//!
//! # Grammar Overview
//!
//! ```text
//! file        = devices connections [monitors] EOF
//! devices     = "DEVICES" ':' device { ',' device } ';'
//! connections = "CONNECTIONS" ':' connection { ',' connection } ';'
//! monitors    = "MONITOR" ':' port { ',' port } ';'
//!
//! device      = kind name [number]
//! connection  = port "->" port
//! port        = name ['.' name]
//!
//! kind        = one of the builder's device kinds
//! name        = letter { letter | digit }     (not a reserved word)
//! number      = digit { digit }
//! ```
//!
//! Comments are `\\` to the end of the line and `\* ... *\`.
//!
//! # Example
//!
//! ```text
//! \\ Half adder driven by two switches
//! DEVICES:
//!     SWITCH a 0, SWITCH b 1,
//!     XOR sum, AND carry 2;
//! CONNECTIONS:
//!     a -> sum.I1, b -> sum.I2,
//!     a -> carry.I1, b -> carry.I2;
//! MONITOR:
//!     sum, carry;
//! ```

mod builder;
mod diagnostics;
mod items;
mod lexer;
mod names;
mod parser;

pub use builder::{CircuitBuilder, ConnectionBuilder, DeviceBuilder, DevicePorts, MonitorBuilder};
pub use diagnostics::{
    Anchor, Diagnostic, DiagnosticSink, ErrorCounting, ErrorKind, Location, Reporter,
    SemanticError, Suppression, SyntaxError, WriterSink,
};
pub use items::{ConnectionItem, DeviceItem, MonitorItem, PortDirection, PortRef, Section};
pub use lexer::{Keywords, Lexer, Token, TokenKind};
pub use names::{SymbolId, SymbolTable};
pub use parser::Parser;

use std::path::Path;

use tracing::info;

use crate::error::{LogsimError, Result};

/// Parse a definition held in memory.
///
/// The builder's device kinds are interned into `names` as reserved words
/// before lexing starts. Returns `true` if the definition has no errors;
/// every error found has been handed to `sink` by the time this returns.
pub fn parse<B, S>(source: &str, names: &mut SymbolTable, builder: &mut B, sink: S) -> bool
where
    B: CircuitBuilder,
    S: DiagnosticSink,
{
    count_errors(source, names, builder, sink) == 0
}

/// Parse a definition file and return the number of errors it contains.
pub fn parse_file<B, S>(
    path: &Path,
    names: &mut SymbolTable,
    builder: &mut B,
    sink: S,
) -> Result<usize>
where
    B: CircuitBuilder,
    S: DiagnosticSink,
{
    let content = std::fs::read_to_string(path).map_err(|e| LogsimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), bytes = content.len(), "parsing definition");
    Ok(count_errors(&content, names, builder, sink))
}

fn count_errors<B, S>(source: &str, names: &mut SymbolTable, builder: &mut B, sink: S) -> usize
where
    B: CircuitBuilder,
    S: DiagnosticSink,
{
    let keywords = Keywords::new(names, builder.device_kinds());
    let lexer = Lexer::new(source, names, keywords);
    let mut parser = Parser::new(builder, sink);
    parser.parse(lexer);
    parser.error_count()
}
