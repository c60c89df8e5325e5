//! # Logsim
//!
//! Front end for a small language describing digital logic circuits.
//!
//! This library provides:
//! - A lexer and recovering recursive-descent parser for circuit definitions
//! - Diagnostics that point at the offending token with a caret
//! - Builder traits through which the parser hands over every item it reads
//! - A reference [`Circuit`] model implementing those traits
//!
//! ## Architecture
//!
//! - [`dsl`] - Symbol table, lexer, parser and diagnostics
//! - [`circuit`] - Device table, connection graph and monitor list
//! - [`error`] - Operational errors and builder result codes
//!
//! ## Usage
//!
//! ```
//! use logsim::dsl::{self, Diagnostic};
//! use logsim::{Circuit, SymbolTable};
//!
//! let source = "DEVICES: SWITCH s1 0, NAND n1 1;
//!               CONNECTIONS: s1 -> n1.I1;
//!               MONITOR: n1;";
//!
//! let mut names = SymbolTable::new();
//! let mut circuit = Circuit::new(&mut names);
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//!
//! assert!(dsl::parse(source, &mut names, &mut circuit, &mut diagnostics));
//! assert_eq!(circuit.devices().len(), 2);
//! ```
//!
//! ### CLI
//!
//! ```bash
//! logsim circuit.def
//! RUST_LOG=logsim=debug logsim circuit.def
//! ```

pub mod circuit;
pub mod dsl;
pub mod error;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use dsl::SymbolTable;
pub use error::{LogsimError, Result};
