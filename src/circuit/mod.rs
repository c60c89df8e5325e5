//! Circuit graph representation and validation.
//!
//! [`Circuit`] is the builder the parser drives: it keeps the device table,
//! the wiring between device ports and the list of monitored outputs, and
//! refuses anything that does not fit the device kinds it knows.

mod graph;
mod types;
mod validate;

pub use graph::{Circuit, Device, Input};
pub use types::*;
pub use validate::unconnected_inputs;
