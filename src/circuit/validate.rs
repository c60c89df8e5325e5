//! Circuit validation.

use super::Circuit;
use crate::dsl::PortRef;

/// Find every input that nothing drives.
///
/// A circuit is complete when this is empty.
pub fn unconnected_inputs(circuit: &Circuit) -> Vec<PortRef> {
    circuit
        .devices()
        .iter()
        .flat_map(|device| {
            device
                .inputs
                .iter()
                .filter(|input| input.source.is_none())
                .map(move |input| PortRef::new(device.name, Some(input.port)))
        })
        .collect()
}
