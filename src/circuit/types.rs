//! Core types for circuit representation.

use std::fmt;

use crate::dsl::{SymbolId, SymbolTable};
use crate::error::DeviceError;

/// Largest number of inputs a multi-input gate may declare.
pub const MAX_GATE_INPUTS: u64 = 16;

/// Kinds of device a definition may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Switch,
    Clock,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Dtype,
    Rc,
}

/// What a device kind accepts after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    NotAllowed,
    Required { min: u64, max: u64 },
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 9] = [
        Self::Switch,
        Self::Clock,
        Self::And,
        Self::Nand,
        Self::Or,
        Self::Nor,
        Self::Xor,
        Self::Dtype,
        Self::Rc,
    ];

    /// Reserved words naming each kind, in [`DeviceKind::ALL`] order.
    pub const KEYWORDS: [&'static str; 9] = [
        "SWITCH", "CLOCK", "AND", "NAND", "OR", "NOR", "XOR", "DTYPE", "RC",
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Switch => "SWITCH",
            Self::Clock => "CLOCK",
            Self::And => "AND",
            Self::Nand => "NAND",
            Self::Or => "OR",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Dtype => "DTYPE",
            Self::Rc => "RC",
        }
    }

    pub fn qualifier(&self) -> Qualifier {
        match self {
            // Initial state
            Self::Switch => Qualifier::Required { min: 0, max: 1 },
            // Half period, in simulation cycles
            Self::Clock => Qualifier::Required { min: 1, max: u64::MAX },
            Self::And | Self::Nand | Self::Or | Self::Nor => Qualifier::Required {
                min: 1,
                max: MAX_GATE_INPUTS,
            },
            // Cycles the output stays high after start
            Self::Rc => Qualifier::Required { min: 1, max: u64::MAX },
            Self::Xor | Self::Dtype => Qualifier::NotAllowed,
        }
    }

    /// Check a declaration's parameter against this kind.
    pub fn check_parameter(&self, parameter: Option<u64>) -> Result<(), DeviceError> {
        match (self.qualifier(), parameter) {
            (Qualifier::NotAllowed, None) => Ok(()),
            (Qualifier::NotAllowed, Some(_)) => Err(DeviceError::QualifierNotAllowed),
            (Qualifier::Required { .. }, None) => Err(DeviceError::QualifierRequired),
            (Qualifier::Required { min, max }, Some(value)) if (min..=max).contains(&value) => {
                Ok(())
            }
            (Qualifier::Required { .. }, Some(_)) => Err(DeviceError::InvalidQualifier),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Interned names of every named port a device can have.
#[derive(Debug, Clone)]
pub struct PortNames {
    /// `I1` to `I16`
    pub gate_inputs: Vec<SymbolId>,
    pub clk: SymbolId,
    pub set: SymbolId,
    pub clear: SymbolId,
    pub data: SymbolId,
    pub q: SymbolId,
    pub qbar: SymbolId,
}

impl PortNames {
    pub fn new(names: &mut SymbolTable) -> Self {
        let gate_inputs = names.lookup_many((1..=MAX_GATE_INPUTS).map(|n| format!("I{n}")));
        let [clk, set, clear, data, q, qbar] =
            ["CLK", "SET", "CLEAR", "DATA", "Q", "QBAR"].map(|name| names.intern(name));
        Self {
            gate_inputs,
            clk,
            set,
            clear,
            data,
            q,
            qbar,
        }
    }

    /// Inputs of a device of `kind` declared with `parameter`.
    ///
    /// The parameter must already have passed [`DeviceKind::check_parameter`].
    pub fn inputs(&self, kind: DeviceKind, parameter: Option<u64>) -> Vec<SymbolId> {
        match kind {
            DeviceKind::Switch | DeviceKind::Clock | DeviceKind::Rc => Vec::new(),
            DeviceKind::Xor => self.gate_inputs[..2].to_vec(),
            DeviceKind::Dtype => vec![self.clk, self.set, self.clear, self.data],
            DeviceKind::And | DeviceKind::Nand | DeviceKind::Or | DeviceKind::Nor => {
                let count = parameter.unwrap_or(0).min(MAX_GATE_INPUTS) as usize;
                self.gate_inputs[..count].to_vec()
            }
        }
    }

    /// Outputs of a device of `kind`. `None` is the single unnamed output.
    pub fn outputs(&self, kind: DeviceKind) -> Vec<Option<SymbolId>> {
        match kind {
            DeviceKind::Dtype => vec![Some(self.q), Some(self.qbar)],
            _ => vec![None],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_match_kinds() {
        for (kind, keyword) in DeviceKind::ALL.iter().zip(DeviceKind::KEYWORDS) {
            assert_eq!(kind.keyword(), keyword);
            assert_eq!(kind.to_string(), keyword);
        }
    }

    #[test]
    fn test_switch_parameter() {
        let kind = DeviceKind::Switch;
        assert_eq!(kind.check_parameter(Some(0)), Ok(()));
        assert_eq!(kind.check_parameter(Some(1)), Ok(()));
        assert_eq!(kind.check_parameter(Some(2)), Err(DeviceError::InvalidQualifier));
        assert_eq!(kind.check_parameter(None), Err(DeviceError::QualifierRequired));
    }

    #[test]
    fn test_gate_parameter() {
        assert_eq!(DeviceKind::Nand.check_parameter(Some(16)), Ok(()));
        assert_eq!(
            DeviceKind::Nand.check_parameter(Some(17)),
            Err(DeviceError::InvalidQualifier)
        );
        assert_eq!(
            DeviceKind::Or.check_parameter(Some(0)),
            Err(DeviceError::InvalidQualifier)
        );
        assert_eq!(DeviceKind::Clock.check_parameter(Some(u64::MAX)), Ok(()));
    }

    #[test]
    fn test_parameterless_kinds() {
        assert_eq!(DeviceKind::Xor.check_parameter(None), Ok(()));
        assert_eq!(
            DeviceKind::Dtype.check_parameter(Some(3)),
            Err(DeviceError::QualifierNotAllowed)
        );
    }

    #[test]
    fn test_ports_per_kind() {
        let mut names = SymbolTable::new();
        let ports = PortNames::new(&mut names);

        let and3 = ports.inputs(DeviceKind::And, Some(3));
        let labels: Vec<_> = and3.iter().map(|&id| names.name_of(id).unwrap()).collect();
        assert_eq!(labels, ["I1", "I2", "I3"]);

        assert_eq!(ports.inputs(DeviceKind::Xor, None).len(), 2);
        assert!(ports.inputs(DeviceKind::Switch, Some(1)).is_empty());
        assert_eq!(
            ports.inputs(DeviceKind::Dtype, None),
            vec![ports.clk, ports.set, ports.clear, ports.data]
        );
        assert_eq!(
            ports.outputs(DeviceKind::Dtype),
            vec![Some(ports.q), Some(ports.qbar)]
        );
        assert_eq!(ports.outputs(DeviceKind::Clock), vec![None]);
    }
}
