//! Sections and the list items they contain.
//!
//! Items are built from consumed tokens, handed to the matching builder and
//! dropped. Nothing here outlives a single item.

use super::names::SymbolId;

/// The three top-level blocks of a definition file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Devices,
    Connections,
    Monitor,
}

impl Section {
    /// All sections in the order they must appear.
    pub const ALL: [Section; 3] = [Self::Devices, Self::Connections, Self::Monitor];

    /// The header keyword opening this section.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Devices => "DEVICES",
            Self::Connections => "CONNECTIONS",
            Self::Monitor => "MONITOR",
        }
    }

    /// The section that follows this one, if any.
    pub fn next(&self) -> Option<Section> {
        match self {
            Self::Devices => Some(Self::Connections),
            Self::Connections => Some(Self::Monitor),
            Self::Monitor => None,
        }
    }
}

/// `<kind> <name> [<number>]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceItem {
    pub kind: SymbolId,
    pub name: SymbolId,
    pub parameter: Option<u64>,
}

/// A `device[.port]` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub device: SymbolId,
    pub port: Option<SymbolId>,
}

impl PortRef {
    pub fn new(device: SymbolId, port: Option<SymbolId>) -> Self {
        Self { device, port }
    }
}

/// `<source> -> <target>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionItem {
    pub source: PortRef,
    pub target: PortRef,
}

/// A monitored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorItem {
    pub port: PortRef,
}

/// Which side of a connection a port reference sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}
