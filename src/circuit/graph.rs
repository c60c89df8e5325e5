//! Circuit graph structure.

use std::collections::HashMap;

use tracing::debug;

use super::types::{DeviceKind, PortNames};
use super::validate::unconnected_inputs;
use crate::dsl::{
    ConnectionBuilder, DeviceBuilder, DevicePorts, MonitorBuilder, PortDirection, PortRef,
    SymbolId, SymbolTable,
};
use crate::error::{ConnectionError, DeviceError, MonitorError, Result};

/// One input port and what drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub port: SymbolId,
    /// The output feeding this input, once connected
    pub source: Option<PortRef>,
}

/// A declared device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Device name
    pub name: SymbolId,
    /// Device kind
    pub kind: DeviceKind,
    /// Parameter given after the name, if any
    pub parameter: Option<u64>,
    /// Inputs in declaration order
    pub inputs: Vec<Input>,
    /// Outputs; `None` is the single unnamed output
    pub outputs: Vec<Option<SymbolId>>,
}

impl Device {
    /// Which side of the device `port` is on, if it exists.
    pub fn port_direction(&self, port: Option<SymbolId>) -> Option<PortDirection> {
        if self.outputs.contains(&port) {
            return Some(PortDirection::Output);
        }
        let port = port?;
        self.inputs
            .iter()
            .any(|input| input.port == port)
            .then_some(PortDirection::Input)
    }

    fn input_mut(&mut self, port: SymbolId) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|input| input.port == port)
    }
}

/// A logic circuit built from a definition: devices, the wiring between
/// them and the outputs to monitor.
#[derive(Debug)]
pub struct Circuit {
    /// Device kind behind each kind keyword's symbol id
    kinds: HashMap<SymbolId, DeviceKind>,

    /// Interned port names
    ports: PortNames,

    /// Devices in declaration order
    devices: Vec<Device>,

    /// Mapping from device names to indices in `devices`
    device_map: HashMap<SymbolId, usize>,

    /// Monitored outputs in declaration order
    monitors: Vec<PortRef>,
}

impl Circuit {
    /// Create an empty circuit, interning its kind keywords and port names.
    pub fn new(names: &mut SymbolTable) -> Self {
        let kinds = DeviceKind::ALL
            .into_iter()
            .map(|kind| (names.intern(kind.keyword()), kind))
            .collect();
        Self {
            kinds,
            ports: PortNames::new(names),
            devices: Vec::new(),
            device_map: HashMap::new(),
            monitors: Vec::new(),
        }
    }

    /// Get all devices in declaration order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Find a device by name.
    pub fn device(&self, name: SymbolId) -> Option<&Device> {
        self.device_map.get(&name).map(|&idx| &self.devices[idx])
    }

    /// Every connection as `(output, input)`.
    pub fn connections(&self) -> impl Iterator<Item = (PortRef, PortRef)> + '_ {
        self.devices.iter().flat_map(|device| {
            device.inputs.iter().filter_map(move |input| {
                input
                    .source
                    .map(|source| (source, PortRef::new(device.name, Some(input.port))))
            })
        })
    }

    pub fn monitors(&self) -> &[PortRef] {
        &self.monitors
    }

    /// Render a port as `device` or `device.port`.
    pub fn port_label(&self, names: &SymbolTable, port: PortRef) -> Result<String> {
        let device = names.name_of(port.device)?;
        match port.port {
            Some(id) => Ok(format!("{device}.{}", names.name_of(id)?)),
            None => Ok(device.to_string()),
        }
    }

    fn device_mut(&mut self, name: SymbolId) -> Option<&mut Device> {
        let idx = *self.device_map.get(&name)?;
        self.devices.get_mut(idx)
    }

    fn direction_of(&self, port: PortRef) -> std::result::Result<PortDirection, ConnectionError> {
        self.device(port.device)
            .ok_or(ConnectionError::DeviceNotDefined)?
            .port_direction(port.port)
            .ok_or(ConnectionError::PortNotFound)
    }

    /// Record `source` as the driver of the input `target`.
    fn connect(&mut self, source: PortRef, target: PortRef) -> std::result::Result<(), ConnectionError> {
        let port = target.port.ok_or(ConnectionError::PortNotFound)?;
        let input = self
            .device_mut(target.device)
            .and_then(|device| device.input_mut(port))
            .ok_or(ConnectionError::PortNotFound)?;
        if input.source.is_some() {
            return Err(ConnectionError::InputAlreadyConnected);
        }
        input.source = Some(source);
        Ok(())
    }
}

impl DeviceBuilder for Circuit {
    fn device_kinds(&self) -> &[&str] {
        &DeviceKind::KEYWORDS
    }

    fn make_device(
        &mut self,
        name: SymbolId,
        kind: SymbolId,
        parameter: Option<u64>,
    ) -> std::result::Result<(), DeviceError> {
        let kind = *self.kinds.get(&kind).ok_or(DeviceError::BadDeviceKind)?;
        if self.device_map.contains_key(&name) {
            return Err(DeviceError::DeviceAlreadyExists);
        }
        kind.check_parameter(parameter)?;

        let device = Device {
            name,
            kind,
            parameter,
            inputs: self
                .ports
                .inputs(kind, parameter)
                .into_iter()
                .map(|port| Input { port, source: None })
                .collect(),
            outputs: self.ports.outputs(kind),
        };
        debug!(%name, %kind, inputs = device.inputs.len(), "device declared");
        self.device_map.insert(name, self.devices.len());
        self.devices.push(device);
        Ok(())
    }

    fn get_device(&self, device: SymbolId) -> Option<DevicePorts> {
        let device = self.device(device)?;
        Some(DevicePorts {
            inputs: device.inputs.iter().map(|input| input.port).collect(),
            outputs: device.outputs.iter().flatten().copied().collect(),
        })
    }
}

impl ConnectionBuilder for Circuit {
    fn make_connection(
        &mut self,
        source: SymbolId,
        source_port: Option<SymbolId>,
        target: SymbolId,
        target_port: Option<SymbolId>,
    ) -> std::result::Result<(), ConnectionError> {
        let first = PortRef::new(source, source_port);
        let second = PortRef::new(target, target_port);

        match (self.direction_of(first)?, self.direction_of(second)?) {
            (PortDirection::Output, PortDirection::Input) => self.connect(first, second),
            // Written backwards; the input end is still the one recorded.
            (PortDirection::Input, PortDirection::Output) => self.connect(second, first),
            (PortDirection::Input, PortDirection::Input) => Err(ConnectionError::InputToInput),
            (PortDirection::Output, PortDirection::Output) => Err(ConnectionError::OutputToOutput),
        }
    }

    fn check_network(&self) -> bool {
        let missing = unconnected_inputs(self);
        if !missing.is_empty() {
            debug!(unconnected = missing.len(), "network incomplete");
        }
        missing.is_empty()
    }
}

impl MonitorBuilder for Circuit {
    fn make_monitor(
        &mut self,
        device: SymbolId,
        port: Option<SymbolId>,
    ) -> std::result::Result<(), MonitorError> {
        let monitored = PortRef::new(device, port);
        let direction = self
            .device(device)
            .ok_or(MonitorError::DeviceNotDefined)?
            .port_direction(port);
        if direction != Some(PortDirection::Output) {
            return Err(MonitorError::PortNotAnOutput);
        }
        if self.monitors.contains(&monitored) {
            return Err(MonitorError::AlreadyMonitored);
        }
        self.monitors.push(monitored);
        Ok(())
    }
}
