//! Response parsing for the gateway API
//!
//! Status documents come in two shapes depending on the query: a cube-wide
//! object carrying a `devices` array, or a single device object. Both are
//! normalised to "find the record whose `address` matches".

use crate::error::{BridgeError, Result};
use crate::gateway::{CubeAddress, DeviceAddress, ThermostatMode};
use serde_json::{Map, Value};

/// Field names of a device status record
pub mod fields {
    pub const DEVICES: &str = "devices";
    pub const ADDRESS: &str = "address";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const TEMPERATURE: &str = "temperature";
    pub const SET_TEMPERATURE: &str = "set_temperature";
    pub const MODE: &str = "mode";
    pub const VALVE: &str = "valve";
    pub const OFFSET: &str = "offset";
    pub const ERROR: &str = "error";
    pub const INITIALIZED: &str = "initialized";
    pub const BATTERY_LOW: &str = "battery_low";
    pub const PANEL_LOCKED: &str = "panel_locked";
    pub const LINK_ERROR: &str = "link_error";
    pub const OPEN: &str = "open";
}

/// Kind of device as named by the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    RadiatorThermostat,
    WallThermostat,
    ShutterContact,
    EcoButton,
}

impl DeviceKind {
    pub fn from_api(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "radiator thermostat" => Some(Self::RadiatorThermostat),
            "wall thermostat" => Some(Self::WallThermostat),
            "shutter contact" => Some(Self::ShutterContact),
            "eco button" => Some(Self::EcoButton),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RadiatorThermostat => "radiator thermostat",
            Self::WallThermostat => "wall thermostat",
            Self::ShutterContact => "shutter contact",
            Self::EcoButton => "eco button",
        }
    }
}

/// One device status record, as last reported by the gateway
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceRecord {
    fields: Map<String, Value>,
}

impl DeviceRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    /// Numeric field; numeric strings are accepted as well
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean field; 0/1 numbers are accepted as well
    pub fn flag(&self, field: &str) -> Option<bool> {
        match self.get(field)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.text(fields::NAME)
    }

    pub fn kind(&self) -> Option<DeviceKind> {
        self.text(fields::TYPE).and_then(DeviceKind::from_api)
    }

    pub fn mode(&self) -> Option<ThermostatMode> {
        self.text(fields::MODE).and_then(ThermostatMode::from_api)
    }

    /// Address of the record, whether reported as number or hex text
    pub fn address(&self) -> Option<DeviceAddress> {
        match self.get(fields::ADDRESS)? {
            Value::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(|v| DeviceAddress::new(v).ok()),
            Value::String(s) => DeviceAddress::parse(s).ok(),
            _ => None,
        }
    }

    pub fn has_address(&self, address: DeviceAddress) -> bool {
        self.get(fields::ADDRESS)
            .is_some_and(|v| address.matches_json(v))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Every device record of one cube
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CubeSnapshot {
    devices: Vec<DeviceRecord>,
}

impl CubeSnapshot {
    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn device_by_address(&self, address: DeviceAddress) -> Option<&DeviceRecord> {
        self.devices.iter().find(|d| d.has_address(address))
    }
}

/// Decode a status body. Anything but a JSON object is a parse error.
pub fn parse_document(body: &str) -> Result<Value> {
    let doc: Value = serde_json::from_str(body)?;
    if !doc.is_object() {
        return Err(BridgeError::parse(format!(
            "Expected a JSON object, got {}",
            json_kind(&doc)
        )));
    }
    Ok(doc)
}

/// All records of a status document, whichever shape it has
pub fn device_records(doc: &Value) -> Result<Vec<DeviceRecord>> {
    match doc.get(fields::DEVICES) {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_object)
            .map(|m| DeviceRecord::new(m.clone()))
            .collect()),
        Some(other) => Err(BridgeError::parse(format!(
            "`devices` must be an array, got {}",
            json_kind(other)
        ))),
        None => match doc.as_object() {
            Some(m) if m.contains_key(fields::ADDRESS) => Ok(vec![DeviceRecord::new(m.clone())]),
            Some(_) => Ok(Vec::new()),
            None => Err(BridgeError::parse("Expected a JSON object")),
        },
    }
}

/// Locate the record for `address` in either document shape
pub fn locate_device(doc: &Value, address: DeviceAddress) -> Result<Option<DeviceRecord>> {
    Ok(device_records(doc)?
        .into_iter()
        .find(|d| d.has_address(address)))
}

/// Parse a body into a whole-cube snapshot
pub fn parse_cube_snapshot(body: &str) -> Result<CubeSnapshot> {
    let doc = parse_document(body)?;
    Ok(CubeSnapshot {
        devices: device_records(&doc)?,
    })
}

/// `get-cubes-list` answers with whitespace separated addresses; entries
/// that are not hex are skipped.
pub fn parse_cube_list(body: &str) -> Vec<CubeAddress> {
    body.split_whitespace()
        .filter_map(|s| CubeAddress::parse(s).ok())
        .collect()
}

/// Duty cycle text as shown to users: whitespace trimmed and the trailing
/// `%` removed. Empty input yields `None`.
pub fn duty_percentage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let value = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
