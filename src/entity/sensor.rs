use super::types::{EntityState, Platform, TEMPERATURE_UNIT};
use super::Entity;
use crate::handler::{CubeDutyHandler, DeviceHandler};
use crate::parser::{duty_percentage, fields};
use std::sync::Arc;
use std::time::Duration;

/// Numeric readings of a thermostat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Temperature,
    SetTemperature,
    Valve,
    Offset,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::SetTemperature,
        SensorKind::Valve,
        SensorKind::Offset,
    ];

    /// Status record field this sensor reads
    pub fn field(&self) -> &'static str {
        match self {
            Self::Temperature => fields::TEMPERATURE,
            Self::SetTemperature => fields::SET_TEMPERATURE,
            Self::Valve => fields::VALVE,
            Self::Offset => fields::OFFSET,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature | Self::SetTemperature | Self::Offset => TEMPERATURE_UNIT,
            Self::Valve => "%",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Temperature | Self::SetTemperature => "mdi:thermometer",
            Self::Valve => "mdi:radiator",
            Self::Offset => "mdi:delta",
        }
    }

    /// Suffix appended to the device name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::SetTemperature => "Target Temperature",
            Self::Valve => "Valve",
            Self::Offset => "Offset",
        }
    }
}

/// One numeric field of a device status record
pub struct DeviceSensor {
    handler: Arc<DeviceHandler>,
    kind: SensorKind,
    name: String,
    unique_id: String,
    value: Option<f64>,
}

impl DeviceSensor {
    pub fn new(handler: Arc<DeviceHandler>, device_name: &str, kind: SensorKind) -> Self {
        let name = format!("{} - {}", device_name, kind.label());
        let unique_id = format!("{}_{}_{}", handler.cube(), handler.device(), kind.field());
        Self {
            handler,
            kind,
            name,
            unique_id,
            value: None,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[async_trait::async_trait]
impl Entity for DeviceSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn poll_interval(&self) -> Duration {
        self.handler.scan_interval()
    }

    fn unit(&self) -> Option<&'static str> {
        Some(self.kind.unit())
    }

    fn icon(&self) -> Option<&'static str> {
        Some(self.kind.icon())
    }

    async fn update(&mut self) {
        self.handler.update().await;
        self.value = self
            .handler
            .data()
            .and_then(|record| record.number(self.kind.field()));
    }

    fn state(&self) -> EntityState {
        self.value.map_or(EntityState::Unknown, EntityState::Number)
    }
}

/// Radio duty cycle of a cube, in percent
pub struct DutySensor {
    handler: Arc<CubeDutyHandler>,
    name: String,
    unique_id: String,
    value: Option<String>,
}

impl DutySensor {
    pub fn new(handler: Arc<CubeDutyHandler>, cube_name: &str) -> Self {
        let name = format!("{} - Duty cycle", cube_name);
        let unique_id = format!("{}_duty", handler.cube());
        Self {
            handler,
            name,
            unique_id,
            value: None,
        }
    }

    /// Duty percentage without the `%` suffix
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

#[async_trait::async_trait]
impl Entity for DutySensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn poll_interval(&self) -> Duration {
        self.handler.scan_interval()
    }

    fn unit(&self) -> Option<&'static str> {
        Some("%")
    }

    fn icon(&self) -> Option<&'static str> {
        Some("mdi:radio-tower")
    }

    async fn update(&mut self) {
        self.handler.update().await;
        self.value = self.handler.data().and_then(|raw| duty_percentage(&raw));
    }

    fn state(&self) -> EntityState {
        self.value
            .clone()
            .map_or(EntityState::Unknown, EntityState::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_and_icon_tables() {
        assert_eq!(SensorKind::Temperature.unit(), "°C");
        assert_eq!(SensorKind::SetTemperature.unit(), "°C");
        assert_eq!(SensorKind::Valve.unit(), "%");
        assert_eq!(SensorKind::Offset.unit(), "°C");
        assert_eq!(SensorKind::Temperature.icon(), "mdi:thermometer");
        assert_eq!(SensorKind::Valve.icon(), "mdi:radiator");
        assert_eq!(SensorKind::Offset.icon(), "mdi:delta");
    }

    #[test]
    fn fields_match_status_record() {
        let fields: Vec<_> = SensorKind::ALL.iter().map(SensorKind::field).collect();
        assert_eq!(fields, ["temperature", "set_temperature", "valve", "offset"]);
    }
}
