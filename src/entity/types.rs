use crate::gateway::ThermostatMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit used for every temperature the gateway reports
pub const TEMPERATURE_UNIT: &str = "°C";

/// Kind of entity, mirroring the host platform's component split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Climate,
    Sensor,
    BinarySensor,
}

/// Platform-side operation mode of a thermostat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Auto,
    HeatCool,
    Heat,
    Off,
}

impl HvacMode {
    pub const ALL: [HvacMode; 4] = [HvacMode::Auto, HvacMode::HeatCool, HvacMode::Heat, HvacMode::Off];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::HeatCool => "heat_cool",
            Self::Heat => "heat",
            Self::Off => "off",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "heat_cool" => Some(Self::HeatCool),
            "heat" => Some(Self::Heat),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Map a raw gateway mode string; unknown modes yield `None`
    pub fn from_api(raw: &str) -> Option<Self> {
        ThermostatMode::from_api(raw).map(Self::from)
    }
}

impl From<ThermostatMode> for HvacMode {
    fn from(mode: ThermostatMode) -> Self {
        match mode {
            ThermostatMode::Automatic => HvacMode::Auto,
            ThermostatMode::Manual => HvacMode::HeatCool,
            ThermostatMode::Boost => HvacMode::Heat,
            ThermostatMode::Vacation => HvacMode::Off,
        }
    }
}

impl From<HvacMode> for ThermostatMode {
    fn from(mode: HvacMode) -> Self {
        match mode {
            HvacMode::Auto => ThermostatMode::Automatic,
            HvacMode::HeatCool => ThermostatMode::Manual,
            HvacMode::Heat => ThermostatMode::Boost,
            HvacMode::Off => ThermostatMode::Vacation,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Climate entity readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub hvac_mode: Option<HvacMode>,
}

/// Exposed value of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntityState {
    /// No value: never reported, fetch failed or field missing
    Unknown,
    Number(f64),
    Text(String),
    Binary(bool),
    Climate(ClimateState),
}

impl EntityState {
    pub fn is_unknown(&self) -> bool {
        matches!(self, EntityState::Unknown)
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityState::Unknown => f.write_str("unknown"),
            EntityState::Number(v) => write!(f, "{}", v),
            EntityState::Text(s) => f.write_str(s),
            EntityState::Binary(true) => f.write_str("on"),
            EntityState::Binary(false) => f.write_str("off"),
            EntityState::Climate(c) => {
                let fmt_opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |t| t.to_string());
                write!(
                    f,
                    "{} current={} target={}",
                    c.hvac_mode.map_or("unknown", |m| m.as_str()),
                    fmt_opt(c.current_temperature),
                    fmt_opt(c.target_temperature)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_table_is_fixed() {
        assert_eq!(HvacMode::from_api("automatic"), Some(HvacMode::Auto));
        assert_eq!(HvacMode::from_api("manual"), Some(HvacMode::HeatCool));
        assert_eq!(HvacMode::from_api("boost"), Some(HvacMode::Heat));
        assert_eq!(HvacMode::from_api("vacation"), Some(HvacMode::Off));
        assert_eq!(HvacMode::from_api("eco"), None);
        assert_eq!(HvacMode::from_api(""), None);
    }

    #[test]
    fn mode_table_round_trips_through_commands() {
        for mode in HvacMode::ALL {
            let cmd: ThermostatMode = mode.into();
            assert_eq!(HvacMode::from(cmd), mode);
            assert_eq!(HvacMode::from_label(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn state_serializes_tagged() {
        let s = serde_json::to_value(EntityState::Binary(true)).unwrap();
        assert_eq!(s, serde_json::json!({"kind": "binary", "value": true}));
        let u = serde_json::to_value(EntityState::Unknown).unwrap();
        assert_eq!(u, serde_json::json!({"kind": "unknown"}));
    }

    #[test]
    fn state_display() {
        assert_eq!(EntityState::Binary(false).to_string(), "off");
        assert_eq!(EntityState::Number(21.5).to_string(), "21.5");
        let c = EntityState::Climate(ClimateState {
            current_temperature: Some(20.0),
            target_temperature: None,
            hvac_mode: Some(HvacMode::Auto),
        });
        assert_eq!(c.to_string(), "auto current=20 target=-");
    }
}
