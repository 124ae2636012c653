//! Gateway addressing and the fixed URL contract of the MAX! Home Automation
//! HTTP API.
//!
//! Every request the bridge issues is a plain GET built here: status and duty
//! reads for the polling handlers, the cube list for discovery and the
//! per-mode thermostat commands.

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Vacation commands park the thermostat in eco mode for a fixed period
pub const VACATION_DAYS: u32 = 365;

/// Highest address the radio protocol can carry (3 bytes)
const MAX_DEVICE_ADDRESS: u32 = 0x00FF_FFFF;

/// Host and port of one HTTP gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEndpoint {
    host: String,
    port: u16,
    base_url: String,
}

impl GatewayEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let base_url = format!("http://{}:{}/", host, port);
        Self {
            host,
            port,
            base_url,
        }
    }

    /// Build an endpoint from an already formed base URL (tests, proxies).
    /// A trailing slash is added when missing.
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            host: String::new(),
            port: 0,
            base_url,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `get-cubes-list`: whitespace separated cube addresses
    pub fn cubes_list_url(&self) -> String {
        format!("{}get-cubes-list", self.base_url)
    }

    /// Status of every device of one cube
    pub fn cube_status_url(&self, cube: &CubeAddress) -> String {
        format!("{}get-status-json?cube={}", self.base_url, cube)
    }

    /// Status of a single device
    pub fn device_status_url(&self, cube: &CubeAddress, device: DeviceAddress) -> String {
        format!(
            "{}get-status-json?cube={}&device={}",
            self.base_url, cube, device
        )
    }

    /// Radio duty cycle of one cube, answered as plain text
    pub fn duty_url(&self, cube: &CubeAddress) -> String {
        format!("{}get-duty?cube={}", self.base_url, cube)
    }

    /// Command URL for switching a thermostat into `mode`.
    ///
    /// The temperature is only carried by the modes that accept one; boost and
    /// vacation ignore it.
    pub fn command_url(
        &self,
        mode: ThermostatMode,
        cube: &CubeAddress,
        device: DeviceAddress,
        temperature: Option<f64>,
    ) -> String {
        let mut url = format!(
            "{}{}?cube={}&device={}",
            self.base_url,
            mode.command_path(),
            cube,
            device
        );
        match mode {
            ThermostatMode::Automatic | ThermostatMode::Manual => {
                if let Some(t) = temperature {
                    url.push_str(&format!("&temperature={}", t));
                }
            }
            ThermostatMode::Boost => {}
            ThermostatMode::Vacation => {
                url.push_str(&format!("&eco&days={}", VACATION_DAYS));
            }
        }
        url
    }
}

/// Operating mode as reported and accepted by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThermostatMode {
    Automatic,
    Manual,
    Boost,
    Vacation,
}

impl ThermostatMode {
    pub const ALL: [ThermostatMode; 4] = [
        ThermostatMode::Automatic,
        ThermostatMode::Manual,
        ThermostatMode::Boost,
        ThermostatMode::Vacation,
    ];

    /// Parse the `mode` field of a status record. Unknown modes yield `None`.
    pub fn from_api(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "automatic" => Some(Self::Automatic),
            "manual" => Some(Self::Manual),
            "boost" => Some(Self::Boost),
            "vacation" => Some(Self::Vacation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
            Self::Boost => "boost",
            Self::Vacation => "vacation",
        }
    }

    /// Path segment of the command endpoint for this mode
    pub fn command_path(&self) -> &'static str {
        match self {
            Self::Automatic => "set-automatic",
            Self::Manual => "set-manual",
            Self::Boost => "set-boost",
            Self::Vacation => "set-vacation",
        }
    }
}

impl fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex address of a cube, kept in the spelling it was given in. Equality and
/// hashing ignore case, so `0A1B2C` and `0a1b2c` name the same cube.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CubeAddress(String);

impl PartialEq for CubeAddress {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CubeAddress {}

impl Hash for CubeAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl CubeAddress {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BridgeError::validation(
                "cube.address",
                "Cube address cannot be empty",
            ));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BridgeError::validation(
                "cube.address".to_string(),
                format!("Not a hex address: {}", s),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CubeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CubeAddress {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CubeAddress {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CubeAddress> for String {
    fn from(a: CubeAddress) -> Self {
        a.0
    }
}

/// 24-bit radio address of a device, rendered as 6 upper-case hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAddress(u32);

impl DeviceAddress {
    pub fn new(raw: u32) -> Result<Self> {
        if raw > MAX_DEVICE_ADDRESS {
            return Err(BridgeError::validation(
                "device.address".to_string(),
                format!("Address {:X} exceeds 24 bits", raw),
            ));
        }
        Ok(Self(raw))
    }

    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(BridgeError::validation(
                "device.address",
                "Device address cannot be empty",
            ));
        }
        let raw = u32::from_str_radix(digits, 16).map_err(|e| {
            BridgeError::validation("device.address".to_string(), format!("{}: {}", s, e))
        })?;
        Self::new(raw)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Compare against the `address` field of a status record, which the
    /// gateway emits as a number but some firmware renders as hex text.
    pub fn matches_json(&self, value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::Number(n) => n.as_u64() == Some(u64::from(self.0)),
            serde_json::Value::String(s) => DeviceAddress::parse(s).is_ok_and(|a| a == *self),
            _ => false,
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

impl FromStr for DeviceAddress {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeviceAddress {
    type Error = BridgeError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<DeviceAddress> for String {
    fn from(a: DeviceAddress) -> Self {
        a.to_string()
    }
}
