//! Configuration management for maxbridge
//!
//! This module handles loading, validation, and management of the bridge
//! configuration from YAML files, with the file location overridable through
//! the `MAXBRIDGE_CONFIG` environment variable.

use crate::error::{BridgeError, Result};
use crate::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

mod defaults;

/// Environment variable naming the configuration file to load
pub const CONFIG_PATH_ENV: &str = "MAXBRIDGE_CONFIG";

/// Longest accepted scan interval (one day)
pub const MAX_SCAN_INTERVAL_SECS: u64 = 86_400;

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    defaults::DEFAULT_PORT
}

fn default_scan_interval() -> u64 {
    defaults::DEFAULT_SCAN_INTERVAL_SECS
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP gateways to poll
    pub gateways: Vec<GatewayConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One MAX! Home Automation HTTP gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host name or IP address of the gateway
    pub host: String,

    /// TCP port (typically 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between permitted network fetches per handler
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,

    /// Ask the gateway for its cube list and add devices of unconfigured cubes
    #[serde(default = "default_true")]
    pub discover: bool,

    /// Statically configured cubes and their devices
    #[serde(default)]
    pub cubes: Vec<CubeConfig>,
}

/// One cube and its devices grouped by kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeConfig {
    /// Hex address of the cube
    pub address: String,

    #[serde(default)]
    pub radiator_thermostats: Vec<DeviceConfig>,

    #[serde(default)]
    pub wall_thermostats: Vec<DeviceConfig>,

    #[serde(default)]
    pub window_shutters: Vec<DeviceConfig>,

    #[serde(default)]
    pub eco_buttons: Vec<DeviceConfig>,
}

/// A single device below a cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Hex address of the device
    pub address: String,

    /// Display name used as entity name prefix
    pub name: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional console-specific level
    pub console_level: Option<String>,

    /// Optional file-specific level
    pub file_level: Option<String>,

    /// Path to log file (its directory receives the rolling files)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl GatewayConfig {
    pub fn endpoint(&self) -> GatewayEndpoint {
        GatewayEndpoint::new(self.host.clone(), self.port)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval)
    }
}

impl CubeConfig {
    pub fn cube_address(&self) -> Result<CubeAddress> {
        CubeAddress::parse(&self.address)
    }

    /// Every configured device of this cube, in kind order
    pub fn all_devices(&self) -> impl Iterator<Item = &DeviceConfig> {
        self.radiator_thermostats
            .iter()
            .chain(self.wall_thermostats.iter())
            .chain(self.window_shutters.iter())
            .chain(self.eco_buttons.iter())
    }
}

impl DeviceConfig {
    pub fn device_address(&self) -> Result<DeviceAddress> {
        DeviceAddress::parse(&self.address)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from `MAXBRIDGE_CONFIG` or the default locations
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let default_paths = [
            "maxbridge.yaml",
            "/data/maxbridge.yaml",
            "/etc/maxbridge/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.gateways.is_empty() {
            return Err(BridgeError::validation(
                "gateways",
                "At least one gateway is required",
            ));
        }

        // Cube and device addresses make up entity ids, so both must be unique
        let mut cubes = HashSet::new();
        for (i, gw) in self.gateways.iter().enumerate() {
            if gw.host.trim().is_empty() {
                return Err(BridgeError::validation(
                    format!("gateways[{}].host", i),
                    "Host cannot be empty".to_string(),
                ));
            }

            if gw.port == 0 {
                return Err(BridgeError::validation(
                    format!("gateways[{}].port", i),
                    "Port must be greater than 0".to_string(),
                ));
            }

            if gw.scan_interval == 0 || gw.scan_interval > MAX_SCAN_INTERVAL_SECS {
                return Err(BridgeError::validation(
                    format!("gateways[{}].scan_interval", i),
                    format!("Must be between 1 and {} seconds", MAX_SCAN_INTERVAL_SECS),
                ));
            }

            for (j, cube) in gw.cubes.iter().enumerate() {
                let address = cube.cube_address().map_err(|e| {
                    BridgeError::validation(format!("gateways[{}].cubes[{}].address", i, j), e.to_string())
                })?;
                if !cubes.insert(address) {
                    return Err(BridgeError::validation(
                        format!("gateways[{}].cubes[{}].address", i, j),
                        format!("Cube {} is configured more than once", cube.address),
                    ));
                }

                let mut devices = HashSet::new();
                for dev in cube.all_devices() {
                    let device = dev.device_address().map_err(|e| {
                        BridgeError::validation(
                            format!("gateways[{}].cubes[{}].{}", i, j, dev.name),
                            e.to_string(),
                        )
                    })?;
                    if dev.name.trim().is_empty() {
                        return Err(BridgeError::validation(
                            format!("gateways[{}].cubes[{}].{}", i, j, dev.address),
                            "Device name cannot be empty".to_string(),
                        ));
                    }
                    if !devices.insert(device) {
                        return Err(BridgeError::validation(
                            format!("gateways[{}].cubes[{}].{}", i, j, dev.address),
                            format!("Device {} is listed more than once", device),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
