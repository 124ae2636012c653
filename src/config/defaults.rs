use super::*;

pub(super) const DEFAULT_PORT: u16 = 8080;
pub(super) const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            scan_interval: DEFAULT_SCAN_INTERVAL_SECS,
            discover: true,
            cubes: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/maxbridge.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateways: vec![GatewayConfig::default()],
            logging: LoggingConfig::default(),
        }
    }
}
