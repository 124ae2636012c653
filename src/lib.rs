//! # maxbridge - MAX! cube polling bridge
//!
//! Polls a MAX! Home Automation HTTP gateway and exposes its radiator
//! thermostats, wall thermostats, window shutter contacts and eco buttons as
//! climate, sensor and binary sensor entities.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration and validation
//! - `logging`: Structured logging and tracing
//! - `gateway`: Addresses, modes and URL building for the gateway API
//! - `fetch`: HTTP access behind the `Fetcher` trait
//! - `parser`: Status document decoding
//! - `handler`: Throttled, mutually exclusive polling caches
//! - `entity`: Climate, sensor and binary sensor adapters
//! - `platform`: Entity setup from configuration and discovery
//! - `bridge`: Poll runner and status board

pub mod bridge;
pub mod config;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod handler;
pub mod logging;
pub mod parser;
pub mod platform;

// Re-export commonly used types
pub use bridge::Bridge;
pub use config::Config;
pub use error::{BridgeError, Result};
pub use platform::PlatformSetup;
