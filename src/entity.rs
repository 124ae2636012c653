//! Entity adapters
//!
//! Read-only projections over a handler's cached snapshot. Each adapter calls
//! its handler's `update()` on its own poll tick, then copies the one field it
//! exposes and translates it into the platform's representation.

use std::time::Duration;

mod binary_sensor;
mod climate;
mod sensor;
mod types;

pub use binary_sensor::{BinarySensor, BinarySensorKind};
pub use climate::{ClimateEntity, MAX_TEMPERATURE, MIN_TEMPERATURE, ThermostatCommander};
pub use sensor::{DeviceSensor, DutySensor, SensorKind};
pub use types::{ClimateState, EntityState, HvacMode, Platform, TEMPERATURE_UNIT};

/// A polled entity as seen by the host platform
#[async_trait::async_trait]
pub trait Entity: Send + Sync {
    /// Display name, e.g. `"Living room - Temperature"`
    fn name(&self) -> &str;

    /// Stable identifier derived from cube, device and entity kind
    fn unique_id(&self) -> &str;

    fn platform(&self) -> Platform;

    /// How often the host should call `update()`
    fn poll_interval(&self) -> Duration;

    /// Unit of measurement, if any
    fn unit(&self) -> Option<&'static str> {
        None
    }

    /// Icon hint for front ends, if any
    fn icon(&self) -> Option<&'static str> {
        None
    }

    /// Device class hint for front ends, if any
    fn device_class(&self) -> Option<&'static str> {
        None
    }

    /// Refresh through the shared handler and re-read the exposed value
    async fn update(&mut self);

    /// Value as of the last `update()`
    fn state(&self) -> EntityState;
}
