use super::Entity;
use super::types::{ClimateState, EntityState, HvacMode, Platform, TEMPERATURE_UNIT};
use crate::error::{BridgeError, Result};
use crate::gateway::ThermostatMode;
use crate::handler::DeviceHandler;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::parser::{DeviceRecord, fields};
use std::sync::Arc;
use std::time::Duration;

/// Lowest settable temperature; the valve treats it as "off"
pub const MIN_TEMPERATURE: f64 = 4.5;
/// Highest settable temperature; the valve treats it as "fully open"
pub const MAX_TEMPERATURE: f64 = 30.5;

/// Issues mode/temperature commands for one thermostat.
///
/// Commands are fire-and-forget GETs; the cached snapshot is left alone and
/// the next poll reconciles it.
#[derive(Clone)]
pub struct ThermostatCommander {
    handler: Arc<DeviceHandler>,
    logger: StructuredLogger,
}

impl ThermostatCommander {
    pub fn new(handler: Arc<DeviceHandler>) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("climate")
                .with_cube(handler.cube())
                .with_device(handler.device()),
        );
        Self { handler, logger }
    }

    /// Set a new target temperature, keeping automatic mode when the device
    /// is in it and falling back to manual otherwise. `None` is rejected
    /// without a request.
    /// Boost and vacation carry no temperature, so setting one from either
    /// mode switches the device to manual.
    pub async fn set_temperature(&self, temperature: Option<f64>) -> bool {
        let Some(temperature) = temperature else {
            return false;
        };
        let mode = match self.handler.data().and_then(|r| r.mode()) {
            Some(ThermostatMode::Automatic) => ThermostatMode::Automatic,
            _ => ThermostatMode::Manual,
        };
        self.send(mode, Some(temperature)).await
    }

    /// Switch to the gateway mode paired with `mode`
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> bool {
        self.send(mode.into(), None).await
    }

    /// Issue the raw command for `mode`; failures are logged
    pub async fn send(&self, mode: ThermostatMode, temperature: Option<f64>) -> bool {
        match self.try_send(mode, temperature).await {
            Ok(()) => true,
            Err(e) => {
                self.logger.error(&e.to_string());
                false
            }
        }
    }

    pub async fn try_send(&self, mode: ThermostatMode, temperature: Option<f64>) -> Result<()> {
        let url = self.handler.endpoint().command_url(
            mode,
            self.handler.cube(),
            self.handler.device(),
            temperature,
        );
        self.logger.debug(&format!("Command to be called: {}", url));

        self.handler
            .fetcher()
            .fetch_text(&url)
            .await
            .map(|_| ())
            .map_err(|e| BridgeError::command(format!("{} failed: {}", mode, e)))
    }
}

/// Thermostat as a climate entity
pub struct ClimateEntity {
    handler: Arc<DeviceHandler>,
    commander: ThermostatCommander,
    name: String,
    unique_id: String,
    record: Option<Arc<DeviceRecord>>,
}

impl ClimateEntity {
    pub fn new(handler: Arc<DeviceHandler>, name: &str) -> Self {
        let unique_id = format!("{}_{}_climate", handler.cube(), handler.device());
        Self {
            commander: ThermostatCommander::new(handler.clone()),
            handler,
            name: name.to_string(),
            unique_id,
            record: None,
        }
    }

    pub fn commander(&self) -> ThermostatCommander {
        self.commander.clone()
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.record.as_ref()?.number(fields::TEMPERATURE)
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.record.as_ref()?.number(fields::SET_TEMPERATURE)
    }

    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.record.as_ref()?.mode().map(HvacMode::from)
    }

    pub fn hvac_modes(&self) -> &'static [HvacMode] {
        &HvacMode::ALL
    }

    pub fn min_temp(&self) -> f64 {
        MIN_TEMPERATURE
    }

    pub fn max_temp(&self) -> f64 {
        MAX_TEMPERATURE
    }

    pub async fn set_temperature(&self, temperature: Option<f64>) -> bool {
        self.commander.set_temperature(temperature).await
    }

    pub async fn set_hvac_mode(&self, mode: HvacMode) -> bool {
        self.commander.set_hvac_mode(mode).await
    }
}

#[async_trait::async_trait]
impl Entity for ClimateEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn platform(&self) -> Platform {
        Platform::Climate
    }

    fn poll_interval(&self) -> Duration {
        self.handler.scan_interval()
    }

    fn unit(&self) -> Option<&'static str> {
        Some(TEMPERATURE_UNIT)
    }

    async fn update(&mut self) {
        self.handler.update().await;
        self.record = self.handler.data();
    }

    fn state(&self) -> EntityState {
        if self.record.is_none() {
            return EntityState::Unknown;
        }
        EntityState::Climate(ClimateState {
            current_temperature: self.current_temperature(),
            target_temperature: self.target_temperature(),
            hvac_mode: self.hvac_mode(),
        })
    }
}
