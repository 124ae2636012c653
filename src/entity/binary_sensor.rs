use super::types::{EntityState, Platform};
use super::Entity;
use crate::handler::DeviceHandler;
use crate::parser::fields;
use std::sync::Arc;
use std::time::Duration;

/// Boolean flags of a device status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinarySensorKind {
    Error,
    Initialized,
    BatteryLow,
    PanelLocked,
    LinkError,
    ShutterOpen,
}

impl BinarySensorKind {
    pub const ALL: [BinarySensorKind; 6] = [
        BinarySensorKind::Error,
        BinarySensorKind::Initialized,
        BinarySensorKind::BatteryLow,
        BinarySensorKind::PanelLocked,
        BinarySensorKind::LinkError,
        BinarySensorKind::ShutterOpen,
    ];

    pub fn field(&self) -> &'static str {
        match self {
            Self::Error => fields::ERROR,
            Self::Initialized => fields::INITIALIZED,
            Self::BatteryLow => fields::BATTERY_LOW,
            Self::PanelLocked => fields::PANEL_LOCKED,
            Self::LinkError => fields::LINK_ERROR,
            Self::ShutterOpen => fields::OPEN,
        }
    }

    pub fn device_class(&self) -> &'static str {
        match self {
            Self::Error => "problem",
            Self::Initialized => "plug",
            Self::BatteryLow => "battery",
            Self::PanelLocked => "lock",
            Self::LinkError => "connectivity",
            Self::ShutterOpen => "window",
        }
    }

    /// The lock and connectivity classes are "on" when unlocked / connected,
    /// the opposite of what the gateway flags report.
    pub fn inverted(&self) -> bool {
        matches!(self, Self::PanelLocked | Self::LinkError)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Initialized => "Initialized",
            Self::BatteryLow => "Low battery",
            Self::PanelLocked => "Unlocked",
            Self::LinkError => "Link",
            Self::ShutterOpen => "Open window",
        }
    }

    /// Translate a raw flag into the exposed value.
    ///
    /// A device that never reported `initialized` is exposed as not
    /// initialized; every other kind reports absence as no value.
    pub fn expose(&self, raw: Option<bool>) -> Option<bool> {
        match raw {
            Some(flag) => Some(flag != self.inverted()),
            None if *self == Self::Initialized => Some(false),
            None => None,
        }
    }
}

/// One boolean flag of a device status record
pub struct BinarySensor {
    handler: Arc<DeviceHandler>,
    kind: BinarySensorKind,
    name: String,
    unique_id: String,
    raw: Option<bool>,
}

impl BinarySensor {
    pub fn new(handler: Arc<DeviceHandler>, device_name: &str, kind: BinarySensorKind) -> Self {
        let name = format!("{} - {}", device_name, kind.label());
        let unique_id = format!("{}_{}_{}", handler.cube(), handler.device(), kind.field());
        Self {
            handler,
            kind,
            name,
            unique_id,
            raw: None,
        }
    }

    pub fn kind(&self) -> BinarySensorKind {
        self.kind
    }

    pub fn is_on(&self) -> Option<bool> {
        self.kind.expose(self.raw)
    }
}

#[async_trait::async_trait]
impl Entity for BinarySensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn platform(&self) -> Platform {
        Platform::BinarySensor
    }

    fn poll_interval(&self) -> Duration {
        self.handler.scan_interval()
    }

    fn device_class(&self) -> Option<&'static str> {
        Some(self.kind.device_class())
    }

    async fn update(&mut self) {
        self.handler.update().await;
        self.raw = self
            .handler
            .data()
            .and_then(|record| record.flag(self.kind.field()));
    }

    fn state(&self) -> EntityState {
        self.is_on().map_or(EntityState::Unknown, EntityState::Binary)
    }
}
