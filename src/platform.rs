//! Entity setup
//!
//! Turns the configuration (and, where enabled, the gateway's own cube list)
//! into handlers and the entities that read from them. Every device gets one
//! [`DeviceHandler`] shared by all of its entities; every cube gets one
//! [`CubeDutyHandler`].

use crate::config::Config;
use crate::entity::{
    BinarySensor, BinarySensorKind, ClimateEntity, DeviceSensor, DutySensor, Entity, SensorKind,
    ThermostatCommander,
};
use crate::error::{BridgeError, Result};
use crate::fetch::Fetcher;
use crate::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use crate::handler::{CubeDutyHandler, CubeHandler, DeviceHandler, UpdateOutcome};
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use crate::parser::{DeviceKind, parse_cube_list};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Ask a gateway which cubes it knows about
pub async fn discover_cubes(
    fetcher: &dyn Fetcher,
    endpoint: &GatewayEndpoint,
) -> Result<Vec<CubeAddress>> {
    let body = fetcher.fetch_text(&endpoint.cubes_list_url()).await?;
    Ok(parse_cube_list(&body))
}

/// Numeric sensors created for a device kind
pub fn sensors_for(kind: DeviceKind) -> &'static [SensorKind] {
    match kind {
        DeviceKind::RadiatorThermostat => &SensorKind::ALL,
        DeviceKind::WallThermostat => &[SensorKind::Temperature, SensorKind::SetTemperature],
        DeviceKind::ShutterContact | DeviceKind::EcoButton => &[],
    }
}

/// Binary sensors created for a device kind
pub fn binary_sensors_for(kind: DeviceKind) -> &'static [BinarySensorKind] {
    use BinarySensorKind as B;
    match kind {
        DeviceKind::RadiatorThermostat | DeviceKind::WallThermostat | DeviceKind::EcoButton => &[
            B::Error,
            B::Initialized,
            B::BatteryLow,
            B::PanelLocked,
            B::LinkError,
        ],
        DeviceKind::ShutterContact => &[
            B::Error,
            B::Initialized,
            B::BatteryLow,
            B::LinkError,
            B::ShutterOpen,
        ],
    }
}

fn has_climate(kind: DeviceKind) -> bool {
    matches!(
        kind,
        DeviceKind::RadiatorThermostat | DeviceKind::WallThermostat
    )
}

/// Everything the poll runner needs: the entities, plus a command handle per
/// climate entity keyed by its unique id
#[derive(Default)]
pub struct PlatformSetup {
    pub entities: Vec<Box<dyn Entity>>,
    pub commanders: BTreeMap<String, ThermostatCommander>,
}

/// Per-gateway values every handler of that gateway is built with
struct GatewayScope {
    endpoint: GatewayEndpoint,
    interval: Duration,
    fetcher: Arc<dyn Fetcher>,
    logger: StructuredLogger,
}

impl PlatformSetup {
    /// Build handlers and entities for every configured gateway.
    ///
    /// Unreachable gateways are logged and skipped; the call only fails when
    /// no gateway could be set up at all, or when the configuration holds an
    /// address that does not parse.
    pub async fn setup(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let logger = get_logger("platform");
        let mut setup = Self::default();
        let mut failures = Vec::new();

        for gateway in &config.gateways {
            let scope = GatewayScope {
                endpoint: gateway.endpoint(),
                interval: gateway.scan_interval(),
                fetcher: fetcher.clone(),
                logger: get_logger_with_context(
                    LogContext::new("platform")
                        .with_field("gateway", format!("{}:{}", gateway.host, gateway.port)),
                ),
            };

            let mut configured = HashSet::new();
            for cube in &gateway.cubes {
                let address = cube.cube_address()?;
                setup.add_cube(&scope, &address);
                for (kind, devices) in [
                    (DeviceKind::RadiatorThermostat, &cube.radiator_thermostats),
                    (DeviceKind::WallThermostat, &cube.wall_thermostats),
                    (DeviceKind::ShutterContact, &cube.window_shutters),
                    (DeviceKind::EcoButton, &cube.eco_buttons),
                ] {
                    for device in devices {
                        setup.add_device(
                            &scope,
                            &address,
                            device.device_address()?,
                            &device.name,
                            kind,
                        );
                    }
                }
                configured.insert(address);
            }

            if gateway.discover
                && let Err(e) = setup.discover(&scope, &configured).await
            {
                scope
                    .logger
                    .error(&format!("Unable to reach gateway: {}", e));
                failures.push(e);
            }
        }

        if !config.gateways.is_empty() && failures.len() == config.gateways.len() {
            let detail = failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BridgeError::generic(format!(
                "No gateway could be set up: {}",
                detail
            )));
        }

        logger.info(&format!(
            "Set up {} entities ({} thermostats)",
            setup.entities.len(),
            setup.commanders.len()
        ));
        Ok(setup)
    }

    async fn discover(
        &mut self,
        scope: &GatewayScope,
        configured: &HashSet<CubeAddress>,
    ) -> Result<()> {
        let cubes = discover_cubes(scope.fetcher.as_ref(), &scope.endpoint).await?;
        for cube in cubes.into_iter().filter(|c| !configured.contains(c)) {
            let handler = CubeHandler::new(
                scope.endpoint.clone(),
                cube.clone(),
                scope.interval,
                scope.fetcher.clone(),
            );
            if handler.update().await != UpdateOutcome::Updated {
                scope
                    .logger
                    .warn(&format!("Skipping cube {}: no device list", cube));
                continue;
            }

            self.add_cube(scope, &cube);
            let mut found = 0usize;
            for record in handler.devices() {
                let (Some(address), Some(kind)) = (record.address(), record.kind()) else {
                    continue;
                };
                let name = record
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| address.to_string());
                self.add_device(scope, &cube, address, &name, kind);
                found += 1;
            }
            scope
                .logger
                .info(&format!("Discovered cube {} with {} devices", cube, found));
        }
        Ok(())
    }

    fn add_cube(&mut self, scope: &GatewayScope, cube: &CubeAddress) {
        let duty = Arc::new(CubeDutyHandler::new(
            &scope.endpoint,
            cube.clone(),
            scope.interval,
            scope.fetcher.clone(),
        ));
        self.entities
            .push(Box::new(DutySensor::new(duty, cube.as_str())));
    }

    fn add_device(
        &mut self,
        scope: &GatewayScope,
        cube: &CubeAddress,
        device: DeviceAddress,
        name: &str,
        kind: DeviceKind,
    ) {
        let handler = Arc::new(DeviceHandler::new(
            scope.endpoint.clone(),
            cube.clone(),
            device,
            scope.interval,
            scope.fetcher.clone(),
        ));

        if has_climate(kind) {
            let climate = ClimateEntity::new(handler.clone(), name);
            self.commanders
                .insert(climate.unique_id().to_string(), climate.commander());
            self.entities.push(Box::new(climate));
        }
        for sensor in sensors_for(kind) {
            self.entities
                .push(Box::new(DeviceSensor::new(handler.clone(), name, *sensor)));
        }
        for binary in binary_sensors_for(kind) {
            self.entities
                .push(Box::new(BinarySensor::new(handler.clone(), name, *binary)));
        }
        scope.logger.debug(&format!(
            "Added {} {} ({}) on cube {}",
            kind.as_str(),
            name,
            device,
            cube
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_thermostat_gets_reduced_sensor_set() {
        assert_eq!(sensors_for(DeviceKind::RadiatorThermostat).len(), 4);
        assert_eq!(
            sensors_for(DeviceKind::WallThermostat),
            &[SensorKind::Temperature, SensorKind::SetTemperature]
        );
        assert!(sensors_for(DeviceKind::EcoButton).is_empty());
    }

    #[test]
    fn only_shutters_report_open_window() {
        for kind in [
            DeviceKind::RadiatorThermostat,
            DeviceKind::WallThermostat,
            DeviceKind::EcoButton,
        ] {
            assert!(!binary_sensors_for(kind).contains(&BinarySensorKind::ShutterOpen));
            assert!(binary_sensors_for(kind).contains(&BinarySensorKind::PanelLocked));
        }
        let shutter = binary_sensors_for(DeviceKind::ShutterContact);
        assert!(shutter.contains(&BinarySensorKind::ShutterOpen));
        assert!(!shutter.contains(&BinarySensorKind::PanelLocked));
    }

    #[test]
    fn climate_only_for_thermostats() {
        assert!(has_climate(DeviceKind::WallThermostat));
        assert!(!has_climate(DeviceKind::ShutterContact));
    }
}
