mod common;

use common::CountingFetcher;
use maxbridge::entity::{
    BinarySensor, BinarySensorKind, ClimateEntity, DutySensor, Entity, EntityState, HvacMode,
    Platform,
};
use maxbridge::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use maxbridge::handler::{CubeDutyHandler, DeviceHandler};
use std::sync::Arc;
use std::time::Duration;

fn device_handler(body: &str) -> Arc<DeviceHandler> {
    Arc::new(DeviceHandler::new(
        GatewayEndpoint::new("gw", 8080),
        CubeAddress::parse("0a1b2c").unwrap(),
        DeviceAddress::parse("123456").unwrap(),
        Duration::from_secs(60),
        CountingFetcher::new(body, Duration::ZERO),
    ))
}

async fn binary(handler: &Arc<DeviceHandler>, kind: BinarySensorKind) -> EntityState {
    let mut sensor = BinarySensor::new(handler.clone(), "Hall", kind);
    sensor.update().await;
    sensor.state()
}

#[tokio::test]
async fn lock_and_link_flags_are_inverted() {
    let handler = device_handler(
        r#"{"address": 1193046, "panel_locked": true, "link_error": false,
            "battery_low": true, "error": false, "initialized": true}"#,
    );

    assert_eq!(
        binary(&handler, BinarySensorKind::PanelLocked).await,
        EntityState::Binary(false)
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::LinkError).await,
        EntityState::Binary(true)
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::BatteryLow).await,
        EntityState::Binary(true)
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::Error).await,
        EntityState::Binary(false)
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::Initialized).await,
        EntityState::Binary(true)
    );
}

#[tokio::test]
async fn absent_flags_map_to_no_value_except_initialized() {
    let handler = device_handler(r#"{"address": 1193046}"#);

    assert_eq!(
        binary(&handler, BinarySensorKind::Initialized).await,
        EntityState::Binary(false)
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::ShutterOpen).await,
        EntityState::Unknown
    );
    assert_eq!(
        binary(&handler, BinarySensorKind::LinkError).await,
        EntityState::Unknown
    );
}

#[tokio::test]
async fn binary_sensor_identity() {
    let handler = device_handler(r#"{"address": 1193046, "open": true}"#);
    let sensor = BinarySensor::new(handler, "Hall window", BinarySensorKind::ShutterOpen);
    assert_eq!(sensor.name(), "Hall window - Open window");
    assert_eq!(sensor.unique_id(), "0a1b2c_123456_open");
    assert_eq!(sensor.device_class(), Some("window"));
    assert_eq!(sensor.platform(), Platform::BinarySensor);
}

#[tokio::test]
async fn duty_sensor_strips_percent_but_handler_keeps_raw() {
    let handler = Arc::new(CubeDutyHandler::new(
        &GatewayEndpoint::new("gw", 8080),
        CubeAddress::parse("0a1b2c").unwrap(),
        Duration::from_secs(60),
        CountingFetcher::new("42%", Duration::ZERO),
    ));
    let mut sensor = DutySensor::new(handler.clone(), "Cube");

    sensor.update().await;
    assert_eq!(sensor.state(), EntityState::Text("42".to_string()));
    assert_eq!(sensor.unit(), Some("%"));
    assert_eq!(
        handler.data().as_deref().map(String::as_str),
        Some("42%")
    );
}

#[tokio::test]
async fn unknown_mode_and_missing_fields_are_no_value() {
    let handler = device_handler(r#"{"address": 1193046, "mode": "holiday"}"#);
    let mut climate = ClimateEntity::new(handler, "Living");
    climate.update().await;

    assert_eq!(climate.hvac_mode(), None);
    assert_eq!(climate.target_temperature(), None);
    assert_eq!(
        climate.hvac_modes(),
        &[HvacMode::Auto, HvacMode::HeatCool, HvacMode::Heat, HvacMode::Off]
    );
}

#[tokio::test]
async fn failed_fetch_leaves_every_entity_without_value() {
    let handler = Arc::new(DeviceHandler::new(
        GatewayEndpoint::new("gw", 8080),
        CubeAddress::parse("0a1b2c").unwrap(),
        DeviceAddress::parse("123456").unwrap(),
        Duration::from_secs(60),
        CountingFetcher::failing(),
    ));
    let mut climate = ClimateEntity::new(handler.clone(), "Living");
    climate.update().await;
    assert!(climate.state().is_unknown());
    assert_eq!(
        binary(&handler, BinarySensorKind::Initialized).await,
        EntityState::Binary(false)
    );
}
