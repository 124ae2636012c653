mod common;

use common::MockGateway;
use maxbridge::error::BridgeError;
use maxbridge::fetch::{Fetcher, HttpFetcher};
use maxbridge::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use maxbridge::handler::{DeviceHandler, UpdateOutcome};
use maxbridge::parser::fields;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn returns_body_text() {
    let gw = MockGateway::start().await;
    gw.mock_duty("0a1b2c", "17%").await;

    let fetcher = HttpFetcher::new().unwrap();
    let cube = CubeAddress::parse("0a1b2c").unwrap();
    let body = fetcher
        .fetch_text(&gw.endpoint().duty_url(&cube))
        .await
        .unwrap();
    assert_eq!(body, "17%");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let gw = MockGateway::start().await;
    Mock::given(method("GET"))
        .and(path("/get-duty"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gw.server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let url = format!("{}get-duty?cube=0a1b2c", gw.endpoint().base_url());
    let err = fetcher.fetch_text(&url).await.unwrap_err();
    assert!(matches!(err, BridgeError::Status { status: 503, .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn slow_gateway_times_out() {
    let gw = MockGateway::start().await;
    Mock::given(method("GET"))
        .and(path("/get-cubes-list"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&gw.server)
        .await;

    let fetcher = HttpFetcher::with_timeout(Duration::from_millis(50)).unwrap();
    let err = fetcher
        .fetch_text(&gw.endpoint().cubes_list_url())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).unwrap();
    let err = fetcher
        .fetch_text("http://127.0.0.1:1/get-cubes-list")
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn device_handler_polls_real_http() {
    let gw = MockGateway::start().await;
    gw.mock_device_status(
        "0a1b2c",
        "123456",
        json!({"devices": [{"address": 1193046, "temperature": 19.5, "mode": "automatic"}]}),
    )
    .await;

    let handler = DeviceHandler::new(
        gw.endpoint(),
        CubeAddress::parse("0a1b2c").unwrap(),
        DeviceAddress::parse("123456").unwrap(),
        Duration::from_secs(60),
        Arc::new(HttpFetcher::new().unwrap()),
    );
    assert_eq!(handler.update().await, UpdateOutcome::Updated);
    assert_eq!(handler.update().await, UpdateOutcome::Skipped);
    assert_eq!(
        handler.data().unwrap().number(fields::TEMPERATURE),
        Some(19.5)
    );
    assert_eq!(
        gw.requests().await,
        ["/get-status-json?cube=0a1b2c&device=123456"]
    );
}

#[tokio::test]
async fn endpoint_from_host_and_port_matches_server() {
    let gw = MockGateway::start().await;
    gw.mock_cubes_list("0a1b2c").await;
    let cfg = gw.gateway_config(true);
    let endpoint = GatewayEndpoint::new(cfg.host.clone(), cfg.port);
    let body = HttpFetcher::new()
        .unwrap()
        .fetch_text(&endpoint.cubes_list_url())
        .await
        .unwrap();
    assert_eq!(body, "0a1b2c");
}
