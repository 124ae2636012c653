//! Shared test doubles: a counting in-process fetcher and a wiremock-backed
//! gateway.

#![allow(dead_code)]

use maxbridge::config::GatewayConfig;
use maxbridge::error::{BridgeError, Result};
use maxbridge::fetch::Fetcher;
use maxbridge::gateway::GatewayEndpoint;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers every request with the same body after `delay`, counting calls
/// and the peak number of overlapping requests.
pub struct CountingFetcher {
    body: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(body: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body.to_string()),
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// Every request fails as if the gateway were unreachable
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.body
            .clone()
            .ok_or_else(|| BridgeError::transport(url, "connection refused"))
    }
}

/// Mock MAX! HTTP gateway
pub struct MockGateway {
    pub server: MockServer,
}

impl MockGateway {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> GatewayEndpoint {
        GatewayEndpoint::from_base_url(self.server.uri())
    }

    pub fn gateway_config(&self, discover: bool) -> GatewayConfig {
        let address = self.server.address();
        GatewayConfig {
            host: address.ip().to_string(),
            port: address.port(),
            scan_interval: 60,
            discover,
            cubes: Vec::new(),
        }
    }

    pub async fn mock_cubes_list(&self, body: &str) {
        Mock::given(method("GET"))
            .and(path("/get-cubes-list"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Whole-cube status; lower priority so device queries hit their own mock
    pub async fn mock_cube_status(&self, cube: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/get-status-json"))
            .and(query_param("cube", cube))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_device_status(&self, cube: &str, device: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/get-status-json"))
            .and(query_param("cube", cube))
            .and(query_param("device", device))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_duty(&self, cube: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path("/get-duty"))
            .and(query_param("cube", cube))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_commands(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/set-(automatic|manual|boost|vacation)$"))
            .respond_with(ResponseTemplate::new(status).set_body_string("OK"))
            .mount(&self.server)
            .await;
    }

    /// `path?query` of every request received so far
    pub async fn requests(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| match r.url.query() {
                Some(q) => format!("{}?{}", r.url.path(), q),
                None => r.url.path().to_string(),
            })
            .collect()
    }
}
