use super::cache::{PollingCache, UpdateOutcome};
use crate::fetch::Fetcher;
use crate::gateway::{CubeAddress, GatewayEndpoint};
use crate::logging::{LogContext, get_logger_with_context};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Polling cache for a cube's radio duty cycle.
///
/// The body is kept verbatim (e.g. `"42%"`); trimming happens where the value
/// is shown.
pub struct CubeDutyHandler {
    cube: CubeAddress,
    cache: PollingCache<String>,
}

impl CubeDutyHandler {
    pub fn new(
        endpoint: &GatewayEndpoint,
        cube: CubeAddress,
        scan_interval: Duration,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("duty_handler").with_cube(&cube),
        );
        let url = endpoint.duty_url(&cube);
        Self {
            cube,
            cache: PollingCache::new(url, scan_interval, fetcher, logger),
        }
    }

    pub async fn update(&self) -> UpdateOutcome {
        self.cache.refresh(|body| Ok(Some(body.to_string()))).await
    }

    /// Raw duty text as last returned by the gateway
    pub fn data(&self) -> Option<Arc<String>> {
        self.cache.data()
    }

    pub async fn next_eligible(&self) -> Option<Instant> {
        self.cache.next_eligible().await
    }

    pub fn scan_interval(&self) -> Duration {
        self.cache.scan_interval()
    }

    pub fn cube(&self) -> &CubeAddress {
        &self.cube
    }
}
