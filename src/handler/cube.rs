use super::cache::{PollingCache, UpdateOutcome};
use crate::fetch::Fetcher;
use crate::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use crate::logging::{LogContext, get_logger_with_context};
use crate::parser::{CubeSnapshot, DeviceRecord, parse_cube_snapshot};
use std::sync::Arc;
use std::time::Duration;

/// Polling cache for every device record of one cube. Used for discovery,
/// where the device list is not known in advance.
pub struct CubeHandler {
    endpoint: GatewayEndpoint,
    cube: CubeAddress,
    cache: PollingCache<CubeSnapshot>,
}

impl CubeHandler {
    pub fn new(
        endpoint: GatewayEndpoint,
        cube: CubeAddress,
        scan_interval: Duration,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let logger = get_logger_with_context(LogContext::new("cube_handler").with_cube(&cube));
        let url = endpoint.cube_status_url(&cube);
        Self {
            endpoint,
            cube,
            cache: PollingCache::new(url, scan_interval, fetcher, logger),
        }
    }

    pub async fn update(&self) -> UpdateOutcome {
        self.cache
            .refresh(|body| parse_cube_snapshot(body).map(Some))
            .await
    }

    pub fn data(&self) -> Option<Arc<CubeSnapshot>> {
        self.cache.data()
    }

    /// Copy of the cached record for `address`, if any
    pub fn device_by_address(&self, address: DeviceAddress) -> Option<DeviceRecord> {
        self.data()
            .and_then(|snap| snap.device_by_address(address).cloned())
    }

    /// Cached device records; empty when no data is held
    pub fn devices(&self) -> Vec<DeviceRecord> {
        self.data()
            .map(|snap| snap.devices().to_vec())
            .unwrap_or_default()
    }

    pub fn scan_interval(&self) -> Duration {
        self.cache.scan_interval()
    }

    pub fn endpoint(&self) -> &GatewayEndpoint {
        &self.endpoint
    }

    pub fn cube(&self) -> &CubeAddress {
        &self.cube
    }
}
