use super::cache::{PollingCache, UpdateOutcome};
use crate::fetch::Fetcher;
use crate::gateway::{CubeAddress, DeviceAddress, GatewayEndpoint};
use crate::logging::{LogContext, get_logger_with_context};
use crate::parser::{DeviceRecord, locate_device, parse_document};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Polling cache for the status record of a single device
pub struct DeviceHandler {
    endpoint: GatewayEndpoint,
    cube: CubeAddress,
    device: DeviceAddress,
    cache: PollingCache<DeviceRecord>,
}

impl DeviceHandler {
    pub fn new(
        endpoint: GatewayEndpoint,
        cube: CubeAddress,
        device: DeviceAddress,
        scan_interval: Duration,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("device_handler")
                .with_cube(&cube)
                .with_device(device),
        );
        let url = endpoint.device_status_url(&cube, device);
        Self {
            endpoint,
            cube,
            device,
            cache: PollingCache::new(url, scan_interval, fetcher, logger),
        }
    }

    /// Pull the latest status if the scan interval has passed
    pub async fn update(&self) -> UpdateOutcome {
        let device = self.device;
        self.cache
            .refresh(move |body| {
                let doc = parse_document(body)?;
                locate_device(&doc, device)
            })
            .await
    }

    /// Cached record; `None` before the first fetch or after a failure
    pub fn data(&self) -> Option<Arc<DeviceRecord>> {
        self.cache.data()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DeviceRecord>>> {
        self.cache.subscribe()
    }

    pub async fn next_eligible(&self) -> Option<Instant> {
        self.cache.next_eligible().await
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

    pub fn device(&self) -> DeviceAddress {
        self.device
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        self.cache.fetcher()
    }
}
