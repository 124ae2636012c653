//! HTTP fetcher for the gateway API
//!
//! Handlers and command issuers talk to the network only through the
//! [`Fetcher`] trait so the polling state machine can be exercised without a
//! gateway. [`HttpFetcher`] is the production implementation: one pooled
//! `reqwest` client, a fixed 10 second timeout, no retries.

use crate::error::{BridgeError, Result};
use crate::logging::{StructuredLogger, get_logger};
use std::time::Duration;

/// Fixed timeout for every request the bridge issues
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs a GET and hands back the response body as text
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    logger: StructuredLogger,
}

impl HttpFetcher {
    /// Create a fetcher with the default 10 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("maxbridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BridgeError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            logger: get_logger("fetch"),
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.logger.trace(&format!("GET {}", url));

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                BridgeError::timeout(url, e.to_string())
            } else {
                BridgeError::transport(url, e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BridgeError::status(url, status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| BridgeError::transport(url, format!("reading body: {}", e)))
    }
}
