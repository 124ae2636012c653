use crate::error::Result;
use crate::fetch::Fetcher;
use crate::logging::StructuredLogger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;

/// After a failed fetch the next attempt is pushed this many scan intervals
/// past the failure, on top of the regular interval.
pub const FAILURE_BACKOFF_FACTOR: u32 = 59;

/// Stand-in deadline when `instant + duration` does not fit the clock
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `base + by`, saturating to a far-future instant instead of panicking
fn later(base: Instant, by: Duration) -> Instant {
    base.checked_add(by)
        .or_else(|| base.checked_add(FAR_FUTURE))
        .unwrap_or(base)
}

/// What a call to `update()` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Within the throttle window (or backoff); no network activity
    Skipped,
    /// Fetched and parsed; the snapshot was replaced
    Updated,
    /// Fetched and parsed, but the target was absent; the snapshot was cleared
    Missing,
    /// Fetch or parse failed; the snapshot was cleared and backoff applied
    Failed,
}

impl UpdateOutcome {
    /// True when a network round trip was made
    pub fn fetched(&self) -> bool {
        !matches!(self, UpdateOutcome::Skipped)
    }
}

/// Time-gated, mutually exclusive fetch-and-parse cache.
///
/// The lock guards the last-attempt instant and is held across the throttle
/// check, the fetch and the snapshot replacement, so at most one request is
/// in flight per cache. The snapshot itself lives in a watch channel: readers
/// never wait behind a fetch and always see a whole payload.
pub struct PollingCache<T> {
    url: String,
    scan_interval: Duration,
    fetcher: Arc<dyn Fetcher>,
    last_attempt: Mutex<Option<Instant>>,
    snapshot: watch::Sender<Option<Arc<T>>>,
    logger: StructuredLogger,
}

impl<T: Send + Sync + 'static> PollingCache<T> {
    pub fn new(
        url: String,
        scan_interval: Duration,
        fetcher: Arc<dyn Fetcher>,
        logger: StructuredLogger,
    ) -> Self {
        let (snapshot, _rx) = watch::channel(None);
        Self {
            url,
            scan_interval,
            fetcher,
            last_attempt: Mutex::new(None),
            snapshot,
            logger,
        }
    }

    /// Fetch and decode if the throttle window has passed.
    ///
    /// `decode` returns `Ok(None)` when the body is well formed but does not
    /// contain the target.
    pub async fn refresh<F>(&self, decode: F) -> UpdateOutcome
    where
        F: FnOnce(&str) -> Result<Option<T>> + Send,
    {
        let mut last_attempt = self.last_attempt.lock().await;
        let now = Instant::now();

        if let Some(last) = *last_attempt
            && now.saturating_duration_since(last) < self.scan_interval
        {
            self.logger.debug("Skipping update");
            return UpdateOutcome::Skipped;
        }

        *last_attempt = Some(now);
        self.logger.debug(&format!("Updating from {}", self.url));

        let decoded = match self.fetcher.fetch_text(&self.url).await {
            Ok(body) => decode(&body),
            Err(e) => Err(e),
        };

        match decoded {
            Ok(Some(value)) => {
                self.snapshot.send_replace(Some(Arc::new(value)));
                UpdateOutcome::Updated
            }
            Ok(None) => {
                self.snapshot.send_replace(None);
                self.logger
                    .warn(&format!("Target not present in response from {}", self.url));
                UpdateOutcome::Missing
            }
            Err(e) => {
                self.snapshot.send_replace(None);
                let backoff = self
                    .scan_interval
                    .checked_mul(FAILURE_BACKOFF_FACTOR)
                    .unwrap_or(Duration::MAX);
                let deferred = later(now, backoff);
                *last_attempt = Some(deferred);
                self.logger.error(&format!(
                    "Error fetching data from {}: {}; next attempt in {}s",
                    self.url,
                    e,
                    later(deferred, self.scan_interval)
                        .saturating_duration_since(now)
                        .as_secs()
                ));
                UpdateOutcome::Failed
            }
        }
    }

    /// Last successfully parsed payload, or `None`. Never fetches.
    pub fn data(&self) -> Option<Arc<T>> {
        self.snapshot.borrow().clone()
    }

    /// Receiver that observes every snapshot replacement
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<T>>> {
        self.snapshot.subscribe()
    }

    /// Earliest instant at which `refresh` will fetch again; `None` when no
    /// attempt has been made yet. Waits for an in-flight fetch to finish.
    pub async fn next_eligible(&self) -> Option<Instant> {
        self.last_attempt
            .lock()
            .await
            .map(|last| later(last, self.scan_interval))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }
}
