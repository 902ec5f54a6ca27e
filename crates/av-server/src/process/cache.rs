//! Short-lived cache in front of process table scans

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::tracker::{ProcessTracker, StatusSnapshot};

/// How long a scan result is served before the next request rescans
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(1);

/// Serves status snapshots, rescanning at most once per freshness window
///
/// The lock is held across the scan, so a burst of requests that all find
/// the entry stale still triggers a single scan; the rest wait and read its
/// result.
pub struct StatusCache {
    tracker: Arc<ProcessTracker>,
    entry: Mutex<Option<(Instant, StatusSnapshot)>>,
    window: Duration,
}

impl StatusCache {
    pub fn new(tracker: Arc<ProcessTracker>) -> Self {
        Self::with_window(tracker, FRESHNESS_WINDOW)
    }

    pub fn with_window(tracker: Arc<ProcessTracker>, window: Duration) -> Self {
        Self {
            tracker,
            entry: Mutex::new(None),
            window,
        }
    }

    /// Current statuses, at most one freshness window old
    ///
    /// An empty result is never served from cache; nothing was watched when
    /// it was taken.
    ///
    /// A failed scan is logged and the last good snapshot is served instead;
    /// it is stamped as fresh so a broken process table is not hammered.
    pub async fn get_cached_statuses(&self) -> StatusSnapshot {
        let mut entry = self.entry.lock().await;

        if let Some((taken, snapshot)) = entry.as_ref() {
            if taken.elapsed() < self.window && !snapshot.is_empty() {
                return snapshot.clone();
            }
        }

        let tracker = Arc::clone(&self.tracker);
        match tokio::task::spawn_blocking(move || tracker.scan()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Process scan failed, serving last snapshot: {}", e),
            Err(e) => tracing::error!("Process scan task panicked: {}", e),
        }

        let snapshot = self.tracker.get_all_statuses();
        *entry = Some((Instant::now(), snapshot.clone()));
        snapshot
    }
}
