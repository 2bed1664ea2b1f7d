//! Presence sweep worker.

use chrono::{DateTime, Utc};
use mate_core::Attempt;
use realtime::PresenceTracker;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the unthrottled presence cleanup on a timer.
pub struct PresenceSweeper {
    tracker: Arc<PresenceTracker>,
}

impl PresenceSweeper {
    pub fn new(tracker: Arc<PresenceTracker>) -> Self {
        Self { tracker }
    }

    /// One sweep. Failures are already logged by the tracker.
    pub async fn run(&self) -> Attempt<u64> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Attempt<u64> {
        let attempt = self.tracker.cleanup_at(now).await;
        match &attempt {
            Attempt::Applied(removed) if *removed > 0 => {
                info!(removed, "Presence sweep removed stale rows");
                // Next dashboard read should not serve the pre-sweep count
                self.tracker.cache().invalidate();
            }
            Attempt::Applied(_) => debug!("Presence sweep found nothing stale"),
            _ => {}
        }
        attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baas_client::MemoryBackend;
    use chrono::Duration;
    use mate_core::{Reading, SessionContext};
    use realtime::PresenceConfig;

    #[tokio::test]
    async fn test_sweep_removes_stale_and_invalidates_cache() {
        let store = Arc::new(MemoryBackend::new());
        let tracker = Arc::new(PresenceTracker::with_config(store, PresenceConfig::default()));
        let t0 = Utc::now();

        tracker.heartbeat_at(&SessionContext::new(), t0).await;
        assert_eq!(tracker.get_active_users().await, Reading::fresh(1));

        let sweeper = PresenceSweeper::new(tracker.clone());
        assert_eq!(sweeper.run_at(t0 + Duration::seconds(61)).await, Attempt::Applied(1));
        assert_eq!(tracker.get_active_users().await, Reading::fresh(0));
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_rows() {
        let store = Arc::new(MemoryBackend::new());
        let tracker = Arc::new(PresenceTracker::with_config(store, PresenceConfig::default()));
        let t0 = Utc::now();

        tracker.heartbeat_at(&SessionContext::new(), t0).await;
        let sweeper = PresenceSweeper::new(tracker);
        assert_eq!(sweeper.run_at(t0 + Duration::seconds(30)).await, Attempt::Applied(0));
    }
}
