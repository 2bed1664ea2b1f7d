//! Per-page view counters.

use baas_client::SharedPageViewStore;
use mate_core::{Attempt, Page, PageViewRow, Reading, Result, SessionContext};
use telemetry::{health, metrics, ComponentHealth};
use tracing::{debug, warn};

/// Counts page views against a [`PageViewStore`](baas_client::PageViewStore).
pub struct PageCounter {
    store: SharedPageViewStore,
}

impl PageCounter {
    pub fn new(store: SharedPageViewStore) -> Self {
        Self { store }
    }

    /// Health component fed by this counter's outcomes, if any.
    ///
    /// Only a store backed by the hosted backend reports; a local file
    /// failing says nothing about the remote service.
    pub fn health_component(&self) -> Option<&'static ComponentHealth> {
        self.store
            .reports_backend_health()
            .then(|| &health().backend)
    }

    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Some(component) = self.health_component() {
            match &result {
                Ok(_) => component.set_healthy(),
                Err(e) => component.set_unhealthy(e.to_string()),
            }
        }
        result
    }

    /// Adds one view to `page_name`.
    pub async fn increase_page_view(&self, page_name: &str) -> Attempt {
        match self.observe(self.store.increment(page_name).await) {
            Ok(()) => {
                metrics().page_views_counted.inc();
                debug!(page = page_name, "Page view counted");
                Attempt::Applied(())
            }
            Err(e) => {
                metrics().page_view_failures.inc();
                warn!(page = page_name, error = %e, "Failed to count page view");
                Attempt::Failed(e.to_string())
            }
        }
    }

    /// Counts a visit to `page` at most once per session.
    ///
    /// Auto-refresh reloads are never counted and do not use up the
    /// session's one count.
    pub async fn count_visit(
        &self,
        session: &mut SessionContext,
        page: Page,
        is_autorefresh: bool,
    ) -> Attempt {
        if is_autorefresh || session.has_counted(page) {
            metrics().page_views_skipped.inc();
            return Attempt::Skipped;
        }

        let attempt = self.increase_page_view(page.counter_name()).await;
        if attempt.is_applied() {
            session.mark_page_counted(page);
        }
        attempt
    }

    /// Every counter row, or an empty list when the store is unreachable.
    pub async fn get_all_page_views(&self) -> Reading<Vec<PageViewRow>> {
        match self.observe(self.store.all().await) {
            Ok(rows) => Reading::fresh(rows),
            Err(e) => {
                warn!(error = %e, "Failed to read page views");
                Reading::fallback(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use baas_client::{FileViewCounter, MemoryBackend, PageViewStore};
    use mate_core::{Error, Freshness};
    use std::sync::Arc;

    struct DownStore;

    #[async_trait]
    impl PageViewStore for DownStore {
        async fn increment(&self, _page_name: &str) -> mate_core::Result<()> {
            Err(Error::backend_status(503, "unavailable"))
        }

        async fn all(&self) -> mate_core::Result<Vec<PageViewRow>> {
            Err(Error::backend("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_increase_page_view() {
        let store = Arc::new(MemoryBackend::new());
        let counter = PageCounter::new(store.clone());

        assert!(counter.increase_page_view("홈").await.is_applied());
        assert!(counter.increase_page_view("홈").await.is_applied());
        assert_eq!(store.view_count("홈"), 2);
    }

    #[tokio::test]
    async fn test_count_visit_once_per_session() {
        let store = Arc::new(MemoryBackend::new());
        let counter = PageCounter::new(store.clone());
        let mut session = SessionContext::new();

        assert!(counter
            .count_visit(&mut session, Page::Stats, false)
            .await
            .is_applied());
        assert_eq!(
            counter.count_visit(&mut session, Page::Stats, false).await,
            Attempt::Skipped
        );
        assert_eq!(store.view_count(Page::Stats.counter_name()), 1);

        let mut other = SessionContext::new();
        counter.count_visit(&mut other, Page::Stats, false).await;
        assert_eq!(store.view_count(Page::Stats.counter_name()), 2);
    }

    #[tokio::test]
    async fn test_autorefresh_is_not_counted() {
        let store = Arc::new(MemoryBackend::new());
        let counter = PageCounter::new(store.clone());
        let mut session = SessionContext::new();

        assert_eq!(
            counter.count_visit(&mut session, Page::Stats, true).await,
            Attempt::Skipped
        );
        assert!(!session.has_counted(Page::Stats));
        assert_eq!(store.view_count(Page::Stats.counter_name()), 0);
    }

    #[tokio::test]
    async fn test_failed_count_is_retried_next_visit() {
        let counter = PageCounter::new(Arc::new(DownStore));
        let mut session = SessionContext::new();

        assert!(counter
            .count_visit(&mut session, Page::Home, false)
            .await
            .is_failed());
        assert!(!session.has_counted(Page::Home));
    }

    #[test]
    fn test_only_remote_stores_feed_backend_health() {
        let remote = PageCounter::new(Arc::new(MemoryBackend::new()));
        assert_eq!(remote.health_component().map(|c| c.name()), Some("backend"));

        let path = std::env::temp_dir()
            .join(format!("wol-counter-{}", uuid::Uuid::new_v4()))
            .join("page_views.json");
        let file = PageCounter::new(Arc::new(FileViewCounter::new(path)));
        assert!(file.health_component().is_none());
    }

    #[tokio::test]
    async fn test_all_page_views_fallback() {
        let counter = PageCounter::new(Arc::new(DownStore));
        let reading = counter.get_all_page_views().await;

        assert!(reading.value.is_empty());
        assert_eq!(reading.freshness, Freshness::Fallback);
    }
}
