//! Mock implementations for testing.

use async_trait::async_trait;
use baas_client::{PageViewStore, PresenceStore};
use chrono::{DateTime, Utc};
use mate_core::{PageViewRow, PresenceRecord, Result, ViewCounts};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Mock backend that keeps presence rows and counters in memory.
///
/// Implements both store traits the hosted backend implements, so the real
/// router runs unchanged against it. Failure mode makes every call return a
/// backend error, as an unreachable host would.
#[derive(Clone)]
pub struct MockBackend {
    presence: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    views: Arc<Mutex<ViewCounts>>,
    /// Simulate failures if set.
    should_fail: Arc<Mutex<bool>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            presence: Arc::new(Mutex::new(HashMap::new())),
            views: Arc::new(Mutex::new(ViewCounts::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    pub fn presence_count(&self) -> usize {
        self.presence.lock().len()
    }

    pub fn last_seen(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.presence.lock().get(user_id).copied()
    }

    /// Inserts a row directly, bypassing the tracker.
    pub fn seed_presence(&self, user_id: &str, last_seen: DateTime<Utc>) {
        self.presence.lock().insert(user_id.to_string(), last_seen);
    }

    pub fn view_count(&self, page_name: &str) -> u64 {
        self.views.lock().get(page_name).copied().unwrap_or(0)
    }

    fn check(&self) -> Result<()> {
        if *self.should_fail.lock() {
            Err(mate_core::Error::backend("Mock backend failure"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceStore for MockBackend {
    async fn upsert_presence(&self, record: &PresenceRecord) -> Result<()> {
        self.check()?;
        self.presence
            .lock()
            .insert(record.user_id.clone(), record.last_seen);
        Ok(())
    }

    async fn delete_stale(&self, threshold: DateTime<Utc>) -> Result<u64> {
        self.check()?;
        let mut presence = self.presence.lock();
        let before = presence.len();
        presence.retain(|_, last_seen| *last_seen >= threshold);
        Ok((before - presence.len()) as u64)
    }

    async fn delete_presence(&self, user_id: &str) -> Result<()> {
        self.check()?;
        self.presence.lock().remove(user_id);
        Ok(())
    }

    async fn list_presence(&self) -> Result<Vec<PresenceRecord>> {
        self.check()?;
        Ok(self
            .presence
            .lock()
            .iter()
            .map(|(user_id, last_seen)| PresenceRecord::new(user_id.clone(), *last_seen))
            .collect())
    }
}

#[async_trait]
impl PageViewStore for MockBackend {
    async fn increment(&self, page_name: &str) -> Result<()> {
        self.check()?;
        *self.views.lock().entry(page_name.to_string()).or_insert(0) += 1;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PageViewRow>> {
        self.check()?;
        Ok(mate_core::rows_from_counts(&self.views.lock()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_counts() {
        let backend = MockBackend::new();
        backend.increment("홈").await.unwrap();
        backend.increment("홈").await.unwrap();
        assert_eq!(backend.view_count("홈"), 2);
    }

    #[tokio::test]
    async fn test_mock_backend_failure() {
        let backend = MockBackend::new();
        backend.set_should_fail(true);

        assert!(backend.increment("홈").await.is_err());
        assert!(backend.count_presence().await.is_err());

        backend.set_should_fail(false);
        assert_eq!(backend.count_presence().await.unwrap(), 0);
    }
}
