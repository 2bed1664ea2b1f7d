//! Common test setup functions.

use analytics::{AnalyticsConfig, MeasurementClient};
use api::{router, AppState, SessionConfig};
use axum::Router;
use axum_test::TestServer;
use dataset::{EventLog, SurveyLog};
use mate_core::{ClientEvent, SurveyResponse};
use realtime::{PageCounter, PresenceConfig, PresenceTracker};
use std::path::PathBuf;
use std::sync::Arc;

use crate::mocks::MockBackend;

/// Test context with a mock backend and a private data directory.
///
/// The real router runs with every middleware; only the hosted backend is
/// replaced and analytics is disabled.
pub struct TestContext {
    pub backend: Arc<MockBackend>,
    pub tracker: Arc<PresenceTracker>,
    pub data_dir: PathBuf,
    pub router: Router,
}

impl TestContext {
    /// Context whose active-user count is never cached.
    pub fn new() -> Self {
        Self::with_presence(PresenceConfig {
            cache_ttl_secs: 0,
            ..PresenceConfig::default()
        })
    }

    pub fn with_presence(presence: PresenceConfig) -> Self {
        let backend = Arc::new(MockBackend::new());
        let tracker = Arc::new(PresenceTracker::with_config(backend.clone(), presence));
        let page_counter = Arc::new(PageCounter::new(backend.clone()));
        let analytics = MeasurementClient::new(AnalyticsConfig::default())
            .expect("Failed to create analytics client");

        let data_dir = std::env::temp_dir().join(format!("wol-it-{}", uuid::Uuid::new_v4()));

        let state = AppState::new(
            tracker.clone(),
            page_counter,
            analytics,
            &data_dir,
            SessionConfig::default(),
        )
        .expect("Failed to create app state");

        Self {
            backend,
            tracker,
            data_dir,
            router: router(state),
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }

    /// Rows written to the event log so far.
    pub fn events(&self) -> Vec<ClientEvent> {
        EventLog::in_dir(&self.data_dir)
            .load()
            .expect("Failed to read event log")
            .unwrap_or_default()
    }

    pub fn surveys(&self) -> Vec<SurveyResponse> {
        SurveyLog::in_dir(&self.data_dir)
            .load()
            .expect("Failed to read survey log")
            .unwrap_or_default()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.data_dir).ok();
    }
}
