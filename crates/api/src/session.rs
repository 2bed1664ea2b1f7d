//! Browser session registry.

use mate_core::{SessionContext, SESSION_IDLE_TIMEOUT_SECS};
use moka::future::Cache;
use realtime::SharedSession;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use telemetry::metrics;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Upper bound on concurrently tracked sessions.
const MAX_SESSIONS: u64 = 100_000;

/// Session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Seconds without a request before a session is forgotten
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_cookie_name() -> String {
    "wol_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    SESSION_IDLE_TIMEOUT_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

/// Live sessions keyed by the id carried in the session cookie.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<Uuid, SharedSession>,
    config: Arc<SessionConfig>,
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        let sessions = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(Duration::from_secs(config.idle_timeout_secs))
            .build();

        Self {
            sessions,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the session for `id`, creating one if it is unknown.
    ///
    /// The flag is true when a new session was created.
    pub async fn resolve(&self, id: Option<Uuid>) -> (SharedSession, bool) {
        if let Some(id) = id {
            if let Some(session) = self.sessions.get(&id).await {
                return (session, false);
            }
        }

        // An expired or foreign id is replaced rather than adopted
        let context = SessionContext::new();
        let id = context.user_id();
        let session: SharedSession = Arc::new(Mutex::new(context));
        self.sessions.insert(id, session.clone()).await;

        metrics().live_sessions.set(self.count().await);
        debug!(user_id = %id, "Session created");
        (session, true)
    }

    /// Number of live sessions after applying pending inserts and expiries.
    pub async fn count(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}
