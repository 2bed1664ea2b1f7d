//! Per-browser-session state.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::page::Page;

/// Idle time after which a session is dropped (30 minutes).
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// State owned by one browser session.
///
/// Created once per session and threaded through every call that needs the
/// session's identity or its throttling state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user_id: Uuid,
    last_cleanup: Option<Instant>,
    counted_pages: HashSet<Page>,
    stats_viewed: bool,
}

impl SessionContext {
    /// Creates a session with a fresh identifier.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a session with a known identifier.
    pub fn with_id(user_id: Uuid) -> Self {
        Self {
            user_id,
            last_cleanup: None,
            counted_pages: HashSet::new(),
            stats_viewed: false,
        }
    }

    /// Stable identifier of this session.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Claims the cleanup slot if `interval` has passed since the last claim.
    ///
    /// The first call always succeeds.
    pub fn try_claim_cleanup(&mut self, now: Instant, interval: Duration) -> bool {
        let due = match self.last_cleanup {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= interval,
        };
        if due {
            self.last_cleanup = Some(now);
        }
        due
    }

    /// Marks `page` as counted. Returns false if it already was.
    pub fn mark_page_counted(&mut self, page: Page) -> bool {
        self.counted_pages.insert(page)
    }

    pub fn has_counted(&self, page: Page) -> bool {
        self.counted_pages.contains(&page)
    }

    /// Marks the stats page as reached. Returns false if it already was.
    pub fn mark_stats_viewed(&mut self) -> bool {
        !std::mem::replace(&mut self.stats_viewed, true)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
