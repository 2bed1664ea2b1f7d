//! Outcomes of best-effort calls against auxiliary services.
//!
//! Presence and counters must never break a page, so their calls report how
//! good the answer is instead of failing.

use serde::{Deserialize, Serialize};

/// Where a read value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Read from the store just now.
    Fresh,
    /// Served from a local cache within its TTL.
    Cached,
    /// The store failed; this is the last value that was read.
    Stale,
    /// The store failed and nothing was known; this is a default.
    Fallback,
}

impl Freshness {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Stale | Self::Fallback)
    }
}

/// A value together with its freshness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Reading<T> {
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Fresh,
        }
    }

    pub fn cached(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Cached,
        }
    }

    pub fn stale(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Stale,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            freshness: Freshness::Fallback,
        }
    }
}

/// Outcome of a best-effort write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T = ()> {
    Applied(T),
    /// Not attempted (throttled or disabled).
    Skipped,
    Failed(String),
}

impl<T> Attempt<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            _ => None,
        }
    }
}
