//! Realtime presence and page view counting.
//!
//! Both are auxiliary to the pages they decorate: every call here absorbs
//! store failures and reports them through [`mate_core::Reading`] and
//! [`mate_core::Attempt`] instead of returning errors.

pub mod cache;
pub mod config;
pub mod page_counter;
pub mod tracker;

pub use cache::ActiveUsersCache;
pub use config::PresenceConfig;
pub use page_counter::PageCounter;
pub use tracker::PresenceTracker;

/// Session state shared between requests of one browser session.
pub type SharedSession = std::sync::Arc<tokio::sync::Mutex<mate_core::SessionContext>>;
