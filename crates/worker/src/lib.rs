//! Background workers.
//!
//! - Presence sweep (stale rows removed even when nobody opens the dashboard)
//! - Metrics log (periodic snapshot of the in-process counters)

pub mod metrics_log;
pub mod scheduler;
pub mod sweep;

pub use scheduler::*;
pub use sweep::PresenceSweeper;
