//! Telemetry for LiqureMate.
//!
//! Structured logging, a component health registry, and in-process
//! counters that the worker periodically writes to the log.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
