//! Analytics beacon.
//!
//! Page views are reported by the gtag.js snippet rendered into each page.
//! Custom events (`survey_completed`, `stats_viewed`) go server-side through
//! the GA4 Measurement Protocol and never block the request that caused them.

pub mod client;
pub mod config;
pub mod gtag;

pub use client::MeasurementClient;
pub use config::AnalyticsConfig;
pub use gtag::{page_path, GtagContext};
