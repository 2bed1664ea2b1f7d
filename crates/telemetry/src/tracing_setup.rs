//! Tracing setup for structured logging.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
///
/// Presence and counter failures log at `warn`, so `info` keeps them visible
/// while hiding cache hits and throttle skips.
pub const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl LogFormat {
    fn from_flag(value: &str) -> Self {
        if value == "1" || value.eq_ignore_ascii_case("true") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter (e.g., "info", "realtime=debug")
    pub filter: String,
    pub format: LogFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl TracingConfig {
    /// Reads `RUST_LOG` and `LOG_JSON`.
    pub fn from_env() -> Self {
        Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string()),
            format: std::env::var("LOG_JSON")
                .map(|v| LogFormat::from_flag(&v))
                .unwrap_or_default(),
        }
    }
}

/// Initialize tracing with the given configuration.
///
/// A second call is a no-op, so tests may call it freely.
pub fn init_tracing(config: &TracingConfig) {
    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(filter = %config.filter, format = ?config.format, "Tracing initialized");
    }
}

/// Initialize tracing from `RUST_LOG` and `LOG_JSON`.
pub fn init_tracing_from_env() {
    init_tracing(&TracingConfig::from_env());
}
