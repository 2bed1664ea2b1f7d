//! 생명의물 (LiqureMate) service
//!
//! Taste survey and live statistics dashboard:
//! - Session-scoped page view counting with auto-refresh suppression
//! - Realtime presence with heartbeats, TTL cleanup and a cached user count
//! - CSV event and survey datasets feeding the funnel and survey statistics
//! - GA4 page tags and server-side milestone events

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use analytics::{AnalyticsConfig, MeasurementClient};
use api::{router, AppState, SessionConfig};
use baas_client::{
    BackendConfig, BackendKind, CounterConfig, CounterKind, FileViewCounter, MemoryBackend,
    PresenceStore, RestBackend, SharedPageViewStore, SharedPresenceStore,
};
use realtime::{PageCounter, PresenceConfig, PresenceTracker};
use telemetry::{health, init_tracing_from_env};
use worker::{WorkerConfig, WorkerScheduler};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Directory holding the CSV datasets and the file counter
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,

    #[serde(default)]
    backend: BackendConfig,

    #[serde(default)]
    counter: CounterConfig,

    #[serde(default)]
    presence: PresenceConfig,

    #[serde(default)]
    session: SessionConfig,

    #[serde(default)]
    analytics: AnalyticsConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            backend: BackendConfig::default(),
            counter: CounterConfig::default(),
            presence: PresenceConfig::default(),
            session: SessionConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting 생명의물 v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        backend = ?config.backend.kind,
        backend_url = %config.backend.url,
        counter = ?config.counter.kind,
        data_dir = %config.data_dir.display(),
        analytics_enabled = config.analytics.is_enabled(),
        "Loaded config"
    );

    let (presence, page_views) = build_stores(&config)?;

    check_health(presence.as_ref()).await;

    let tracker = Arc::new(PresenceTracker::with_config(
        presence,
        config.presence.clone(),
    ));
    let page_counter = Arc::new(PageCounter::new(page_views));

    let analytics = MeasurementClient::new(config.analytics.clone())
        .context("Failed to create analytics client")?;

    // Start background workers
    let worker_config = WorkerConfig {
        sweep_interval: config.presence.sweep_interval(),
        ..WorkerConfig::default()
    };
    let worker_scheduler = Arc::new(WorkerScheduler::new(worker_config, tracker.clone()));
    let worker_handles = worker_scheduler.start();

    let state = AppState::new(
        tracker,
        page_counter,
        analytics,
        &config.data_dir,
        config.session.clone(),
    )
    .context("Failed to create application state")?;

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");

    for handle in worker_handles {
        handle.abort();
    }

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .prefix("WOL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat aliases for the secrets deployments usually inject
    if let Ok(url) = std::env::var("WOL_BACKEND_URL") {
        config.backend.url = url;
    }
    if let Ok(key) = std::env::var("WOL_BACKEND_API_KEY") {
        config.backend.api_key = Some(key);
    }
    if let Ok(id) = std::env::var("WOL_GA_MEASUREMENT_ID") {
        config.analytics.measurement_id = Some(id);
    }
    if let Ok(secret) = std::env::var("WOL_GA_API_SECRET") {
        config.analytics.api_secret = Some(secret);
    }

    config
        .presence
        .validate()
        .context("Invalid presence configuration")?;

    Ok(config)
}

/// Builds the presence and page view stores selected by `config`.
fn build_stores(config: &Config) -> Result<(SharedPresenceStore, SharedPageViewStore)> {
    let (presence, remote_views): (SharedPresenceStore, SharedPageViewStore) =
        match config.backend.kind {
            BackendKind::Remote => {
                if config.backend.api_key.is_none() {
                    warn!("No backend API key configured; requests will be anonymous");
                }
                let backend = Arc::new(
                    RestBackend::new(config.backend.clone())
                        .context("Failed to create backend client")?,
                );
                (backend.clone(), backend)
            }
            BackendKind::Memory => {
                warn!("Using in-memory backend; presence and counters are lost on restart");
                let backend = Arc::new(MemoryBackend::new());
                (backend.clone(), backend)
            }
        };

    let page_views: SharedPageViewStore = match config.counter.kind {
        CounterKind::Remote => remote_views,
        CounterKind::File => {
            let path = config.data_dir.join(&config.counter.file);
            info!(path = %path.display(), "Counting page views in file");
            Arc::new(FileViewCounter::new(path))
        }
    };

    Ok((presence, page_views))
}

/// Check backend health on startup.
async fn check_health(presence: &dyn PresenceStore) {
    if baas_client::health::check_connection(presence).await {
        health().backend.set_healthy();
        info!("Backend connection: healthy");
    } else {
        health().backend.set_unhealthy("Connection failed");
        error!("Backend connection: unhealthy; presence and counters will degrade");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
