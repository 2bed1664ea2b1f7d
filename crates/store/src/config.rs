//! Backend configuration.

use serde::{Deserialize, Serialize};

/// Which presence/counter backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted database over REST
    #[default]
    Remote,
    /// In-process maps, lost on restart
    Memory,
}

/// Hosted backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default = "default_url")]
    pub url: String,
    /// Service or anon key sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_presence_table")]
    pub presence_table: String,
    #[serde(default = "default_page_view_table")]
    pub page_view_table: String,
    /// Stored procedure that increments one page counter
    #[serde(default = "default_increment_rpc")]
    pub increment_rpc: String,
}

fn default_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout_secs() -> u64 {
    3
}

fn default_presence_table() -> String {
    "realtime_users".to_string()
}

fn default_page_view_table() -> String {
    "page_views".to_string()
}

fn default_increment_rpc() -> String {
    "increment_page_view".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            presence_table: default_presence_table(),
            page_view_table: default_page_view_table(),
            increment_rpc: default_increment_rpc(),
        }
    }
}

/// Where page view counters live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    /// Same backend as presence
    #[default]
    Remote,
    /// JSON file under the data directory
    File,
}

/// Page view counter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default)]
    pub kind: CounterKind,
    /// File name relative to the data directory
    #[serde(default = "default_counter_file")]
    pub file: String,
}

fn default_counter_file() -> String {
    "page_views.json".to_string()
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            kind: CounterKind::default(),
            file: default_counter_file(),
        }
    }
}
