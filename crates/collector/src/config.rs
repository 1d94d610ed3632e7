use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://gamba.com/_api/@";
pub const GET_RACE_BY_ID_HASH: &str =
    "c682a2e9795a0f35f291d417f01543135f4be142180598bcb6159c26ba2177ef";

/// Knobs of the collection loops.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Pause between two consecutive source requests
    pub request_delay: Duration,
    /// Ids checked below the latest known race in monitor mode
    pub lookback: i64,
    /// Ids checked past the latest known race
    pub lookahead: i64,
    /// Latest race id assumed while the store is empty
    pub default_latest_id: i64,
    pub races_per_week: f64,
    /// Sleep after a failed monitor cycle
    pub recovery_sleep: Duration,
    pub error_display_limit: usize,
    pub report_path: PathBuf,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            lookback: 5,
            lookahead: 10,
            default_latest_id: 100,
            races_per_week: 1.5,
            recovery_sleep: Duration::from_secs(60),
            error_display_limit: 5,
            report_path: PathBuf::from("race_collection_report.json"),
        }
    }
}

/// Connection settings of the remote race API.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
    pub persisted_query_hash: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeout: Duration::from_secs(30),
            persisted_query_hash: GET_RACE_BY_ID_HASH.to_string(),
        }
    }
}

impl SourceConfig {
    /// Defaults overridden by `GAMBA_API_URL` and `GAMBA_AUTH_TOKEN`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GAMBA_API_URL").unwrap_or(defaults.base_url),
            auth_token: std::env::var("GAMBA_AUTH_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            ..defaults
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.trim().is_empty());
        self
    }
}
