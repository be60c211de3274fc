//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_BACKEND_URL, DEFAULT_DROPS_POLL_SECS,
    DEFAULT_FREE_GAMES_POLL_SECS, DEFAULT_IDLE_LIMIT_POLL_SECS, DEFAULT_PROCESS_POLL_SECS,
    DEFAULT_STEAM_STATUS_POLL_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub logging: LoggingConfig,
    /// Account to operate on. Without it only process and Steam status
    /// monitoring run.
    pub steam_id: Option<String>,
}

/// Backend RPC configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: DEFAULT_BACKEND_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Poll intervals, in seconds. Zero disables a poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub drops_interval_seconds: u64,
    pub free_games_interval_seconds: u64,
    pub steam_status_interval_seconds: u64,
    pub process_interval_seconds: u64,
    /// How often manual idlers are checked against their max idle time.
    pub idle_limit_interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            drops_interval_seconds: DEFAULT_DROPS_POLL_SECS,
            free_games_interval_seconds: DEFAULT_FREE_GAMES_POLL_SECS,
            steam_status_interval_seconds: DEFAULT_STEAM_STATUS_POLL_SECS,
            process_interval_seconds: DEFAULT_PROCESS_POLL_SECS,
            idle_limit_interval_seconds: DEFAULT_IDLE_LIMIT_POLL_SECS,
        }
    }
}

impl PollingConfig {
    pub fn drops_interval(&self) -> Option<Duration> {
        non_zero_secs(self.drops_interval_seconds)
    }

    pub fn free_games_interval(&self) -> Option<Duration> {
        non_zero_secs(self.free_games_interval_seconds)
    }

    pub fn steam_status_interval(&self) -> Option<Duration> {
        non_zero_secs(self.steam_status_interval_seconds)
    }

    pub fn process_interval(&self) -> Option<Duration> {
        non_zero_secs(self.process_interval_seconds)
    }

    pub fn idle_limit_interval(&self) -> Option<Duration> {
        non_zero_secs(self.idle_limit_interval_seconds)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
