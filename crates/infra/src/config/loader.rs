//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `IDLERIG_BACKEND_URL` is set, configuration comes from the
//!    environment
//! 2. Otherwise an explicit file, or the first file found by probing
//! 3. With neither, built-in defaults
//!
//! ## Environment Variables
//! - `IDLERIG_BACKEND_URL`: Backend base URL (required for env loading)
//! - `IDLERIG_BACKEND_TIMEOUT_SECS`: Per-request timeout
//! - `IDLERIG_STEAM_ID`: Steam account to automate
//! - `IDLERIG_LOG_LEVEL`: Default log filter when `RUST_LOG` is unset
//! - `IDLERIG_LOG_JSON`: Emit JSON logs (true/false)
//! - `IDLERIG_DROPS_INTERVAL_SECS`, `IDLERIG_FREE_GAMES_INTERVAL_SECS`,
//!   `IDLERIG_STEAM_STATUS_INTERVAL_SECS`, `IDLERIG_PROCESS_INTERVAL_SECS`,
//!   `IDLERIG_IDLE_LIMIT_INTERVAL_SECS`: Poller intervals; 0 disables a
//!   poller
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./idlerig.json` or `./idlerig.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use idlerig_domain::{
    BackendConfig, Config, IdlerError, LoggingConfig, PollingConfig, Result,
};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `IdlerError::Config` if an environment value or the chosen file
/// is invalid.
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    if std::env::var_os("IDLERIG_BACKEND_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    if path.is_some() || probe_config_paths().is_some() {
        return load_from_file(path);
    }

    tracing::info!("No configuration found, using defaults");
    Ok(Config::default())
}

/// Load configuration from environment variables
///
/// `IDLERIG_BACKEND_URL` is required; everything else falls back to its
/// default.
///
/// # Errors
/// Returns `IdlerError::Config` if the URL is missing or a number does not
/// parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let backend = BackendConfig {
        base_url: env_var("IDLERIG_BACKEND_URL")?,
        timeout_seconds: env_u64("IDLERIG_BACKEND_TIMEOUT_SECS", defaults.backend.timeout_seconds)?,
    };

    let polling = PollingConfig {
        drops_interval_seconds: env_u64(
            "IDLERIG_DROPS_INTERVAL_SECS",
            defaults.polling.drops_interval_seconds,
        )?,
        free_games_interval_seconds: env_u64(
            "IDLERIG_FREE_GAMES_INTERVAL_SECS",
            defaults.polling.free_games_interval_seconds,
        )?,
        steam_status_interval_seconds: env_u64(
            "IDLERIG_STEAM_STATUS_INTERVAL_SECS",
            defaults.polling.steam_status_interval_seconds,
        )?,
        process_interval_seconds: env_u64(
            "IDLERIG_PROCESS_INTERVAL_SECS",
            defaults.polling.process_interval_seconds,
        )?,
        idle_limit_interval_seconds: env_u64(
            "IDLERIG_IDLE_LIMIT_INTERVAL_SECS",
            defaults.polling.idle_limit_interval_seconds,
        )?,
    };

    let logging = LoggingConfig {
        level: std::env::var("IDLERIG_LOG_LEVEL").unwrap_or(defaults.logging.level),
        json: env_bool("IDLERIG_LOG_JSON", defaults.logging.json),
    };

    let steam_id = std::env::var("IDLERIG_STEAM_ID").ok().filter(|s| !s.trim().is_empty());

    Ok(Config { backend, polling, logging, steam_id })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `IdlerError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IdlerError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            IdlerError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| IdlerError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| IdlerError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IdlerError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IdlerError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["idlerig.json", "idlerig.toml", "config.json", "config.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        IdlerError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional unsigned number from the environment.
fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| IdlerError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
