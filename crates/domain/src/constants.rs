//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Idling limits
pub const MAX_IDLE_PROCESSES: usize = 32;
pub const MAX_FARMING_GAMES: usize = 32;

// Polling cadence (seconds)
pub const DEFAULT_DROPS_POLL_SECS: u64 = 30 * 60;
pub const DEFAULT_FREE_GAMES_POLL_SECS: u64 = 60 * 60;
pub const DEFAULT_STEAM_STATUS_POLL_SECS: u64 = 1;
pub const DEFAULT_PROCESS_POLL_SECS: u64 = 5;
pub const DEFAULT_IDLE_LIMIT_POLL_SECS: u64 = 5;
pub const SCHEDULE_RECHECK_SECS: u64 = 60;

// Timeout applied to a single per-game drop check
pub const DROP_CHECK_TIMEOUT_SECS: u64 = 30;

// Backend defaults
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:14250";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

// Settings keys written by the drops refresh
pub const KEY_CREDENTIALS: &str = "cardFarming.credentials";
pub const KEY_CARD_FARMING_USER: &str = "cardFarming.userSummary";
pub const KEY_GAMES_WITH_DROPS: &str = "cardFarming.gamesWithDrops";
pub const KEY_TOTAL_DROPS: &str = "cardFarming.totalDropsRemaining";

// Event names
pub const EVENT_STEAM_STATUS_CHANGED: &str = "steam_status_changed";
pub const EVENT_RUNNING_PROCESSES_CHANGED: &str = "running_processes_changed";
