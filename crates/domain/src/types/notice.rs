//! User-facing notices and application events

use serde::{Deserialize, Serialize};

use super::drops::{DropsSummary, FreeGame};
use super::process::IdleProcessEntry;

/// Something the user should be told about, shown as a toast or native
/// notification by whatever front end is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Card farming credentials are not configured.
    MissingCredentials,
    /// Stored credentials were rejected and have been cleared.
    OutdatedCredentials,
    /// A remote call failed; details are in the log.
    GenericError { context: String },
    /// The Steam client stopped while automation was active.
    SteamNotRunning,
    /// New free games appeared on the store.
    FreeGamesAvailable { count: usize },
    /// A free game was added to the library automatically.
    FreeGameRedeemed { app_id: u32, name: String },
    FreeGameRedeemFailed { app_id: u32, name: String },
}

/// Events fanned out to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum AppEvent {
    SteamStatusChanged(bool),
    RunningProcessesChanged(Vec<IdleProcessEntry>),
    DropsSummaryUpdated(DropsSummary),
    FreeGamesUpdated(Vec<FreeGame>),
    Notice(Notice),
}
