//! Steam client status tracking
//!
//! The backend reports whether the Steam client is running on every poll.
//! [`SteamStatusTracker`] turns that into change events; [`SteamGuard`]
//! shuts automation down when Steam goes away under a signed-in user. The
//! first report only seeds the tracker: a daemon started while Steam is
//! closed leaves existing idlers alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use idlerig_domain::Notice;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::ports::SteamClient;
use crate::notify_ports::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteamStatusChanged {
    pub running: bool,
    /// True for the report that seeded the tracker.
    pub initial: bool,
}

impl SteamStatusChanged {
    /// Whether Steam went away after having been seen.
    pub fn stopped(&self) -> bool {
        !self.running && !self.initial
    }
}

/// Remembers the last observed status.
#[derive(Debug, Default)]
pub struct SteamStatusTracker {
    last: Mutex<Option<bool>>,
}

impl SteamStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `running`. The first observation is reported with
    /// `initial` set; later ones only when the status flips.
    pub fn observe(&self, running: bool) -> Option<SteamStatusChanged> {
        let mut last = self.last.lock();
        let initial = last.is_none();
        if *last == Some(running) {
            return None;
        }
        *last = Some(running);
        Some(SteamStatusChanged { running, initial })
    }

    pub fn last(&self) -> Option<bool> {
        *self.last.lock()
    }
}

/// Which automations are active, plus whether the "Steam is not running"
/// warning is showing.
#[derive(Debug, Default)]
pub struct AutomationState {
    card_farming: AtomicBool,
    achievement_unlocker: AtomicBool,
    steam_warning: AtomicBool,
}

impl AutomationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_card_farming(&self) -> bool {
        self.card_farming.load(Ordering::SeqCst)
    }

    pub fn set_card_farming(&self, active: bool) {
        self.card_farming.store(active, Ordering::SeqCst);
    }

    pub fn is_achievement_unlocker(&self) -> bool {
        self.achievement_unlocker.load(Ordering::SeqCst)
    }

    pub fn set_achievement_unlocker(&self, active: bool) {
        self.achievement_unlocker.store(active, Ordering::SeqCst);
    }

    pub fn steam_warning(&self) -> bool {
        self.steam_warning.load(Ordering::SeqCst)
    }

    pub fn dismiss_steam_warning(&self) {
        self.steam_warning.store(false, Ordering::SeqCst);
    }

    /// Stop every automation and raise the Steam warning.
    fn halt(&self) {
        self.card_farming.store(false, Ordering::SeqCst);
        self.achievement_unlocker.store(false, Ordering::SeqCst);
        self.steam_warning.store(true, Ordering::SeqCst);
    }
}

pub struct SteamGuard {
    steam: Arc<dyn SteamClient>,
    state: Arc<AutomationState>,
    notifier: Arc<dyn Notifier>,
}

impl SteamGuard {
    pub fn new(
        steam: Arc<dyn SteamClient>,
        state: Arc<AutomationState>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { steam, state, notifier }
    }

    pub fn state(&self) -> &Arc<AutomationState> {
        &self.state
    }

    /// React to a status report. Returns true when automation was halted.
    pub async fn on_status(&self, running: bool, signed_in: bool) -> bool {
        if running || !signed_in {
            return false;
        }

        warn!("steam is not running, stopping automation");
        if let Err(err) = self.steam.kill_all_idlers().await {
            error!(error = %err, "failed to kill idler processes");
        }
        self.state.halt();
        self.notifier.notify(Notice::SteamNotRunning);
        info!("automation halted");
        true
    }
}
