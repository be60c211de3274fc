//! Manually started idlers
//!
//! Starting is refused when the idler cap is reached or the game is already
//! idling, both judged from the [`IdleTracker`]. A game with a max idle
//! time (global or per game, in minutes) is stopped by
//! [`ManualIdler::enforce_limits`] once the tracker has seen it run that
//! long.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use idlerig_domain::constants::MAX_IDLE_PROCESSES;
use idlerig_domain::{IdlerError, Result};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ports::GameIdler;
use super::tracker::IdleTracker;
use crate::settings_ports::SettingsStore;
use crate::steam::SteamClient;

#[derive(Debug, Clone)]
struct IdleLimit {
    name: String,
    max: Duration,
    /// The tracker has observed the idler at least once.
    seen: bool,
}

pub struct ManualIdler {
    idler: Arc<dyn GameIdler>,
    steam: Arc<dyn SteamClient>,
    settings: Arc<dyn SettingsStore>,
    tracker: Arc<Mutex<IdleTracker>>,
    limits: Mutex<HashMap<u32, IdleLimit>>,
}

impl ManualIdler {
    pub fn new(
        idler: Arc<dyn GameIdler>,
        steam: Arc<dyn SteamClient>,
        settings: Arc<dyn SettingsStore>,
        tracker: Arc<Mutex<IdleTracker>>,
    ) -> Self {
        Self { idler, steam, settings, tracker, limits: Mutex::new(HashMap::new()) }
    }

    /// Start idling `app_id` for `steam_id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdlerError::InvalidInput`] when Steam is not running, the
    /// cap of idlers is reached or the game is already idling, and any
    /// error from the settings store or the idler itself.
    pub async fn start(&self, steam_id: &str, app_id: u32, name: &str) -> Result<()> {
        if !self.steam.is_steam_running().await? {
            return Err(IdlerError::InvalidInput("steam is not running".into()));
        }

        let settings = self.settings.get_user_settings(steam_id).await?;
        let max_minutes = settings.game_settings().max_idle_time(app_id);

        {
            let tracker = self.tracker.lock();
            if !tracker.has_capacity() {
                warn!(app_id, name, "idler cap reached");
                return Err(IdlerError::InvalidInput(format!(
                    "maximum of {MAX_IDLE_PROCESSES} idlers reached"
                )));
            }
            if tracker.is_idling(app_id) {
                warn!(app_id, name, "game is already idling");
                return Err(IdlerError::InvalidInput(format!("{name} ({app_id}) is already idling")));
            }
        }

        self.idler.start_idle(app_id, name).await?;
        info!(app_id, name, max_minutes = ?max_minutes, "started idling");

        if let Some(minutes) = max_minutes {
            let limit = IdleLimit {
                name: name.to_string(),
                max: Duration::from_secs(minutes.saturating_mul(60)),
                seen: false,
            };
            self.limits.lock().insert(app_id, limit);
        }
        Ok(())
    }

    /// Stop idling `app_id` and drop its time limit.
    pub async fn stop(&self, app_id: u32) -> Result<()> {
        self.limits.lock().remove(&app_id);
        self.idler.stop_idle(app_id).await?;
        info!(app_id, "stopped idling");
        Ok(())
    }

    /// Whether `app_id` is under a max idle time.
    pub fn has_limit(&self, app_id: u32) -> bool {
        self.limits.lock().contains_key(&app_id)
    }

    /// Stop every limited idler that has run past its max idle time.
    /// Returns the app ids that were stopped.
    pub async fn enforce_limits(&self) -> Vec<u32> {
        let expired: Vec<(u32, IdleLimit)> = {
            let tracker = self.tracker.lock();
            let mut limits = self.limits.lock();
            let mut expired = Vec::new();
            limits.retain(|&app_id, limit| match tracker.elapsed(app_id) {
                Some(elapsed) if elapsed >= limit.max => {
                    expired.push((app_id, limit.clone()));
                    false
                }
                Some(_) => {
                    limit.seen = true;
                    true
                }
                // Gone after being seen: stopped elsewhere.
                None => !limit.seen,
            });
            expired
        };

        let mut stopped = Vec::new();
        for (app_id, limit) in expired {
            match self.idler.stop_idle(app_id).await {
                Ok(()) => {
                    info!(app_id, name = %limit.name, max_secs = limit.max.as_secs(), "max idle time reached, stopped");
                    stopped.push(app_id);
                }
                Err(err) => {
                    warn!(app_id, error = %err, "failed to stop idler at max idle time, will retry");
                    self.limits.lock().insert(app_id, IdleLimit { seen: true, ..limit });
                }
            }
        }

        if stopped.is_empty() {
            debug!("no idler past its max idle time");
        }
        stopped
    }
}
