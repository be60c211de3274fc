//! Poll jobs wired to core services
//!
//! Each job does one round of work and publishes what changed on the
//! [`EventBus`].

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use idlerig_core::{
    DropPoller, FreeGamesCheck, IdleTracker, ManualIdler, SettingsStore, SteamClient, SteamGuard,
    SteamStatusTracker,
};
use idlerig_domain::{AppEvent, IdlerError, Result};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::poller::PollJob;
use crate::events::EventBus;

/// Refreshes the drops summary for one account.
pub struct DropsSummaryJob {
    drops: Arc<DropPoller>,
    steam_id: String,
    bus: EventBus,
}

impl DropsSummaryJob {
    pub fn new(drops: Arc<DropPoller>, steam_id: impl Into<String>, bus: EventBus) -> Self {
        Self { drops, steam_id: steam_id.into(), bus }
    }
}

#[async_trait]
impl PollJob for DropsSummaryJob {
    fn name(&self) -> &'static str {
        "drops_summary"
    }

    async fn run(&self) -> Result<()> {
        match self.drops.refresh_summary(&self.steam_id).await {
            Ok(summary) => {
                self.bus.publish(AppEvent::DropsSummaryUpdated(summary));
                Ok(())
            }
            // The user has already been told; nothing to retry until they act.
            Err(IdlerError::MissingCredentials | IdlerError::OutdatedCredentials) => {
                debug!("drops refresh skipped, credentials unusable");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Checks the store for free promotions the user does not own, and redeems
/// them when `general.autoRedeemFreeGames` is set.
pub struct FreeGamesJob {
    check: Arc<FreeGamesCheck>,
    settings: Arc<dyn SettingsStore>,
    steam_id: String,
    owned: Arc<RwLock<HashSet<u32>>>,
    bus: EventBus,
}

impl FreeGamesJob {
    pub fn new(
        check: Arc<FreeGamesCheck>,
        settings: Arc<dyn SettingsStore>,
        steam_id: impl Into<String>,
        bus: EventBus,
    ) -> Self {
        Self {
            check,
            settings,
            steam_id: steam_id.into(),
            owned: Arc::new(RwLock::new(HashSet::new())),
            bus,
        }
    }

    /// Share the set of app ids in the user's library. Promotions for these
    /// are ignored.
    pub fn with_owned_games(mut self, owned: Arc<RwLock<HashSet<u32>>>) -> Self {
        self.owned = owned;
        self
    }
}

#[async_trait]
impl PollJob for FreeGamesJob {
    fn name(&self) -> &'static str {
        "free_games"
    }

    async fn run(&self) -> Result<()> {
        let settings = self.settings.get_user_settings(&self.steam_id).await?;
        let owned = self.owned.read().clone();

        let Some(mut games) =
            self.check.run(&owned, settings.general.free_game_notifications).await
        else {
            return Ok(());
        };

        if settings.general.auto_redeem_free_games {
            let redeemed = self.check.redeem(&games).await;
            games.retain(|g| !redeemed.contains(&g.appid));
        }

        self.bus.publish(AppEvent::FreeGamesUpdated(games));
        Ok(())
    }
}

/// Watches whether the Steam client is running. Automation is only halted
/// when Steam stops after the first report.
pub struct SteamStatusJob {
    steam: Arc<dyn SteamClient>,
    tracker: SteamStatusTracker,
    guard: SteamGuard,
    signed_in: bool,
    bus: EventBus,
}

impl SteamStatusJob {
    pub fn new(steam: Arc<dyn SteamClient>, guard: SteamGuard, signed_in: bool, bus: EventBus) -> Self {
        Self { steam, tracker: SteamStatusTracker::new(), guard, signed_in, bus }
    }
}

#[async_trait]
impl PollJob for SteamStatusJob {
    fn name(&self) -> &'static str {
        "steam_status"
    }

    async fn run(&self) -> Result<()> {
        let running = self.steam.is_steam_running().await?;
        let Some(change) = self.tracker.observe(running) else {
            return Ok(());
        };

        self.bus.publish(AppEvent::SteamStatusChanged(change.running));
        if change.initial {
            debug!(running = change.running, "steam status seeded");
            return Ok(());
        }
        self.guard.on_status(change.running, self.signed_in).await;
        Ok(())
    }
}

/// Keeps the idle list in step with the backend's process list.
pub struct ProcessListJob {
    steam: Arc<dyn SteamClient>,
    tracker: Arc<Mutex<IdleTracker>>,
    bus: EventBus,
}

impl ProcessListJob {
    pub fn new(steam: Arc<dyn SteamClient>, tracker: Arc<Mutex<IdleTracker>>, bus: EventBus) -> Self {
        Self { steam, tracker, bus }
    }
}

#[async_trait]
impl PollJob for ProcessListJob {
    fn name(&self) -> &'static str {
        "process_list"
    }

    async fn run(&self) -> Result<()> {
        let processes = self.steam.running_processes().await?;

        let changed = {
            let mut tracker = self.tracker.lock();
            tracker.apply(&processes).then(|| tracker.entries().to_vec())
        };

        if let Some(entries) = changed {
            self.bus.publish(AppEvent::RunningProcessesChanged(entries));
        }
        Ok(())
    }
}

/// Stops manual idlers that ran past their max idle time. The process list
/// job publishes the resulting change.
pub struct IdleLimitJob {
    manual: Arc<ManualIdler>,
}

impl IdleLimitJob {
    pub fn new(manual: Arc<ManualIdler>) -> Self {
        Self { manual }
    }
}

#[async_trait]
impl PollJob for IdleLimitJob {
    fn name(&self) -> &'static str {
        "idle_limit"
    }

    async fn run(&self) -> Result<()> {
        let stopped = self.manual.enforce_limits().await;
        if !stopped.is_empty() {
            debug!(?stopped, "idlers stopped at max idle time");
        }
        Ok(())
    }
}
