//! The card farming loop
//!
//! Each round builds a [`FarmingPlan`], runs one [`FarmingCycle`] over it
//! and starts again until no game has drops left.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use idlerig_domain::constants::DROP_CHECK_TIMEOUT_SECS;
use idlerig_domain::{GameSettings, SessionCredentials, UserSettings};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::cycle::{FarmingCycle, StepAction};
use super::plan::FarmingPlan;
use super::ports::{CustomLists, IdleController};
use crate::drops::DropPoller;
use crate::settings_ports::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmingOutcome {
    /// No game has drops left.
    Complete,
    /// An idler could not be started or stopped, or settings were
    /// unavailable.
    Failed,
    Cancelled,
}

enum RoundEnd {
    Finished,
    Failed,
    Cancelled,
}

pub struct FarmingRunner {
    drops: Arc<DropPoller>,
    settings: Arc<dyn SettingsStore>,
    lists: Arc<dyn CustomLists>,
    idler: Arc<dyn IdleController>,
    cycle: FarmingCycle,
    check_timeout: Duration,
}

impl FarmingRunner {
    pub fn new(
        drops: Arc<DropPoller>,
        settings: Arc<dyn SettingsStore>,
        lists: Arc<dyn CustomLists>,
        idler: Arc<dyn IdleController>,
    ) -> Self {
        Self {
            drops,
            settings,
            lists,
            idler,
            cycle: FarmingCycle::standard(),
            check_timeout: Duration::from_secs(DROP_CHECK_TIMEOUT_SECS),
        }
    }

    pub fn with_cycle(mut self, cycle: FarmingCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Farm until every selected game is done, a step fails or `cancel`
    /// fires. Idlers started by this runner are stopped on cancellation.
    pub async fn run(&self, steam_id: &str, cancel: &CancellationToken) -> FarmingOutcome {
        loop {
            if cancel.is_cancelled() {
                return FarmingOutcome::Cancelled;
            }

            let Some(settings) = self.load_settings(steam_id).await else {
                return FarmingOutcome::Failed;
            };
            let custom_list = !settings.card_farming.all_games;

            let mut plan = self.build_plan(steam_id, &settings).await;
            if plan.is_empty() {
                info!(steam_id, "no games left with drops, farming complete");
                return FarmingOutcome::Complete;
            }

            info!(
                steam_id,
                games = plan.len(),
                total_drops = plan.total_drops(),
                "starting farming round"
            );

            match self.run_round(steam_id, &mut plan, custom_list, cancel).await {
                RoundEnd::Finished => continue,
                RoundEnd::Failed => return FarmingOutcome::Failed,
                RoundEnd::Cancelled => {
                    self.stop_quietly(&plan.app_ids()).await;
                    return FarmingOutcome::Cancelled;
                }
            }
        }
    }

    /// Games to farm this round, from either every game with drops or the
    /// user's custom list.
    pub async fn build_plan(&self, steam_id: &str, settings: &UserSettings) -> FarmingPlan {
        let game_settings = settings.game_settings();
        let credentials = settings.credentials();

        if settings.card_farming.all_games {
            let entries = self.drops.all_games_with_drops(steam_id, credentials).await;
            return FarmingPlan::from_entries(&entries, &game_settings);
        }

        match self.drops.require_credentials(credentials) {
            Some(credentials) => {
                self.plan_from_custom_list(steam_id, credentials, &game_settings).await
            }
            None => FarmingPlan::default(),
        }
    }

    async fn plan_from_custom_list(
        &self,
        steam_id: &str,
        credentials: &SessionCredentials,
        game_settings: &GameSettings,
    ) -> FarmingPlan {
        let listed = match self.lists.card_farming_list(steam_id).await {
            Ok(listed) => listed,
            Err(err) => {
                error!(steam_id, error = %err, "failed to load card farming list");
                return FarmingPlan::default();
            }
        };

        let checks = listed.iter().map(|game| async move {
            let check = self.drops.try_check_drops(steam_id, game.appid, Some(credentials));
            (game, tokio::time::timeout(self.check_timeout, check).await)
        });

        let mut plan = FarmingPlan::default();
        for (game, result) in join_all(checks).await {
            match result {
                Ok(Ok(0)) => {
                    debug!(app_id = game.appid, "no drops left, removing from farming list");
                    self.remove_from_list(steam_id, game.appid).await;
                }
                Ok(Ok(remaining)) => {
                    plan.push(game.appid, &game.name, remaining, game_settings);
                }
                // Unknown is not zero: keep the game listed and retry next round.
                Ok(Err(err)) => {
                    warn!(app_id = game.appid, error = %err, "drops check failed, skipping game");
                }
                Err(_) => warn!(app_id = game.appid, "drops check timed out, skipping game"),
            }
        }
        plan
    }

    async fn run_round(
        &self,
        steam_id: &str,
        plan: &mut FarmingPlan,
        custom_list: bool,
        cancel: &CancellationToken,
    ) -> RoundEnd {
        for step in self.cycle.steps() {
            if cancel.is_cancelled() {
                return RoundEnd::Cancelled;
            }

            let app_ids = plan.app_ids();
            let result = match step.action {
                StepAction::Start => self.idler.start_farm_idle(&app_ids).await,
                StepAction::Stop => self.idler.stop_farm_idle(&app_ids).await,
            };
            if let Err(err) = result {
                error!(action = ?step.action, games = app_ids.len(), error = %err, "farming step failed");
                self.stop_quietly(&app_ids).await;
                return RoundEnd::Failed;
            }

            tokio::select! {
                _ = cancel.cancelled() => return RoundEnd::Cancelled,
                _ = tokio::time::sleep(step.hold) => {}
            }

            if step.action == StepAction::Stop {
                self.prune_finished(steam_id, plan, custom_list).await;
                if plan.is_empty() {
                    return RoundEnd::Finished;
                }
            }
        }
        RoundEnd::Finished
    }

    /// Re-check every planned game and drop the finished ones.
    async fn prune_finished(&self, steam_id: &str, plan: &mut FarmingPlan, custom_list: bool) {
        let Some(settings) = self.load_settings(steam_id).await else {
            return;
        };
        let credentials = settings.credentials();

        let checks = plan.games().iter().map(|game| async move {
            (game.app_id, self.drops.try_check_drops(steam_id, game.app_id, credentials).await)
        });
        let results = join_all(checks).await;

        for (app_id, result) in results {
            let remaining = match result {
                Ok(remaining) => remaining,
                Err(err) => {
                    warn!(app_id, error = %err, "drops check failed, keeping game this round");
                    continue;
                }
            };
            if plan.prune(app_id, remaining) {
                info!(app_id, remaining, "farmed all drops, removing game");
                if custom_list {
                    self.remove_from_list(steam_id, app_id).await;
                }
            }
        }
    }

    async fn load_settings(&self, steam_id: &str) -> Option<UserSettings> {
        match self.settings.get_user_settings(steam_id).await {
            Ok(settings) => Some(settings),
            Err(err) => {
                error!(steam_id, error = %err, "failed to load settings for farming");
                None
            }
        }
    }

    async fn remove_from_list(&self, steam_id: &str, app_id: u32) {
        if let Err(err) = self.lists.remove_from_card_farming_list(steam_id, app_id).await {
            error!(steam_id, app_id, error = %err, "failed to update card farming list");
        }
    }

    async fn stop_quietly(&self, app_ids: &[u32]) {
        if app_ids.is_empty() {
            return;
        }
        if let Err(err) = self.idler.stop_farm_idle(app_ids).await {
            warn!(games = app_ids.len(), error = %err, "failed to stop farming idlers");
        }
    }
}
