//! Free promotion checks

use std::collections::HashSet;
use std::sync::Arc;

use idlerig_domain::{FreeGame, Notice};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::ports::FreeGamesSource;
use crate::notify_ports::Notifier;

/// Fetches free promotions, notifies when a new set shows up and can
/// redeem them.
pub struct FreeGamesCheck {
    source: Arc<dyn FreeGamesSource>,
    notifier: Arc<dyn Notifier>,
    last_ids: Mutex<Vec<u32>>,
    last_redeemed: Mutex<Vec<u32>>,
}

fn sorted_ids(games: &[FreeGame]) -> Vec<u32> {
    let mut ids: Vec<u32> = games.iter().map(|g| g.appid).collect();
    ids.sort_unstable();
    ids
}

impl FreeGamesCheck {
    pub fn new(source: Arc<dyn FreeGamesSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            last_ids: Mutex::new(Vec::new()),
            last_redeemed: Mutex::new(Vec::new()),
        }
    }

    /// Fetch free games the user does not own.
    ///
    /// Returns `None` when the fetch failed. An empty `owned_app_ids`
    /// filters nothing. When the resulting set differs from the last one,
    /// it is remembered and, if `notify` is true, announced.
    pub async fn run(&self, owned_app_ids: &HashSet<u32>, notify: bool) -> Option<Vec<FreeGame>> {
        let offered = match self.source.free_games().await {
            Ok(reply) => reply.games,
            Err(err) => {
                error!(error = %err, "free games lookup failed");
                return None;
            }
        };

        let games: Vec<FreeGame> =
            offered.into_iter().filter(|g| !owned_app_ids.contains(&g.appid)).collect();

        let ids = sorted_ids(&games);

        let mut last_ids = self.last_ids.lock();
        if games.is_empty() {
            last_ids.clear();
            return Some(games);
        }

        if *last_ids != ids {
            info!(count = games.len(), "free games changed");
            *last_ids = ids;
            if notify {
                self.notifier.notify(Notice::FreeGamesAvailable { count: games.len() });
            }
        } else {
            debug!(count = games.len(), "free games unchanged");
        }
        Some(games)
    }

    /// Redeem every game in `games`, one at a time. A set that was already
    /// attempted is skipped. Returns the app ids that were redeemed; they
    /// are also dropped from the announced set.
    pub async fn redeem(&self, games: &[FreeGame]) -> Vec<u32> {
        let ids = sorted_ids(games);
        {
            let mut last_redeemed = self.last_redeemed.lock();
            if ids.is_empty() || *last_redeemed == ids {
                return Vec::new();
            }
            *last_redeemed = ids;
        }

        let mut redeemed = Vec::new();
        for game in games {
            let (app_id, name) = (game.appid, game.name.clone());
            match self.source.redeem_free_game(app_id).await {
                Ok(reply) if reply.success => {
                    info!(app_id, name = %name, "redeemed free game");
                    self.notifier.notify(Notice::FreeGameRedeemed { app_id, name });
                    redeemed.push(app_id);
                }
                Ok(reply) => {
                    warn!(app_id, name = %name, message = ?reply.message, "free game not redeemed");
                    self.notifier.notify(Notice::FreeGameRedeemFailed { app_id, name });
                }
                Err(err) => {
                    error!(app_id, name = %name, error = %err, "free game redemption failed");
                    self.notifier.notify(Notice::FreeGameRedeemFailed { app_id, name });
                }
            }
        }

        if !redeemed.is_empty() {
            self.last_ids.lock().retain(|id| !redeemed.contains(id));
        }
        redeemed
    }

    /// Forget the last announced and redeemed sets.
    pub fn reset(&self) {
        self.last_ids.lock().clear();
        self.last_redeemed.lock().clear();
    }
}
