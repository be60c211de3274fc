//! Which games a farming round idles, and when each one is done

use idlerig_domain::constants::MAX_FARMING_GAMES;
use idlerig_domain::{DropEntry, GameSettings};

/// A game selected for farming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmingGame {
    pub app_id: u32,
    pub name: String,
    /// Drops to farm before the game is considered done. Capped by the
    /// game's `maxCardDrops` setting.
    pub drops_to_count: u32,
    /// Drops remaining when the game was selected.
    pub initial_drops: u32,
}

impl FarmingGame {
    fn new(app_id: u32, name: String, remaining: u32, settings: &GameSettings) -> Self {
        let cap = settings.max_card_drops(app_id).unwrap_or(remaining);
        Self { app_id, name, drops_to_count: remaining.min(cap), initial_drops: remaining }
    }

    /// Whether `remaining_now` means this game has nothing left to farm.
    pub fn is_finished(&self, remaining_now: u32) -> bool {
        remaining_now == 0 || self.initial_drops.saturating_sub(remaining_now) >= self.drops_to_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FarmingPlan {
    games: Vec<FarmingGame>,
}

impl FarmingPlan {
    /// Select up to [`MAX_FARMING_GAMES`] games, in backend order, skipping
    /// those without drops.
    pub fn from_entries(entries: &[DropEntry], settings: &GameSettings) -> Self {
        let mut plan = Self::default();
        for entry in entries {
            if plan.is_full() {
                break;
            }
            plan.push(entry.app_id, &entry.name, entry.remaining, settings);
        }
        plan
    }

    /// Add a game. Returns false when it has no drops, is already planned,
    /// or the plan is full.
    pub fn push(&mut self, app_id: u32, name: &str, remaining: u32, settings: &GameSettings) -> bool {
        if remaining == 0 || self.is_full() || self.contains(app_id) {
            return false;
        }
        self.games.push(FarmingGame::new(app_id, name.to_string(), remaining, settings));
        true
    }

    /// Drop `app_id` from the plan if `remaining_now` shows it is finished.
    /// Returns true when the game was removed.
    pub fn prune(&mut self, app_id: u32, remaining_now: u32) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g.app_id != app_id || !g.is_finished(remaining_now));
        self.games.len() != before
    }

    pub fn games(&self) -> &[FarmingGame] {
        &self.games
    }

    pub fn app_ids(&self) -> Vec<u32> {
        self.games.iter().map(|g| g.app_id).collect()
    }

    pub fn contains(&self, app_id: u32) -> bool {
        self.games.iter().any(|g| g.app_id == app_id)
    }

    /// Sum of `drops_to_count` over the plan.
    pub fn total_drops(&self) -> u64 {
        self.games.iter().map(|g| u64::from(g.drops_to_count)).sum()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.games.len() >= MAX_FARMING_GAMES
    }
}
