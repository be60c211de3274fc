//! Per-user settings
//!
//! One canonical, versioned schema. Every section carries explicit defaults
//! so partially written documents deserialize cleanly; older document shapes
//! are upgraded by [`migration::migrate`].

pub mod migration;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{IdlerError, Result};
use crate::types::{ScheduleWindow, SessionCredentials, TimeOfDay};

/// Current schema version written by this build.
pub const SETTINGS_VERSION: u32 = 1;

/// Settings document for one Steam account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub version: u32,
    pub general: GeneralSettings,
    pub card_farming: CardFarmingSettings,
    pub achievement_unlocker: AchievementUnlockerSettings,
    pub trading_cards: TradingCardsSettings,
    pub game_settings: Option<GameSettings>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            general: GeneralSettings::default(),
            card_farming: CardFarmingSettings::default(),
            achievement_unlocker: AchievementUnlockerSettings::default(),
            trading_cards: TradingCardsSettings::default(),
            game_settings: None,
        }
    }
}

impl UserSettings {
    /// Credentials, if configured and complete.
    pub fn credentials(&self) -> Option<&SessionCredentials> {
        crate::types::credentials::usable(self.card_farming.credentials.as_ref())
    }

    /// Per-game limits, empty when none are configured.
    pub fn game_settings(&self) -> GameSettings {
        self.game_settings.clone().unwrap_or_default()
    }

    /// Return a copy with `key` (dotted path, e.g. `cardFarming.credentials`)
    /// set to `value`, validated against the schema.
    pub fn with_value(&self, key: &str, value: Value) -> Result<Self> {
        let mut document = serde_json::to_value(self)
            .map_err(|e| IdlerError::Internal(format!("failed to serialize settings: {e}")))?;
        set_path(&mut document, key, value)?;
        serde_json::from_value(document)
            .map_err(|e| IdlerError::InvalidInput(format!("invalid value for '{key}': {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub anti_away: bool,
    pub free_game_notifications: bool,
    pub auto_redeem_free_games: bool,
    pub api_key: Option<String>,
    pub use_beta: bool,
    pub disable_tooltips: bool,
    pub run_at_startup: bool,
    pub start_minimized: bool,
    pub close_to_tray: bool,
    pub chat_sounds: Vec<f64>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            anti_away: false,
            free_game_notifications: true,
            auto_redeem_free_games: false,
            api_key: None,
            use_beta: false,
            disable_tooltips: false,
            run_at_startup: false,
            start_minimized: false,
            close_to_tray: true,
            chat_sounds: vec![0.5],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardFarmingSettings {
    pub list_games: bool,
    pub all_games: bool,
    pub next_task_checkbox: bool,
    pub next_task: Option<String>,
    pub skip_unplayed_games: bool,
    pub credentials: Option<SessionCredentials>,
    /// Profile of the account the credentials belong to, owned by the UI.
    pub user_summary: Option<Value>,
    pub games_with_drops: usize,
    pub total_drops_remaining: u64,
    pub blacklist: Option<Vec<u32>>,
}

impl Default for CardFarmingSettings {
    fn default() -> Self {
        Self {
            list_games: false,
            all_games: true,
            next_task_checkbox: false,
            next_task: None,
            skip_unplayed_games: false,
            credentials: None,
            user_summary: None,
            games_with_drops: 0,
            total_drops_remaining: 0,
            blacklist: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementUnlockerSettings {
    pub idle: bool,
    pub hidden: bool,
    pub next_task_checkbox: bool,
    pub next_task: Option<String>,
    pub schedule: bool,
    pub schedule_from: TimeOfDay,
    pub schedule_to: TimeOfDay,
    /// Random delay bounds between unlocks, in minutes.
    pub interval: [u32; 2],
}

impl Default for AchievementUnlockerSettings {
    fn default() -> Self {
        let window = ScheduleWindow::default();
        Self {
            idle: true,
            hidden: false,
            next_task_checkbox: false,
            next_task: None,
            schedule: false,
            schedule_from: window.from,
            schedule_to: window.to,
            interval: [30, 130],
        }
    }
}

impl AchievementUnlockerSettings {
    /// The configured window, or `None` when scheduling is switched off.
    pub fn schedule_window(&self) -> Option<ScheduleWindow> {
        self.schedule.then(|| ScheduleWindow::new(self.schedule_from, self.schedule_to))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SellOption {
    HighestBuyOrder,
    LowestSellOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellLimit {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingCardsSettings {
    pub sell_options: SellOption,
    pub price_adjustment: f64,
    pub sell_limit: SellLimit,
    /// Seconds between listings.
    pub sell_delay: u32,
}

impl Default for TradingCardsSettings {
    fn default() -> Self {
        Self {
            sell_options: SellOption::HighestBuyOrder,
            price_adjustment: 0.0,
            sell_limit: SellLimit { min: 0.01, max: 10.0 },
            sell_delay: 5,
        }
    }
}

/// Limits keyed by app id, plus an optional global idle limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    #[serde(rename = "globalMaxIdleTime", default, skip_serializing_if = "Option::is_none")]
    pub global_max_idle_time: Option<u64>,
    #[serde(flatten)]
    pub per_game: BTreeMap<String, GameSpecificSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSpecificSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_achievement_unlocks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_card_drops: Option<u32>,
    /// Minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_time: Option<u64>,
}

impl GameSettings {
    pub fn for_game(&self, app_id: u32) -> Option<&GameSpecificSettings> {
        self.per_game.get(&app_id.to_string())
    }

    /// Minutes to idle `app_id` before stopping. A positive global limit
    /// overrides any per-game value.
    pub fn max_idle_time(&self, app_id: u32) -> Option<u64> {
        match self.global_max_idle_time {
            Some(global) if global > 0 => Some(global),
            _ => self.for_game(app_id).and_then(|g| g.max_idle_time).filter(|&m| m > 0),
        }
    }

    /// Cap on drops to farm for `app_id`; zero means unset.
    pub fn max_card_drops(&self, app_id: u32) -> Option<u32> {
        self.for_game(app_id).and_then(|g| g.max_card_drops).filter(|&m| m > 0)
    }
}

/// Set a dotted `key` inside `document`, creating intermediate objects.
pub fn set_path(document: &mut Value, key: &str, value: Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(IdlerError::InvalidInput(format!("invalid key path '{key}'")));
    }

    let (last, parents) = parts
        .split_last()
        .ok_or_else(|| IdlerError::InvalidInput("empty key path".into()))?;

    let mut current = document;
    for part in parents {
        let object = current.as_object_mut().ok_or_else(|| {
            IdlerError::InvalidInput(format!("cannot descend into '{part}': parent is not an object"))
        })?;
        current = object.entry((*part).to_string()).or_insert_with(|| Value::Object(Default::default()));
    }

    let object = current.as_object_mut().ok_or_else(|| {
        IdlerError::InvalidInput(format!("cannot update key '{last}': parent is not an object"))
    })?;
    object.insert((*last).to_string(), value);
    Ok(())
}
