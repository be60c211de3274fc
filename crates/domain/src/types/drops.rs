//! Card drop types

use serde::{Deserialize, Deserializer, Serialize};

/// A game that still has card drops to earn.
///
/// The backend has used both `id` and `appid` for the app id over time;
/// both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    #[serde(rename = "appid", alias = "id", alias = "app_id", deserialize_with = "app_id_from_any")]
    pub app_id: u32,
    pub name: String,
    #[serde(default)]
    pub remaining: u32,
    /// Hours played, as reported on the badge page.
    #[serde(default)]
    pub playtime: f64,
}

/// The badge scraper reports ids as strings, the process list as numbers.
fn app_id_from_any<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(id) => Ok(id),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Reply of `get_drops_remaining`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropsRemaining {
    #[serde(default)]
    pub remaining: Option<u32>,
}

/// Reply of `get_games_with_drops`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesWithDrops {
    #[serde(default)]
    pub games_with_drops: Option<Vec<DropEntry>>,
}

/// Aggregate over one polling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropsSummary {
    pub games_with_drops: usize,
    pub total_drops_remaining: u64,
}

impl DropsSummary {
    /// Sum `remaining` and count entries. No deduplication: the backend
    /// returns unique app ids.
    pub fn from_entries(entries: &[DropEntry]) -> Self {
        Self {
            games_with_drops: entries.len(),
            total_drops_remaining: entries.iter().map(|e| u64::from(e.remaining)).sum(),
        }
    }
}

/// A game currently offered for free on the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeGame {
    pub appid: u32,
    pub name: String,
}

/// Reply of `get_free_games`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeGames {
    #[serde(default)]
    pub games: Vec<FreeGame>,
}

/// Reply of `redeem_free_game`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeGameRedemption {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
