//! User-curated game lists

use serde::{Deserialize, Serialize};

/// Name of the list holding games picked for card farming.
pub const CARD_FARMING_LIST: &str = "cardFarmingList";

/// A game stored in a custom list. Extra fields written by the UI are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
}

/// Reply of `get_custom_lists`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomList {
    #[serde(default)]
    pub list_data: Vec<ListedGame>,
}

impl CustomList {
    /// Copy of this list without `app_id`.
    pub fn without(&self, app_id: u32) -> Vec<ListedGame> {
        self.list_data.iter().filter(|g| g.appid != app_id).cloned().collect()
    }
}
