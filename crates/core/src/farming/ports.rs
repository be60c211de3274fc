//! Port interfaces used by the card farming loop

use async_trait::async_trait;
use idlerig_domain::{ListedGame, Result};

/// Starts and stops farming idlers for a batch of games.
#[async_trait]
pub trait IdleController: Send + Sync {
    async fn start_farm_idle(&self, app_ids: &[u32]) -> Result<()>;
    async fn stop_farm_idle(&self, app_ids: &[u32]) -> Result<()>;
}

/// The user's curated card farming list.
#[async_trait]
pub trait CustomLists: Send + Sync {
    async fn card_farming_list(&self, steam_id: &str) -> Result<Vec<ListedGame>>;
    async fn remove_from_card_farming_list(&self, steam_id: &str, app_id: u32) -> Result<()>;
}
