//! Port for the store's free promotions

use async_trait::async_trait;
use idlerig_domain::{FreeGameRedemption, FreeGames, Result};

#[async_trait]
pub trait FreeGamesSource: Send + Sync {
    async fn free_games(&self) -> Result<FreeGames>;

    /// Add a free game to the signed-in account.
    async fn redeem_free_game(&self, app_id: u32) -> Result<FreeGameRedemption>;
}
