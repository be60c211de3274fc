//! Card drop commands

use idlerig_domain::{DropEntry, DropsSummary};

use crate::context::AppContext;
use crate::utils::logging::execute_command;

/// Validate the session, fetch every game with drops and persist the
/// aggregate counts.
pub async fn get_drops_summary(context: &AppContext) -> Result<DropsSummary, String> {
    execute_command("drops::get_drops_summary", || async {
        let summary = context.drops.refresh_summary(context.steam_id()?).await?;
        *context.last_summary.write() = Some(summary);
        Ok(summary)
    })
    .await
}

/// Last summary computed by the poller or by [`get_drops_summary`].
pub async fn get_last_drops_summary(context: &AppContext) -> Result<Option<DropsSummary>, String> {
    execute_command("drops::get_last_drops_summary", || async {
        Ok(*context.last_summary.read())
    })
    .await
}

/// Drops left for one game; 0 when they cannot be determined.
pub async fn check_drops(context: &AppContext, app_id: u32) -> Result<u32, String> {
    execute_command("drops::check_drops", || async {
        let steam_id = context.steam_id()?;
        let settings = context.user_settings(steam_id).await?;
        Ok(context.drops.check_drops(steam_id, app_id, settings.credentials()).await)
    })
    .await
}

/// Every game that still has drops; empty when they cannot be determined.
pub async fn get_games_with_drops(context: &AppContext) -> Result<Vec<DropEntry>, String> {
    execute_command("drops::get_games_with_drops", || async {
        let steam_id = context.steam_id()?;
        let settings = context.user_settings(steam_id).await?;
        Ok(context.drops.all_games_with_drops(steam_id, settings.credentials()).await)
    })
    .await
}
