//! Card farming commands

use idlerig_core::FarmingOutcome;

use crate::context::AppContext;
use crate::utils::logging::execute_command;

pub async fn start_card_farming(context: &AppContext) -> Result<(), String> {
    execute_command("farming::start_card_farming", || async { context.start_card_farming() }).await
}

/// Cancel farming. `None` when nothing was running.
pub async fn stop_card_farming(context: &AppContext) -> Result<Option<FarmingOutcome>, String> {
    execute_command("farming::stop_card_farming", || async {
        Ok(context.stop_card_farming().await)
    })
    .await
}
