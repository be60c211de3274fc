//! User settings commands

use idlerig_domain::UserSettings;
use serde_json::Value;

use crate::context::AppContext;
use crate::utils::logging::execute_command;

pub async fn get_user_settings(context: &AppContext) -> Result<UserSettings, String> {
    execute_command("settings::get_user_settings", || async {
        context.user_settings(context.steam_id()?).await
    })
    .await
}

/// Set one dotted key, e.g. `general.freeGameNotifications`.
pub async fn update_user_settings(
    context: &AppContext,
    key: String,
    value: Value,
) -> Result<UserSettings, String> {
    execute_command("settings::update_user_settings", || async {
        context.settings_store().update_user_settings(context.steam_id()?, &key, value).await
    })
    .await
}

pub async fn reset_user_settings(context: &AppContext) -> Result<UserSettings, String> {
    execute_command("settings::reset_user_settings", || async {
        context.settings_store().reset_user_settings(context.steam_id()?).await
    })
    .await
}
