//! Schedule commands

use idlerig_domain::ScheduleWindow;

use crate::context::AppContext;
use crate::utils::logging::execute_command;

/// Whether the local time falls inside `window`.
///
/// Without a window, the achievement unlocker's configured schedule is
/// used; an account with scheduling turned off is always in schedule.
pub async fn is_within_schedule(
    context: &AppContext,
    window: Option<ScheduleWindow>,
) -> Result<bool, String> {
    execute_command("schedule::is_within_schedule", || async {
        let window = match window {
            Some(window) => Some(window),
            None => {
                let settings = context.user_settings(context.steam_id()?).await?;
                settings.achievement_unlocker.schedule_window()
            }
        };

        Ok(match window {
            Some(window) => context.schedule.now_within(&window),
            None => true,
        })
    })
    .await
}
