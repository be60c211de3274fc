//! Idling process commands

use std::collections::HashSet;

use idlerig_domain::{AppEvent, IdleProcessEntry, RunningProcesses};
use tracing::debug;

use crate::context::AppContext;
use crate::utils::logging::execute_command;

/// Games currently being idled, with their start times.
pub async fn get_idle_games(context: &AppContext) -> Result<Vec<IdleProcessEntry>, String> {
    execute_command("processes::get_idle_games", || async {
        Ok(context.idle_tracker.lock().entries().to_vec())
    })
    .await
}

/// Feed a `running_processes_changed` payload into the idle list. Changes
/// are published on the event bus.
pub async fn apply_process_list(
    context: &AppContext,
    payload: RunningProcesses,
) -> Result<Vec<IdleProcessEntry>, String> {
    execute_command("processes::apply_process_list", || async {
        let (changed, entries) = {
            let mut tracker = context.idle_tracker.lock();
            let changed = tracker.apply(&payload.processes);
            (changed, tracker.entries().to_vec())
        };

        if changed {
            context.events.publish(AppEvent::RunningProcessesChanged(entries.clone()));
        } else {
            debug!(count = entries.len(), "process list unchanged");
        }
        Ok(entries)
    })
    .await
}

/// Replace the set of games the user owns. Free promotions for these are
/// not reported.
pub async fn set_owned_games(context: &AppContext, app_ids: Vec<u32>) -> Result<usize, String> {
    execute_command("processes::set_owned_games", || async {
        let owned: HashSet<u32> = app_ids.into_iter().collect();
        let count = owned.len();
        *context.owned_games.write() = owned;
        Ok(count)
    })
    .await
}

/// Start idling one game. Refused when Steam is not running, the idler cap
/// is reached or the game is already idling.
pub async fn start_idle(context: &AppContext, app_id: u32, app_name: String) -> Result<(), String> {
    execute_command("processes::start_idle", || async {
        let steam_id = context.steam_id()?;
        context.manual_idle.start(steam_id, app_id, &app_name).await
    })
    .await
}

/// Stop idling one game.
pub async fn stop_idle(context: &AppContext, app_id: u32) -> Result<(), String> {
    execute_command("processes::stop_idle", || async { context.manual_idle.stop(app_id).await })
        .await
}
