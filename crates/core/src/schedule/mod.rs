//! Daily schedule windows
//!
//! Automation may be restricted to a window of the day. Windows can wrap
//! midnight (`22:00-06:00`). A window whose start equals its end is never
//! active.

use std::sync::Arc;
use std::time::Duration;

use idlerig_common::time::Clock;
use idlerig_domain::constants::SCHEDULE_RECHECK_SECS;
use idlerig_domain::{ScheduleWindow, TimeOfDay};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Whether `now` falls inside `window`. The start is inclusive and the end
/// exclusive.
pub fn is_within_schedule(now: TimeOfDay, window: &ScheduleWindow) -> bool {
    let ScheduleWindow { from, to } = *window;
    if to < from {
        now >= from || now < to
    } else {
        from <= now && now < to
    }
}

/// How [`ScheduleChecker::wait_until_in_schedule`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleWait {
    Opened,
    Cancelled,
}

/// Checks windows against the local wall clock.
#[derive(Clone)]
pub struct ScheduleChecker {
    clock: Arc<dyn Clock>,
    recheck_every: Duration,
}

impl ScheduleChecker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, recheck_every: Duration::from_secs(SCHEDULE_RECHECK_SECS) }
    }

    pub fn with_recheck_interval(mut self, every: Duration) -> Self {
        self.recheck_every = every;
        self
    }

    /// Local time of day, truncated to the minute.
    pub fn now(&self) -> TimeOfDay {
        TimeOfDay::from_time(&self.clock.local_time())
    }

    pub fn now_within(&self, window: &ScheduleWindow) -> bool {
        is_within_schedule(self.now(), window)
    }

    /// Block until the window opens, re-checking at the configured interval.
    pub async fn wait_until_in_schedule(
        &self,
        window: &ScheduleWindow,
        cancel: &CancellationToken,
    ) -> ScheduleWait {
        loop {
            if cancel.is_cancelled() {
                return ScheduleWait::Cancelled;
            }
            if self.now_within(window) {
                return ScheduleWait::Opened;
            }

            debug!(window = %window, now = %self.now(), "outside schedule, waiting");

            tokio::select! {
                _ = cancel.cancelled() => return ScheduleWait::Cancelled,
                _ = tokio::time::sleep(self.recheck_every) => {}
            }
        }
    }
}
