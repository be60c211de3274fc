//! Idle list state

use std::sync::Arc;
use std::time::Duration;

use idlerig_common::time::Clock;
use idlerig_domain::constants::MAX_IDLE_PROCESSES;
use idlerig_domain::{IdleProcessEntry, RawProcess};
use tracing::debug;

use super::reconcile::{reconcile, Reconciled};

/// Owns the list of games being idled and keeps it in step with process
/// list observations.
pub struct IdleTracker {
    entries: Vec<IdleProcessEntry>,
    clock: Arc<dyn Clock>,
}

impl IdleTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Vec::new(), clock }
    }

    /// Fold an observation in. Returns true when the list changed.
    pub fn apply(&mut self, observed: &[RawProcess]) -> bool {
        match reconcile(&self.entries, observed, self.clock.millis_since_epoch()) {
            Reconciled::Unchanged => false,
            Reconciled::Changed(entries) => {
                debug!(before = self.entries.len(), after = entries.len(), "idle list changed");
                self.entries = entries;
                true
            }
        }
    }

    pub fn entries(&self) -> &[IdleProcessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_idling(&self, app_id: u32) -> bool {
        self.entries.iter().any(|e| e.app_id == app_id)
    }

    /// How long `app_id` has been idling.
    pub fn elapsed(&self, app_id: u32) -> Option<Duration> {
        let entry = self.entries.iter().find(|e| e.app_id == app_id)?;
        let millis = self.clock.millis_since_epoch().saturating_sub(entry.start_time);
        Some(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }

    /// Whether another idler may be started.
    pub fn has_capacity(&self) -> bool {
        self.entries.len() < MAX_IDLE_PROCESSES
    }
}
