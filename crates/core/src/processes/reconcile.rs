//! Idle list reconciliation
//!
//! Merges a freshly observed process list into the previous idle list so
//! that start times survive for as long as an app id keeps running.

use std::collections::HashSet;

use idlerig_domain::{IdleProcessEntry, RawProcess};

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// Same set of app ids; keep the previous list as is.
    Unchanged,
    Changed(Vec<IdleProcessEntry>),
}

impl Reconciled {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    /// Resolve to the list the caller should hold from now on.
    pub fn into_entries(self, previous: &[IdleProcessEntry]) -> Vec<IdleProcessEntry> {
        match self {
            Self::Unchanged => previous.to_vec(),
            Self::Changed(entries) => entries,
        }
    }
}

/// Merge `observed` into `previous`.
///
/// When the app id sets match, nothing changes: pid and name refreshes are
/// ignored. Otherwise the list is rebuilt from `observed`, reusing the start
/// time of any app id already present and stamping `now_ms` on new ones.
pub fn reconcile(
    previous: &[IdleProcessEntry],
    observed: &[RawProcess],
    now_ms: i64,
) -> Reconciled {
    if previous.len() == observed.len() {
        let previous_ids: HashSet<u32> = previous.iter().map(|e| e.app_id).collect();
        let observed_ids: HashSet<u32> = observed.iter().map(|p| p.appid).collect();
        if previous_ids == observed_ids {
            return Reconciled::Unchanged;
        }
    }

    let entries = observed
        .iter()
        .map(|process| {
            let start_time = previous
                .iter()
                .find(|e| e.app_id == process.appid)
                .map_or(now_ms, |e| e.start_time);
            IdleProcessEntry::from_raw(process, start_time)
        })
        .collect();

    Reconciled::Changed(entries)
}
