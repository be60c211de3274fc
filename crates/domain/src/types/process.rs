//! Idling process types

use serde::{Deserialize, Serialize};

/// A process reported by the backend's process-list notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProcess {
    pub appid: u32,
    pub name: String,
    pub pid: u32,
}

/// Payload of a `running_processes_changed` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningProcesses {
    #[serde(default)]
    pub processes: Vec<RawProcess>,
}

/// A game currently being idled.
///
/// `start_time` is stamped the first time `app_id` is observed and kept
/// for as long as the process stays alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleProcessEntry {
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub name: String,
    pub pid: u32,
    /// Unix epoch milliseconds.
    pub start_time: i64,
}

impl IdleProcessEntry {
    pub fn from_raw(raw: &RawProcess, start_time: i64) -> Self {
        Self { app_id: raw.appid, name: raw.name.clone(), pid: raw.pid, start_time }
    }
}
