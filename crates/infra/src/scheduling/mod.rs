//! Background polling
//!
//! [`IntervalPoller`] drives a [`PollJob`] on a fixed interval with
//! explicit start/stop and no overlapping runs. The jobs in [`jobs`] wire
//! it to the drops, free games, Steam status, process and idle limit
//! services.

pub mod error;
pub mod jobs;
pub mod poller;

pub use error::{PollerError, PollerResult};
pub use jobs::{DropsSummaryJob, FreeGamesJob, IdleLimitJob, ProcessListJob, SteamStatusJob};
pub use poller::{IntervalPoller, PollJob, PollerConfig, PollerStats};
