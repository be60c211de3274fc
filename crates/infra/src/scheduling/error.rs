//! Poller lifecycle errors

use std::time::Duration;

use idlerig_domain::IdlerError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("poller '{job}' is already running")]
    AlreadyRunning { job: &'static str },

    #[error("poller '{job}' was not started")]
    NotStarted { job: &'static str },

    /// The loop task did not wind down within the join timeout.
    #[error("poller '{job}' did not stop within {waited:?}")]
    StopTimedOut { job: &'static str, waited: Duration },

    /// The loop task panicked or was aborted from outside.
    #[error("poller '{job}' loop task ended abnormally")]
    LoopTaskFailed {
        job: &'static str,
        #[source]
        source: JoinError,
    },
}

impl PollerError {
    pub fn job(&self) -> &'static str {
        match self {
            Self::AlreadyRunning { job }
            | Self::NotStarted { job }
            | Self::StopTimedOut { job, .. }
            | Self::LoopTaskFailed { job, .. } => job,
        }
    }
}

impl From<PollerError> for IdlerError {
    fn from(err: PollerError) -> Self {
        match err {
            PollerError::AlreadyRunning { .. } | PollerError::NotStarted { .. } => {
                IdlerError::InvalidInput(err.to_string())
            }
            PollerError::StopTimedOut { .. } | PollerError::LoopTaskFailed { .. } => {
                IdlerError::Internal(err.to_string())
            }
        }
    }
}

pub type PollerResult<T> = Result<T, PollerError>;
