//! Retry policy for backend calls

use idlerig_common::resilience::{RetryDecision, RetryError, RetryPolicy};
use idlerig_domain::IdlerError;

/// Retries only errors classified as transient.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientOnly;

impl RetryPolicy<IdlerError> for TransientOnly {
    fn should_retry(&self, error: &IdlerError, _attempt: u32) -> RetryDecision {
        if error.is_transient() {
            RetryDecision::Retry
        } else {
            RetryDecision::Stop
        }
    }
}

/// Collapse a retry failure into the error the operation last returned.
pub fn into_idler_error(err: RetryError<IdlerError>) -> IdlerError {
    let summary = err.to_string();
    err.into_last_error().unwrap_or(IdlerError::Internal(summary))
}
