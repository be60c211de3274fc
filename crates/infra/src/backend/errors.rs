//! Backend RPC error types
//!
//! Classifies transport and HTTP failures so callers can tell a flaky
//! backend from a bad request.

use std::time::Duration;

use idlerig_domain::IdlerError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorCategory {
    /// 5xx replies - retryable
    Server,
    /// 4xx replies - non-retryable
    Client,
    /// Connect failures and timeouts - retryable
    Network,
    /// Replies that could not be decoded - non-retryable
    Decode,
    Config,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode reply: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BackendError {
    pub fn category(&self) -> BackendErrorCategory {
        match self {
            Self::Server(_) => BackendErrorCategory::Server,
            Self::Client(_) | Self::NotFound(_) => BackendErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => BackendErrorCategory::Network,
            Self::Decode(_) => BackendErrorCategory::Decode,
            Self::Config(_) => BackendErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(self.category(), BackendErrorCategory::Server | BackendErrorCategory::Network)
    }

    pub(crate) fn from_status(status: StatusCode, command: &str, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{command} returned status {status}")
        } else {
            format!("{command} returned status {status}: {body}")
        };

        if status == StatusCode::NOT_FOUND {
            Self::NotFound(message)
        } else if status.is_server_error() {
            Self::Server(message)
        } else if status.is_client_error() {
            Self::Client(message)
        } else {
            Self::Network(message)
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<BackendError> for IdlerError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Server(message) => IdlerError::Backend(message),
            BackendError::Network(message) => IdlerError::Network(message),
            BackendError::Timeout(after) => IdlerError::Network(format!("timed out after {after:?}")),
            BackendError::NotFound(message) => IdlerError::NotFound(message),
            BackendError::Client(message) | BackendError::Decode(message) => {
                IdlerError::InvalidInput(message)
            }
            BackendError::Config(message) => IdlerError::Config(message),
        }
    }
}
