//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for idlerig
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IdlerError {
    /// Card farming credentials are absent or incomplete; the user must
    /// reconfigure them before any remote call is attempted.
    #[error("Missing session credentials")]
    MissingCredentials,

    /// The backend rejected the stored credentials.
    #[error("Session credentials are outdated")]
    OutdatedCredentials,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// User must enter credentials.
    MissingCredentials,
    /// Credentials were cleared; user must sign in again.
    OutdatedCredentials,
    /// Remote call failed; log, default, and show a generic notice.
    Transient,
    /// Programming or configuration error; never retried.
    Fatal,
}

impl IdlerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials => ErrorKind::MissingCredentials,
            Self::OutdatedCredentials => ErrorKind::OutdatedCredentials,
            Self::Backend(_) | Self::Network(_) => ErrorKind::Transient,
            Self::Config(_) | Self::InvalidInput(_) | Self::NotFound(_) | Self::Internal(_) => {
                ErrorKind::Fatal
            }
        }
    }

    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

/// Result type alias for idlerig operations
pub type Result<T> = std::result::Result<T, IdlerError>;
