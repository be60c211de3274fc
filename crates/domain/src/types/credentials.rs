//! Steam web session credentials

use std::fmt;

use serde::{Deserialize, Serialize};

/// Steam community cookies used by the backend's scraping calls.
///
/// The values are opaque to this layer. Older settings files stored them
/// under the cookie names, which are still accepted.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCredentials {
    #[serde(alias = "sessionid", default)]
    pub sid: String,
    #[serde(alias = "steamLoginSecure", default)]
    pub sls: String,
    #[serde(alias = "steamMachineAuth", default, skip_serializing_if = "Option::is_none")]
    pub sma: Option<String>,
}

impl SessionCredentials {
    pub fn new(sid: impl Into<String>, sls: impl Into<String>, sma: Option<String>) -> Self {
        Self { sid: sid.into(), sls: sls.into(), sma }
    }

    /// `sid` and `sls` are both required; `sma` is optional.
    pub fn is_complete(&self) -> bool {
        !self.sid.trim().is_empty() && !self.sls.trim().is_empty()
    }
}

/// Reply of `validate_session`: the profile name when the session is
/// accepted, an error string otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValidation {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SessionValidation {
    pub fn is_valid(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Resolve optional credentials to a usable set.
pub fn usable(credentials: Option<&SessionCredentials>) -> Option<&SessionCredentials> {
    credentials.filter(|c| c.is_complete())
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("sid", &"<redacted>")
            .field("sls", &"<redacted>")
            .field("sma", &self.sma.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
