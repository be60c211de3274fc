//! Port for per-user settings persistence

use async_trait::async_trait;
use idlerig_domain::{Result, UserSettings};
use serde_json::Value;

/// Settings are stored per Steam account and addressed by dotted keys such
/// as `cardFarming.credentials`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_user_settings(&self, steam_id: &str) -> Result<UserSettings>;

    /// Set one key and return the full document as stored.
    async fn update_user_settings(
        &self,
        steam_id: &str,
        key: &str,
        value: Value,
    ) -> Result<UserSettings>;

    async fn reset_user_settings(&self, steam_id: &str) -> Result<UserSettings>;
}
