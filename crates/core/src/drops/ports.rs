//! Port interfaces for card drop lookups
//!
//! Implemented by the backend client in infra; mocked in tests.

use async_trait::async_trait;
use idlerig_domain::{DropsRemaining, GamesWithDrops, Result, SessionCredentials, SessionValidation};

/// Remote capability that scrapes badge pages for drop counts.
#[async_trait]
pub trait DropsBackend: Send + Sync {
    /// Drops left for one game.
    async fn drops_remaining(
        &self,
        steam_id: &str,
        app_id: u32,
        credentials: &SessionCredentials,
    ) -> Result<DropsRemaining>;

    /// Every game that still has drops.
    async fn games_with_drops(
        &self,
        steam_id: &str,
        credentials: &SessionCredentials,
    ) -> Result<GamesWithDrops>;

    /// Ask the community site whether the session cookies are still
    /// accepted.
    async fn validate_session(
        &self,
        steam_id: &str,
        credentials: &SessionCredentials,
    ) -> Result<SessionValidation>;
}
