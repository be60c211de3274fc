//! Drop polling service
//!
//! Every public lookup degrades to a default value: failures are logged,
//! surfaced as a generic notice and never propagated to the caller. Only
//! [`DropPoller::refresh_summary`] returns errors, because it also has to
//! report credential problems. The farming loop uses a fallible variant of
//! the per-game check so that an outage never reads as "no drops left".

use std::sync::Arc;

use idlerig_common::resilience::{RetryConfig, RetryExecutor};
use idlerig_domain::constants::{
    KEY_CARD_FARMING_USER, KEY_CREDENTIALS, KEY_GAMES_WITH_DROPS, KEY_TOTAL_DROPS,
};
use idlerig_domain::types::credentials::usable;
use idlerig_domain::{
    DropEntry, DropsSummary, IdlerError, Notice, Result, SessionCredentials,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::ports::DropsBackend;
use crate::notify_ports::Notifier;
use crate::resilience::{into_idler_error, TransientOnly};
use crate::settings_ports::SettingsStore;

/// Polls the backend for remaining card drops.
pub struct DropPoller {
    backend: Arc<dyn DropsBackend>,
    settings: Arc<dyn SettingsStore>,
    notifier: Arc<dyn Notifier>,
    retry: RetryExecutor<TransientOnly>,
}

impl DropPoller {
    pub fn new(
        backend: Arc<dyn DropsBackend>,
        settings: Arc<dyn SettingsStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            settings,
            notifier,
            retry: RetryExecutor::new(RetryConfig::default(), TransientOnly),
        }
    }

    /// Replace the default retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config, TransientOnly);
        self
    }

    /// Drops left for `app_id`, or 0 when they cannot be determined.
    pub async fn check_drops(
        &self,
        steam_id: &str,
        app_id: u32,
        credentials: Option<&SessionCredentials>,
    ) -> u32 {
        self.try_check_drops(steam_id, app_id, credentials).await.unwrap_or(0)
    }

    /// Drops left for `app_id`. Unlike [`DropPoller::check_drops`] a failed
    /// lookup stays an error, so callers that delete state on a zero count
    /// can tell "none left" from "unknown".
    pub(crate) async fn try_check_drops(
        &self,
        steam_id: &str,
        app_id: u32,
        credentials: Option<&SessionCredentials>,
    ) -> Result<u32> {
        let credentials =
            self.require_credentials(credentials).ok_or(IdlerError::MissingCredentials)?;

        let result = self
            .retry
            .execute(|| self.backend.drops_remaining(steam_id, app_id, credentials))
            .await
            .map_err(into_idler_error);

        match result {
            Ok(reply) => Ok(reply.remaining.unwrap_or(0)),
            Err(err) => {
                error!(steam_id, app_id, error = %err, "drops check failed");
                self.notify_failure("check_drops");
                Err(err)
            }
        }
    }

    /// Every game that still has drops, or an empty list on failure.
    pub async fn all_games_with_drops(
        &self,
        steam_id: &str,
        credentials: Option<&SessionCredentials>,
    ) -> Vec<DropEntry> {
        let Some(credentials) = self.require_credentials(credentials) else {
            return Vec::new();
        };

        let result = self
            .retry
            .execute(|| self.backend.games_with_drops(steam_id, credentials))
            .await
            .map_err(into_idler_error);

        match result {
            Ok(reply) => reply.games_with_drops.unwrap_or_default(),
            Err(err) => {
                error!(steam_id, error = %err, "games with drops lookup failed");
                self.notify_failure("all_games_with_drops");
                Vec::new()
            }
        }
    }

    /// Validate the stored session, fetch every game with drops and persist
    /// the aggregate counts into the user's settings.
    ///
    /// A rejected session clears the stored credentials and user summary.
    pub async fn refresh_summary(&self, steam_id: &str) -> Result<DropsSummary> {
        let settings = self.settings.get_user_settings(steam_id).await.map_err(|err| {
            error!(steam_id, error = %err, "failed to load settings for drops refresh");
            self.notify_failure("refresh_summary");
            err
        })?;

        let Some(credentials) = usable(settings.credentials()).cloned() else {
            self.notifier.notify(Notice::MissingCredentials);
            return Err(IdlerError::MissingCredentials);
        };

        let validation = self
            .retry
            .execute(|| self.backend.validate_session(steam_id, &credentials))
            .await
            .map_err(into_idler_error)
            .map_err(|err| {
                error!(steam_id, error = %err, "session validation failed");
                self.notify_failure("refresh_summary");
                err
            })?;

        if !validation.is_valid() {
            warn!(steam_id, reason = ?validation.error, "session rejected, clearing credentials");
            self.clear_credentials(steam_id).await;
            self.notifier.notify(Notice::OutdatedCredentials);
            return Err(IdlerError::OutdatedCredentials);
        }

        let entries = self.all_games_with_drops(steam_id, Some(&credentials)).await;
        let summary = DropsSummary::from_entries(&entries);

        self.persist(steam_id, KEY_GAMES_WITH_DROPS, Value::from(summary.games_with_drops))
            .await;
        self.persist(steam_id, KEY_TOTAL_DROPS, Value::from(summary.total_drops_remaining))
            .await;

        info!(
            steam_id,
            games = summary.games_with_drops,
            drops = summary.total_drops_remaining,
            "drops summary refreshed"
        );
        Ok(summary)
    }

    /// Pass complete credentials through; otherwise tell the user they are
    /// missing.
    pub(crate) fn require_credentials<'a>(
        &self,
        credentials: Option<&'a SessionCredentials>,
    ) -> Option<&'a SessionCredentials> {
        let usable = usable(credentials);
        if usable.is_none() {
            debug!("credentials missing, skipping backend call");
            self.notifier.notify(Notice::MissingCredentials);
        }
        usable
    }

    fn notify_failure(&self, context: &str) {
        self.notifier.notify(Notice::GenericError { context: context.to_string() });
    }

    async fn clear_credentials(&self, steam_id: &str) {
        self.persist(steam_id, KEY_CREDENTIALS, Value::Null).await;
        self.persist(steam_id, KEY_CARD_FARMING_USER, Value::Null).await;
    }

    async fn persist(&self, steam_id: &str, key: &str, value: Value) {
        if let Err(err) = self.settings.update_user_settings(steam_id, key, value).await {
            error!(steam_id, key, error = %err, "failed to persist setting");
        }
    }
}
