//! Core port implementations over [`BackendClient`]

use async_trait::async_trait;
use idlerig_core::{
    CustomLists, DropsBackend, FreeGamesSource, GameIdler, IdleController, SettingsStore,
    SteamClient,
};
use idlerig_domain::settings::migration::migrate;
use idlerig_domain::{
    CustomList, DropsRemaining, FreeGameRedemption, FreeGames, GamesWithDrops, IdlerError, ListedGame, RawProcess,
    Result, RunningProcesses, SessionCredentials, SessionValidation, UserSettings,
    CARD_FARMING_LIST,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::client::BackendClient;

/// Session cookies plus the account, spelled `steamid` by the badge
/// scraping commands.
#[derive(Serialize)]
struct SessionArgs<'a> {
    sid: &'a str,
    sls: &'a str,
    sma: Option<&'a str>,
    steamid: &'a str,
}

impl<'a> SessionArgs<'a> {
    fn new(steam_id: &'a str, credentials: &'a SessionCredentials) -> Self {
        Self {
            sid: &credentials.sid,
            sls: &credentials.sls,
            sma: credentials.sma.as_deref(),
            steamid: steam_id,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DropsRemainingArgs<'a> {
    sid: &'a str,
    sls: &'a str,
    sma: Option<&'a str>,
    steam_id: &'a str,
    app_id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppIdArgs {
    app_id: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartIdleArgs<'a> {
    app_id: u32,
    app_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppIdsArgs<'a> {
    app_ids: &'a [u32],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SteamIdArgs<'a> {
    steam_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSettingArgs<'a> {
    steam_id: &'a str,
    key: &'a str,
    value: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs<'a> {
    steam_id: &'a str,
    list: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateListArgs<'a> {
    steam_id: &'a str,
    list: &'a str,
    new_list: &'a [ListedGame],
}

/// `{"success": ...}` or `{"error": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct CommandReply {
    #[serde(default)]
    error: Option<String>,
}

impl CommandReply {
    fn into_result(self, command: &str) -> Result<()> {
        match self.error {
            Some(error) => Err(IdlerError::Backend(format!("{command}: {error}"))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsReply {
    settings: Value,
}

impl SettingsReply {
    /// Settings documents may come from an older version of the app.
    fn into_settings(self) -> Result<UserSettings> {
        let migrated = migrate(self.settings)?;
        if migrated.changed {
            info!(from_version = migrated.from_version, "migrated stored user settings");
        }
        Ok(migrated.settings)
    }
}

#[async_trait]
impl DropsBackend for BackendClient {
    async fn drops_remaining(
        &self,
        steam_id: &str,
        app_id: u32,
        credentials: &SessionCredentials,
    ) -> Result<DropsRemaining> {
        let args = DropsRemainingArgs {
            sid: &credentials.sid,
            sls: &credentials.sls,
            sma: credentials.sma.as_deref(),
            steam_id,
            app_id,
        };
        Ok(self.invoke("get_drops_remaining", &args).await?)
    }

    async fn games_with_drops(
        &self,
        steam_id: &str,
        credentials: &SessionCredentials,
    ) -> Result<GamesWithDrops> {
        let args = SessionArgs::new(steam_id, credentials);
        Ok(self.invoke("get_games_with_drops", &args).await?)
    }

    async fn validate_session(
        &self,
        steam_id: &str,
        credentials: &SessionCredentials,
    ) -> Result<SessionValidation> {
        let args = SessionArgs::new(steam_id, credentials);
        Ok(self.invoke("validate_session", &args).await?)
    }
}

#[async_trait]
impl SettingsStore for BackendClient {
    async fn get_user_settings(&self, steam_id: &str) -> Result<UserSettings> {
        let reply: SettingsReply =
            self.invoke("get_user_settings", &SteamIdArgs { steam_id }).await?;
        reply.into_settings()
    }

    async fn update_user_settings(
        &self,
        steam_id: &str,
        key: &str,
        value: Value,
    ) -> Result<UserSettings> {
        let args = UpdateSettingArgs { steam_id, key, value };
        let reply: SettingsReply = self.invoke("update_user_settings", &args).await?;
        reply.into_settings()
    }

    async fn reset_user_settings(&self, steam_id: &str) -> Result<UserSettings> {
        let reply: SettingsReply =
            self.invoke("reset_user_settings", &SteamIdArgs { steam_id }).await?;
        reply.into_settings()
    }
}

#[async_trait]
impl SteamClient for BackendClient {
    async fn is_steam_running(&self) -> Result<bool> {
        Ok(self.invoke_no_args("is_steam_running").await?)
    }

    async fn running_processes(&self) -> Result<Vec<RawProcess>> {
        let reply: RunningProcesses = self.invoke_no_args("get_running_processes").await?;
        Ok(reply.processes)
    }

    async fn kill_all_idlers(&self) -> Result<()> {
        let reply: CommandReply = self.invoke_no_args("kill_all_steamutil_processes").await?;
        reply.into_result("kill_all_steamutil_processes")
    }
}

#[async_trait]
impl IdleController for BackendClient {
    async fn start_farm_idle(&self, app_ids: &[u32]) -> Result<()> {
        let reply: CommandReply = self.invoke("start_farm_idle", &AppIdsArgs { app_ids }).await?;
        reply.into_result("start_farm_idle")
    }

    async fn stop_farm_idle(&self, app_ids: &[u32]) -> Result<()> {
        let reply: CommandReply = self.invoke("stop_farm_idle", &AppIdsArgs { app_ids }).await?;
        reply.into_result("stop_farm_idle")
    }
}

#[async_trait]
impl GameIdler for BackendClient {
    async fn start_idle(&self, app_id: u32, app_name: &str) -> Result<()> {
        let reply: CommandReply =
            self.invoke("start_idle", &StartIdleArgs { app_id, app_name }).await?;
        reply.into_result("start_idle")
    }

    async fn stop_idle(&self, app_id: u32) -> Result<()> {
        let reply: CommandReply = self.invoke("stop_idle", &AppIdArgs { app_id }).await?;
        reply.into_result("stop_idle")
    }
}

#[async_trait]
impl CustomLists for BackendClient {
    async fn card_farming_list(&self, steam_id: &str) -> Result<Vec<ListedGame>> {
        let args = ListArgs { steam_id, list: CARD_FARMING_LIST };
        let reply: CustomList = self.invoke("get_custom_lists", &args).await?;
        Ok(reply.list_data)
    }

    async fn remove_from_card_farming_list(&self, steam_id: &str, app_id: u32) -> Result<()> {
        let args = ListArgs { steam_id, list: CARD_FARMING_LIST };
        let current: CustomList = self.invoke("get_custom_lists", &args).await?;
        let remaining = current.without(app_id);

        let update = UpdateListArgs { steam_id, list: CARD_FARMING_LIST, new_list: &remaining };
        let reply: CommandReply = self.invoke("update_custom_list", &update).await?;
        reply.into_result("update_custom_list")
    }
}

#[async_trait]
impl FreeGamesSource for BackendClient {
    async fn free_games(&self) -> Result<FreeGames> {
        Ok(self.invoke_no_args("get_free_games").await?)
    }

    async fn redeem_free_game(&self, app_id: u32) -> Result<FreeGameRedemption> {
        Ok(self.invoke("redeem_free_game", &AppIdArgs { app_id }).await?)
    }
}
