//! In-memory port mocks

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use idlerig_core::{
    CustomLists, DropsBackend, FreeGamesSource, GameIdler, IdleController, Notifier,
    SettingsStore, SteamClient,
};
use idlerig_domain::{
    DropEntry, DropsRemaining, FreeGame, FreeGameRedemption, FreeGames, GamesWithDrops,
    IdlerError, ListedGame, Notice, RawProcess, Result as DomainResult, SessionCredentials, SessionValidation,
    UserSettings,
};
use parking_lot::Mutex;
use serde_json::Value;

pub fn credentials() -> SessionCredentials {
    SessionCredentials::new("sid", "sls", None)
}

pub fn entry(app_id: u32, remaining: u32) -> DropEntry {
    DropEntry { app_id, name: format!("game-{app_id}"), remaining, playtime: 0.0 }
}

/// Settings with complete credentials and the given farming mode.
pub fn signed_in_settings(all_games: bool) -> UserSettings {
    let mut settings = UserSettings::default();
    settings.card_farming.credentials = Some(credentials());
    settings.card_farming.all_games = all_games;
    settings.card_farming.list_games = !all_games;
    settings
}

/// Scripted drops backend.
///
/// `remaining` holds a queue of replies per app id and `games` a queue of
/// game lists; in both the last reply repeats once the queue is down to one
/// element. Queued `failures` are returned before any scripted reply, once
/// more than `fail_after` calls have been made.
#[derive(Default)]
pub struct MockDropsBackend {
    remaining: Mutex<HashMap<u32, VecDeque<u32>>>,
    games: Mutex<VecDeque<Vec<DropEntry>>>,
    validation: Mutex<SessionValidation>,
    failures: Mutex<VecDeque<IdlerError>>,
    fail_after: AtomicUsize,
    pub drops_calls: AtomicUsize,
    pub games_calls: AtomicUsize,
    pub validate_calls: AtomicUsize,
}

impl MockDropsBackend {
    pub fn new() -> Self {
        Self {
            validation: Mutex::new(SessionValidation { user: Some("gaben".into()), error: None }),
            ..Default::default()
        }
    }

    pub fn with_remaining(self, app_id: u32, replies: &[u32]) -> Self {
        self.remaining.lock().insert(app_id, replies.iter().copied().collect());
        self
    }

    /// Queue a reply for `games_with_drops`.
    pub fn with_games(self, games: Vec<DropEntry>) -> Self {
        self.games.lock().push_back(games);
        self
    }

    pub fn rejecting_session(self) -> Self {
        *self.validation.lock() =
            SessionValidation { user: None, error: Some("Not logged in".into()) };
        self
    }

    pub fn failing_with(self, errors: Vec<IdlerError>) -> Self {
        *self.failures.lock() = errors.into();
        self
    }

    /// Let the first `calls` requests through before failing.
    pub fn failing_after(self, calls: usize, errors: Vec<IdlerError>) -> Self {
        self.fail_after.store(calls, Ordering::SeqCst);
        self.failing_with(errors)
    }

    pub fn total_calls(&self) -> usize {
        self.drops_calls.load(Ordering::SeqCst)
            + self.games_calls.load(Ordering::SeqCst)
            + self.validate_calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<IdlerError> {
        if self.total_calls() <= self.fail_after.load(Ordering::SeqCst) {
            return None;
        }
        self.failures.lock().pop_front()
    }
}

#[async_trait]
impl DropsBackend for MockDropsBackend {
    async fn drops_remaining(
        &self,
        _steam_id: &str,
        app_id: u32,
        _credentials: &SessionCredentials,
    ) -> DomainResult<DropsRemaining> {
        self.drops_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_failure() {
            return Err(err);
        }
        let mut remaining = self.remaining.lock();
        let replies = remaining.entry(app_id).or_default();
        let reply = if replies.len() > 1 { replies.pop_front() } else { replies.front().copied() };
        Ok(DropsRemaining { remaining: reply })
    }

    async fn games_with_drops(
        &self,
        _steam_id: &str,
        _credentials: &SessionCredentials,
    ) -> DomainResult<GamesWithDrops> {
        self.games_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_failure() {
            return Err(err);
        }
        let mut games = self.games.lock();
        let reply = if games.len() > 1 { games.pop_front() } else { games.front().cloned() };
        Ok(GamesWithDrops { games_with_drops: reply })
    }

    async fn validate_session(
        &self,
        _steam_id: &str,
        _credentials: &SessionCredentials,
    ) -> DomainResult<SessionValidation> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_failure() {
            return Err(err);
        }
        Ok(self.validation.lock().clone())
    }
}

/// Settings held in memory, with every update recorded.
pub struct MockSettingsStore {
    settings: Mutex<UserSettings>,
    pub updates: Mutex<Vec<(String, Value)>>,
    fail: AtomicBool,
}

impl MockSettingsStore {
    pub fn new(settings: UserSettings) -> Self {
        Self { settings: Mutex::new(settings), updates: Mutex::new(Vec::new()), fail: AtomicBool::new(false) }
    }

    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn current(&self) -> UserSettings {
        self.settings.lock().clone()
    }

    pub fn updated_keys(&self) -> Vec<String> {
        self.updates.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(IdlerError::Network("settings unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    async fn get_user_settings(&self, _steam_id: &str) -> DomainResult<UserSettings> {
        self.check()?;
        Ok(self.current())
    }

    async fn update_user_settings(
        &self,
        _steam_id: &str,
        key: &str,
        value: Value,
    ) -> DomainResult<UserSettings> {
        self.check()?;
        self.updates.lock().push((key.to_string(), value.clone()));
        let mut settings = self.settings.lock();
        *settings = settings.with_value(key, value)?;
        Ok(settings.clone())
    }

    async fn reset_user_settings(&self, _steam_id: &str) -> DomainResult<UserSettings> {
        self.check()?;
        let mut settings = self.settings.lock();
        *settings = UserSettings::default();
        Ok(settings.clone())
    }
}

/// Collects every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdleCall {
    Start(Vec<u32>),
    Stop(Vec<u32>),
}

/// Records start/stop requests; can be told to fail starts.
#[derive(Default)]
pub struct MockIdleController {
    pub calls: Mutex<Vec<IdleCall>>,
    fail_start: AtomicBool,
}

impl MockIdleController {
    pub fn failing_start() -> Self {
        let controller = Self::default();
        controller.fail_start.store(true, Ordering::SeqCst);
        controller
    }

    pub fn calls(&self) -> Vec<IdleCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl IdleController for MockIdleController {
    async fn start_farm_idle(&self, app_ids: &[u32]) -> DomainResult<()> {
        self.calls.lock().push(IdleCall::Start(app_ids.to_vec()));
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(IdlerError::Backend("too many idlers".into()));
        }
        Ok(())
    }

    async fn stop_farm_idle(&self, app_ids: &[u32]) -> DomainResult<()> {
        self.calls.lock().push(IdleCall::Stop(app_ids.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockCustomLists {
    list: Mutex<Vec<ListedGame>>,
}

impl MockCustomLists {
    pub fn new(app_ids: &[u32]) -> Self {
        let list = app_ids
            .iter()
            .map(|&appid| ListedGame { appid, name: format!("game-{appid}") })
            .collect();
        Self { list: Mutex::new(list) }
    }

    pub fn app_ids(&self) -> Vec<u32> {
        self.list.lock().iter().map(|g| g.appid).collect()
    }
}

#[async_trait]
impl CustomLists for MockCustomLists {
    async fn card_farming_list(&self, _steam_id: &str) -> DomainResult<Vec<ListedGame>> {
        Ok(self.list.lock().clone())
    }

    async fn remove_from_card_farming_list(&self, _steam_id: &str, app_id: u32) -> DomainResult<()> {
        self.list.lock().retain(|g| g.appid != app_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSteamClient {
    pub running: AtomicBool,
    pub processes: Mutex<Vec<RawProcess>>,
    pub kills: AtomicUsize,
}

#[async_trait]
impl SteamClient for MockSteamClient {
    async fn is_steam_running(&self) -> DomainResult<bool> {
        Ok(self.running.load(Ordering::SeqCst))
    }

    async fn running_processes(&self) -> DomainResult<Vec<RawProcess>> {
        Ok(self.processes.lock().clone())
    }

    async fn kill_all_idlers(&self) -> DomainResult<()> {
        self.kills.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Replies with queued game lists; `None` in the queue means a failure.
/// Redemptions succeed unless the app id was marked as rejected.
#[derive(Default)]
pub struct MockFreeGamesSource {
    replies: Mutex<VecDeque<Option<Vec<u32>>>>,
    rejected: HashSet<u32>,
    pub redeemed: Mutex<Vec<u32>>,
}

impl MockFreeGamesSource {
    pub fn new(replies: Vec<Option<Vec<u32>>>) -> Self {
        Self { replies: Mutex::new(replies.into()), ..Default::default() }
    }

    pub fn rejecting(mut self, app_ids: &[u32]) -> Self {
        self.rejected.extend(app_ids);
        self
    }

    pub fn redeem_calls(&self) -> Vec<u32> {
        self.redeemed.lock().clone()
    }
}

#[async_trait]
impl FreeGamesSource for MockFreeGamesSource {
    async fn free_games(&self) -> DomainResult<FreeGames> {
        match self.replies.lock().pop_front().flatten() {
            Some(ids) => Ok(FreeGames {
                games: ids
                    .into_iter()
                    .map(|appid| FreeGame { appid, name: format!("free-{appid}") })
                    .collect(),
            }),
            None => Err(IdlerError::Network("store unreachable".into())),
        }
    }

    async fn redeem_free_game(&self, app_id: u32) -> DomainResult<FreeGameRedemption> {
        self.redeemed.lock().push(app_id);
        if self.rejected.contains(&app_id) {
            return Ok(FreeGameRedemption {
                success: false,
                message: Some("already owned".into()),
            });
        }
        Ok(FreeGameRedemption { success: true, message: None })
    }
}

/// Records single-game start/stop requests; stops fail while `fail_stop`
/// is set.
#[derive(Default)]
pub struct MockGameIdler {
    pub calls: Mutex<Vec<IdleCall>>,
    pub fail_stop: AtomicBool,
}

impl MockGameIdler {
    pub fn calls(&self) -> Vec<IdleCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GameIdler for MockGameIdler {
    async fn start_idle(&self, app_id: u32, _app_name: &str) -> DomainResult<()> {
        self.calls.lock().push(IdleCall::Start(vec![app_id]));
        Ok(())
    }

    async fn stop_idle(&self, app_id: u32) -> DomainResult<()> {
        self.calls.lock().push(IdleCall::Stop(vec![app_id]));
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(IdlerError::Backend("idler did not exit".into()));
        }
        Ok(())
    }
}
