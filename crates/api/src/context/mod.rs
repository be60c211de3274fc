//! Application context - dependency injection container

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use idlerig_common::time::{Clock, SystemClock};
use idlerig_core::{
    AutomationState, CustomLists, DropPoller, DropsBackend, FarmingOutcome, FarmingRunner,
    FreeGamesCheck, FreeGamesSource, GameIdler, IdleController, IdleTracker, ManualIdler,
    Notifier, ScheduleChecker, SettingsStore, SteamClient, SteamGuard,
};
use idlerig_domain::{AppEvent, Config, DropsSummary, IdlerError, Notice, Result, UserSettings};
use idlerig_infra::scheduling::{
    DropsSummaryJob, FreeGamesJob, IdleLimitJob, IntervalPoller, PollJob, PollerConfig,
    ProcessListJob, SteamStatusJob,
};
use idlerig_infra::{BackendClient, BusNotifier, EventBus, Listener};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// A card farming run in progress.
struct FarmingTask {
    cancel: CancellationToken,
    handle: JoinHandle<FarmingOutcome>,
}

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub backend: Arc<BackendClient>,
    pub events: EventBus,
    pub notifier: Arc<dyn Notifier>,

    // Core services
    pub drops: Arc<DropPoller>,
    pub farming: Arc<FarmingRunner>,
    pub free_games: Arc<FreeGamesCheck>,
    pub schedule: ScheduleChecker,
    pub idle_tracker: Arc<Mutex<IdleTracker>>,
    pub manual_idle: Arc<ManualIdler>,
    pub automation: Arc<AutomationState>,

    /// Latest summary published by the drops poller.
    pub last_summary: Arc<RwLock<Option<DropsSummary>>>,
    /// App ids in the user's library, used to filter free promotions.
    pub owned_games: Arc<RwLock<HashSet<u32>>>,

    pollers: tokio::sync::Mutex<Vec<IntervalPoller>>,
    farming_task: Arc<Mutex<Option<FarmingTask>>>,
    _listeners: Vec<Listener>,
}

impl AppContext {
    /// Build every service from `config`. Must be called inside a Tokio
    /// runtime; no poller runs until [`AppContext::start`].
    ///
    /// # Errors
    ///
    /// Returns [`IdlerError::Config`] if the backend client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        let events = EventBus::default();
        let notifier: Arc<dyn Notifier> = Arc::new(BusNotifier::new(events.clone()));

        let drops = Arc::new(DropPoller::new(
            backend.clone() as Arc<dyn DropsBackend>,
            backend.clone() as Arc<dyn SettingsStore>,
            notifier.clone(),
        ));
        let farming = Arc::new(FarmingRunner::new(
            drops.clone(),
            backend.clone() as Arc<dyn SettingsStore>,
            backend.clone() as Arc<dyn CustomLists>,
            backend.clone() as Arc<dyn IdleController>,
        ));
        let free_games = Arc::new(FreeGamesCheck::new(
            backend.clone() as Arc<dyn FreeGamesSource>,
            notifier.clone(),
        ));

        let idle_tracker = Arc::new(Mutex::new(IdleTracker::new(clock.clone())));
        let manual_idle = Arc::new(ManualIdler::new(
            backend.clone() as Arc<dyn GameIdler>,
            backend.clone() as Arc<dyn SteamClient>,
            backend.clone() as Arc<dyn SettingsStore>,
            idle_tracker.clone(),
        ));

        let last_summary = Arc::new(RwLock::new(None));
        let farming_task: Arc<Mutex<Option<FarmingTask>>> = Arc::new(Mutex::new(None));

        let listeners = vec![
            {
                let last_summary = last_summary.clone();
                events.listen(move |event| {
                    if let AppEvent::DropsSummaryUpdated(summary) = event {
                        *last_summary.write() = Some(summary);
                    }
                })
            },
            {
                // The Steam guard kills idlers; the farming loop must not restart them.
                let farming_task = farming_task.clone();
                events.listen(move |event| {
                    if event == AppEvent::Notice(Notice::SteamNotRunning) {
                        if let Some(task) = farming_task.lock().as_ref() {
                            task.cancel.cancel();
                        }
                    }
                })
            },
        ];

        info!(backend = %backend.base_url(), steam_id = ?config.steam_id, "application context built");

        Ok(Self {
            config,
            backend,
            events,
            notifier,
            drops,
            farming,
            free_games,
            schedule: ScheduleChecker::new(clock),
            idle_tracker,
            manual_idle,
            automation: Arc::new(AutomationState::new()),
            last_summary,
            owned_games: Arc::new(RwLock::new(HashSet::new())),
            pollers: tokio::sync::Mutex::new(Vec::new()),
            farming_task,
            _listeners: listeners,
        })
    }

    /// Account the context operates on.
    ///
    /// # Errors
    ///
    /// Returns [`IdlerError::Config`] when no Steam id is configured.
    pub fn steam_id(&self) -> Result<&str> {
        self.config
            .steam_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| IdlerError::Config("no steam id configured".into()))
    }

    pub fn settings_store(&self) -> Arc<dyn SettingsStore> {
        self.backend.clone()
    }

    /// Stored settings for `steam_id`, migrated to the current schema.
    pub async fn user_settings(&self, steam_id: &str) -> Result<UserSettings> {
        self.backend.get_user_settings(steam_id).await
    }

    /// Start every enabled poller. Account-bound pollers only run when a
    /// Steam id is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the pollers are already running.
    pub async fn start(&self) -> Result<()> {
        let mut pollers = self.pollers.lock().await;
        if !pollers.is_empty() {
            return Err(IdlerError::InvalidInput("pollers already running".into()));
        }

        for (job, interval) in self.poll_jobs() {
            let config = PollerConfig { job_timeout: job_timeout(interval), ..PollerConfig::every(interval) };
            let mut poller = IntervalPoller::new(job, config);
            poller.start()?;
            pollers.push(poller);
        }

        info!(count = pollers.len(), "pollers started");
        Ok(())
    }

    fn poll_jobs(&self) -> Vec<(Arc<dyn PollJob>, Duration)> {
        let polling = &self.config.polling;
        let steam = self.backend.clone() as Arc<dyn SteamClient>;
        let mut jobs: Vec<(Arc<dyn PollJob>, Duration)> = Vec::new();

        if let Some(interval) = polling.steam_status_interval() {
            let guard = SteamGuard::new(steam.clone(), self.automation.clone(), self.notifier.clone());
            let signed_in = self.steam_id().is_ok();
            let job = SteamStatusJob::new(steam.clone(), guard, signed_in, self.events.clone());
            jobs.push((Arc::new(job), interval));
        }

        if let Some(interval) = polling.process_interval() {
            let job = ProcessListJob::new(steam, self.idle_tracker.clone(), self.events.clone());
            jobs.push((Arc::new(job), interval));
        }

        if let Some(interval) = polling.idle_limit_interval() {
            jobs.push((Arc::new(IdleLimitJob::new(self.manual_idle.clone())), interval));
        }

        let Ok(steam_id) = self.steam_id() else {
            warn!("no steam id configured, drops and free games polling disabled");
            return jobs;
        };

        if let Some(interval) = polling.drops_interval() {
            let job = DropsSummaryJob::new(self.drops.clone(), steam_id, self.events.clone());
            jobs.push((Arc::new(job), interval));
        }

        if let Some(interval) = polling.free_games_interval() {
            let job = FreeGamesJob::new(
                self.free_games.clone(),
                self.backend.clone() as Arc<dyn SettingsStore>,
                steam_id,
                self.events.clone(),
            )
            .with_owned_games(self.owned_games.clone());
            jobs.push((Arc::new(job), interval));
        }

        jobs
    }

    /// Number of pollers currently running.
    pub async fn running_pollers(&self) -> usize {
        self.pollers.lock().await.iter().filter(|p| p.is_running()).count()
    }

    /// Start the card farming loop on a background task.
    ///
    /// # Errors
    ///
    /// Returns an error when no Steam id is configured or a run is already
    /// in progress.
    pub fn start_card_farming(&self) -> Result<()> {
        let steam_id = self.steam_id()?.to_string();

        let mut slot = self.farming_task.lock();
        if slot.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            return Err(IdlerError::InvalidInput("card farming already running".into()));
        }

        let cancel = CancellationToken::new();
        let runner = self.farming.clone();
        let automation = self.automation.clone();
        let token = cancel.clone();

        automation.set_card_farming(true);
        let handle = tokio::spawn(async move {
            let outcome = runner.run(&steam_id, &token).await;
            automation.set_card_farming(false);
            info!(?outcome, "card farming finished");
            outcome
        });

        *slot = Some(FarmingTask { cancel, handle });
        Ok(())
    }

    /// Cancel the farming loop and wait for it to stop its idlers. Returns
    /// `None` when nothing was running.
    pub async fn stop_card_farming(&self) -> Option<FarmingOutcome> {
        let task = self.farming_task.lock().take()?;
        task.cancel.cancel();

        match task.handle.await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(error = %err, "card farming task failed");
                Some(FarmingOutcome::Failed)
            }
        }
    }

    pub fn is_card_farming(&self) -> bool {
        self.farming_task.lock().as_ref().is_some_and(|task| !task.handle.is_finished())
    }

    /// Stop farming and every poller. Errors are logged, not returned.
    pub async fn shutdown(&self) {
        if let Some(outcome) = self.stop_card_farming().await {
            info!(?outcome, "card farming stopped for shutdown");
        }

        let mut pollers = self.pollers.lock().await;
        for mut poller in pollers.drain(..) {
            if let Err(err) = poller.stop().await {
                warn!(job = poller.name(), error = %err, "failed to stop poller cleanly");
            }
        }

        info!("application context shut down");
    }
}

/// Per-run timeout: one interval, clamped to 5 s..=5 min.
fn job_timeout(interval: Duration) -> Duration {
    interval.clamp(Duration::from_secs(5), Duration::from_secs(300))
}
