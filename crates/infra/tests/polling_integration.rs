//! Integration tests for the poll jobs
//!
//! **Coverage:**
//! - Drops summary refresh end to end: settings → session check → badge
//!   scrape → persisted counts → published event
//! - Steam status changes published once and halting automation, except
//!   for the report that seeds the tracker
//! - Process list changes published with stable start times
//! - Free games redeemed only when `autoRedeemFreeGames` is set
//!
//! **Infrastructure:** WireMock backend, real [`BackendClient`], real
//! [`IntervalPoller`] on short intervals.

use std::sync::Arc;
use std::time::Duration;

use idlerig_common::resilience::RetryConfig;
use idlerig_common::time::{Clock, MockClock};
use idlerig_core::{
    AutomationState, DropPoller, DropsBackend, FreeGamesCheck, FreeGamesSource, IdleTracker,
    Notifier, SettingsStore, SteamClient, SteamGuard,
};
use idlerig_domain::{AppEvent, BackendConfig, DropsSummary, FreeGame, Notice};
use idlerig_infra::scheduling::{
    DropsSummaryJob, FreeGamesJob, IntervalPoller, PollJob, PollerConfig, ProcessListJob,
    SteamStatusJob,
};
use idlerig_infra::{BackendClient, BusNotifier, EventBus, Subscription};
use parking_lot::Mutex;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STEAM_ID: &str = "76561198000000000";

fn client_for(server: &MockServer) -> Arc<BackendClient> {
    let config = BackendConfig { base_url: server.uri(), timeout_seconds: 2 };
    Arc::new(BackendClient::new(&config).expect("client should build"))
}

fn quick_retry() -> RetryConfig {
    RetryConfig::builder()
        .max_attempts(2)
        .exponential_backoff(Duration::from_millis(5), 2.0, Duration::from_millis(10))
        .no_jitter()
        .build()
        .expect("retry config")
}

fn settings_with_credentials() -> serde_json::Value {
    json!({
        "settings": {
            "cardFarming": { "credentials": { "sid": "sid-cookie", "sls": "sls-cookie" } }
        }
    })
}

/// Drain everything already published.
fn drain(subscription: &mut Subscription) -> Vec<AppEvent> {
    std::iter::from_fn(|| subscription.try_recv()).collect()
}

#[tokio::test]
async fn drops_job_persists_and_publishes_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_user_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(settings_with_credentials()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/validate_session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": "gabe" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_games_with_drops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gamesWithDrops": [
                { "id": "10", "name": "Ten", "remaining": 3 },
                { "id": "20", "name": "Twenty", "remaining": 4 }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/update_user_settings"))
        .and(body_partial_json(json!({ "key": "cardFarming.gamesWithDrops", "value": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "settings": {} })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/update_user_settings"))
        .and(body_partial_json(json!({ "key": "cardFarming.totalDropsRemaining", "value": 7 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "settings": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let notifier: Arc<dyn Notifier> = Arc::new(BusNotifier::new(bus.clone()));
    let drops = Arc::new(
        DropPoller::new(
            client.clone() as Arc<dyn DropsBackend>,
            client.clone() as Arc<dyn SettingsStore>,
            notifier,
        )
        .with_retry_config(quick_retry()),
    );

    DropsSummaryJob::new(drops, STEAM_ID, bus.clone()).run().await.unwrap();

    assert_eq!(
        drain(&mut events),
        vec![AppEvent::DropsSummaryUpdated(DropsSummary {
            games_with_drops: 2,
            total_drops_remaining: 7
        })]
    );
}

#[tokio::test]
async fn drops_job_without_credentials_only_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_user_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "settings": {} })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let drops = Arc::new(DropPoller::new(
        client.clone() as Arc<dyn DropsBackend>,
        client.clone() as Arc<dyn SettingsStore>,
        Arc::new(BusNotifier::new(bus.clone())),
    ));

    DropsSummaryJob::new(drops, STEAM_ID, bus.clone()).run().await.unwrap();

    assert_eq!(drain(&mut events), vec![AppEvent::Notice(Notice::MissingCredentials)]);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.iter().all(|r| r.url.path() == "/invoke/get_user_settings"));
}

#[tokio::test]
async fn steam_going_away_halts_automation_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/is_steam_running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/is_steam_running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/kill_all_steamutil_processes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let state = Arc::new(AutomationState::new());
    state.set_card_farming(true);
    let guard = SteamGuard::new(
        client.clone() as Arc<dyn SteamClient>,
        state.clone(),
        Arc::new(BusNotifier::new(bus.clone())),
    );
    let job = SteamStatusJob::new(client.clone() as Arc<dyn SteamClient>, guard, true, bus.clone());

    let mut poller = IntervalPoller::new(Arc::new(job), PollerConfig::every(Duration::from_millis(50)));
    poller.start().unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    poller.stop().await.unwrap();

    assert!(poller.stats().runs() >= 3);
    assert!(!state.is_card_farming());
    assert!(state.steam_warning());
    assert_eq!(
        drain(&mut events),
        vec![
            AppEvent::SteamStatusChanged(true),
            AppEvent::SteamStatusChanged(false),
            AppEvent::Notice(Notice::SteamNotRunning),
        ]
    );
}

#[tokio::test]
async fn steam_closed_at_startup_leaves_idlers_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/is_steam_running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/kill_all_steamutil_processes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let state = Arc::new(AutomationState::new());
    state.set_card_farming(true);
    let guard = SteamGuard::new(
        client.clone() as Arc<dyn SteamClient>,
        state.clone(),
        Arc::new(BusNotifier::new(bus.clone())),
    );
    let job = SteamStatusJob::new(client.clone() as Arc<dyn SteamClient>, guard, true, bus.clone());

    job.run().await.unwrap();
    job.run().await.unwrap();

    assert!(state.is_card_farming());
    assert!(!state.steam_warning());
    assert_eq!(drain(&mut events), vec![AppEvent::SteamStatusChanged(false)]);
}

#[tokio::test]
async fn process_changes_keep_start_times() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_running_processes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processes": [{ "appid": 440, "name": "Team Fortress 2", "pid": 1 }]
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_running_processes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processes": [
                { "appid": 440, "name": "Team Fortress 2", "pid": 1 },
                { "appid": 570, "name": "Dota 2", "pid": 2 }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let clock = MockClock::at_local(10, 0);
    let tracker = Arc::new(Mutex::new(IdleTracker::new(Arc::new(clock.clone()))));
    let job = ProcessListJob::new(client.clone() as Arc<dyn SteamClient>, tracker.clone(), bus.clone());

    let first_seen = clock.millis_since_epoch();
    job.run().await.unwrap();
    clock.advance(Duration::from_secs(60));
    job.run().await.unwrap();
    job.run().await.unwrap();

    let published = drain(&mut events);
    assert_eq!(published.len(), 2, "unchanged lists are not republished");

    let AppEvent::RunningProcessesChanged(entries) = &published[1] else {
        unreachable!("only process events are published");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].start_time, first_seen);
    assert_eq!(entries[1].start_time, first_seen + 60_000);
    assert_eq!(tracker.lock().len(), 2);
}

/// Serve two free games and the given auto-redeem flag; redeeming 730
/// succeeds and 570 is refused.
async fn free_games_backend(auto_redeem: bool) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_user_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "settings": {
                "general": { "freeGameNotifications": false, "autoRedeemFreeGames": auto_redeem }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/get_free_games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "games": [{ "appid": 730, "name": "Promo" }, { "appid": 570, "name": "Other" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/redeem_free_game"))
        .and(body_partial_json(json!({ "appId": 730 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/invoke/redeem_free_game"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "region locked"
        })))
        .mount(&server)
        .await;
    server
}

fn free_games_job(server: &MockServer, bus: &EventBus) -> FreeGamesJob {
    let client = client_for(server);
    let notifier: Arc<dyn Notifier> = Arc::new(BusNotifier::new(bus.clone()));
    let check = Arc::new(FreeGamesCheck::new(client.clone() as Arc<dyn FreeGamesSource>, notifier));
    FreeGamesJob::new(check, client as Arc<dyn SettingsStore>, STEAM_ID, bus.clone())
}

async fn redeem_requests(server: &MockServer) -> usize {
    let requests = server.received_requests().await.unwrap_or_default();
    requests.iter().filter(|r| r.url.path() == "/invoke/redeem_free_game").count()
}

#[tokio::test]
async fn free_games_job_redeems_when_enabled() {
    let server = free_games_backend(true).await;
    let bus = EventBus::default();
    let mut events = bus.subscribe();

    free_games_job(&server, &bus).run().await.unwrap();

    assert_eq!(redeem_requests(&server).await, 2);
    assert_eq!(
        drain(&mut events),
        vec![
            AppEvent::Notice(Notice::FreeGameRedeemed { app_id: 730, name: "Promo".into() }),
            AppEvent::Notice(Notice::FreeGameRedeemFailed { app_id: 570, name: "Other".into() }),
            AppEvent::FreeGamesUpdated(vec![FreeGame { appid: 570, name: "Other".into() }]),
        ]
    );
}

#[tokio::test]
async fn free_games_job_only_lists_when_redeem_is_off() {
    let server = free_games_backend(false).await;
    let bus = EventBus::default();
    let mut events = bus.subscribe();

    free_games_job(&server, &bus).run().await.unwrap();

    assert_eq!(redeem_requests(&server).await, 0);
    assert_eq!(
        drain(&mut events),
        vec![AppEvent::FreeGamesUpdated(vec![
            FreeGame { appid: 730, name: "Promo".into() },
            FreeGame { appid: 570, name: "Other".into() },
        ])]
    );
}
