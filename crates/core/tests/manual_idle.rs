//! Manually started idlers: cap, duplicates and max idle time

mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use idlerig_common::time::MockClock;
use idlerig_core::{IdleTracker, ManualIdler};
use idlerig_domain::constants::MAX_IDLE_PROCESSES;
use idlerig_domain::settings::GameSpecificSettings;
use idlerig_domain::{GameSettings, IdlerError, RawProcess, UserSettings};
use parking_lot::Mutex;
use support::mocks::{IdleCall, MockGameIdler, MockSettingsStore, MockSteamClient};

struct Harness {
    clock: MockClock,
    steam: Arc<MockSteamClient>,
    idler: Arc<MockGameIdler>,
    tracker: Arc<Mutex<IdleTracker>>,
    manual: ManualIdler,
}

fn harness(settings: UserSettings) -> Harness {
    let clock = MockClock::at_local(10, 0);
    let steam = Arc::new(MockSteamClient::default());
    steam.running.store(true, Ordering::SeqCst);
    let idler = Arc::new(MockGameIdler::default());
    let tracker = Arc::new(Mutex::new(IdleTracker::new(Arc::new(clock.clone()))));
    let manual = ManualIdler::new(
        idler.clone(),
        steam.clone(),
        Arc::new(MockSettingsStore::new(settings)),
        tracker.clone(),
    );
    Harness { clock, steam, idler, tracker, manual }
}

fn limited(app_id: u32, minutes: u64) -> UserSettings {
    let mut game_settings = GameSettings::default();
    game_settings.per_game.insert(
        app_id.to_string(),
        GameSpecificSettings { max_idle_time: Some(minutes), ..Default::default() },
    );
    let mut settings = UserSettings::default();
    settings.game_settings = Some(game_settings);
    settings
}

fn raw(appid: u32) -> RawProcess {
    RawProcess { appid, name: format!("game-{appid}"), pid: appid + 1000 }
}

#[tokio::test]
async fn start_is_refused_at_the_idler_cap() {
    let h = harness(UserSettings::default());
    let running: Vec<RawProcess> = (0..MAX_IDLE_PROCESSES as u32).map(raw).collect();
    h.tracker.lock().apply(&running);

    let err = h.manual.start("7656", 9000, "one too many").await.unwrap_err();

    assert!(matches!(err, IdlerError::InvalidInput(msg) if msg.contains("32")));
    assert!(h.idler.calls().is_empty());
}

#[tokio::test]
async fn start_is_refused_for_a_game_already_idling() {
    let h = harness(UserSettings::default());
    h.tracker.lock().apply(&[raw(440)]);

    let err = h.manual.start("7656", 440, "Team Fortress 2").await.unwrap_err();

    assert!(matches!(err, IdlerError::InvalidInput(msg) if msg.contains("already idling")));
    assert!(h.idler.calls().is_empty());

    h.manual.start("7656", 570, "Dota 2").await.unwrap();
    assert_eq!(h.idler.calls(), vec![IdleCall::Start(vec![570])]);
}

#[tokio::test]
async fn start_needs_steam_running() {
    let h = harness(UserSettings::default());
    h.steam.running.store(false, Ordering::SeqCst);

    let err = h.manual.start("7656", 440, "Team Fortress 2").await.unwrap_err();

    assert_eq!(err, IdlerError::InvalidInput("steam is not running".into()));
    assert!(h.idler.calls().is_empty());
}

#[tokio::test]
async fn max_idle_time_stops_the_game() {
    let h = harness(limited(440, 10));
    h.manual.start("7656", 440, "Team Fortress 2").await.unwrap();
    assert!(h.manual.has_limit(440));

    // Not observed yet: the limit waits for the process list.
    assert!(h.manual.enforce_limits().await.is_empty());
    assert!(h.manual.has_limit(440));

    h.tracker.lock().apply(&[raw(440)]);
    h.clock.advance(Duration::from_secs(9 * 60));
    assert!(h.manual.enforce_limits().await.is_empty());

    h.clock.advance(Duration::from_secs(60));
    assert_eq!(h.manual.enforce_limits().await, vec![440]);
    assert!(!h.manual.has_limit(440));
    assert_eq!(
        h.idler.calls(),
        vec![IdleCall::Start(vec![440]), IdleCall::Stop(vec![440])]
    );
}

#[tokio::test]
async fn limit_is_dropped_when_the_game_is_closed_elsewhere() {
    let h = harness(limited(440, 10));
    h.manual.start("7656", 440, "Team Fortress 2").await.unwrap();

    h.tracker.lock().apply(&[raw(440)]);
    h.manual.enforce_limits().await;
    h.tracker.lock().apply(&[]);
    h.manual.enforce_limits().await;

    assert!(!h.manual.has_limit(440));
    assert_eq!(h.idler.calls(), vec![IdleCall::Start(vec![440])]);
}

#[tokio::test]
async fn failed_stop_is_retried_next_run() {
    let h = harness(limited(440, 1));
    h.manual.start("7656", 440, "Team Fortress 2").await.unwrap();
    h.tracker.lock().apply(&[raw(440)]);
    h.clock.advance(Duration::from_secs(60));

    h.idler.fail_stop.store(true, Ordering::SeqCst);
    assert!(h.manual.enforce_limits().await.is_empty());
    assert!(h.manual.has_limit(440));

    h.idler.fail_stop.store(false, Ordering::SeqCst);
    assert_eq!(h.manual.enforce_limits().await, vec![440]);
}

#[tokio::test]
async fn games_without_a_max_idle_time_run_freely() {
    let h = harness(limited(440, 10));
    h.manual.start("7656", 570, "Dota 2").await.unwrap();
    h.tracker.lock().apply(&[raw(570)]);
    h.clock.advance(Duration::from_secs(24 * 60 * 60));

    assert!(!h.manual.has_limit(570));
    assert!(h.manual.enforce_limits().await.is_empty());
}

#[tokio::test]
async fn manual_stop_clears_the_limit() {
    let h = harness(limited(440, 10));
    h.manual.start("7656", 440, "Team Fortress 2").await.unwrap();

    h.manual.stop(440).await.unwrap();

    assert!(!h.manual.has_limit(440));
    assert_eq!(
        h.idler.calls(),
        vec![IdleCall::Start(vec![440]), IdleCall::Stop(vec![440])]
    );
}
