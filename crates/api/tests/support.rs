#![allow(dead_code)]

use std::sync::Arc;

use idlerig_common::time::MockClock;
use idlerig_domain::{BackendConfig, Config, PollingConfig};
use idlerig_lib::AppContext;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STEAM_ID: &str = "76561198000000000";

/// Config pointing at `server` with every poller disabled.
pub fn quiet_config(server: &MockServer) -> Config {
    Config {
        backend: BackendConfig { base_url: server.uri(), timeout_seconds: 2 },
        polling: PollingConfig {
            drops_interval_seconds: 0,
            free_games_interval_seconds: 0,
            steam_status_interval_seconds: 0,
            process_interval_seconds: 0,
            idle_limit_interval_seconds: 0,
        },
        steam_id: Some(STEAM_ID.to_string()),
        ..Config::default()
    }
}

/// Context whose local time is pinned to `hour:minute`.
pub fn context_at(config: Config, hour: u32, minute: u32) -> (Arc<AppContext>, MockClock) {
    let clock = MockClock::at_local(hour, minute);
    let context = AppContext::with_clock(config, Arc::new(clock.clone()))
        .expect("context should build");
    (Arc::new(context), clock)
}

/// Reply to `command` with `body` on every call.
pub async fn reply(server: &MockServer, command: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/invoke/{command}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn settings_with_credentials() -> Value {
    json!({
        "settings": {
            "cardFarming": {
                "allGames": true,
                "credentials": { "sid": "sid-cookie", "sls": "sls-cookie" }
            }
        }
    })
}
