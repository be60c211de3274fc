//! idlerig - Steam idling automation daemon
//!
//! Loads configuration, starts the pollers and runs until Ctrl-C.

use anyhow::Context;
use idlerig_infra::config;
use idlerig_lib::utils::logging::init_tracing;
use idlerig_lib::AppContext;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Read .env before the config loader looks at the environment
    let dotenv = dotenvy::dotenv();

    let config = config::load(None).context("failed to load configuration")?;
    init_tracing(&config.logging);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => info!(error = %err, "no .env file loaded"),
    }

    let context = AppContext::new(config).context("failed to build application context")?;

    context.start().await.context("failed to start pollers")?;
    info!(pollers = context.running_pollers().await, "idlerig running");

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    info!("shutdown requested");

    context.shutdown().await;
    Ok(())
}
