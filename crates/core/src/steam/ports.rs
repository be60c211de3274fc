//! Port interfaces for the local Steam client and idler processes

use async_trait::async_trait;
use idlerig_domain::{RawProcess, Result};

#[async_trait]
pub trait SteamClient: Send + Sync {
    async fn is_steam_running(&self) -> Result<bool>;

    /// Idler processes currently alive.
    async fn running_processes(&self) -> Result<Vec<RawProcess>>;

    /// Kill every idler process, farming or manual.
    async fn kill_all_idlers(&self) -> Result<()>;
}
