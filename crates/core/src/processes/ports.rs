//! Port for single-game idlers started by the user

use async_trait::async_trait;
use idlerig_domain::Result;

#[async_trait]
pub trait GameIdler: Send + Sync {
    async fn start_idle(&self, app_id: u32, app_name: &str) -> Result<()>;
    async fn stop_idle(&self, app_id: u32) -> Result<()>;
}
