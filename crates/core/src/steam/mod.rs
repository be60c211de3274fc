//! Steam client monitoring

pub mod ports;
pub mod status;

pub use ports::SteamClient;
pub use status::{AutomationState, SteamGuard, SteamStatusChanged, SteamStatusTracker};
