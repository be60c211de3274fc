//! # idlerig Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Schedule gating and idle list reconciliation
//! - Drop polling, the card farming loop, Steam and free games monitoring
//! - Port/adapter interfaces (traits) for everything remote
//!
//! ## Architecture Principles
//! - Only depends on `idlerig-common` and `idlerig-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod drops;
pub mod farming;
pub mod free_games;
pub mod processes;
pub mod resilience;
pub mod schedule;
pub mod steam;

// Infrastructure ports
pub mod notify_ports;
pub mod settings_ports;

pub use drops::{DropPoller, DropsBackend};
pub use farming::{
    CustomLists, FarmingCycle, FarmingOutcome, FarmingPlan, FarmingRunner, IdleController,
};
pub use free_games::{FreeGamesCheck, FreeGamesSource};
pub use notify_ports::Notifier;
pub use processes::{reconcile, GameIdler, IdleTracker, ManualIdler, Reconciled};
pub use resilience::TransientOnly;
pub use schedule::{is_within_schedule, ScheduleChecker, ScheduleWait};
pub use settings_ports::SettingsStore;
pub use steam::{AutomationState, SteamClient, SteamGuard, SteamStatusChanged, SteamStatusTracker};
