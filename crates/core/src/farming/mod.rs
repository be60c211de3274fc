//! Card farming

pub mod cycle;
pub mod plan;
pub mod ports;
pub mod runner;

pub use cycle::{CycleStep, FarmingCycle, StepAction};
pub use plan::{FarmingGame, FarmingPlan};
pub use ports::{CustomLists, IdleController};
pub use runner::{FarmingOutcome, FarmingRunner};
