//! Idle process tracking and manual idlers

pub mod manual;
pub mod ports;
pub mod reconcile;
pub mod tracker;

pub use manual::ManualIdler;
pub use ports::GameIdler;
pub use reconcile::{reconcile, Reconciled};
pub use tracker::IdleTracker;
