//! # idlerig Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The HTTP/JSON client for the native backend and the port
//!   implementations built on it
//! - Configuration loading (environment, JSON, TOML)
//! - Fixed-interval pollers and the jobs they run
//! - The in-process event bus
//!
//! ## Architecture
//! - Implements traits defined in `idlerig-core`
//! - Contains all "impure" code (network I/O, background tasks)

pub mod backend;
pub mod config;
pub mod events;
pub mod scheduling;

// Re-export commonly used items
pub use backend::{BackendClient, BackendError, BackendErrorCategory};
pub use events::{BusNotifier, EventBus, Listener, Subscription};
pub use scheduling::{IntervalPoller, PollJob, PollerConfig, PollerError};
