//! # idlerig App
//!
//! Application layer - commands, wiring and the daemon entry point.
//!
//! This crate contains:
//! - Commands (front end → automation core bridge)
//! - Application context (dependency injection and poller lifecycle)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
