//! # idlerig Domain
//!
//! Business domain types and models for idlerig.
//!
//! This crate contains:
//! - Domain data types (schedule windows, idle processes, drop entries)
//! - Domain error types and Result definitions
//! - Configuration structures and the versioned user settings schema
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other idlerig crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod settings;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use settings::{GameSettings, UserSettings, SETTINGS_VERSION};
pub use types::*;
