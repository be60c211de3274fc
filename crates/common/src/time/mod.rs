//! Time utilities and abstractions
//!
//! - **Clock abstractions**: real and mock wall-clock time for testing

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
