//! Commands - front end to automation core bridge
//!
//! Every command takes the [`AppContext`](crate::AppContext), logs its
//! outcome and duration, and returns errors as strings.

mod drops;
mod farming;
mod processes;
mod schedule;
mod settings;

pub use drops::*;
pub use farming::*;
pub use processes::*;
pub use schedule::*;
pub use settings::*;
