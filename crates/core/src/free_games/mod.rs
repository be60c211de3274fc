//! Free games on the store

pub mod ports;
pub mod service;

pub use ports::FreeGamesSource;
pub use service::FreeGamesCheck;
