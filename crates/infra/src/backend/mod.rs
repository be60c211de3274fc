//! Native backend RPC

pub mod client;
pub mod errors;
mod ports;

pub use client::BackendClient;
pub use errors::{BackendError, BackendErrorCategory};
