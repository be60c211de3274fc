//! Card drop polling

pub mod ports;
pub mod service;

pub use ports::DropsBackend;
pub use service::DropPoller;
