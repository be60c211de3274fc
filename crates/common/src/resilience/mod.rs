//! Resilience patterns for fault tolerance
//!
//! Generic retry with configurable backoff and jitter. Callers decide what
//! is retryable through a [`RetryPolicy`]; the executor never inspects
//! error values itself.

pub mod retry;

pub use retry::{
    policies, BackoffStrategy, Jitter, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
