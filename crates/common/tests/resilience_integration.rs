//! Integration tests for the retry executor
//!
//! Exercises the executor the way the drops poller uses it: a typed error
//! that knows whether it is transient, exponential backoff and a paused
//! tokio clock.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idlerig_common::resilience::{policies, RetryConfig, RetryError, RetryExecutor};

#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
struct TestError {
    message: String,
    transient: bool,
}

impl TestError {
    fn transient(message: &str) -> Self {
        Self { message: message.to_string(), transient: true }
    }

    fn permanent(message: &str) -> Self {
        Self { message: message.to_string(), transient: false }
    }
}

fn transient_only() -> policies::PredicateRetry<fn(&TestError, u32) -> bool> {
    policies::PredicateRetry::new(|error: &TestError, _attempt: u32| error.transient)
}

/// Recovers from brief outages: three failures then success with five
/// attempts allowed.
#[tokio::test(start_paused = true)]
async fn test_retry_exponential_backoff_success() {
    let attempt_count = Arc::new(AtomicU32::new(0));

    let config = RetryConfig::builder()
        .max_attempts(5)
        .exponential_backoff(Duration::from_millis(10), 2.0, Duration::from_millis(100))
        .full_jitter()
        .build()
        .expect("Failed to build config");
    let executor = RetryExecutor::new(config, policies::AlwaysRetry);

    let result = executor
        .execute(|| {
            let attempt_count = Arc::clone(&attempt_count);
            async move {
                let count = attempt_count.fetch_add(1, Ordering::SeqCst);
                if count < 3 {
                    Err(TestError::transient("connection reset"))
                } else {
                    Ok("Success")
                }
            }
        })
        .await;

    assert_eq!(result.expect("Should succeed"), "Success");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 4);
}

/// Backoff delays accumulate as 500 ms then 1 s with the default policy
/// shape when jitter is off.
#[tokio::test(start_paused = true)]
async fn test_retry_sleeps_follow_backoff() {
    let config = RetryConfig::builder()
        .max_attempts(3)
        .exponential_backoff(Duration::from_millis(500), 2.0, Duration::from_secs(10))
        .no_jitter()
        .build()
        .expect("Failed to build config");
    let executor = RetryExecutor::new(config, transient_only());

    let started = tokio::time::Instant::now();
    let result: Result<(), _> =
        executor.execute(|| async { Err(TestError::transient("502 Bad Gateway")) }).await;

    assert!(matches!(result, Err(RetryError::AttemptsExhausted { attempts: 3, .. })));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1500), "slept {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1600), "slept {elapsed:?}");
}

/// Permanent errors fail on the first attempt and surface the original
/// error.
#[tokio::test(start_paused = true)]
async fn test_retry_policy_skips_permanent_errors() {
    let attempt_count = Arc::new(AtomicU32::new(0));
    let executor = RetryExecutor::new(RetryConfig::default(), transient_only());

    let result: Result<(), _> = executor
        .execute(|| {
            attempt_count.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError::permanent("401 Unauthorized")) }
        })
        .await;

    let error = result.expect_err("should fail").into_last_error();
    assert_eq!(error, Some(TestError::permanent("401 Unauthorized")));
    assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
}

/// A transient failure followed by a permanent one stops at the permanent
/// error without using the remaining attempts.
#[tokio::test(start_paused = true)]
async fn test_retry_stops_when_error_turns_permanent() {
    let attempt_count = Arc::new(AtomicU32::new(0));
    let executor = RetryExecutor::new(
        RetryConfig::builder().max_attempts(5).no_jitter().build().expect("config"),
        transient_only(),
    );

    let result: Result<(), _> = executor
        .execute(|| {
            let attempt_count = Arc::clone(&attempt_count);
            async move {
                match attempt_count.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(TestError::transient("timeout")),
                    _ => Err(TestError::permanent("bad request")),
                }
            }
        })
        .await;

    assert!(matches!(result, Err(RetryError::NonRetryable { .. })));
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}
