use std::future::Future;
use std::time::{Duration, Instant};

use idlerig_domain::{IdlerError, LoggingConfig, Result as DomainResult};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.level`. Calling this twice is harmless; the second call leaves
/// the first subscriber in place.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert an `IdlerError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &IdlerError) -> &'static str {
    match error {
        IdlerError::MissingCredentials => "missing_credentials",
        IdlerError::OutdatedCredentials => "outdated_credentials",
        IdlerError::Backend(_) => "backend",
        IdlerError::Network(_) => "network",
        IdlerError::Config(_) => "config",
        IdlerError::InvalidInput(_) => "invalid_input",
        IdlerError::NotFound(_) => "not_found",
        IdlerError::Internal(_) => "internal",
    }
}

/// Time `command_fn`, log the outcome and flatten the error to a string for
/// the front end.
pub async fn execute_command<F, Fut, T>(command: &str, command_fn: F) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command, start.elapsed(), result.is_ok());

    result.map_err(|err| {
        warn!(command, error_type = error_label(&err), error = %err, "command failed");
        err.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_command_flattens_errors() {
        let ok = execute_command("test::ok", || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<(), String> = execute_command("test::err", || async {
            Err(IdlerError::NotFound("game 10".into()))
        })
        .await;
        assert_eq!(err, Err(IdlerError::NotFound("game 10".into()).to_string()));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&IdlerError::MissingCredentials), "missing_credentials");
        assert_eq!(error_label(&IdlerError::Network("x".into())), "network");
    }
}
