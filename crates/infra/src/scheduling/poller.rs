//! Fixed-interval poller with explicit lifecycle management.
//!
//! Runs a [`PollJob`] every `interval` on a spawned task. Join handles are
//! tracked, cancellation is explicit, and every run is wrapped in a
//! timeout. Runs never overlap: a tick that fires while the previous run is
//! still executing is skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use idlerig_domain::Result;
//! use idlerig_infra::scheduling::{IntervalPoller, PollJob, PollerConfig, PollerResult};
//!
//! struct NoopJob;
//!
//! #[async_trait]
//! impl PollJob for NoopJob {
//!     fn name(&self) -> &'static str {
//!         "noop"
//!     }
//!
//!     async fn run(&self) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> PollerResult<()> {
//! let mut poller = IntervalPoller::new(Arc::new(NoopJob), PollerConfig::every(Duration::from_secs(5)));
//! poller.start()?;
//! // ... application runs ...
//! poller.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use idlerig_domain::Result;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::{PollerError, PollerResult};

/// Work performed on every tick.
#[async_trait]
pub trait PollJob: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn run(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Timeout applied to a single run.
    pub job_timeout: Duration,
    /// Timeout for awaiting the loop task on stop.
    pub join_timeout: Duration,
    /// Run once as soon as the poller starts instead of after the first
    /// interval.
    pub run_immediately: bool,
}

impl PollerConfig {
    pub fn every(interval: Duration) -> Self {
        Self { interval, ..Default::default() }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            job_timeout: Duration::from_secs(300),
            join_timeout: Duration::from_secs(5),
            run_immediately: true,
        }
    }
}

/// Counters for one poller.
#[derive(Debug, Default)]
pub struct PollerStats {
    runs: AtomicU64,
    failures: AtomicU64,
    timeouts: AtomicU64,
    skipped: AtomicU64,
}

impl PollerStats {
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Ticks dropped because a run was still in flight.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Clears the in-flight flag when a run ends, including on abort.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct IntervalPoller {
    job: Arc<dyn PollJob>,
    config: PollerConfig,
    cancellation: CancellationToken,
    handle: Option<JoinHandle<()>>,
    in_flight: Arc<AtomicBool>,
    stats: Arc<PollerStats>,
}

impl IntervalPoller {
    pub fn new(job: Arc<dyn PollJob>, config: PollerConfig) -> Self {
        Self {
            job,
            config,
            cancellation: CancellationToken::new(),
            handle: None,
            in_flight: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(PollerStats::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.job.name()
    }

    pub fn stats(&self) -> Arc<PollerStats> {
        self.stats.clone()
    }

    /// Start the loop task.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::AlreadyRunning`] if the poller is running.
    #[instrument(skip(self), fields(job = self.job.name()))]
    pub fn start(&mut self) -> PollerResult<()> {
        if self.is_running() {
            return Err(PollerError::AlreadyRunning { job: self.job.name() });
        }

        // Fresh token so a stopped poller can be restarted.
        self.cancellation = CancellationToken::new();

        let handle = tokio::spawn(Self::poll_loop(
            self.job.clone(),
            self.config.clone(),
            self.cancellation.clone(),
            self.in_flight.clone(),
            self.stats.clone(),
        ));
        self.handle = Some(handle);

        info!(interval_secs = self.config.interval.as_secs(), "poller started");
        Ok(())
    }

    /// Cancel the loop and wait for it to finish. A run still in flight is
    /// aborted.
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::NotStarted`] if the poller is stopped,
    /// [`PollerError::StopTimedOut`] if the loop outlives the join timeout
    /// and [`PollerError::LoopTaskFailed`] if it panicked.
    #[instrument(skip(self), fields(job = self.job.name()))]
    pub async fn stop(&mut self) -> PollerResult<()> {
        let job = self.job.name();
        let Some(handle) = self.handle.take() else {
            return Err(PollerError::NotStarted { job });
        };

        self.cancellation.cancel();

        let join_timeout = self.config.join_timeout;
        match tokio::time::timeout(join_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => return Err(PollerError::LoopTaskFailed { job, source }),
            Err(_) => return Err(PollerError::StopTimedOut { job, waited: join_timeout }),
        }

        info!("poller stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn poll_loop(
        job: Arc<dyn PollJob>,
        config: PollerConfig,
        cancel: CancellationToken,
        in_flight: Arc<AtomicBool>,
        stats: Arc<PollerStats>,
    ) {
        let first = if config.run_immediately {
            Instant::now()
        } else {
            Instant::now() + config.interval
        };
        let mut ticker = tokio::time::interval_at(first, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut runs = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(job = job.name(), "poll loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    // Reap finished runs so the set does not grow.
                    while runs.try_join_next().is_some() {}

                    let Some(guard) = InFlight::acquire(&in_flight) else {
                        stats.skipped.fetch_add(1, Ordering::Relaxed);
                        warn!(job = job.name(), "previous run still in flight, skipping tick");
                        continue;
                    };

                    runs.spawn(Self::run_once(job.clone(), config.job_timeout, stats.clone(), guard));
                }
            }
        }

        runs.shutdown().await;
    }

    async fn run_once(
        job: Arc<dyn PollJob>,
        job_timeout: Duration,
        stats: Arc<PollerStats>,
        _guard: InFlight,
    ) {
        let started = Instant::now();
        stats.runs.fetch_add(1, Ordering::Relaxed);

        match tokio::time::timeout(job_timeout, job.run()).await {
            Ok(Ok(())) => {
                debug!(
                    job = job.name(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "poll run finished"
                );
            }
            Ok(Err(err)) => {
                stats.failures.fetch_add(1, Ordering::Relaxed);
                error!(job = job.name(), error = %err, "poll run failed");
            }
            Err(_) => {
                stats.timeouts.fetch_add(1, Ordering::Relaxed);
                warn!(job = job.name(), timeout_secs = job_timeout.as_secs(), "poll run timed out");
            }
        }
    }
}

/// Ensure the loop is cancelled when the poller is dropped
impl Drop for IntervalPoller {
    fn drop(&mut self) {
        if self.handle.is_some() && !self.cancellation.is_cancelled() {
            warn!(job = self.job.name(), "poller dropped while running; cancelling");
            self.cancellation.cancel();
        }
    }
}
