//! Wall-clock abstraction for testability
//!
//! Schedule checks need the local time of day and process tracking needs
//! epoch milliseconds. Both come from a [`Clock`] so tests can pin and
//! advance time without sleeping.
//!
//! ```
//! # #[cfg(feature = "foundation")]
//! # {
//! use std::time::Duration;
//!
//! use idlerig_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::at_local(9, 15);
//! let before = clock.millis_since_epoch();
//! clock.advance(Duration::from_secs(60));
//! assert_eq!(clock.millis_since_epoch() - before, 60_000);
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock time in the user's local zone.
    fn local_time(&self) -> NaiveTime;

    /// Milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_utc(&self) -> DateTime<Utc> {
        (**self).now_utc()
    }

    fn local_time(&self) -> NaiveTime {
        (**self).local_time()
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Manually driven clock. Its local zone is UTC.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(now)) }
    }

    /// Fixed date, with the given local hour and minute.
    pub fn at_local(hour: u32, minute: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn advance(&self, by: Duration) {
        let by = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }

    /// Set the time of day, keeping the current date.
    pub fn set_local_time(&self, hour: u32, minute: u32) {
        let mut now = self.now.lock();
        if let Some(target) = now.date_naive().and_hms_opt(hour, minute, 0) {
            *now = Utc.from_utc_datetime(&target);
        }
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    fn local_time(&self) -> NaiveTime {
        self.now.lock().time()
    }
}
