//! Time-of-day and schedule window types

use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::errors::{IdlerError, Result};

/// A wall-clock time with minute precision.
///
/// Ordered by hour, then minute. Persisted settings store the full
/// `{hour, minute, second, millisecond}` shape; sub-minute fields are read
/// and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredTime", into = "StoredTime")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Build a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 {
            return Err(IdlerError::InvalidInput(format!("hour out of range: {hour}")));
        }
        if minute > 59 {
            return Err(IdlerError::InvalidInput(format!("minute out of range: {minute}")));
        }
        Ok(Self { hour, minute })
    }

    /// Truncate any chrono time value to minute precision.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        Self { hour: time.hour() as u8, minute: time.minute() as u8 }
    }

    /// Inverse of [`TimeOfDay::minute_of_day`]; wraps past 1440.
    pub fn from_minute_of_day(minutes: u16) -> Self {
        let minutes = minutes % (24 * 60);
        Self { hour: (minutes / 60) as u8, minute: (minutes % 60) as u8 }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight, `0..1440`.
    pub fn minute_of_day(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = IdlerError;

    /// Parse `HH:MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| IdlerError::InvalidInput(format!("expected HH:MM, got '{s}'")))?;
        let hour = hour
            .parse::<u8>()
            .map_err(|e| IdlerError::InvalidInput(format!("invalid hour '{hour}': {e}")))?;
        let minute = minute
            .parse::<u8>()
            .map_err(|e| IdlerError::InvalidInput(format!("invalid minute '{minute}': {e}")))?;
        Self::new(hour, minute)
    }
}

/// Persisted representation of a [`TimeOfDay`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredTime {
    hour: u8,
    minute: u8,
    #[serde(default)]
    second: u8,
    #[serde(default)]
    millisecond: u16,
}

impl TryFrom<StoredTime> for TimeOfDay {
    type Error = IdlerError;

    fn try_from(value: StoredTime) -> Result<Self> {
        Self::new(value.hour, value.minute)
    }
}

impl From<TimeOfDay> for StoredTime {
    fn from(value: TimeOfDay) -> Self {
        Self { hour: value.hour, minute: value.minute, second: 0, millisecond: 0 }
    }
}

/// A daily `[from, to)` window during which automation may run.
///
/// `to < from` is valid and means the window spans midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub from: TimeOfDay,
    pub to: TimeOfDay,
}

impl ScheduleWindow {
    pub fn new(from: TimeOfDay, to: TimeOfDay) -> Self {
        Self { from, to }
    }

    /// True when the window runs past midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.to < self.from
    }
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self { from: TimeOfDay { hour: 8, minute: 30 }, to: TimeOfDay { hour: 23, minute: 0 } }
    }
}

impl fmt::Display for ScheduleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
