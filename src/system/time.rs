//! Time keeping module

use chrono::{FixedOffset, NaiveDateTime};
use embassy_time::Instant;

use super::BUILD_UTC_EPOCH_MILLIS;
use crate::Error;

/// Wall-clock time paired with the system instant it was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    /// Clock time, milliseconds since the Unix epoch
    millis: i64,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            millis: BUILD_UTC_EPOCH_MILLIS,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UTC `NaiveDateTime`
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self::from_millis(time.and_utc().timestamp_millis())
    }

    /// Create new time reference from milliseconds since the epoch
    pub fn from_millis(millis: i64) -> Self {
        Self::at(millis, Instant::now())
    }

    /// Create new time reference taken at a known instant
    pub fn at(millis: i64, instant: Instant) -> Self {
        Self { millis, instant }
    }
}

/// Wall clock and local time zone of the device.
#[derive(Debug, Clone, Copy)]
pub struct TimeManager {
    reference: TimeReference,
    offset: FixedOffset,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(offset: FixedOffset) -> Self {
        Self {
            reference: TimeReference::default(),
            offset,
        }
    }

    /// Get current time in milliseconds since the epoch
    pub fn now_millis(&self) -> i64 {
        self.millis_at(Instant::now())
    }

    /// Wall-clock time at `instant`.
    ///
    /// Instants before the reference clamp to the reference time.
    pub fn millis_at(&self, instant: Instant) -> i64 {
        let elapsed = instant.saturating_duration_since(self.reference.instant);
        let elapsed = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        self.reference.millis.saturating_add(elapsed)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    /// Current local UTC offset
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Update the local UTC offset, in seconds east of UTC
    pub fn set_offset(&mut self, secs: i32) -> Result<(), Error> {
        self.offset = FixedOffset::east_opt(secs).ok_or(Error::InvalidOffset(secs))?;
        Ok(())
    }
}
