use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;

/// The start of a UTC day, in seconds since the UNIX epoch.
///
/// Group credentials are issued with a redemption time at this granularity:
/// a credential for day `D` can only be presented while the client believes
/// it is day `D`. Lookups compare days exactly, never by range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionDay(u64);

impl RedemptionDay {
    /// The day containing `time`. Times before the epoch collapse to day zero.
    pub fn containing(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since_epoch| since_epoch.as_secs());

        Self::from_epoch_seconds(secs)
    }

    /// Truncates `secs` down to the start of its day.
    pub const fn from_epoch_seconds(secs: u64) -> Self {
        Self(secs - secs % SECONDS_PER_DAY)
    }

    pub const fn as_epoch_seconds(self) -> u64 {
        self.0
    }

    pub const fn plus_days(self, days: u64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(SECONDS_PER_DAY)))
    }

    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.0)
    }
}

impl std::fmt::Display for RedemptionDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedemptionDay({})", self.0)
    }
}

/// Source of wall-clock time. Day boundaries and cache freshness are both
/// computed from it, so tests swap in a [`ManualClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug)]
pub struct ManualClock(std::sync::Mutex<SystemTime>);

#[cfg(any(test, feature = "test-utils"))]
impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self(std::sync::Mutex::new(start))
    }

    pub fn at_day(day: RedemptionDay, offset: Duration) -> Self {
        Self::new(day.to_system_time() + offset)
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: SystemTime) {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = to;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-10T00:00:00Z
    const MIDNIGHT: u64 = 1_710_028_800;

    #[test]
    fn truncates_to_start_of_utc_day() {
        let late_evening = UNIX_EPOCH + Duration::from_secs(MIDNIGHT + 23 * 3600 + 59 * 60);

        assert_eq!(
            RedemptionDay::containing(late_evening).as_epoch_seconds(),
            MIDNIGHT
        );
        assert_eq!(RedemptionDay::from_epoch_seconds(MIDNIGHT).as_epoch_seconds(), MIDNIGHT);
    }

    #[test]
    fn plus_days_moves_whole_days() {
        let day = RedemptionDay::from_epoch_seconds(MIDNIGHT);

        assert_eq!(day.plus_days(7).as_epoch_seconds(), MIDNIGHT + 7 * SECONDS_PER_DAY);
        assert_eq!(RedemptionDay::containing(day.plus_days(1).to_system_time()), day.plus_days(1));
    }

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::at_day(RedemptionDay::from_epoch_seconds(MIDNIGHT), Duration::ZERO);
        let before = clock.now();

        assert_eq!(clock.now(), before);
        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), before + Duration::from_secs(90));
    }
}
