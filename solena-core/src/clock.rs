//! Clock abstraction for calendar arithmetic
//!
//! Streaks, mood series, and time windows all reason about "today" and
//! "yesterday" as calendar dates. The clock is injected so those
//! computations stay deterministic under test.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Source of the current instant.
///
/// All calendar dates in the engine are the UTC calendar date of `now()`.
/// Comparing dates, never timestamps, avoids time-of-day drift around
/// midnight boundaries.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// The calendar date immediately before `today()`.
    fn yesterday(&self) -> NaiveDate {
        self.today() - Duration::days(1)
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_dates() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 0, 30, 0).unwrap());
        assert_eq!(
            clock.today(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(
            clock.yesterday(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
