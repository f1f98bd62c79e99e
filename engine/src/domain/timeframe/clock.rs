//! Clock abstraction for resolving "now"

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of the current instant.
///
/// The parser never reads the system clock directly; it asks a `Clock`, which
/// keeps every time frame a pure function of its inputs.
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as seen in `tz`
    fn now_in(&self, tz: Tz) -> DateTime<Tz> {
        self.now().with_timezone(&tz)
    }
}

/// Wall clock of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new<T: chrono::TimeZone>(instant: DateTime<T>) -> Self {
        Self(instant.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_fixed_clock_normalizes_to_utc() {
        let local = chrono_tz::Europe::Madrid
            .with_ymd_and_hms(2025, 11, 29, 14, 2, 0)
            .unwrap();
        let clock = FixedClock::new(local);
        assert_eq!(
            clock.now(),
            Utc.with_ymd_and_hms(2025, 11, 29, 13, 2, 0).unwrap()
        );
    }

    #[test]
    fn test_now_in_timezone() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 11, 29, 13, 2, 0).unwrap());
        let local = clock.now_in(chrono_tz::Europe::Madrid);
        assert_eq!(local.hour(), 14);
        assert_eq!(local.minute(), 2);
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let borrowed = &clock;
        assert_eq!(Clock::now(&borrowed), clock.now());
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
