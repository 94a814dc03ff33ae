//! Time source collaborator.
//!
//! Every calendar- or elapsed-time-sensitive rule in the core (streaks,
//! stale-session reconciliation, plant growth, the breathing countdown)
//! reads time through [`Clock`] so the rules stay testable at fixed dates.
//! Elapsed time is always recomputed from absolute timestamps, never from a
//! running counter, so a suspended process resumes with correct state.

use chrono::{DateTime, NaiveDate, Utc};

/// Wall-clock collaborator.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::Cell;

    /// Clock pinned to an instant, advanceable by tests.
    pub struct FixedClock {
        now: Cell<DateTime<Utc>>,
    }

    impl FixedClock {
        pub fn at(now: DateTime<Utc>) -> Self {
            Self { now: Cell::new(now) }
        }

        /// Pin to midnight UTC of an ISO date string.
        pub fn on_date(date: &str) -> Self {
            let date: NaiveDate = date.parse().expect("valid ISO date");
            Self::at(date.and_hms_opt(0, 0, 0).expect("valid time").and_utc())
        }

        pub fn set(&self, now: DateTime<Utc>) {
            self.now.set(now);
        }

        pub fn advance(&self, duration: chrono::Duration) {
            self.now.set(self.now.get() + duration);
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.now.get()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FixedClock;
    use super::*;

    #[test]
    fn today_is_derived_from_now() {
        let clock = FixedClock::on_date("2024-03-15");
        assert_eq!(clock.today(), "2024-03-15".parse::<NaiveDate>().unwrap());

        clock.advance(chrono::Duration::hours(25));
        assert_eq!(clock.today(), "2024-03-16".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
