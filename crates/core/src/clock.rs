//! Time source abstraction.
//!
//! Timestamps are always injected rather than read ambiently so that
//! year-rollover and expiry behavior can be pinned in tests.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests/dev.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().expect("clock lock poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock poisoned")
    }
}

impl<'a, C> Clock for &'a C
where
    C: Clock + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C> Clock for std::sync::Arc<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_set_instant() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let clock = FixedClock::new(t0);
        assert_eq!(clock.now(), t0);

        clock.set(t1);
        assert_eq!(clock.now(), t1);
    }
}
