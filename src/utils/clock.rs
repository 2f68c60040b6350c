//! Clock Abstraction
//!
//! Injectable time source so every expiry comparison (lockouts, reset tokens,
//! JWT lifetimes) can be driven deterministically in tests.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Source of the current wall-clock time.
///
/// Services never call `Utc::now()` directly; they read time through this
/// trait so time-dependent transitions can be tested without sleeping.
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for deterministic tests
///
/// Starts at a fixed instant and only moves when told to, so lockout and
/// token-expiry windows can be crossed instantly.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by the given duration
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += delta;
    }

    /// Jump the clock to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(15));
        assert_eq!(clock.now(), start + Duration::minutes(15));
    }

    #[test]
    fn test_manual_clock_set() {
        let start = Utc::now();
        let clock = ManualClock::new(start);

        let later = start + Duration::days(7);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
