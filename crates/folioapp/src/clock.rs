//! Time source for record timestamps.
//!
//! Repositories never call `Utc::now()` directly; they ask a [`Clock`]. Tests
//! use [`ManualClock`] so `createdAt`/`updatedAt` assertions are exact.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move time forward. Negative durations are ignored; time never goes back.
    pub fn advance(&self, by: Duration) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if by > Duration::zero() {
            *current += by;
        }
        *current
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_forward() {
        let start = DateTime::<Utc>::UNIX_EPOCH;
        let clock = ManualClock::at(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::milliseconds(5));
        assert_eq!(clock.now(), start + Duration::milliseconds(5));

        clock.advance(Duration::milliseconds(-50));
        assert_eq!(clock.now(), start + Duration::milliseconds(5));
    }
}
