//! Clock abstraction and calendar-day helpers.
//!
//! The ledger never calls `Utc::now()` directly; it reads time through an
//! injected [`Clock`] so daily-limit windows are deterministic under test.

use std::sync::RwLock;

use chrono::{DateTime, NaiveTime, Utc};

/// Source of the current instant.
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

/// Settable clock for tests (frozen until moved explicitly).
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(mut poisoned) => **poisoned.get_mut() = now,
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        match self.now.write() {
            Ok(mut guard) => *guard += by,
            Err(mut poisoned) => **poisoned.get_mut() += by,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Midnight (UTC) of the calendar day containing `at`.
///
/// Daily withdrawal totals are windowed from this instant.
pub fn day_start(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}
