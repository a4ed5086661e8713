//! Time source used by the table for expiry.
//!
//! The table never reads ambient time: a [`Clock`] is injected at
//! construction so simulations can drive time explicitly.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Milliseconds since the clock's epoch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub ms_since_epoch: u64,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { ms_since_epoch: 0 };

    pub fn from_millis(ms: u64) -> Self {
        Self { ms_since_epoch: ms }
    }

    pub fn adding(&self, d: Duration) -> Self {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        Self {
            ms_since_epoch: self.ms_since_epoch.saturating_add(ms),
        }
    }

    pub fn difference(&self, other: &Self) -> Option<Duration> {
        self.ms_since_epoch
            .checked_sub(other.ms_since_epoch)
            .map(Duration::from_millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.ms_since_epoch)
    }
}

/// A source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// Wall clock measured from the moment it was created.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::ZERO.adding(self.start.elapsed())
    }
}

/// Manually advanced clock for simulations and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            ms: AtomicU64::new(start.ms_since_epoch),
        }
    }

    pub fn advance(&self, d: Duration) -> Timestamp {
        let ms = u64::try_from(d.as_millis()).unwrap_or(u64::MAX);
        // Saturates at the end of time instead of wrapping back to zero.
        let prev = self
            .ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(ms))
            })
            .unwrap_or_else(|cur| cur);
        Timestamp::from_millis(prev.saturating_add(ms))
    }

    pub fn set(&self, t: Timestamp) {
        self.ms.store(t.ms_since_epoch, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.ms.load(Ordering::SeqCst))
    }
}
