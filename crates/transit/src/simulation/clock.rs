//! Time-of-day sources.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Timelike;

use crate::schedule::SECONDS_PER_DAY;

/// Supplies the current local time of day
pub trait Clock: Send + Sync {
    /// Seconds since local midnight, in [0, 86400)
    fn seconds_since_midnight(&self) -> u32;
}

/// The host's local wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn seconds_since_midnight(&self) -> u32 {
        chrono::Local::now().num_seconds_from_midnight() % SECONDS_PER_DAY
    }
}

/// A clock that only moves when told to. Wraps around at midnight.
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: AtomicU32,
}

impl ManualClock {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds: AtomicU32::new(seconds % SECONDS_PER_DAY),
        }
    }

    pub fn set(&self, seconds: u32) {
        self.seconds.store(seconds % SECONDS_PER_DAY, Ordering::Relaxed);
    }

    /// Move forward by `delta` seconds and return the new time
    pub fn advance(&self, delta: u32) -> u32 {
        let delta = delta % SECONDS_PER_DAY;
        let mut current = self.seconds.load(Ordering::Relaxed);
        loop {
            let next = (current + delta) % SECONDS_PER_DAY;
            match self
                .seconds
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clock for ManualClock {
    fn seconds_since_midnight(&self) -> u32 {
        self.seconds.load(Ordering::Relaxed)
    }
}
