//! Tick sources for the simulation driver.
//!
//! A tick source decides *when* the driver recomputes vehicles; the clock decides
//! *what time it is* when it does. Stopping a source only prevents future ticks,
//! a tick already being processed always runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::simulation::clock::ManualClock;

/// Longest single sleep while waiting, so a stop request is noticed promptly
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub trait TickSource {
    /// Block until the next tick is due. Returns `false` once the source is exhausted or stopped.
    fn wait_for_tick(&mut self) -> bool;
}

/// Cancels a tick source from anywhere, including another thread
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Ticks on a fixed real-time interval, the first one immediately
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Duration,
    limit: Option<u64>,
    delivered: u64,
    next_due: Option<Instant>,
    stop: StopHandle,
}

impl IntervalTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            limit: None,
            delivered: 0,
            next_due: None,
            stop: StopHandle::default(),
        }
    }

    /// Stop after `ticks` ticks
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl TickSource for IntervalTicker {
    fn wait_for_tick(&mut self) -> bool {
        if self.stop.is_stopped() || self.limit.is_some_and(|limit| self.delivered >= limit) {
            return false;
        }

        if let Some(due) = self.next_due {
            loop {
                let now = Instant::now();
                if now >= due {
                    break;
                }
                std::thread::sleep((due - now).min(STOP_POLL_INTERVAL));
                if self.stop.is_stopped() {
                    return false;
                }
            }
        }

        // Schedule from the due time, not from now, so ticks do not drift
        let base = self.next_due.unwrap_or_else(Instant::now);
        self.next_due = Some(base + self.interval);
        self.delivered += 1;
        true
    }
}

/// Virtual time: a fixed number of ticks with no waiting, each after the
/// first advancing a [`ManualClock`] by `step_seconds`
#[derive(Debug)]
pub struct SteppedTicker {
    clock: Arc<ManualClock>,
    step_seconds: u32,
    remaining: u64,
    started: bool,
    stop: StopHandle,
}

impl SteppedTicker {
    pub fn new(clock: Arc<ManualClock>, step_seconds: u32, ticks: u64) -> Self {
        Self {
            clock,
            step_seconds,
            remaining: ticks,
            started: false,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl TickSource for SteppedTicker {
    fn wait_for_tick(&mut self) -> bool {
        if self.remaining == 0 || self.stop.is_stopped() {
            return false;
        }

        if self.started {
            self.clock.advance(self.step_seconds);
        }
        self.started = true;
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::clock::Clock;

    #[test]
    fn test_stepped_ticker_advances_clock() {
        let clock = Arc::new(ManualClock::new(1000));
        let mut ticker = SteppedTicker::new(clock.clone(), 5, 3);

        let mut seen = Vec::new();
        while ticker.wait_for_tick() {
            seen.push(clock.seconds_since_midnight());
        }
        assert_eq!(seen, vec![1000, 1005, 1010]);
        assert!(!ticker.wait_for_tick());
    }

    #[test]
    fn test_stepped_ticker_stop() {
        let clock = Arc::new(ManualClock::new(0));
        let mut ticker = SteppedTicker::new(clock, 5, 100);
        let handle = ticker.stop_handle();

        assert!(ticker.wait_for_tick());
        handle.stop();
        assert!(!ticker.wait_for_tick());
    }

    #[test]
    fn test_interval_ticker_limit() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(1)).with_limit(3);
        let mut count = 0;
        while ticker.wait_for_tick() {
            count += 1;
        }
        assert_eq!(count, 3);
        assert_eq!(ticker.delivered(), 3);
    }

    #[test]
    fn test_interval_ticker_stop_from_other_thread() {
        let mut ticker = IntervalTicker::new(Duration::from_secs(3600));
        let handle = ticker.stop_handle();

        assert!(ticker.wait_for_tick()); // first tick is immediate

        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.stop();
        });

        let started = Instant::now();
        assert!(!ticker.wait_for_tick());
        assert!(started.elapsed() < Duration::from_secs(5));
        stopper.join().unwrap();
    }
}
