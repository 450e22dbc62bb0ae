//! Tick source and scheduler-aware sleep.
//!
//! One tick is one millisecond. `MonotonicClock` backs production runs; the
//! simulation driver provides a virtual clock for deterministic tests.

use std::time::{Duration, Instant};

/// Monotonic tick counter with a blocking sleep.
pub trait Clock: Send + Sync {
    /// Milliseconds since the clock was created. Never decreases.
    fn now_ms(&self) -> u64;

    /// Suspend the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall-time clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
