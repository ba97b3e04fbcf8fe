//! Time sources for the frame loop

use std::time::Instant;

/// Monotonic time source
pub trait Clock {
    /// Seconds since an arbitrary fixed origin; never decreases
    fn elapsed_seconds(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand, for tools and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward; negative or non-finite steps are ignored
    pub fn advance(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.now += seconds;
        }
    }
}

impl Clock for ManualClock {
    fn elapsed_seconds(&self) -> f64 {
        self.now
    }
}
