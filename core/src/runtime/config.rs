//! Frame loop configuration

use std::time::Duration;

/// Frame loop configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Nominal frame rate in Hz, used for the first frame's delta
    pub tick_rate: u32,
    /// Largest delta handed to the simulation after a stall
    pub max_delta: Duration,
    /// Per-frame CPU time above which a warning is logged
    pub cpu_budget: Duration,
}

impl RuntimeConfig {
    /// Duration of one nominal frame
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_delta: Duration::from_millis(100),
            cpu_budget: Duration::from_micros(4000), // 4ms at 60fps
        }
    }
}
