//! Frame loop
//!
//! One frame: read the clock, derive a clamped delta, poll input, tick the
//! world, replay the resulting command list into a renderer.

use std::time::{Duration, Instant};

use crate::input::{FrameInput, InputState};
use crate::render::{RenderCommandList, Renderer};
use crate::world::WorldState;

mod clock;
mod config;


pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RuntimeConfig;

/// Drives a [`WorldState`] from a [`Clock`]
pub struct FrameLoop<C: Clock> {
    clock: C,
    config: RuntimeConfig,
    last_time: Option<f64>,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    /// Create a frame loop with the default configuration
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, RuntimeConfig::default())
    }

    pub fn with_config(clock: C, config: RuntimeConfig) -> Self {
        Self {
            clock,
            config,
            last_time: None,
            frames: 0,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds since the previous call, clamped to `max_delta`.
    ///
    /// The first call yields one nominal tick. A clock that runs backwards
    /// yields zero.
    pub fn next_delta(&mut self) -> f32 {
        let now = self.clock.elapsed_seconds();
        let delta = match self.last_time {
            Some(last) => (now - last).max(0.0),
            None => self.config.tick_duration().as_secs_f64(),
        };
        self.last_time = Some(now);
        delta.min(self.config.max_delta.as_secs_f64()) as f32
    }

    /// Run one frame and return the command list that was rendered
    pub fn frame<I, R>(
        &mut self,
        world: &mut WorldState,
        input: &mut I,
        renderer: &mut R,
    ) -> RenderCommandList
    where
        I: InputState + ?Sized,
        R: Renderer + ?Sized,
    {
        let dt = self.next_delta();
        let frame_input = FrameInput::capture(input);

        let frame_start = Instant::now();
        let commands = world.tick(dt, &frame_input);
        commands.replay_into(renderer);
        self.frames += 1;

        self.check_budget(frame_start.elapsed());
        commands
    }

    fn check_budget(&self, frame_time: Duration) {
        if frame_time > self.config.cpu_budget {
            tracing::warn!(
                "Tick took {:?}, exceeds budget of {:?}",
                frame_time,
                self.config.cpu_budget
            );
        }
    }
}
