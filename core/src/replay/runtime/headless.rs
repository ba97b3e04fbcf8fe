//! Headless replay execution
//!
//! Runs replay scripts against the simulation without a window or GPU.
//! Each frame applies the script's input, ticks the backend once, then
//! records snapshots and checks assertions on the values it reads back.

use anyhow::{Context, Result};
use hashbrown::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::input::FrameInput;
use crate::replay::script::{CompiledScript, Compiler, InputLayout, ReplayScript};
use crate::replay::types::DebugValueData;

use super::backend::DebugVariableInfo;
use super::executor::{RaceSummary, ReplayReport, ScriptExecutor, StopReason};

/// Headless replay runner configuration
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Stop on first assertion failure
    pub fail_fast: bool,
    /// Wall-clock limit in seconds
    pub timeout_secs: u64,
    /// Script file path (for reporting)
    pub script_path: Option<String>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            timeout_secs: 300,
            script_path: None,
        }
    }
}

/// Something a script can drive one tick at a time.
pub trait HeadlessBackend {
    /// Hold these controls for the next tick; `None` past the last scripted frame.
    fn apply_inputs(&mut self, inputs: Option<&FrameInput>) -> Result<()>;
    /// Advance the simulation by one tick.
    fn update(&mut self) -> Result<()>;
    /// Read the published variables.
    fn read_debug_values(&mut self) -> Result<HashMap<String, DebugValueData>>;
    /// Race state for the report, if the backend runs a race.
    fn race_summary(&self) -> Option<RaceSummary> {
        None
    }
}

/// Headless replay runner
pub struct HeadlessRunner {
    executor: ScriptExecutor,
    config: HeadlessConfig,
    variables: &'static [DebugVariableInfo],
}

impl HeadlessRunner {
    pub fn new(script: CompiledScript, config: HeadlessConfig) -> Self {
        Self {
            executor: ScriptExecutor::new(script),
            config,
            variables: &[],
        }
    }

    /// Parse and compile a TOML script file
    pub fn from_file(
        script_path: &Path,
        layout: &dyn InputLayout,
        config: HeadlessConfig,
    ) -> Result<Self> {
        let script = ReplayScript::from_file(script_path)
            .with_context(|| format!("Failed to parse script: {}", script_path.display()))?;

        let compiled = Compiler::new(layout)
            .compile(&script)
            .with_context(|| format!("Failed to compile script: {}", script_path.display()))?;

        let config = HeadlessConfig {
            script_path: Some(script_path.display().to_string()),
            ..config
        };
        Ok(Self::new(compiled, config))
    }

    /// Variables listed in the report
    pub fn register_debug_variables(&mut self, variables: &'static [DebugVariableInfo]) {
        self.variables = variables;
    }

    /// Seconds each tick advances the simulation
    pub fn frame_delta(&self) -> f32 {
        self.executor.frame_delta()
    }

    pub fn frame_count(&self) -> u64 {
        self.executor.frame_count()
    }

    /// Run the script to the end, a fail-fast assertion, the timeout or a
    /// backend error. Backend errors end up in the report, not in `Err`.
    pub fn execute_with_backend<B: HeadlessBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<ReplayReport> {
        let started = Instant::now();
        let executed_at = chrono::Utc::now().to_rfc3339();

        while !self.executor.is_done() {
            if started.elapsed().as_secs() > self.config.timeout_secs {
                self.executor.abort(StopReason::TimedOut {
                    limit_secs: self.config.timeout_secs,
                });
                break;
            }

            match self.step(backend) {
                Ok(()) => self.executor.advance(),
                Err(e) => self
                    .executor
                    .abort(StopReason::BackendFailed(format!("{:#}", e))),
            }
        }

        let mut report = self.executor.report(backend.race_summary());
        report.script = self.config.script_path.clone();
        report.executed_at = Some(executed_at);
        report.duration_ms = Some(started.elapsed().as_millis() as u64);
        report.variables = self.variables.to_vec();

        tracing::info!(
            "Replay finished: {} after {}/{} frames ({} passed, {} failed)",
            report.outcome.verdict,
            report.frames_run,
            report.frames_total,
            report.outcome.passed,
            report.outcome.failed
        );
        if let Some(reason) = &report.outcome.aborted {
            tracing::warn!("Replay aborted: {}", reason);
        }

        Ok(report)
    }

    /// One scripted frame: input, tick, then snapshot and assertions
    fn step<B: HeadlessBackend>(&mut self, backend: &mut B) -> Result<()> {
        let input = self.executor.input().copied();
        backend
            .apply_inputs(input.as_ref())
            .with_context(|| format!("applying input at frame {}", self.executor.frame()))?;

        let snapshot = self.executor.wants_snapshot();
        let due = self.executor.assertions_due();

        let pre = if snapshot {
            backend.read_debug_values()?
        } else {
            HashMap::new()
        };

        backend
            .update()
            .with_context(|| format!("ticking frame {}", self.executor.frame()))?;

        if !snapshot && due.is_empty() {
            return Ok(());
        }
        let post = backend.read_debug_values()?;

        if snapshot {
            self.executor
                .record_snapshot(pre, &post, describe_input(input.as_ref()));
        }
        for assertion in &due {
            self.executor.check(assertion, &post, self.config.fail_fast);
        }
        Ok(())
    }
}

/// Spell a frame's input the way scripts do
pub fn describe_input(input: Option<&FrameInput>) -> String {
    let Some(input) = input else {
        return "no_input".to_string();
    };

    let mut parts = vec![input.held.to_symbolic()];
    if input.look != glam::Vec2::ZERO {
        parts.push(format!("look({}, {})", input.look.x, input.look.y));
    }
    if input.scroll != 0.0 {
        parts.push(format!("scroll({})", input.scroll));
    }
    parts.join(" ")
}
