//! Frame-by-frame bookkeeping for a compiled script
//!
//! The executor never touches a world. The runner asks it what the current
//! frame needs (input, snapshot, assertions), drives its backend, and hands
//! the values it read back to the executor.

mod report;


pub use report::{Outcome, RaceSummary, ReplayReport, Verdict};

use hashbrown::HashMap;

use crate::input::FrameInput;
use crate::replay::script::{CompiledAssertion, CompiledScript};
use crate::replay::types::{AssertionResult, DebugValueData, Snapshot};

/// Why a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Complete,
    /// First failing assertion under fail-fast
    AssertionFailed { frame: u64, condition: String },
    TimedOut { limit_secs: u64 },
    /// The backend returned an error while applying input, ticking or reading values
    BackendFailed(String),
}

impl StopReason {
    /// Timeouts and backend failures fail a run regardless of assertions
    pub fn is_abort(&self) -> bool {
        matches!(self, StopReason::TimedOut { .. } | StopReason::BackendFailed(_))
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Complete => write!(f, "ran every frame"),
            StopReason::AssertionFailed { frame, condition } => {
                write!(f, "assertion failed at frame {}: {}", frame, condition)
            }
            StopReason::TimedOut { limit_secs } => write!(f, "timed out after {}s", limit_secs),
            StopReason::BackendFailed(e) => write!(f, "backend failed: {}", e),
        }
    }
}

pub struct ScriptExecutor {
    script: CompiledScript,
    frame: u64,
    /// Post-tick values of the latest snapshot, read by `$prev_` operands
    last_snapshot: HashMap<String, DebugValueData>,
    snapshots: Vec<Snapshot>,
    results: Vec<AssertionResult>,
    stop: Option<StopReason>,
}

impl ScriptExecutor {
    pub fn new(script: CompiledScript) -> Self {
        Self {
            script,
            frame: 0,
            last_snapshot: HashMap::new(),
            snapshots: Vec::new(),
            results: Vec::new(),
            stop: None,
        }
    }

    /// Frame about to run, or the number of frames run once done
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.script.frame_count
    }

    /// Seconds each frame advances the world
    pub fn frame_delta(&self) -> f32 {
        self.script.frame_delta()
    }

    pub fn is_done(&self) -> bool {
        self.stop.is_some() || self.frame >= self.script.frame_count
    }

    pub fn input(&self) -> Option<&FrameInput> {
        self.script.inputs.get(self.frame as usize)
    }

    pub fn wants_snapshot(&self) -> bool {
        self.script.snap_frames.contains(&self.frame)
    }

    /// Assertions scheduled on the current frame
    pub fn assertions_due(&self) -> Vec<CompiledAssertion> {
        self.script
            .assertions
            .iter()
            .filter(|a| a.frame == self.frame)
            .cloned()
            .collect()
    }

    /// Store the values around this frame's tick
    pub fn record_snapshot(
        &mut self,
        pre: HashMap<String, DebugValueData>,
        post: &HashMap<String, DebugValueData>,
        input: String,
    ) {
        self.snapshots
            .push(Snapshot::between(self.frame, input, pre, post));
        self.last_snapshot = post.clone();
    }

    /// Check one assertion against post-tick values and record the result
    pub fn check(
        &mut self,
        assertion: &CompiledAssertion,
        values: &HashMap<String, DebugValueData>,
        fail_fast: bool,
    ) -> bool {
        let condition = &assertion.condition;
        let (passed, actual, operand) = condition.check(values, &self.last_snapshot);

        self.results.push(AssertionResult {
            frame: self.frame,
            condition: assertion.source.clone(),
            passed,
            actual,
            expected: (!passed)
                .then(|| format!("{} {}", condition.operator, condition.value.describe(operand))),
        });

        if !passed {
            tracing::warn!(
                "Assertion failed at frame {}: {} (actual {:?})",
                self.frame,
                assertion.source,
                actual
            );
            if fail_fast && self.stop.is_none() {
                self.stop = Some(StopReason::AssertionFailed {
                    frame: self.frame,
                    condition: assertion.source.clone(),
                });
            }
        }
        passed
    }

    /// Count the current frame as run
    pub fn advance(&mut self) {
        self.frame += 1;
        if self.stop.is_none() && self.frame >= self.script.frame_count {
            self.stop = Some(StopReason::Complete);
        }
    }

    /// End the run early; the first reason given wins
    pub fn abort(&mut self, reason: StopReason) {
        self.stop.get_or_insert(reason);
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop.as_ref()
    }

    /// Build the report; the runner fills in timing, script path and variables
    pub fn report(&self, race: Option<RaceSummary>) -> ReplayReport {
        let passed = self.results.iter().filter(|r| r.passed).count();
        let failed = self.results.len() - passed;
        let aborted = self
            .stop
            .as_ref()
            .filter(|reason| reason.is_abort())
            .map(ToString::to_string);
        let verdict = if failed == 0 && aborted.is_none() {
            Verdict::Passed
        } else {
            Verdict::Failed
        };

        ReplayReport {
            script: None,
            executed_at: None,
            duration_ms: None,
            tick_rate: self.script.tick_rate,
            frames_run: self.frame,
            frames_total: self.script.frame_count,
            race,
            snapshots: self.snapshots.clone(),
            assertions: self.results.clone(),
            variables: Vec::new(),
            outcome: Outcome {
                verdict,
                snapshots: self.snapshots.len(),
                passed,
                failed,
                aborted,
            },
        }
    }
}
