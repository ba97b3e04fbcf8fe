//! Replay report written after a scripted run

use serde::Serialize;

use crate::motion::BodyId;
use crate::race::RacePhase;
use crate::replay::runtime::backend::DebugVariableInfo;
use crate::replay::types::{AssertionResult, Snapshot};
use crate::sky::SkyMode;
use crate::world::WorldState;

/// Everything a scripted run produced
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Script path, when run from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// RFC 3339 wall-clock start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub tick_rate: u32,
    /// Ticks that ran to completion
    pub frames_run: u64,
    pub frames_total: u64,
    /// Where the race stood when the run stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<RaceSummary>,
    pub snapshots: Vec<Snapshot>,
    pub assertions: Vec<AssertionResult>,
    /// Variables the backend publishes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<DebugVariableInfo>,
    pub outcome: Outcome,
}

impl ReplayReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// No failed assertion and nothing aborted the run
    pub fn passed(&self) -> bool {
        self.outcome.verdict == Verdict::Passed
    }

    /// Simulated seconds covered by the ticks that ran
    pub fn simulated_secs(&self) -> f64 {
        self.frames_run as f64 / f64::from(self.tick_rate.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Passed,
    Failed,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Passed => write!(f, "PASSED"),
            Verdict::Failed => write!(f, "FAILED"),
        }
    }
}

/// Assertion tally and why the run ended
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub verdict: Verdict,
    pub snapshots: usize,
    pub passed: usize,
    pub failed: usize,
    /// Set when a timeout or backend failure cut the run short
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Race and ghost state at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSummary {
    pub phase: RacePhase,
    pub ghosts_moving: bool,
    /// Bodies past the finish line, in id order
    pub finished: Vec<BodyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<f64>,
    /// Body furthest down the track; ties go to the lower id
    pub leader: BodyId,
    pub player_speed: f32,
    pub sky: SkyMode,
    /// World clock in seconds
    pub elapsed: f64,
}

impl RaceSummary {
    pub fn of(world: &WorldState) -> Self {
        let race = world.race();
        let leader = world
            .bodies()
            .iter()
            .min_by(|a, b| {
                b.position
                    .z
                    .total_cmp(&a.position.z)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map_or(BodyId::Player, |body| body.id);

        Self {
            phase: race.phase(),
            ghosts_moving: world.ghosts_moving(),
            finished: BodyId::ALL
                .into_iter()
                .filter(|id| race.body_finished(*id))
                .collect(),
            finish_time: race.finish_time(),
            leader,
            player_speed: world.player().speed,
            sky: world.sky(),
            elapsed: world.elapsed(),
        }
    }
}
