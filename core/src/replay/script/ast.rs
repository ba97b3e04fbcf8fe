//! Script file layout and assertion conditions

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::replay::types::DebugValueData;

/// A replay script as stored in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Every frame ticks the world by `1 / tick_rate` seconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,

    /// Sparse entries; frames without one repeat the held controls
    pub frames: Vec<FrameEntry>,
}

fn default_tick_rate() -> u32 {
    60
}

impl ReplayScript {
    /// Highest frame any entry mentions
    pub fn last_frame(&self) -> u64 {
        self.frames.iter().map(|entry| entry.f).max().unwrap_or(0)
    }

    /// Simulated seconds the script covers
    pub fn duration_secs(&self) -> f64 {
        (self.last_frame() + 1) as f64 / f64::from(self.tick_rate.max(1))
    }
}

/// One `{ f = ... }` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameEntry {
    pub f: u64,

    /// Controls held from this frame on: `"accelerate+turn_left"`, `"W+A"`, `"idle"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Pointer delta for this frame only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look: Option<[f32; 2]>,

    /// Zoom delta for this frame only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<f32>,

    #[serde(default)]
    pub snap: bool,

    /// Checked after the tick, e.g. `"$ghost1_z > $player_z"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assert: Option<String>,
}

/// `$variable <op> operand`
#[derive(Debug, Clone, PartialEq)]
pub struct AssertCondition {
    pub variable: String,
    pub operator: CompareOp,
    pub value: AssertValue,
}

impl AssertCondition {
    /// Compare the variable against the operand.
    ///
    /// Returns the observed value and the resolved operand alongside the
    /// verdict; a missing value on either side fails the check.
    pub fn check(
        &self,
        current: &HashMap<String, DebugValueData>,
        previous: &HashMap<String, DebugValueData>,
    ) -> (bool, Option<f64>, Option<f64>) {
        let actual = current.get(&self.variable).and_then(DebugValueData::as_f64);
        let operand = self.value.resolve(current, previous);
        let holds = match (actual, operand) {
            (Some(a), Some(b)) => self.operator.holds(a, b),
            _ => false,
        };
        (holds, actual, operand)
    }
}

/// Comparison operators, two-character spellings first so `<=` is not read as `<`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl CompareOp {
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Le,
        CompareOp::Ge,
        CompareOp::Lt,
        CompareOp::Gt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }

    /// Equality tolerates f64 rounding; bools compare as 0/1
    pub fn holds(self, actual: f64, expected: f64) -> bool {
        let same = (actual - expected).abs() < f64::EPSILON;
        match self {
            CompareOp::Eq => same,
            CompareOp::Ne => !same,
            CompareOp::Le => actual <= expected,
            CompareOp::Ge => actual >= expected,
            CompareOp::Lt => actual < expected,
            CompareOp::Gt => actual > expected,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum AssertValue {
    /// Literal; `true`/`false` parse to 1/0
    Number(f64),
    /// `$name` read on the same frame
    Variable(String),
    /// `$prev_name`, read from the most recent snapshot. Holds `$name`.
    PrevValue(String),
}

impl AssertValue {
    pub fn resolve(
        &self,
        current: &HashMap<String, DebugValueData>,
        previous: &HashMap<String, DebugValueData>,
    ) -> Option<f64> {
        match self {
            AssertValue::Number(n) => Some(*n),
            AssertValue::Variable(name) => current.get(name).and_then(DebugValueData::as_f64),
            AssertValue::PrevValue(name) => previous.get(name).and_then(DebugValueData::as_f64),
        }
    }

    /// Operand as it appears in failure messages, with its resolved value
    pub fn describe(&self, resolved: Option<f64>) -> String {
        let shown = resolved.map_or_else(|| "undefined".to_string(), |v| v.to_string());
        match self {
            AssertValue::Number(n) => n.to_string(),
            AssertValue::Variable(name) => format!("{} ({})", name, shown),
            AssertValue::PrevValue(name) => {
                format!("$prev_{} ({})", name.trim_start_matches('$'), shown)
            }
        }
    }
}
