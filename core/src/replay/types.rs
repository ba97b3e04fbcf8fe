//! Values read from the world and the records built from them

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A published world variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DebugValueData {
    U32(u32),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl DebugValueData {
    /// Numeric view used by assertions; bools are 0 or 1
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DebugValueData::U32(v) => Some(f64::from(*v)),
            DebugValueData::F32(v) => Some(f64::from(*v)),
            DebugValueData::F64(v) => Some(*v),
            DebugValueData::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        }
    }

    /// How this value moved since `before`, or `None` if it did not.
    ///
    /// Counters and positions read as signed steps (`+1`, `-0.50`), flags as
    /// `false -> true`. A change of variant is shown as old and new values.
    pub fn change_from(&self, before: &DebugValueData) -> Option<String> {
        match (before, self) {
            (DebugValueData::U32(a), DebugValueData::U32(b)) => {
                (a != b).then(|| format!("{:+}", i64::from(*b) - i64::from(*a)))
            }
            (DebugValueData::F32(a), DebugValueData::F32(b)) => {
                ((b - a).abs() > f32::EPSILON).then(|| format!("{:+.2}", b - a))
            }
            (DebugValueData::F64(a), DebugValueData::F64(b)) => {
                ((b - a).abs() > f64::EPSILON).then(|| format!("{:+.2}", b - a))
            }
            (DebugValueData::Bool(a), DebugValueData::Bool(b)) => {
                (a != b).then(|| format!("{} -> {}", a, b))
            }
            (a, b) => Some(format!("{:?} -> {:?}", a, b)),
        }
    }
}

/// World variables around one scripted tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub frame: u64,
    /// Input applied on the tick, spelled like a script entry
    pub input: String,
    pub pre: BTreeMap<String, DebugValueData>,
    pub post: BTreeMap<String, DebugValueData>,
    /// Variables that changed; `"new"` for ones that only exist after the tick
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<BTreeMap<String, String>>,
}

impl Snapshot {
    pub fn between(
        frame: u64,
        input: String,
        pre: HashMap<String, DebugValueData>,
        post: &HashMap<String, DebugValueData>,
    ) -> Self {
        let delta: BTreeMap<String, String> = post
            .iter()
            .filter_map(|(name, after)| {
                let change = match pre.get(name) {
                    Some(before) => after.change_from(before)?,
                    None => "new".to_string(),
                };
                Some((name.clone(), change))
            })
            .collect();

        Self {
            frame,
            input,
            pre: pre.into_iter().collect(),
            post: post.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            delta: (!delta.is_empty()).then_some(delta),
        }
    }
}

/// Outcome of one scheduled assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    pub frame: u64,
    /// Condition as written in the script
    pub condition: String,
    pub passed: bool,
    /// Observed value of the left-hand variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    /// Operator and operand, filled in for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}
