//! Scripted replays
//!
//! Replay scripts drive the simulation headlessly for regression testing:
//!
//! ```text
//! script.toml ─> Compiler ─> ScriptExecutor ─> report.json
//!                                 │
//!                  snap: capture debug vars before/after the tick
//!                  assert: evaluate conditions after the tick
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ghostkart_core::replay::{HeadlessConfig, HeadlessRunner, WorldBackend};
//!
//! let mut runner = HeadlessRunner::from_file(path, &config.keys, HeadlessConfig::default())?;
//! let mut backend = WorldBackend::new(world, runner.frame_delta());
//! let report = runner.execute_with_backend(&mut backend)?;
//! println!("{}: {}", report.outcome.verdict, report.to_json()?);
//! ```

pub mod runtime;
pub mod script;
pub mod types;

// Re-export core types
pub use types::{AssertionResult, DebugValueData, Snapshot};

// Re-export script format
pub use script::{
    AssertCondition, AssertValue, CompareOp, CompileError, CompiledAssertion, CompiledScript,
    Compiler, FrameEntry, InputLayout, MAX_SCRIPT_FRAME, ParseError, ReplayScript, ValidationError,
};

// Re-export runtime
pub use runtime::{
    DEBUG_VARIABLES, DebugVariableInfo, HeadlessBackend, HeadlessConfig, HeadlessRunner, Outcome,
    RaceSummary, ReplayReport, ScriptExecutor, StopReason, Verdict, WorldBackend,
};
