//! Replay runtime
//!
//! This module contains the execution infrastructure for replay scripts:
//! - **Executor**: Frame bookkeeping, snapshots, assertions and the report
//! - **Headless**: Drives an executor against any [`HeadlessBackend`]
//! - **Backend**: The [`HeadlessBackend`] that ticks a real world

mod backend;
mod executor;
mod headless;

pub use backend::{DEBUG_VARIABLES, DebugVariableInfo, WorldBackend};
pub use executor::{Outcome, RaceSummary, ReplayReport, ScriptExecutor, StopReason, Verdict};
pub use headless::{HeadlessBackend, HeadlessConfig, HeadlessRunner, describe_input};
