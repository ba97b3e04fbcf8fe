//! Script replay format
//!
//! The script format is a human-readable TOML format designed for:
//! - Regression tests of driving and race behavior
//! - Manual test case creation
//! - Debugging with snap/assert flags
//!
//! # Example Script
//!
//! ```toml
//! tick_rate = 60
//!
//! frames = [
//!   { f = 0, input = "accelerate", snap = true },
//!   { f = 120, input = "idle", assert = "$player_speed == 9" },
//!   { f = 121, input = "launch", snap = true },
//!   { f = 130, look = [10.0, 0.0], scroll = 5.0 },
//! ]
//! ```
//!
//! # Input Formats
//!
//! - **Control names**: `"idle"`, `"accelerate"`, `"accelerate+turn_left"`, `"launch"`
//! - **Bound keys**: `"W+A"`, `"Space"` (resolved through `[keys]` in the config)

mod ast;
mod compiler;
mod parser;
mod validation;

pub use ast::{AssertCondition, AssertValue, CompareOp, FrameEntry, ReplayScript};
pub use compiler::{CompileError, CompiledAssertion, CompiledScript, Compiler, InputLayout};
pub use parser::{ParseError, parse_symbolic};
pub use validation::{MAX_SCRIPT_FRAME, ValidationError, validate_script};
