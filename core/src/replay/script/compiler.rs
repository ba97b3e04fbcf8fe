//! Script compiler
//!
//! Converts parsed TOML scripts into one [`FrameInput`] per frame plus the
//! snapshot and assertion schedule.

use glam::Vec2;

use super::ast::{AssertCondition, ReplayScript};
use super::parser::parse_symbolic;
use super::validation::{ValidationError, validate_script};
use crate::config::KeyBindings;
use crate::controls::{Control, ControlSet};
use crate::input::FrameInput;

/// Resolves script input tokens to controls
pub trait InputLayout {
    /// Control named by `token`, if any
    fn resolve(&self, token: &str) -> Option<Control>;
}

/// Accepts control names (`accelerate`, `launch`, ...) and bound key names
impl InputLayout for KeyBindings {
    fn resolve(&self, token: &str) -> Option<Control> {
        Control::from_name(token).or_else(|| self.control_for_key(token))
    }
}

/// Compiled script ready for execution
#[derive(Debug, Default)]
pub struct CompiledScript {
    /// Simulation rate in ticks per second
    pub tick_rate: u32,
    /// Input for every frame, dense
    pub inputs: Vec<FrameInput>,
    /// Frames that need snapshots
    pub snap_frames: Vec<u64>,
    /// Assertions to evaluate
    pub assertions: Vec<CompiledAssertion>,
    /// Total frame count (max frame + 1)
    pub frame_count: u64,
}

impl CompiledScript {
    /// Seconds per tick
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// An assertion scheduled on a frame
#[derive(Debug, Clone)]
pub struct CompiledAssertion {
    pub frame: u64,
    /// Condition as written in the script
    pub source: String,
    pub condition: AssertCondition,
}

/// Script compiler
pub struct Compiler<'a> {
    layout: &'a dyn InputLayout,
}

impl<'a> Compiler<'a> {
    /// Create a new compiler with the given input layout
    pub fn new(layout: &'a dyn InputLayout) -> Self {
        Self { layout }
    }

    /// Compile a parsed script into executable form
    pub fn compile(&self, script: &ReplayScript) -> Result<CompiledScript, CompileError> {
        validate_script(script).map_err(CompileError::Validation)?;

        let last_frame = script.last_frame();
        let mut entries: Vec<_> = script.frames.iter().collect();
        entries.sort_by_key(|entry| entry.f);

        let mut inputs = Vec::with_capacity(last_frame as usize + 1);
        let mut snap_frames = Vec::new();
        let mut assertions = Vec::new();
        let mut held = ControlSet::empty();
        let mut pending = entries.into_iter().peekable();

        // Held controls persist until the next entry that sets `input`;
        // look and scroll apply to their own frame only
        for frame in 0..=last_frame {
            let mut input = FrameInput {
                held,
                ..FrameInput::idle()
            };

            if let Some(entry) = pending.next_if(|entry| entry.f == frame) {
                if let Some(ref symbolic) = entry.input {
                    held = self.resolve_controls(frame, symbolic)?;
                    input.held = held;
                }
                if let Some([dx, dy]) = entry.look {
                    input.look = Vec2::new(dx, dy);
                }
                if let Some(scroll) = entry.scroll {
                    input.scroll = scroll;
                }
                if entry.snap {
                    snap_frames.push(frame);
                }
                if let Some(ref source) = entry.assert {
                    let condition = AssertCondition::parse(source)
                        .map_err(|e| CompileError::InvalidAssertion(e.to_string()))?;
                    assertions.push(CompiledAssertion {
                        frame,
                        source: source.clone(),
                        condition,
                    });
                }
            }

            inputs.push(input);
        }

        Ok(CompiledScript {
            tick_rate: script.tick_rate,
            inputs,
            snap_frames,
            assertions,
            frame_count: last_frame + 1,
        })
    }

    fn resolve_controls(&self, frame: u64, symbolic: &str) -> Result<ControlSet, CompileError> {
        parse_symbolic(symbolic)
            .into_iter()
            .map(|token| {
                self.layout
                    .resolve(&token)
                    .ok_or(CompileError::UnknownControl { frame, name: token })
            })
            .collect::<Result<Vec<Control>, _>>()
            .map(|controls| controls.into_iter().collect())
    }
}

/// Compilation errors
#[derive(Debug)]
pub enum CompileError {
    /// Script validation failed
    Validation(ValidationError),
    /// Invalid assertion syntax
    InvalidAssertion(String),
    /// Input names neither a control nor a bound key
    UnknownControl { frame: u64, name: String },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Validation(e) => write!(f, "Validation error: {}", e),
            CompileError::InvalidAssertion(e) => write!(f, "Invalid assertion: {}", e),
            CompileError::UnknownControl { frame, name } => {
                write!(f, "Unknown control '{}' at frame {}", name, frame)
            }
        }
    }
}

impl std::error::Error for CompileError {}
