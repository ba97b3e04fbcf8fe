//! Dump render command lists for a fixed input

use anyhow::{Context, Result};
use clap::Args;
use glam::Mat4;
use serde::Serialize;
use std::path::PathBuf;

use ghostkart_core::replay::InputLayout;
use ghostkart_core::replay::script::parse_symbolic;
use ghostkart_core::{
    Control, ControlSet, DrawRequest, FrameLoop, GameConfig, InputState, Light, ManualClock,
    RenderCommandList, Renderer, SceneHandles, TextureHandle, WorldState,
};

#[derive(Args)]
pub struct TraceArgs {
    /// Number of frames to run
    #[arg(short, long, default_value = "60")]
    pub frames: u64,

    /// Controls held every frame, e.g. "accelerate+turn_left"
    #[arg(short, long, default_value = "idle")]
    pub input: String,

    /// Output file (JSON); stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Holds the same controls every frame
struct HeldInput {
    held: ControlSet,
}

impl InputState for HeldInput {
    fn is_active(&self, control: Control) -> bool {
        self.held.held(control)
    }

    fn pointer_delta(&mut self) -> (f32, f32) {
        (0.0, 0.0)
    }

    fn scroll_delta(&mut self) -> f32 {
        0.0
    }
}

/// Counts draws that would reach the GPU
#[derive(Default)]
struct DrawCounter {
    draws: usize,
}

impl Renderer for DrawCounter {
    fn begin_frame(&mut self) {}

    fn set_view_projection(&mut self, _view: Mat4, _projection: Mat4) {}

    fn set_light(&mut self, _light: &Light) {}

    fn draw_sky(&mut self, _cubemap: TextureHandle, _view: Mat4) {}

    fn submit(&mut self, _request: &DrawRequest) {
        self.draws += 1;
    }

    fn end_frame(&mut self) {}
}

#[derive(Serialize)]
struct TraceFrame {
    frame: u64,
    commands: RenderCommandList,
}

pub fn execute(args: TraceArgs) -> Result<()> {
    let config = crate::config::load_checked();
    let held = resolve_input(&args.input, &config.keys)?;
    let frames = trace(config, held, args.frames);
    let json = serde_json::to_string_pretty(&frames)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write trace: {}", path.display()))?;
            println!("Wrote {} frames to {}", frames.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn resolve_input(symbolic: &str, layout: &dyn InputLayout) -> Result<ControlSet> {
    parse_symbolic(symbolic)
        .iter()
        .map(|token| {
            layout
                .resolve(token)
                .with_context(|| format!("Unknown control '{}'", token))
        })
        .collect()
}

fn trace(config: GameConfig, held: ControlSet, frames: u64) -> Vec<TraceFrame> {
    let mut frame_loop = FrameLoop::new(ManualClock::new());
    let step = frame_loop.config().tick_duration().as_secs_f64();
    let mut world = WorldState::new(config, SceneHandles::default());
    let mut input = HeldInput { held };
    let mut counter = DrawCounter::default();

    let mut out = Vec::with_capacity(frames as usize);
    for frame in 0..frames {
        let commands = frame_loop.frame(&mut world, &mut input, &mut counter);
        out.push(TraceFrame { frame, commands });
        frame_loop.clock_mut().advance(step);
    }

    tracing::info!(
        "Traced {} frames, {} draws, race phase {:?}",
        frame_loop.frames(),
        counter.draws,
        world.race().phase()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostkart_core::{KeyBindings, RenderCommand};

    #[test]
    fn test_resolve_input_accepts_names_and_keys() {
        let keys = KeyBindings::default();
        let held = resolve_input("accelerate+A", &keys).unwrap();
        assert!(held.held(Control::Accelerate));
        assert!(held.held(Control::TurnLeft));
        assert!(resolve_input("idle", &keys).unwrap().is_empty());
        assert!(resolve_input("accelerate+boost", &keys).is_err());
    }

    #[test]
    fn test_trace_frames() {
        let held = resolve_input("accelerate", &KeyBindings::default()).unwrap();
        let frames = trace(GameConfig::default(), held, 3);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].frame, 2);
        assert_eq!(
            frames[0].commands.commands().first(),
            Some(&RenderCommand::BeginFrame)
        );

        let json = serde_json::to_value(&frames).unwrap();
        assert_eq!(json[0]["commands"][0]["op"], "begin_frame");
    }
}
