//! Validate a replay script without running it

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ghostkart_core::replay::{Compiler, ReplayScript};

#[derive(Args)]
pub struct ValidateArgs {
    /// Script file (TOML)
    pub script: PathBuf,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    println!("Validating script: {}", args.script.display());

    let script = ReplayScript::from_file(&args.script)
        .with_context(|| format!("Failed to parse script: {}", args.script.display()))?;

    let config = crate::config::load_checked();
    let compiled = Compiler::new(&config.keys)
        .compile(&script)
        .context("Failed to compile script")?;

    println!();
    println!("=== Script Valid ===");
    println!("Tick rate: {}", compiled.tick_rate);
    println!("Entries: {}", script.frames.len());
    println!(
        "Frames: {} ({:.2}s simulated)",
        compiled.frame_count,
        script.duration_secs()
    );
    println!("Snap frames: {}", compiled.snap_frames.len());
    println!("Assertions: {}", compiled.assertions.len());

    Ok(())
}
