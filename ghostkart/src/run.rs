//! Execute a replay script and generate a report

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ghostkart_core::replay::{
    DEBUG_VARIABLES, HeadlessConfig, HeadlessRunner, RaceSummary, ReplayReport, WorldBackend,
};
use ghostkart_core::{GameConfig, SceneHandles, WorldState};

#[derive(Args)]
pub struct RunArgs {
    /// Script file (TOML)
    pub script: PathBuf,

    /// Output report file (JSON)
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Maximum execution time in seconds
    #[arg(long, default_value = "300")]
    pub timeout: u64,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = crate::config::load_checked();
    let report = run_script(&args, config)?;

    println!("=== {} ===", report.outcome.verdict);
    println!(
        "Frames: {}/{} ({:.2}s simulated)",
        report.frames_run,
        report.frames_total,
        report.simulated_secs()
    );
    if let Some(race) = &report.race {
        print_race(race);
    }
    println!("Snapshots: {}", report.outcome.snapshots);
    println!(
        "Assertions: {} passed, {} failed",
        report.outcome.passed, report.outcome.failed
    );
    for failure in report.assertions.iter().filter(|a| !a.passed) {
        println!(
            "  frame {}: {} (actual {}, expected {})",
            failure.frame,
            failure.condition,
            failure
                .actual
                .map_or_else(|| "undefined".to_string(), |v| v.to_string()),
            failure.expected.as_deref().unwrap_or("?")
        );
    }

    if let Some(report_path) = &args.report {
        std::fs::write(report_path, report.to_json()?)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        println!("Report written to: {}", report_path.display());
    }

    if let Some(reason) = &report.outcome.aborted {
        anyhow::bail!("Script stopped early: {}", reason);
    }
    if !report.passed() {
        anyhow::bail!("{} assertion(s) failed", report.outcome.failed);
    }
    Ok(())
}

fn print_race(race: &RaceSummary) {
    println!(
        "Race: {:?}, leader {}, player at {:.2} u/s",
        race.phase,
        race.leader.label(),
        race.player_speed
    );
    if let Some(time) = race.finish_time {
        println!("Finished in {:.2}s", time);
    } else if race.ghosts_moving {
        println!("Ghosts still running after {:.2}s", race.elapsed);
    }
}

fn run_script(args: &RunArgs, config: GameConfig) -> Result<ReplayReport> {
    let headless = HeadlessConfig {
        fail_fast: args.fail_fast,
        timeout_secs: args.timeout,
        script_path: None,
    };
    let mut runner = HeadlessRunner::from_file(&args.script, &config.keys, headless)?;
    runner.register_debug_variables(DEBUG_VARIABLES);

    tracing::info!(
        "Executing {} ({} frames)",
        args.script.display(),
        runner.frame_count()
    );

    let world = WorldState::new(config, SceneHandles::default());
    let mut backend = WorldBackend::new(world, runner.frame_delta());
    runner.execute_with_backend(&mut backend)
}
