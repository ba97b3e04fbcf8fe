//! Ghostkart CLI - headless tools for the ghost kart demo
//!
//! # Commands
//!
//! - `ghostkart run` - Execute a replay script and report assertion results
//! - `ghostkart validate` - Parse and compile a replay script without running it
//! - `ghostkart trace` - Dump per-frame render command lists as JSON
//! - `ghostkart config` - Print the effective configuration
//! - `ghostkart assets` - Load every asset in the manifest
//!
//! # Usage
//!
//! ```bash
//! # Run a regression script, failing the process on any failed assertion
//! ghostkart run tests/launch.toml --report report.json
//!
//! # Two seconds of full throttle
//! ghostkart trace --frames 120 --input accelerate --output trace.json
//! ```

mod assets;
mod config;
mod run;
mod trace;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Ghostkart CLI - headless tools for the ghost kart demo
#[derive(Parser)]
#[command(name = "ghostkart")]
#[command(about = "Headless tools for the ghost kart racing demo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a replay script and generate a report
    Run(run::RunArgs),

    /// Validate a replay script without running it
    Validate(validate::ValidateArgs),

    /// Run the world with a fixed input and dump the render commands
    Trace(trace::TraceArgs),

    /// Print the effective configuration and where it lives
    Config(config::ConfigArgs),

    /// Load every mesh and texture named by the asset manifest
    Assets(assets::AssetsArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Trace(args) => trace::execute(args),
        Commands::Config(args) => config::execute(args),
        Commands::Assets(args) => assets::execute(args),
    }
}
