//! Show or reset the configuration

use anyhow::{Context, Result};
use clap::Args;

use ghostkart_core::config::{self, GameConfig, validate_keybindings};

#[derive(Args)]
pub struct ConfigArgs {
    /// Overwrite the config file with the defaults before printing
    #[arg(long)]
    pub write_default: bool,
}

/// Load the user config, logging key binding conflicts
pub fn load_checked() -> GameConfig {
    let config = config::load();
    for warning in validate_keybindings(&config) {
        tracing::warn!("{}", warning);
    }
    config
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    if args.write_default {
        let path = config::save(&GameConfig::default()).context("Failed to write default config")?;
        println!("Wrote default config to {}", path.display());
    }

    match config::config_path() {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not found, using defaults)", path.display()),
        None => println!("# no config directory available, using defaults"),
    }

    let config = load_checked();
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
