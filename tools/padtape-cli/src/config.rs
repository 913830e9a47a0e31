//! Show or write the configuration file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use padtape_core::config::{self, CONFIG_FILE, Config};

use crate::common::load_config;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config file to read (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective configuration back to disk
    #[arg(long)]
    pub write: bool,

    /// Destination for --write (defaults to the platform config directory)
    #[arg(short, long, requires = "write")]
    pub output: Option<PathBuf>,
}

/// Execute the config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match config::config_dir() {
        Some(dir) => println!("# Platform config: {}", dir.join(CONFIG_FILE).display()),
        None => println!("# Platform config: unavailable (no home directory)"),
    }
    print!("{}", render(&config)?);

    if args.write {
        match &args.output {
            Some(path) => {
                config::save_to(&config, path)
                    .with_context(|| format!("Failed to write config: {}", path.display()))?;
                println!();
                println!("Config written to: {}", path.display());
            }
            None => {
                config::save(&config).context("Failed to write config")?;
                println!();
                println!("Config written to the platform config directory");
            }
        }
    }

    Ok(())
}

fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}
