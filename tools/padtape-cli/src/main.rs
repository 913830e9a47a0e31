//! Padtape CLI - scripted input replay and RAM snapshot analysis
//!
//! # Commands
//!
//! - `padtape run` - Drive the emulator with an input script, capturing snapshots
//! - `padtape validate` - Parse an input script without running it
//! - `padtape diff` - Compare two RAM snapshots
//! - `padtape read` - Read a value (or hex dump) from a snapshot
//! - `padtape watch` - Evaluate a watch file against a snapshot
//! - `padtape info` - Summarize a snapshot
//! - `padtape config` - Show or write the configuration file
//!
//! # Usage
//!
//! ```bash
//! # Hold start for 50 frames, snapshot every 300 frames
//! padtape run --frames 600 --input "100:start,150:start:release" \
//!     --mode snapshots --snapshot-interval 300 --snapshot-dir out
//!
//! # What changed between two snapshots
//! padtape diff out/ram_00000300.bin out/ram_00000600.bin
//!
//! # Read a 16-bit value
//! padtape read out/ram_00000600.bin --address 0x80068F5C --size 2
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `info`).

mod common;
mod config;
mod diff;
mod info;
mod presets;
mod read;
mod run;
mod validate;
mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Padtape CLI - scripted input replay and RAM snapshot analysis
#[derive(Parser)]
#[command(name = "padtape")]
#[command(about = "Frame-accurate input replay and RAM snapshot analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the frame loop with scripted input
    Run(run::RunArgs),

    /// Parse an input script and summarize it
    Validate(validate::ValidateArgs),

    /// Compare two RAM snapshots
    Diff(diff::DiffArgs),

    /// Read a value or hex dump from a snapshot
    Read(read::ReadArgs),

    /// Evaluate a watch file against a snapshot
    Watch(watch::WatchArgs),

    /// Show snapshot size, non-zero bytes and checksum
    Info(info::InfoArgs),

    /// Show the effective configuration, optionally writing it to disk
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run::execute(args),
        Commands::Validate(args) => validate::execute(args),
        Commands::Diff(args) => diff::execute(args),
        Commands::Read(args) => read::execute(args),
        Commands::Watch(args) => watch::execute(args),
        Commands::Info(args) => info::execute(args),
        Commands::Config(args) => config::execute(args),
    }
}
