//! Run command - frame loop with scripted input
//!
//! Resolves settings (flags over config file over defaults), replays the
//! input script against the reference console and optionally writes RAM
//! snapshots, a recording and a JSON report.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use padtape_core::config::Config;
use padtape_core::replay::{HeadlessConfig, HeadlessRunner, RecordingMode, RunReport};
use padtape_core::ScratchConsole;

use crate::common::{InputArgs, load_config};

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of frames to run (default from [run] frames)
    #[arg(short, long)]
    pub frames: Option<u64>,

    #[command(flatten)]
    pub input: InputArgs,

    /// Snapshot output directory (default from [paths] snapshot_dir)
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Snapshot every N frames, 0 to disable
    #[arg(long)]
    pub snapshot_interval: Option<u64>,

    /// Extra frames to snapshot, comma separated
    #[arg(long, value_delimiter = ',')]
    pub snapshot_at: Vec<u64>,

    /// Recording mode: basic, snapshots or full
    #[arg(short, long)]
    pub mode: Option<RecordingMode>,

    /// Record the controller and save the log to this file
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// BIOS image for the console
    #[arg(long)]
    pub bios: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let edges = args.input.load()?;
    let headless = resolve(&args, &config);
    tracing::debug!(?headless, "resolved run settings");

    println!("Running {} frames ({:?})", headless.total_frames, headless.mode);
    println!("  Edges: {}", edges.len());
    if let Some(dir) = &headless.snapshot_dir {
        println!("  Snapshots: {}", dir.display());
    }

    let mut host = match &args.bios {
        Some(path) => ScratchConsole::with_bios(headless.layout, path)?,
        None => ScratchConsole::new(headless.layout),
    };
    if let Some(checksum) = host.bios_checksum() {
        println!("  BIOS: {:016x}", checksum);
    }

    let mut runner = HeadlessRunner::new(edges, headless)?;
    let report = runner.run(&mut host)?;

    print_summary(&report);

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        println!();
        println!("Report written to: {}", path.display());
    }

    Ok(())
}

/// Merge flags over the loaded config
fn resolve(args: &RunArgs, config: &Config) -> HeadlessConfig {
    let snapshot_interval = args
        .snapshot_interval
        .unwrap_or(config.run.snapshot_interval);

    // Snapshot flags imply a snapshot mode unless one was chosen. Config
    // values alone never switch the mode.
    let wants_snapshots = args.snapshot_dir.is_some()
        || !args.snapshot_at.is_empty()
        || args.snapshot_interval.is_some_and(|n| n > 0);
    let mode = match args.mode {
        Some(mode) => mode,
        None if wants_snapshots && !config.run.mode.captures_snapshots() => {
            RecordingMode::WithSnapshots
        }
        None => config.run.mode,
    };

    let snapshot_dir = mode.captures_snapshots().then(|| {
        args.snapshot_dir
            .clone()
            .unwrap_or_else(|| config.paths.snapshot_dir.clone())
    });

    HeadlessConfig {
        total_frames: args.frames.unwrap_or(config.run.frames),
        mode,
        layout: config.memory,
        snapshot_dir,
        snapshot_interval,
        snapshot_frames: args.snapshot_at.iter().copied().collect(),
        record_path: args.record.clone(),
    }
}

fn print_summary(report: &RunReport) {
    println!();
    println!("=== Run Complete ===");
    println!("Frames: {}/{}", report.frames_run, report.total_frames);
    println!("Edges delivered: {}", report.edges_delivered);
    if report.edges_missed > 0 {
        println!("Edges missed: {}", report.edges_missed);
    }
    if report.edges_undelivered > 0 {
        println!(
            "Edges past the last frame: {} (not fired)",
            report.edges_undelivered
        );
    }
    if !report.snapshots.is_empty() {
        println!("Snapshots: {}", report.snapshots.len());
        for snapshot in &report.snapshots {
            println!(
                "  frame {:>8}  {}  {}",
                snapshot.frame, snapshot.checksum, snapshot.path
            );
        }
    }
    if report.screenshots > 0 {
        println!("Screenshots: {}", report.screenshots);
    }
    if let Some(recording) = &report.recording {
        println!("Recording: {} ({} edges)", recording.path, recording.edges);
    }
    println!("Duration: {} ms", report.duration_ms);
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
