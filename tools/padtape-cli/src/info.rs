//! Summarize a snapshot

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use padtape_core::memory::MemorySnapshot;

use crate::common::{LayoutArgs, load_snapshot};

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Snapshot file
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute the info command
pub fn execute(args: InfoArgs) -> Result<()> {
    let layout = args.layout.resolve()?;
    let snapshot = load_snapshot(&args.snapshot, layout)?;
    println!("Snapshot: {}", args.snapshot.display());
    print!("{}", render(&snapshot));
    Ok(())
}

fn render(snapshot: &MemorySnapshot) -> String {
    let layout = snapshot.layout();
    let frame = snapshot
        .frame()
        .map_or_else(|| "unknown".to_string(), |f| f.to_string());
    let non_zero = snapshot.non_zero_bytes();
    let percent = if snapshot.is_empty() {
        0.0
    } else {
        non_zero as f64 * 100.0 / snapshot.len() as f64
    };

    format!(
        "Frame: {}\nSize: {} bytes (0x{:08X}..0x{:08X})\nNon-zero: {} ({:.1}%)\nChecksum: {:016x}\n",
        frame,
        snapshot.len(),
        layout.base,
        layout.address_of(snapshot.len()),
        non_zero,
        percent,
        snapshot.checksum()
    )
}
