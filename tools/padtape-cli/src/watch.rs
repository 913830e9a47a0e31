//! Evaluate a watch file against a snapshot

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;

use padtape_core::memory::{MemorySnapshot, Watch, load_watches};

use crate::common::{LayoutArgs, load_snapshot};
use crate::presets::Preset;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Snapshot file
    pub snapshot: PathBuf,

    /// Watch definitions, one `name, 0xADDRESS, size` per line
    #[arg(short, long, required_unless_present = "preset", conflicts_with = "preset")]
    pub watch_file: Option<PathBuf>,

    /// Built-in watch list for a known game
    #[arg(short, long, value_enum)]
    pub preset: Option<Preset>,

    /// Print readings as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute the watch command
pub fn execute(args: WatchArgs) -> Result<()> {
    let layout = args.layout.resolve()?;
    let watches = match (&args.watch_file, args.preset) {
        (Some(path), _) => load_watches(path)
            .with_context(|| format!("Invalid watch file: {}", path.display()))?,
        (None, Some(preset)) => preset.watches()?,
        (None, None) => bail!("Pass --watch-file or --preset"),
    };
    let snapshot = load_snapshot(&args.snapshot, layout)?;

    if args.json {
        let readings = watches
            .iter()
            .map(|watch| watch.evaluate(&snapshot))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&readings)?);
    } else {
        print!("{}", render(&watches, &snapshot));
    }
    Ok(())
}

/// One line per watch; unreadable watches are reported inline
fn render(watches: &[Watch], snapshot: &MemorySnapshot) -> String {
    let width = watches.iter().map(|w| w.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for watch in watches {
        let line = match watch.evaluate(snapshot) {
            Ok(reading) => format!(
                "{:<width$}  0x{:08X}  {:>12}  {}",
                reading.name,
                watch.address,
                reading.value.unsigned,
                reading.value.hex(),
            ),
            Err(err) => format!("{:<width$}  0x{:08X}  error: {}", watch.name, watch.address, err),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
