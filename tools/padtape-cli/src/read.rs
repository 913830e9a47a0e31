//! Read a value or hex dump from a snapshot

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use padtape_core::memory::{MemorySnapshot, hex_dump, read_at};

use crate::common::{LayoutArgs, load_snapshot, parse_address};

/// Arguments for the read command
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Snapshot file
    pub snapshot: PathBuf,

    /// Absolute address (hex, e.g. 0x80068F58)
    #[arg(short, long, value_parser = parse_address)]
    pub address: u32,

    /// Value width in bytes (1, 2 or 4)
    #[arg(short, long, default_value = "4", value_parser = parse_size)]
    pub size: usize,

    /// Print a hex dump starting at the address instead
    #[arg(long)]
    pub hex: bool,

    /// Bytes to include in the hex dump
    #[arg(long, default_value = "64")]
    pub hex_length: usize,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

fn parse_size(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n @ (1 | 2 | 4)) => Ok(n),
        _ => Err(format!("size must be 1, 2 or 4 (got '{}')", s)),
    }
}

/// Execute the read command
pub fn execute(args: ReadArgs) -> Result<()> {
    let layout = args.layout.resolve()?;
    let snapshot = load_snapshot(&args.snapshot, layout)?;
    print!("{}", render(&snapshot, &args)?);
    Ok(())
}

fn render(snapshot: &MemorySnapshot, args: &ReadArgs) -> Result<String> {
    if args.hex {
        return hex_dump(snapshot, args.address, args.hex_length)
            .with_context(|| format!("Cannot dump 0x{:08X}", args.address));
    }

    let value = read_at(snapshot, args.address, args.size)
        .with_context(|| format!("Cannot read 0x{:08X}", args.address))?;
    let bytes = value
        .bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    Ok(format!(
        "0x{:08X}: {} (unsigned {}, signed {}) [{}]\n",
        value.address,
        value.hex(),
        value.unsigned,
        value.signed,
        bytes
    ))
}
