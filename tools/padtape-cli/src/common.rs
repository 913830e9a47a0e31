//! Shared argument handling

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use padtape_core::config::{self, Config};
use padtape_core::memory::MemorySnapshot;
use padtape_core::replay::{Edge, text};
use padtape_core::MemoryLayout;

/// Memory layout overrides for commands that load snapshots
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// RAM base address (hex), overrides [memory] base
    #[arg(long, value_parser = parse_address)]
    pub base: Option<u32>,

    /// RAM size in bytes, overrides [memory] size
    #[arg(long)]
    pub ram_size: Option<usize>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl LayoutArgs {
    pub fn resolve(&self) -> Result<MemoryLayout> {
        let config = load_config(self.config.as_deref())?;
        Ok(MemoryLayout {
            base: self.base.unwrap_or(config.memory.base),
            size: self.ram_size.unwrap_or(config.memory.size),
        })
    }
}

/// Where an input script comes from
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct InputArgs {
    /// Inline input script, e.g. "100:start,150:start:release"
    #[arg(long)]
    pub input: Option<String>,

    /// Input script file (one entry per line, '#' comments allowed)
    #[arg(long)]
    pub input_file: Option<PathBuf>,
}

impl InputArgs {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.input_file.is_none()
    }

    /// Parse whichever source was given; no source means no edges
    pub fn load(&self) -> Result<Vec<Edge>> {
        if let Some(inline) = &self.input {
            return text::parse(inline).context("Invalid --input");
        }
        if let Some(path) = &self.input_file {
            return text::load_file(path)
                .with_context(|| format!("Invalid input file: {}", path.display()));
        }
        Ok(Vec::new())
    }
}

/// Load an explicit config file, or the user config with defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(config::load()),
    }
}

pub fn load_snapshot(path: &Path, layout: MemoryLayout) -> Result<MemorySnapshot> {
    MemorySnapshot::load(path, layout)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))
}

/// Parse a hex address with or without a `0x` prefix
pub fn parse_address(s: &str) -> Result<u32, String> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex address '{}'", s))
}
