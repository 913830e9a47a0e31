//! Compare two RAM snapshots

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use padtape_core::memory::{DiffResult, diff};

use crate::common::{LayoutArgs, load_snapshot};

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Earlier snapshot
    pub before: PathBuf,

    /// Later snapshot
    pub after: PathBuf,

    /// Maximum number of changed bytes to list
    #[arg(short, long, default_value = "100")]
    pub limit: usize,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute the diff command
pub fn execute(args: DiffArgs) -> Result<()> {
    let layout = args.layout.resolve()?;
    let before = load_snapshot(&args.before, layout)?;
    let after = load_snapshot(&args.after, layout)?;

    let result = diff(&before, &after).with_context(|| {
        format!(
            "Cannot compare {} and {}",
            args.before.display(),
            args.after.display()
        )
    })?;

    print!("{}", render(&result, args.limit));
    Ok(())
}

/// Range summary followed by a per-byte table
fn render(result: &DiffResult, limit: usize) -> String {
    let mut out = String::new();
    if result.is_empty() {
        out.push_str("Snapshots are identical\n");
        return out;
    }

    out.push_str(&format!(
        "{} changed range(s), {} byte(s)\n\n",
        result.len(),
        result.changed_bytes()
    ));
    for range in result.ranges() {
        out.push_str(&format!("0x{:08X}  {:>5} byte(s)", range.address, range.len()));
        if let (Some(old), Some(new), Some(delta)) =
            (range.old_value(), range.new_value(), range.delta())
        {
            out.push_str(&format!("  {} -> {} ({:+})", old, new, delta));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{:<12} {:>6} {:>6} {:>6}\n",
        "Address", "Before", "After", "Delta"
    ));
    for change in result.byte_changes().take(limit) {
        out.push_str(&format!(
            "0x{:08X}   0x{:02X}   0x{:02X} {:>+6}\n",
            change.address,
            change.before,
            change.after,
            change.delta()
        ));
    }
    if result.changed_bytes() > limit {
        out.push_str(&format!(
            "... {} more (raise --limit to see them)\n",
            result.changed_bytes() - limit
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use padtape_core::memory::MemorySnapshot;
    use padtape_core::MemoryLayout;

    fn result(changed: &[(usize, u8)]) -> DiffResult {
        let layout = MemoryLayout::new(0x8000_0000, 32);
        let mut before = vec![3u8; 32];
        let after = before.clone();
        for &(offset, value) in changed {
            before[offset] = value;
        }
        let a = MemorySnapshot::from_bytes(None, before, layout).unwrap();
        let b = MemorySnapshot::from_bytes(None, after, layout).unwrap();
        diff(&a, &b).unwrap()
    }

    #[test]
    fn test_render_identical() {
        assert_eq!(render(&result(&[]), 100), "Snapshots are identical\n");
    }

    #[test]
    fn test_render_single_byte() {
        let out = render(&result(&[(4, 2)]), 100);
        assert!(out.starts_with("1 changed range(s), 1 byte(s)"));
        assert!(out.contains("0x80000004      1 byte(s)  2 -> 3 (+1)"));
        assert!(out.contains("0x80000004   0x02   0x03     +1"));
    }

    #[test]
    fn test_render_respects_limit() {
        let out = render(&result(&[(1, 0), (2, 0), (3, 0), (10, 0)]), 2);
        assert!(out.contains("... 2 more"));
        assert_eq!(out.lines().filter(|l| l.contains("   0x00   0x03")).count(), 2);
    }
}
