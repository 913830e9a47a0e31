//! Validate an input script without running it

use anyhow::{Result, bail};
use clap::Args;
use std::collections::BTreeMap;

use padtape_core::replay::{Button, Edge, text};

use crate::common::InputArgs;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs) -> Result<()> {
    if args.input.is_empty() {
        bail!("Nothing to validate: pass --input or --input-file");
    }
    let edges = args.input.load()?;

    println!("=== Input Valid ===");
    println!("Edges: {}", edges.len());
    if let (Some(first), Some(last)) = (
        edges.iter().map(|e| e.frame).min(),
        edges.iter().map(|e| e.frame).max(),
    ) {
        println!("Frames: {}..={}", first, last);
    }

    let counts = per_button(&edges);
    if !counts.is_empty() {
        println!();
        println!("{:<10} {:>7} {:>8}", "Button", "Presses", "Releases");
        for (button, (presses, releases)) in &counts {
            println!("{:<10} {:>7} {:>8}", button.name(), presses, releases);
        }
    }

    println!();
    println!("Canonical: {}", text::serialize(&edges));
    Ok(())
}

/// Press and release counts per button, in pad bit order
fn per_button(edges: &[Edge]) -> BTreeMap<Button, (usize, usize)> {
    let mut counts = BTreeMap::new();
    for edge in edges {
        let entry = counts.entry(edge.button).or_insert((0, 0));
        if edge.action.is_press() {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_button_counts() {
        let edges = text::parse("1:x,2:x:release,3:cross,4:start").unwrap();
        let counts = per_button(&edges);
        assert_eq!(counts[&Button::Cross], (2, 1));
        assert_eq!(counts[&Button::Start], (1, 0));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_validate_requires_input() {
        let args = ValidateArgs {
            input: InputArgs::default(),
        };
        assert!(execute(args).is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.txt");
        std::fs::write(&path, "# boot\n100:start\n150:start:release\n").unwrap();

        let args = ValidateArgs {
            input: InputArgs {
                input: None,
                input_file: Some(path),
            },
        };
        assert!(execute(args).is_ok());
    }
}
