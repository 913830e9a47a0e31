//! Memory watch files
//!
//! One watch per line: `name, 0xADDRESS, size`. Blank lines and lines
//! starting with `#` are ignored.

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

use super::inspect::{TypedValue, read_at};
use super::snapshot::{MemorySnapshot, SnapshotError};

/// Watch file errors (line numbers are 1-based)
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("line {line}: expected 'name, address, size'")]
    Malformed { line: usize },
    #[error("line {line}: invalid hex address '{token}'")]
    InvalidAddress { line: usize, token: String },
    #[error("line {line}: invalid size '{token}' (expected 1, 2 or 4)")]
    InvalidSize { line: usize, token: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A named address to read from snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Watch {
    pub name: String,
    pub address: u32,
    pub size: usize,
}

/// A watch evaluated against one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct WatchReading {
    pub name: String,
    pub value: TypedValue,
}

impl Watch {
    pub fn evaluate(&self, snapshot: &MemorySnapshot) -> Result<WatchReading, SnapshotError> {
        Ok(WatchReading {
            name: self.name.clone(),
            value: read_at(snapshot, self.address, self.size)?,
        })
    }
}

/// Parse watch definitions
pub fn parse_watches(text: &str) -> Result<Vec<Watch>, WatchError> {
    let mut watches = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let &[name, address, size] = parts.as_slice() else {
            return Err(WatchError::Malformed { line });
        };
        if name.is_empty() {
            return Err(WatchError::Malformed { line });
        }

        let hex = address
            .strip_prefix("0x")
            .or_else(|| address.strip_prefix("0X"))
            .unwrap_or(address);
        let address_value =
            u32::from_str_radix(hex, 16).map_err(|_| WatchError::InvalidAddress {
                line,
                token: address.to_string(),
            })?;

        let size_value = match size.parse::<usize>() {
            Ok(n @ (1 | 2 | 4)) => n,
            _ => {
                return Err(WatchError::InvalidSize {
                    line,
                    token: size.to_string(),
                });
            }
        };

        watches.push(Watch {
            name: name.to_string(),
            address: address_value,
            size: size_value,
        });
    }
    Ok(watches)
}

/// Read and parse a watch file
pub fn load_watches(path: &Path) -> Result<Vec<Watch>, WatchError> {
    let content = std::fs::read_to_string(path).map_err(|source| WatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_watches(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLayout;

    #[test]
    fn test_parse_watches() {
        let text = "# crash 3\nlives, 0x80068F58, 1\n\nwumpa,80068F5C,2\ncrystals , 0x80068F60 , 4\n";
        let watches = parse_watches(text).unwrap();
        assert_eq!(watches.len(), 3);
        assert_eq!(
            watches[0],
            Watch {
                name: "lives".to_string(),
                address: 0x8006_8F58,
                size: 1
            }
        );
        assert_eq!(watches[1].address, 0x8006_8F5C);
        assert_eq!(watches[2].name, "crystals");
        assert_eq!(watches[2].size, 4);
    }

    #[test]
    fn test_parse_watch_errors() {
        assert!(matches!(
            parse_watches("lives, 0x80068F58"),
            Err(WatchError::Malformed { line: 1 })
        ));
        assert!(matches!(
            parse_watches("# c\nlives, 0xZZ, 1"),
            Err(WatchError::InvalidAddress { line: 2, .. })
        ));
        assert!(matches!(
            parse_watches("lives, 0x80068F58, 3"),
            Err(WatchError::InvalidSize { line: 1, .. })
        ));
    }

    #[test]
    fn test_evaluate_watch() {
        let mut bytes = vec![0u8; 16];
        bytes[4] = 7;
        let layout = MemoryLayout::new(0x8000_0000, 16);
        let snapshot = MemorySnapshot::from_bytes(None, bytes, layout).unwrap();

        let watch = Watch {
            name: "lives".to_string(),
            address: 0x8000_0004,
            size: 1,
        };
        let reading = watch.evaluate(&snapshot).unwrap();
        assert_eq!(reading.name, "lives");
        assert_eq!(reading.value.unsigned, 7);
    }
}
