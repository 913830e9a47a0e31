//! Snapshot differ
//!
//! A linear scan over both images, grouping consecutive differing offsets
//! into maximal ranges. Addresses in the result are absolute.

use super::inspect::{decode_signed, decode_unsigned};
use super::snapshot::{MemorySnapshot, SnapshotError};

/// A maximal run of differing bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRange {
    /// Absolute address of the first differing byte
    pub address: u32,
    /// Bytes in the first snapshot
    pub old: Vec<u8>,
    /// Bytes in the second snapshot
    pub new: Vec<u8>,
}

impl DiffRange {
    pub fn len(&self) -> usize {
        self.old.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old.is_empty()
    }

    /// Old value as a little-endian unsigned integer (1, 2 or 4 bytes only)
    pub fn old_value(&self) -> Option<u64> {
        decode_unsigned(&self.old)
    }

    /// New value as a little-endian unsigned integer (1, 2 or 4 bytes only)
    pub fn new_value(&self) -> Option<u64> {
        decode_unsigned(&self.new)
    }

    /// Signed change from old to new, reading both as signed integers
    pub fn delta(&self) -> Option<i64> {
        Some(decode_signed(&self.new)? - decode_signed(&self.old)?)
    }

    /// Per-byte view of the range
    pub fn changes(&self) -> impl Iterator<Item = ByteChange> + '_ {
        self.old
            .iter()
            .zip(&self.new)
            .enumerate()
            .map(|(i, (&before, &after))| ByteChange {
                address: self.address.wrapping_add(i as u32),
                before,
                after,
            })
    }
}

/// One changed byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteChange {
    pub address: u32,
    pub before: u8,
    pub after: u8,
}

impl ByteChange {
    pub fn delta(&self) -> i16 {
        i16::from(self.after) - i16::from(self.before)
    }
}

/// Changed ranges between two snapshots, ascending by address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    ranges: Vec<DiffRange>,
}

impl DiffResult {
    pub fn ranges(&self) -> &[DiffRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Total number of differing bytes
    pub fn changed_bytes(&self) -> usize {
        self.ranges.iter().map(DiffRange::len).sum()
    }

    /// Every changed byte, ascending by address
    pub fn byte_changes(&self) -> impl Iterator<Item = ByteChange> + '_ {
        self.ranges.iter().flat_map(DiffRange::changes)
    }

    pub fn into_ranges(self) -> Vec<DiffRange> {
        self.ranges
    }
}

/// Compare two snapshots
///
/// Fails if the images differ in length. Addresses are taken from `a`'s
/// layout.
pub fn diff(a: &MemorySnapshot, b: &MemorySnapshot) -> Result<DiffResult, SnapshotError> {
    if a.len() != b.len() {
        return Err(SnapshotError::SizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let layout = a.layout();
    let (old, new) = (a.bytes(), b.bytes());
    let mut ranges = Vec::new();
    let mut run_start: Option<usize> = None;

    for offset in 0..=old.len() {
        let differs = offset < old.len() && old[offset] != new[offset];
        match (differs, run_start) {
            (true, None) => run_start = Some(offset),
            (false, Some(start)) => {
                ranges.push(DiffRange {
                    address: layout.address_of(start),
                    old: old[start..offset].to_vec(),
                    new: new[start..offset].to_vec(),
                });
                run_start = None;
            }
            _ => {}
        }
    }

    tracing::debug!(ranges = ranges.len(), "snapshot diff complete");
    Ok(DiffResult { ranges })
}
