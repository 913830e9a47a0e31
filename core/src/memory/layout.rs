//! Address space description

use serde::{Deserialize, Serialize};

use super::snapshot::SnapshotError;

/// Base of main RAM in the cached segment
pub const DEFAULT_RAM_BASE: u32 = 0x8000_0000;

/// 2 MiB of main RAM
pub const DEFAULT_RAM_SIZE: usize = 2 * 1024 * 1024;

/// Where RAM lives and how big it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLayout {
    /// Absolute address of offset 0
    #[serde(default = "default_base")]
    pub base: u32,
    /// Exact snapshot length in bytes
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_base() -> u32 {
    DEFAULT_RAM_BASE
}
fn default_size() -> usize {
    DEFAULT_RAM_SIZE
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            base: DEFAULT_RAM_BASE,
            size: DEFAULT_RAM_SIZE,
        }
    }
}

impl MemoryLayout {
    pub fn new(base: u32, size: usize) -> Self {
        Self { base, size }
    }

    /// Translate an absolute address range to a buffer offset
    pub fn offset_of(&self, address: u32, len: usize) -> Result<usize, SnapshotError> {
        let out_of_range = || SnapshotError::AddressOutOfRange {
            address,
            len,
            base: self.base,
            size: self.size,
        };
        let offset = address.checked_sub(self.base).ok_or_else(out_of_range)? as usize;
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(offset),
            _ => Err(out_of_range()),
        }
    }

    /// Absolute address of a buffer offset
    pub fn address_of(&self, offset: usize) -> u32 {
        self.base.wrapping_add(offset as u32)
    }
}
