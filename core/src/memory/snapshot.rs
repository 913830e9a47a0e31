//! Snapshot capture and loading
//!
//! Snapshot files are raw RAM images with no header. The frame number is
//! carried in the file name, zero-padded so lexical and numeric order agree.

use std::io;
use std::path::{Path, PathBuf};

use xxhash_rust::xxh3::xxh3_64;

use super::layout::MemoryLayout;

/// Snapshot errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Two snapshots of different lengths were compared
    #[error("snapshot size mismatch: {left} bytes vs {right} bytes")]
    SizeMismatch { left: usize, right: usize },
    /// Image length differs from the configured RAM size
    #[error("invalid snapshot length {actual} (expected {expected})")]
    InvalidLength { expected: usize, actual: usize },
    /// Read outside RAM
    #[error("address 0x{address:08X} (+{len}) outside RAM at 0x{base:08X} (0x{size:X} bytes)")]
    AddressOutOfRange {
        address: u32,
        len: usize,
        base: u32,
        size: usize,
    },
    /// Typed reads support 1, 2 and 4 byte values
    #[error("unsupported read size {0} (expected 1, 2 or 4)")]
    UnsupportedSize(usize),
    #[error("snapshot I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File name for a snapshot taken at `frame`
pub fn snapshot_file_name(frame: u64) -> String {
    format!("ram_{:08}.bin", frame)
}

/// Recover the frame number from a snapshot file name
fn frame_from_path(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix("ram_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Immutable RAM image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySnapshot {
    frame: Option<u64>,
    bytes: Box<[u8]>,
    path: Option<PathBuf>,
    layout: MemoryLayout,
}

impl MemorySnapshot {
    /// Wrap an in-memory image; the length must match the layout
    pub fn from_bytes(
        frame: Option<u64>,
        bytes: impl Into<Box<[u8]>>,
        layout: MemoryLayout,
    ) -> Result<Self, SnapshotError> {
        let bytes = bytes.into();
        if bytes.len() != layout.size {
            return Err(SnapshotError::InvalidLength {
                expected: layout.size,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            frame,
            bytes,
            path: None,
            layout,
        })
    }

    /// Load a snapshot file, rejecting any length other than the layout's
    pub fn load(path: &Path, layout: MemoryLayout) -> Result<Self, SnapshotError> {
        let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut snapshot = Self::from_bytes(frame_from_path(path), bytes, layout)?;
        snapshot.path = Some(path.to_path_buf());
        Ok(snapshot)
    }

    /// Frame the image was captured at, if known
    pub fn frame(&self) -> Option<u64> {
        self.frame
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// xxh3-64 of the image
    pub fn checksum(&self) -> u64 {
        xxh3_64(&self.bytes)
    }

    pub fn non_zero_bytes(&self) -> usize {
        self.bytes.iter().filter(|&&b| b != 0).count()
    }
}

/// Writes RAM images at an interval or on request
#[derive(Debug, Clone)]
pub struct SnapshotCapture {
    dir: PathBuf,
    layout: MemoryLayout,
    /// Capture every N frames (0 = only on request)
    interval: u64,
    requested: bool,
}

impl SnapshotCapture {
    pub fn new(dir: impl Into<PathBuf>, layout: MemoryLayout, interval: u64) -> Self {
        Self {
            dir: dir.into(),
            layout,
            interval,
            requested: false,
        }
    }

    /// Create the output directory
    pub fn prepare(&self) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SnapshotError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Capture on the next due check regardless of the interval
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Check if a snapshot should be taken at `frame`
    pub fn is_due(&self, frame: u64) -> bool {
        if self.requested {
            return true;
        }
        self.interval > 0 && frame > 0 && frame.is_multiple_of(self.interval)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Destination path for a snapshot at `frame`
    pub fn path_for(&self, frame: u64) -> PathBuf {
        self.dir.join(snapshot_file_name(frame))
    }

    /// Copy `ram` into a new snapshot and write it to disk
    pub fn capture(&mut self, frame: u64, ram: &[u8]) -> Result<MemorySnapshot, SnapshotError> {
        let mut snapshot = MemorySnapshot::from_bytes(Some(frame), ram.to_vec(), self.layout)?;
        let path = self.path_for(frame);
        std::fs::write(&path, snapshot.bytes()).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        self.requested = false;

        tracing::info!(frame, path = %path.display(), "snapshot written");
        snapshot.path = Some(path);
        Ok(snapshot)
    }
}
