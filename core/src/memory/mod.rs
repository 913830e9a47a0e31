//! RAM snapshots
//!
//! - **Capture**: raw, header-less images of main RAM written at chosen frames
//! - **Diff**: coalesced changed ranges between two images
//! - **Inspect**: typed point reads and hex dumps
//! - **Watches**: named addresses read from a watch file

mod diff;
mod inspect;
mod layout;
mod snapshot;
mod watch;

pub use diff::{ByteChange, DiffRange, DiffResult, diff};
pub use inspect::{TypedValue, hex_dump, read_at};
pub use layout::{DEFAULT_RAM_BASE, DEFAULT_RAM_SIZE, MemoryLayout};
pub use snapshot::{MemorySnapshot, SnapshotCapture, SnapshotError, snapshot_file_name};
pub use watch::{Watch, WatchError, WatchReading, load_watches, parse_watches};
