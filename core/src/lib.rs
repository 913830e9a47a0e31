//! Padtape Core - frame-accurate input replay and RAM snapshots
//!
//! This crate drives an emulator frame by frame with scripted or recorded
//! controller input and captures main RAM for offline analysis.
//!
//! # Architecture
//!
//! - [`replay`] - Button model, input text format, schedule, injector, recorder
//! - [`memory`] - Snapshot capture, differ, point reads and watch files
//! - [`console`] - [`FrameHost`] seam to the emulator and a reference host
//! - [`config`] - User configuration (`config.toml`)

pub mod config;
pub mod console;
pub mod memory;
pub mod replay;

pub use config::Config;
pub use console::{FrameHost, ScratchConsole};

// Re-export memory types
pub use memory::{DiffRange, DiffResult, MemoryLayout, MemorySnapshot, SnapshotError, diff};

// Re-export replay types
pub use replay::{
    Button, ControllerState, Edge, EdgeAction, HeadlessConfig, HeadlessRunner, ParseError,
    RecordingMode, RunError, RunReport,
};
