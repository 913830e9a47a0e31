//! Run report types and serialization

use serde::{Deserialize, Serialize};

use crate::replay::types::RecordingMode;

/// Summary of a headless run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report format version
    #[serde(default = "default_version")]
    pub version: String,
    pub mode: RecordingMode,
    /// Frame budget
    pub total_frames: u64,
    /// Frames actually run
    pub frames_run: u64,
    /// Edges applied to the controller
    pub edges_delivered: u64,
    /// Edges dropped because their frame was skipped
    pub edges_missed: u64,
    /// Edges still pending at the end (scheduled beyond the budget)
    pub edges_undelivered: u64,
    /// Recording written by this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording: Option<RecordingInfo>,
    pub snapshots: Vec<SnapshotRecord>,
    pub screenshots: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// A snapshot written during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub frame: u64,
    pub path: String,
    /// xxh3-64 of the image, hex
    pub checksum: String,
}

/// Where the recording went and how much it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingInfo {
    pub path: String,
    pub edges: usize,
    pub start_frame: u64,
}

impl RunReport {
    pub(super) fn new(mode: RecordingMode, total_frames: u64) -> Self {
        Self {
            version: default_version(),
            mode,
            total_frames,
            frames_run: 0,
            edges_delivered: 0,
            edges_missed: 0,
            edges_undelivered: 0,
            recording: None,
            snapshots: Vec::new(),
            screenshots: 0,
            duration_ms: 0,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
