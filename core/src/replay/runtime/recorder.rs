//! Input recorder
//!
//! Watches controller state frame by frame and logs press/release edges for
//! later replay.

use std::path::Path;

use crate::replay::text;
use crate::replay::types::{ControllerState, Edge, RecordingMode, RecordingSession};

/// Recorder state
///
/// Only transitions are logged, so memory grows with the number of button
/// changes, not with the number of frames.
#[derive(Debug, Default)]
pub struct Recorder {
    mode: RecordingMode,
    edges: Vec<Edge>,
    previous: ControllerState,
    start_frame: Option<u64>,
    recording: bool,
    sessions: u32,
}

impl Recorder {
    /// Create a new recorder
    pub fn new(mode: RecordingMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Start (or resume) recording
    ///
    /// The comparison baseline is reset to all-released, so buttons already
    /// held are logged as presses on the first observed frame.
    pub fn start(&mut self) {
        if self.recording {
            return;
        }
        self.recording = true;
        self.previous = ControllerState::new();
        self.sessions += 1;
        tracing::info!(session = self.sessions, mode = ?self.mode, "recording started");
    }

    /// Stop recording; the log is kept
    pub fn stop(&mut self) {
        if !self.recording {
            return;
        }
        self.recording = false;
        tracing::info!(
            session = self.sessions,
            edges = self.edges.len(),
            "recording stopped"
        );
    }

    /// Check if recording is active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Observe the controller for one frame
    pub fn on_frame(&mut self, frame: u64, observed: &ControllerState) {
        if !self.recording {
            return;
        }
        self.start_frame.get_or_insert(frame);

        for (button, action) in observed.transitions_from(&self.previous) {
            self.edges.push(Edge {
                frame,
                button,
                action,
            });
        }
        self.previous = *observed;
    }

    /// Recorded edges across all sessions, in chronological order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    /// Snapshot of the log and its context
    pub fn session(&self) -> RecordingSession {
        RecordingSession {
            edges: self.edges.clone(),
            start_frame: self.start_frame.unwrap_or(0),
            mode: self.mode,
        }
    }

    /// Serialize the log in the text format
    pub fn to_text(&self) -> String {
        text::serialize_lines(&self.edges)
    }

    /// Write the log to `path`
    ///
    /// The file is written next to its destination and renamed into place,
    /// so readers never see a partial log. The in-memory log is not cleared.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        std::fs::write(&tmp, self.to_text())?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err);
        }
        tracing::info!(path = %path.display(), edges = self.edges.len(), "recording saved");
        Ok(())
    }
}
