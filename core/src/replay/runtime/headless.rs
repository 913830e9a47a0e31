//! Headless replay execution
//!
//! Drives a [`FrameHost`] for a fixed number of frames without a window,
//! wiring together the injector, recorder and snapshot capture. Every
//! component is called synchronously once per frame, in this order:
//!
//! 1. injector tick (scheduled edges applied to the controller)
//! 2. recorder observation
//! 3. host frame
//! 4. snapshot / screenshot, if due

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use crate::console::FrameHost;
use crate::memory::{MemoryLayout, SnapshotCapture, SnapshotError};
use crate::replay::types::{ControllerState, Edge, RecordingMode};

use super::injector::Injector;
use super::recorder::Recorder;
use super::report::{RecordingInfo, RunReport, SnapshotRecord};

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A required external resource is missing or unusable
    #[error("{what} unavailable at {}: {source}", path.display())]
    Resource {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid run configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("host failed at frame {frame}: {source}")]
    Host {
        frame: u64,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to save recording to {}: {source}", path.display())]
    Recording {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The schedule is consumed by a run; build a new runner to run again
    #[error("runner has already been used")]
    AlreadyRun,
}

/// Headless runner configuration
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Frame budget; frames `0..total_frames` are run
    pub total_frames: u64,
    pub mode: RecordingMode,
    pub layout: MemoryLayout,
    /// Required when `mode` captures snapshots
    pub snapshot_dir: Option<PathBuf>,
    /// Capture every N frames (0 = explicit frames only)
    pub snapshot_interval: u64,
    /// Extra frames to snapshot regardless of the interval
    pub snapshot_frames: BTreeSet<u64>,
    /// Record the controller and save the log here when the run ends
    pub record_path: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            total_frames: 600,
            mode: RecordingMode::Basic,
            layout: MemoryLayout::default(),
            snapshot_dir: None,
            snapshot_interval: 0,
            snapshot_frames: BTreeSet::new(),
            record_path: None,
        }
    }
}

/// Headless frame loop
pub struct HeadlessRunner {
    config: HeadlessConfig,
    injector: Injector,
    recorder: Option<Recorder>,
    capture: Option<SnapshotCapture>,
    controller: ControllerState,
    started: bool,
}

impl HeadlessRunner {
    /// Create a runner that replays `edges` in insertion order
    pub fn new(
        edges: impl IntoIterator<Item = Edge>,
        config: HeadlessConfig,
    ) -> Result<Self, RunError> {
        let capture = if config.mode.captures_snapshots() {
            let dir = config.snapshot_dir.clone().ok_or_else(|| {
                RunError::Config(format!(
                    "mode {:?} needs a snapshot directory",
                    config.mode
                ))
            })?;
            Some(SnapshotCapture::new(
                dir,
                config.layout,
                config.snapshot_interval,
            ))
        } else {
            None
        };

        let recorder = config
            .record_path
            .as_ref()
            .map(|_| Recorder::new(config.mode));

        Ok(Self {
            injector: Injector::from_edges(edges),
            recorder,
            capture,
            controller: ControllerState::new(),
            started: false,
            config,
        })
    }

    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// Controller state as of the last frame run
    pub fn controller(&self) -> &ControllerState {
        &self.controller
    }

    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    /// Run the full frame budget against `host`
    ///
    /// A runner runs once. Later calls fail with [`RunError::AlreadyRun`],
    /// even if the first run stopped on an error.
    pub fn run<H: FrameHost>(&mut self, host: &mut H) -> Result<RunReport, RunError> {
        if self.started {
            return Err(RunError::AlreadyRun);
        }
        self.started = true;

        let start_time = Instant::now();
        let total = self.config.total_frames;
        let mut report = RunReport::new(self.config.mode, total);

        if let Some(capture) = &self.capture {
            capture.prepare().map_err(|err| match err {
                SnapshotError::Io { path, source } => RunError::Resource {
                    what: "snapshot directory",
                    path,
                    source,
                },
                other => RunError::Snapshot(other),
            })?;
        }

        let beyond = self.injector.pending_beyond(total);
        if let Some(first) = beyond.first() {
            tracing::info!(
                count = beyond.len(),
                first_frame = first.frame,
                total_frames = total,
                "edges scheduled past the frame budget will not fire"
            );
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.start();
        }

        tracing::info!(frames = total, mode = ?self.config.mode, "run started");

        for frame in 0..total {
            self.injector.tick(frame, &mut self.controller);

            if let Some(recorder) = &mut self.recorder {
                recorder.on_frame(frame, &self.controller);
            }

            host.run_frame(&self.controller)
                .map_err(|source| RunError::Host { frame, source })?;
            report.frames_run += 1;

            if let Some(capture) = &mut self.capture {
                if self.config.snapshot_frames.contains(&frame) {
                    capture.request();
                }
                if capture.is_due(frame) {
                    let snapshot = capture.capture(frame, host.ram())?;
                    report.snapshots.push(SnapshotRecord {
                        frame,
                        path: snapshot
                            .path()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        checksum: format!("{:016x}", snapshot.checksum()),
                    });

                    if self.config.mode.captures_screenshots() {
                        let path = capture.dir().join(format!("frame_{:08}.png", frame));
                        if host
                            .screenshot(&path)
                            .map_err(|source| RunError::Host { frame, source })?
                        {
                            report.screenshots += 1;
                        }
                    }
                }
            }
        }

        if let Some(recorder) = &mut self.recorder {
            recorder.stop();
            if let Some(path) = &self.config.record_path {
                recorder.save(path).map_err(|source| RunError::Recording {
                    path: path.clone(),
                    source,
                })?;
                let session = recorder.session();
                report.recording = Some(RecordingInfo {
                    path: path.display().to_string(),
                    edges: session.edges.len(),
                    start_frame: session.start_frame,
                });
            }
        }

        report.edges_delivered = self.injector.delivered();
        report.edges_missed = self.injector.missed();
        report.edges_undelivered = self.injector.pending() as u64;
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            frames = report.frames_run,
            delivered = report.edges_delivered,
            undelivered = report.edges_undelivered,
            snapshots = report.snapshots.len(),
            "run complete"
        );
        Ok(report)
    }
}
