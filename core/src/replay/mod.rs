//! Input replay
//!
//! Controller input is described as a list of edges: a button pressed or
//! released at a frame number. Edges come from a compact text form
//! (`100:start,150:start:release`) or from recording a live controller, and
//! are fed back into the controller one frame at a time.
//!
//! ```text
//! input text ─▶ text::parse ─▶ EventSchedule ─▶ Injector ─▶ ControllerState
//!                                                                 │
//! recording  ◀─ text::serialize ◀─ Recorder ◀─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use padtape_core::replay::{ControllerState, Injector, text};
//!
//! let edges = text::parse("100:start,150:start:release")?;
//! let mut injector = Injector::from_edges(edges);
//! let mut controller = ControllerState::new();
//!
//! for frame in 0..600 {
//!     injector.tick(frame, &mut controller);
//!     // Run emulator frame with `controller`
//! }
//! ```

pub mod runtime;
pub mod text;
pub mod types;

// Re-export core types
pub use types::{
    Button, ButtonMask, ControllerState, Edge, EdgeAction, RecordingMode, RecordingSession,
    UnknownButton,
};

// Re-export text format
pub use text::ParseError;

// Re-export runtime
pub use runtime::{
    DueEdges, EventSchedule, HeadlessConfig, HeadlessRunner, Injector, Recorder, RecordingInfo,
    RunError, RunReport, ScheduleError, SnapshotRecord,
};
