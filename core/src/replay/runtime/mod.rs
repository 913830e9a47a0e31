//! Replay runtime
//!
//! Per-frame machinery for driving a controller from a schedule:
//! - **Schedule**: frame-ordered pending edges with a forward cursor
//! - **Injector**: applies due edges to the controller each frame
//! - **Recorder**: logs controller transitions as edges
//! - **Headless**: the frame loop that wires these to a host

mod headless;
mod injector;
mod recorder;
mod report;
mod schedule;

pub use headless::{HeadlessConfig, HeadlessRunner, RunError};
pub use injector::Injector;
pub use recorder::Recorder;
pub use report::{RecordingInfo, RunReport, SnapshotRecord};
pub use schedule::{DueEdges, EventSchedule, ScheduleError};
