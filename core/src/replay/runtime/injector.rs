//! Input injector
//!
//! Consumes due edges from an [`EventSchedule`] once per frame and applies
//! them to the controller state owned by the frame loop.

use crate::replay::types::{ControllerState, Edge};

use super::schedule::{DueEdges, EventSchedule};

/// Applies scheduled edges to a controller, one frame at a time
#[derive(Debug, Default)]
pub struct Injector {
    schedule: EventSchedule,
    delivered: u64,
}

impl Injector {
    pub fn new(schedule: EventSchedule) -> Self {
        Self {
            schedule,
            delivered: 0,
        }
    }

    /// Build an injector over edges in insertion order
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        Self::new(EventSchedule::from_edges(edges))
    }

    /// Deliver the edges due on `frame` and apply them to `controller`
    ///
    /// Returns the applied edges in delivery order.
    pub fn tick(&mut self, frame: u64, controller: &mut ControllerState) -> DueEdges {
        let due = self.schedule.tick(frame);
        for edge in &due {
            controller.apply(edge);
            tracing::debug!(frame, %edge, "edge applied");
        }
        self.delivered += due.len() as u64;
        due
    }

    /// Edges applied so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Edges dropped because their frame was skipped
    pub fn missed(&self) -> u64 {
        self.schedule.missed()
    }

    /// Edges not yet delivered
    pub fn pending(&self) -> usize {
        self.schedule.len()
    }

    /// Pending edges scheduled at or after `total_frames`; these never fire
    /// in a run of that length
    pub fn pending_beyond(&self, total_frames: u64) -> Vec<Edge> {
        self.schedule
            .iter()
            .filter(|edge| edge.frame >= total_frames)
            .copied()
            .collect()
    }

    pub fn schedule(&self) -> &EventSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut EventSchedule {
        &mut self.schedule
    }
}
