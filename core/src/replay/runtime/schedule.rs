//! Event schedule
//!
//! Pending edges keyed by `(frame, sequence)`. Consumption is forward-only:
//! once a frame has been ticked, nothing at or before it can be delivered
//! again.

use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::replay::types::{Button, Edge, EdgeAction};

/// Edges due on one frame. Most frames carry at most a couple of edges.
pub type DueEdges = SmallVec<[Edge; 4]>;

/// Errors raised when adding edges to a schedule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("negative frame {0}")]
    NegativeFrame(i64),
    #[error("unknown button '{0}'")]
    UnknownButton(String),
    #[error("frame {frame} has already been ticked (cursor at {cursor})")]
    FrameAlreadyPassed { frame: u64, cursor: u64 },
}

/// Sorted multiset of pending edges
#[derive(Debug, Clone, Default)]
pub struct EventSchedule {
    pending: BTreeMap<(u64, u64), Edge>,
    next_seq: u64,
    /// Last frame passed to `tick`
    cursor: Option<u64>,
    missed: u64,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schedule from edges in insertion order
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut schedule = Self::new();
        for edge in edges {
            schedule.insert(edge);
        }
        schedule
    }

    /// Insert an edge
    ///
    /// Edges on the same frame are delivered in the order they were
    /// scheduled.
    pub fn schedule(&mut self, edge: Edge) -> Result<(), ScheduleError> {
        if let Some(cursor) = self.cursor
            && edge.frame <= cursor
        {
            return Err(ScheduleError::FrameAlreadyPassed {
                frame: edge.frame,
                cursor,
            });
        }
        self.insert(edge);
        Ok(())
    }

    /// Insert from loosely-typed values (e.g. a scripting host)
    pub fn schedule_token(
        &mut self,
        frame: i64,
        button: &str,
        action: EdgeAction,
    ) -> Result<(), ScheduleError> {
        let frame = u64::try_from(frame).map_err(|_| ScheduleError::NegativeFrame(frame))?;
        let button = Button::from_token(button)
            .ok_or_else(|| ScheduleError::UnknownButton(button.to_string()))?;
        self.schedule(Edge {
            frame,
            button,
            action,
        })
    }

    fn insert(&mut self, edge: Edge) {
        self.pending.insert((edge.frame, self.next_seq), edge);
        self.next_seq += 1;
    }

    /// Remove and return every edge due on `frame`, in key order
    ///
    /// Edges left on earlier frames (the caller skipped them) are discarded
    /// and counted as missed.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is lower than a previously ticked frame.
    pub fn tick(&mut self, frame: u64) -> DueEdges {
        if let Some(cursor) = self.cursor {
            assert!(
                frame >= cursor,
                "tick({}) after tick({}): frames must be monotonic",
                frame,
                cursor
            );
        }
        self.cursor = Some(frame);

        let mut due = DueEdges::new();
        while let Some(entry) = self.pending.first_entry() {
            let (edge_frame, _) = *entry.key();
            if edge_frame > frame {
                break;
            }
            let edge = entry.remove();
            if edge_frame == frame {
                due.push(edge);
            } else {
                tracing::warn!(frame = edge_frame, %edge, "skipped frame, edge dropped");
                self.missed += 1;
            }
        }
        due
    }

    /// Number of edges not yet delivered
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of edges dropped because their frame was skipped
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Last ticked frame
    pub fn cursor(&self) -> Option<u64> {
        self.cursor
    }

    /// Frame of the next pending edge
    pub fn next_frame(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(frame, _)| frame)
    }

    /// Pending edges in delivery order
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.pending.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::text::parse;

    #[test]
    fn test_tick_delivers_only_matching_frame() {
        let mut schedule = EventSchedule::from_edges(parse("100:start,150:start:release").unwrap());

        assert!(schedule.tick(99).is_empty());
        assert_eq!(
            schedule.tick(100).as_slice(),
            &[Edge::press(100, Button::Start)]
        );
        assert!(schedule.tick(125).is_empty());
        assert_eq!(
            schedule.tick(150).as_slice(),
            &[Edge::release(150, Button::Start)]
        );
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut schedule = EventSchedule::new();
        schedule.schedule(Edge::press(5, Button::Up)).unwrap();
        schedule.schedule(Edge::press(3, Button::Cross)).unwrap();
        schedule.schedule(Edge::release(5, Button::Up)).unwrap();
        schedule.schedule(Edge::press(5, Button::Down)).unwrap();

        assert_eq!(schedule.next_frame(), Some(3));
        let due = schedule.tick(3);
        assert_eq!(due.as_slice(), &[Edge::press(3, Button::Cross)]);

        let due = schedule.tick(5);
        assert_eq!(
            due.as_slice(),
            &[
                Edge::press(5, Button::Up),
                Edge::release(5, Button::Up),
                Edge::press(5, Button::Down),
            ]
        );
    }

    #[test]
    fn test_each_edge_delivered_once() {
        let mut schedule = EventSchedule::from_edges([Edge::press(1, Button::Start)]);
        assert_eq!(schedule.tick(1).len(), 1);
        assert!(schedule.tick(1).is_empty());
    }

    #[test]
    fn test_skipped_frames_are_missed() {
        let mut schedule = EventSchedule::from_edges([
            Edge::press(1, Button::Start),
            Edge::press(2, Button::Cross),
            Edge::press(3, Button::Circle),
        ]);
        let due = schedule.tick(2);
        assert_eq!(due.as_slice(), &[Edge::press(2, Button::Cross)]);
        assert_eq!(schedule.missed(), 1);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    #[should_panic(expected = "monotonic")]
    fn test_tick_backwards_panics() {
        let mut schedule = EventSchedule::new();
        schedule.tick(10);
        schedule.tick(9);
    }

    #[test]
    fn test_schedule_token_validation() {
        let mut schedule = EventSchedule::new();
        assert_eq!(
            schedule.schedule_token(-1, "start", EdgeAction::Press),
            Err(ScheduleError::NegativeFrame(-1))
        );
        assert_eq!(
            schedule.schedule_token(1, "turbo", EdgeAction::Press),
            Err(ScheduleError::UnknownButton("turbo".to_string()))
        );
        schedule.schedule_token(1, "X", EdgeAction::Press).unwrap();
        assert_eq!(schedule.iter().next(), Some(&Edge::press(1, Button::Cross)));
    }

    #[test]
    fn test_schedule_behind_cursor_rejected() {
        let mut schedule = EventSchedule::new();
        schedule.tick(10);
        assert_eq!(
            schedule.schedule(Edge::press(10, Button::Start)),
            Err(ScheduleError::FrameAlreadyPassed {
                frame: 10,
                cursor: 10
            })
        );
        schedule.schedule(Edge::press(11, Button::Start)).unwrap();
        assert_eq!(schedule.tick(11).len(), 1);
    }
}
