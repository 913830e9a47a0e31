//! Integration tests for input replay.
//!
//! Tests the complete flow:
//! 1. Parse input text into edges
//! 2. Drive a controller frame by frame
//! 3. Record it back and compare

use std::path::Path;

use tempfile::tempdir;

use padtape_core::replay::text::{self, ParseError};
use padtape_core::replay::{
    Button, ControllerState, Edge, EdgeAction, EventSchedule, HeadlessConfig, HeadlessRunner,
    Injector, Recorder, RecordingMode,
};
use padtape_core::{MemoryLayout, ScratchConsole};

fn small_layout() -> MemoryLayout {
    MemoryLayout::new(0x8000_0000, 256)
}

#[test]
fn test_start_pressed_for_fifty_frames() {
    let edges = text::parse("100:start,150:start:release").unwrap();
    let mut injector = Injector::from_edges(edges);
    let mut controller = ControllerState::new();

    let mut held = Vec::new();
    for frame in 0..200 {
        injector.tick(frame, &mut controller);
        if controller.is_pressed(Button::Start) {
            held.push(frame);
        }
    }

    assert_eq!(held.len(), 50);
    assert_eq!(held.first(), Some(&100));
    assert_eq!(held.last(), Some(&149));
    assert_eq!(injector.delivered(), 2);
}

#[test]
fn test_aliases_canonicalize() {
    let edges = text::parse("1:X,2:o,3:Sq,4:TRI,5:sel,6:l,7:r").unwrap();
    let buttons: Vec<Button> = edges.iter().map(|e| e.button).collect();
    assert_eq!(
        buttons,
        vec![
            Button::Cross,
            Button::Circle,
            Button::Square,
            Button::Triangle,
            Button::Select,
            Button::L1,
            Button::R1,
        ]
    );
    assert_eq!(
        text::serialize(&edges),
        "1:cross,2:circle,3:square,4:triangle,5:select,6:l1,7:r1"
    );
}

#[test]
fn test_malformed_frame_reports_first_entry() {
    let err = text::parse("abc:start").unwrap_err();
    assert!(matches!(err, ParseError::InvalidFrame { index: 0, .. }));
    assert_eq!(err.entry_index(), Some(0));

    let err = text::parse("10:start,20:jump").unwrap_err();
    assert!(matches!(err, ParseError::UnknownButton { index: 1, .. }));
}

#[test]
fn test_text_round_trip() {
    let edges = vec![
        Edge::press(0, Button::Cross),
        Edge::press(12, Button::Up),
        Edge::press(12, Button::L2),
        Edge::release(40, Button::Cross),
        Edge::release(41, Button::L2),
        Edge::release(90, Button::Up),
    ];
    assert_eq!(text::parse(&text::serialize(&edges)).unwrap(), edges);
    assert_eq!(text::parse_lines(&text::serialize_lines(&edges)).unwrap(), edges);
    assert!(text::parse(&text::serialize(&[])).unwrap().is_empty());
}

#[test]
fn test_edge_beyond_budget_never_fires() {
    let edges = text::parse("5:start,100:start:release").unwrap();
    let config = HeadlessConfig {
        total_frames: 50,
        layout: small_layout(),
        ..HeadlessConfig::default()
    };
    let mut runner = HeadlessRunner::new(edges, config).unwrap();
    let report = runner.run(&mut ScratchConsole::new(small_layout())).unwrap();

    assert_eq!(report.frames_run, 50);
    assert_eq!(report.edges_delivered, 1);
    assert_eq!(report.edges_undelivered, 1);
    assert!(runner.controller().is_pressed(Button::Start));
}

#[test]
fn test_schedule_after_partial_run() {
    let mut schedule = EventSchedule::new();
    schedule.schedule_token(3, "x", EdgeAction::Press).unwrap();
    assert_eq!(schedule.tick(0).len(), 0);
    assert_eq!(schedule.tick(3).len(), 1);

    assert!(schedule.schedule(Edge::press(3, Button::Start)).is_err());
    assert!(schedule.schedule(Edge::press(4, Button::Start)).is_ok());
    assert!(schedule.schedule_token(-1, "start", EdgeAction::Press).is_err());
}

#[test]
fn test_recording_reparses_to_same_controller_history() {
    let script = "10:x,10:up,30:up:release,31:r2,60:x:release,61:r2:release";
    let dir = tempdir().unwrap();
    let record_path = dir.path().join("take1.txt");

    let config = HeadlessConfig {
        total_frames: 90,
        layout: small_layout(),
        record_path: Some(record_path.clone()),
        ..HeadlessConfig::default()
    };
    let mut runner = HeadlessRunner::new(text::parse(script).unwrap(), config).unwrap();
    runner.run(&mut ScratchConsole::new(small_layout())).unwrap();

    let recorded = text::load_file(&record_path).unwrap();
    assert_eq!(
        history(&recorded, 90),
        history(&text::parse(script).unwrap(), 90)
    );
}

#[test]
fn test_recorder_standalone_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manual.txt");

    let mut recorder = Recorder::new(RecordingMode::Basic);
    recorder.start();
    let mut controller = ControllerState::new();
    for frame in 0..20 {
        controller.set(Button::Triangle, (5..15).contains(&frame));
        recorder.on_frame(frame, &controller);
    }
    recorder.stop();
    recorder.save(&path).unwrap();

    assert_eq!(
        text::load_file(&path).unwrap(),
        vec![
            Edge::press(5, Button::Triangle),
            Edge::release(15, Button::Triangle),
        ]
    );
    assert!(!Path::new(&format!("{}.tmp", path.display())).exists());
}

/// Pad words seen on each frame when replaying `edges`
fn history(edges: &[Edge], frames: u64) -> Vec<u16> {
    let mut injector = Injector::from_edges(edges.iter().copied());
    let mut controller = ControllerState::new();
    (0..frames)
        .map(|frame| {
            injector.tick(frame, &mut controller);
            controller.pad_word()
        })
        .collect()
}
