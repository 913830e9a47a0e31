//! Integration tests for snapshot capture and analysis.

use std::collections::BTreeSet;

use tempfile::tempdir;

use padtape_core::memory::{
    MemorySnapshot, SnapshotCapture, SnapshotError, diff, hex_dump, parse_watches, read_at,
    snapshot_file_name,
};
use padtape_core::replay::{HeadlessConfig, HeadlessRunner, RecordingMode, text};
use padtape_core::{MemoryLayout, ScratchConsole};

const BASE: u32 = 0x8000_0000;

fn layout() -> MemoryLayout {
    MemoryLayout::new(BASE, 1024)
}

#[test]
fn test_single_byte_diff() {
    let mut before = vec![0u8; 1024];
    before[0x100] = 3;
    let mut after = before.clone();
    after[0x100] = 2;

    let a = MemorySnapshot::from_bytes(Some(10), before, layout()).unwrap();
    let b = MemorySnapshot::from_bytes(Some(11), after, layout()).unwrap();
    let result = diff(&a, &b).unwrap();

    assert_eq!(result.len(), 1);
    let range = &result.ranges()[0];
    assert_eq!(range.address, BASE + 0x100);
    assert_eq!(range.old, vec![3]);
    assert_eq!(range.new, vec![2]);
    assert_eq!(range.delta(), Some(-1));
}

#[test]
fn test_diff_coalesces_adjacent_bytes() {
    let before = vec![0u8; 1024];
    let mut after = before.clone();
    after[10..14].copy_from_slice(&[1, 2, 3, 4]);
    after[20] = 9;

    let a = MemorySnapshot::from_bytes(None, before, layout()).unwrap();
    let b = MemorySnapshot::from_bytes(None, after, layout()).unwrap();
    let result = diff(&a, &b).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.ranges()[0].address, BASE + 10);
    assert_eq!(result.ranges()[0].len(), 4);
    assert_eq!(result.ranges()[1].address, BASE + 20);
    assert_eq!(result.changed_bytes(), 5);
    assert!(diff(&a, &a).unwrap().is_empty());
}

#[test]
fn test_wrong_length_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(snapshot_file_name(5));
    std::fs::write(&path, vec![0u8; 1000]).unwrap();

    let err = MemorySnapshot::load(&path, layout()).unwrap_err();
    assert!(matches!(
        err,
        SnapshotError::InvalidLength {
            expected: 1024,
            actual: 1000
        }
    ));
}

#[test]
fn test_capture_then_load() {
    let dir = tempdir().unwrap();
    let mut capture = SnapshotCapture::new(dir.path(), layout(), 0);
    capture.prepare().unwrap();

    let mut ram = vec![0u8; 1024];
    ram[0x40..0x42].copy_from_slice(&[0x34, 0x12]);
    let written = capture.capture(77, &ram).unwrap();

    let loaded = MemorySnapshot::load(&capture.path_for(77), layout()).unwrap();
    assert_eq!(loaded.frame(), Some(77));
    assert_eq!(loaded.checksum(), written.checksum());
    assert_eq!(read_at(&loaded, BASE + 0x40, 2).unwrap().unsigned, 0x1234);
    assert!(hex_dump(&loaded, BASE + 0x40, 2).unwrap().contains("34 12"));
}

#[test]
fn test_snapshot_run_writes_expected_files() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("dumps");
    let config = HeadlessConfig {
        total_frames: 100,
        mode: RecordingMode::WithSnapshots,
        layout: layout(),
        snapshot_dir: Some(out.clone()),
        snapshot_interval: 30,
        snapshot_frames: BTreeSet::from([1, 30]),
        record_path: None,
    };
    let edges = text::parse("50:circle").unwrap();
    let mut runner = HeadlessRunner::new(edges, config).unwrap();
    let report = runner.run(&mut ScratchConsole::new(layout())).unwrap();

    let frames: Vec<u64> = report.snapshots.iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![1, 30, 60, 90]);

    let mut names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "ram_00000001.bin",
            "ram_00000030.bin",
            "ram_00000060.bin",
            "ram_00000090.bin",
        ]
    );

    // Circle pressed at frame 50 shows up in the pad word between 30 and 60
    let at_30 = MemorySnapshot::load(&out.join(snapshot_file_name(30)), layout()).unwrap();
    let at_60 = MemorySnapshot::load(&out.join(snapshot_file_name(60)), layout()).unwrap();
    assert_eq!(read_at(&at_30, BASE + 4, 2).unwrap().unsigned, 0xFFFF);
    assert_eq!(read_at(&at_60, BASE + 4, 2).unwrap().unsigned, 0xDFFF);
    assert_eq!(read_at(&at_60, BASE, 4).unwrap().unsigned, 60);
}

#[test]
fn test_watches_against_snapshot() {
    let mut ram = vec![0u8; 1024];
    ram[0x10] = 4;
    ram[0x20..0x24].copy_from_slice(&(-5i32).to_le_bytes());
    let snapshot = MemorySnapshot::from_bytes(None, ram, layout()).unwrap();

    let watches = parse_watches("# test\nlives, 0x80000010, 1\nvelocity, 0x80000020, 4\n").unwrap();
    let readings: Vec<_> = watches
        .iter()
        .map(|w| w.evaluate(&snapshot).unwrap())
        .collect();
    assert_eq!(readings[0].value.unsigned, 4);
    assert_eq!(readings[1].value.signed, -5);

    let outside = parse_watches("bad, 0x80000400, 1").unwrap();
    assert!(outside[0].evaluate(&snapshot).is_err());
}
