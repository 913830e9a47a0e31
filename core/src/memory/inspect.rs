//! Point queries and hex dumps

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt::Write as _;

use super::snapshot::{MemorySnapshot, SnapshotError};

/// Bytes read at an address with their integer interpretations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedValue {
    pub address: u32,
    pub bytes: Vec<u8>,
    pub unsigned: u64,
    pub signed: i64,
}

impl TypedValue {
    /// Hex rendering padded to the value's width, e.g. `0x0042`
    pub fn hex(&self) -> String {
        format!("0x{:0width$X}", self.unsigned, width = self.bytes.len() * 2)
    }
}

pub(super) fn decode_unsigned(bytes: &[u8]) -> Option<u64> {
    match bytes.len() {
        1 => Some(u64::from(bytes[0])),
        2 => Some(u64::from(LittleEndian::read_u16(bytes))),
        4 => Some(u64::from(LittleEndian::read_u32(bytes))),
        _ => None,
    }
}

pub(super) fn decode_signed(bytes: &[u8]) -> Option<i64> {
    match bytes.len() {
        1 => Some(i64::from(bytes[0] as i8)),
        2 => Some(i64::from(LittleEndian::read_i16(bytes))),
        4 => Some(i64::from(LittleEndian::read_i32(bytes))),
        _ => None,
    }
}

/// Read a 1, 2 or 4 byte little-endian value at an absolute address
pub fn read_at(
    snapshot: &MemorySnapshot,
    address: u32,
    size: usize,
) -> Result<TypedValue, SnapshotError> {
    if !matches!(size, 1 | 2 | 4) {
        return Err(SnapshotError::UnsupportedSize(size));
    }
    let offset = snapshot.layout().offset_of(address, size)?;
    let bytes = snapshot.bytes()[offset..offset + size].to_vec();

    let unsigned = decode_unsigned(&bytes).ok_or(SnapshotError::UnsupportedSize(size))?;
    let signed = decode_signed(&bytes).ok_or(SnapshotError::UnsupportedSize(size))?;
    Ok(TypedValue {
        address,
        bytes,
        unsigned,
        signed,
    })
}

/// Format `length` bytes starting at `address`, 16 per line
///
/// Output stops at the end of RAM.
pub fn hex_dump(
    snapshot: &MemorySnapshot,
    address: u32,
    length: usize,
) -> Result<String, SnapshotError> {
    let layout = snapshot.layout();
    let start = layout.offset_of(address, 1)?;
    let end = start.saturating_add(length).min(snapshot.len());
    let data = snapshot.bytes();

    let mut out = String::new();
    for line_start in (start..end).step_by(16) {
        let line = &data[line_start..(line_start + 16).min(end)];
        let hex = line
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii: String = line
            .iter()
            .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
            .collect();
        let _ = writeln!(
            out,
            "0x{:08X}: {:<48} {}",
            layout.address_of(line_start),
            hex,
            ascii
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLayout;

    fn snapshot() -> MemorySnapshot {
        let mut bytes = vec![0u8; 64];
        bytes[0x10..0x14].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);
        bytes[0x20] = 0xFF;
        bytes[0x21] = 0xFF;
        bytes[0x30..0x35].copy_from_slice(b"CRASH");
        MemorySnapshot::from_bytes(Some(1), bytes, MemoryLayout::new(0x8000_0000, 64)).unwrap()
    }

    #[test]
    fn test_read_at_sizes() {
        let snap = snapshot();

        let v = read_at(&snap, 0x8000_0010, 4).unwrap();
        assert_eq!(v.unsigned, 0x1234_5678);
        assert_eq!(v.bytes, vec![0x78, 0x56, 0x34, 0x12]);
        assert_eq!(v.hex(), "0x12345678");

        let v = read_at(&snap, 0x8000_0010, 2).unwrap();
        assert_eq!(v.unsigned, 0x5678);

        let v = read_at(&snap, 0x8000_0020, 2).unwrap();
        assert_eq!(v.unsigned, 0xFFFF);
        assert_eq!(v.signed, -1);

        let v = read_at(&snap, 0x8000_0020, 1).unwrap();
        assert_eq!(v.signed, -1);
        assert_eq!(v.hex(), "0xFF");
    }

    #[test]
    fn test_read_at_errors() {
        let snap = snapshot();
        assert!(matches!(
            read_at(&snap, 0x8000_0000, 3),
            Err(SnapshotError::UnsupportedSize(3))
        ));
        assert!(matches!(
            read_at(&snap, 0x8000_003E, 4),
            Err(SnapshotError::AddressOutOfRange { .. })
        ));
        assert!(matches!(
            read_at(&snap, 0x0000_0010, 1),
            Err(SnapshotError::AddressOutOfRange { .. })
        ));
    }

    #[test]
    fn test_hex_dump_format() {
        let snap = snapshot();
        let dump = hex_dump(&snap, 0x8000_0030, 16).unwrap();
        let line = dump.lines().next().unwrap();
        assert!(line.starts_with("0x80000030: 43 52 41 53 48 00"));
        assert!(line.ends_with("CRASH..........."));
        assert_eq!(dump.lines().count(), 1);
    }

    #[test]
    fn test_hex_dump_clamps_at_end() {
        let snap = snapshot();
        let dump = hex_dump(&snap, 0x8000_0038, 64).unwrap();
        assert_eq!(dump.lines().count(), 1);
        assert!(dump.starts_with("0x80000038: 00 00 00 00 00 00 00 00 "));
    }
}
