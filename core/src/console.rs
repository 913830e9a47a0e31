//! Emulator host interface
//!
//! The emulator itself is external: it is driven through [`FrameHost`], one
//! call per frame. [`ScratchConsole`] is a deterministic stand-in used for
//! dry runs and tests.

use anyhow::Result;
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

use crate::memory::MemoryLayout;
use crate::replay::ControllerState;
use crate::replay::runtime::RunError;

/// Offset of the frame counter written by [`ScratchConsole`]
pub const SCRATCH_FRAME_OFFSET: usize = 0;
/// Offset of the pad word written by [`ScratchConsole`]
pub const SCRATCH_PAD_OFFSET: usize = 4;

/// An emulator that can be stepped one frame at a time
pub trait FrameHost {
    /// Run one frame with the given controller state latched
    fn run_frame(&mut self, controller: &ControllerState) -> Result<()>;

    /// Main RAM as it stands after the last frame
    fn ram(&self) -> &[u8];

    /// Save a screenshot of the current frame
    ///
    /// Returns `false` if the host has no video output.
    fn screenshot(&mut self, _path: &Path) -> Result<bool> {
        Ok(false)
    }
}

/// Deterministic reference host
///
/// Each frame writes the frame counter (u32 LE) at offset 0 and the
/// active-low pad word (u16 LE) at offset 4. Nothing else in RAM changes.
/// A BIOS image is only checked for readability and fingerprinted.
pub struct ScratchConsole {
    ram: Vec<u8>,
    frames: u32,
    bios_checksum: Option<u64>,
}

impl ScratchConsole {
    pub fn new(layout: MemoryLayout) -> Self {
        Self {
            ram: vec![0; layout.size],
            frames: 0,
            bios_checksum: None,
        }
    }

    /// Create a console that requires a BIOS image
    pub fn with_bios(layout: MemoryLayout, bios_path: &Path) -> Result<Self, RunError> {
        let bios = std::fs::read(bios_path).map_err(|source| RunError::Resource {
            what: "BIOS image",
            path: bios_path.to_path_buf(),
            source,
        })?;
        let checksum = xxh3_64(&bios);
        tracing::info!(
            path = %bios_path.display(),
            bytes = bios.len(),
            checksum = format_args!("{:016x}", checksum),
            "BIOS loaded"
        );

        let mut console = Self::new(layout);
        console.bios_checksum = Some(checksum);
        Ok(console)
    }

    /// Frames run so far
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// xxh3-64 of the BIOS image, if one was loaded
    pub fn bios_checksum(&self) -> Option<u64> {
        self.bios_checksum
    }

    /// Mutable RAM access for test setups
    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }
}

impl FrameHost for ScratchConsole {
    fn run_frame(&mut self, controller: &ControllerState) -> Result<()> {
        if let Some(slot) = self
            .ram
            .get_mut(SCRATCH_FRAME_OFFSET..SCRATCH_FRAME_OFFSET + 4)
        {
            LittleEndian::write_u32(slot, self.frames);
        }
        if let Some(slot) = self.ram.get_mut(SCRATCH_PAD_OFFSET..SCRATCH_PAD_OFFSET + 2) {
            LittleEndian::write_u16(slot, controller.pad_word());
        }
        self.frames = self.frames.wrapping_add(1);
        Ok(())
    }

    fn ram(&self) -> &[u8] {
        &self.ram
    }
}
