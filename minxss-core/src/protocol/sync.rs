use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::{START_SYNC, STOP_SYNC, SYNC_SIZE};

/// Two-byte marker delimiting a packet inside the radio byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncMarker(pub [u8; SYNC_SIZE]);

impl SyncMarker {
    /// Index of the first byte of the first occurrence of the marker.
    pub fn find_in(&self, buffer: &[u8]) -> Option<usize> {
        buffer
            .windows(SYNC_SIZE)
            .position(|window| window == self.0)
    }
}

/// Locates packet boundaries in a raw buffer.
///
/// Other spacecraft built on the same bus use different markers, so both are
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLocator {
    pub start: SyncMarker,
    pub stop: SyncMarker,
}

impl FrameLocator {
    pub const fn new(start: SyncMarker, stop: SyncMarker) -> Self {
        Self { start, stop }
    }

    pub fn find_start(&self, buffer: &[u8]) -> Option<usize> {
        self.start.find_in(buffer)
    }

    /// Scans the whole buffer, independently of where the start marker is.
    pub fn find_end(&self, buffer: &[u8]) -> Option<usize> {
        self.stop.find_in(buffer)
    }

    /// Span from the start marker through the first stop marker after it,
    /// both markers included.
    ///
    /// Not used by [`PacketParser`](super::PacketParser), which bounds fields by
    /// offset only.
    pub fn frame_bounds(&self, buffer: &[u8]) -> Option<Range<usize>> {
        let start = self.find_start(buffer)?;
        let body = start + SYNC_SIZE;
        let end = self.stop.find_in(&buffer[body..])? + body + SYNC_SIZE;
        Some(start..end)
    }
}

impl Default for FrameLocator {
    fn default() -> Self {
        Self::new(START_SYNC, STOP_SYNC)
    }
}
