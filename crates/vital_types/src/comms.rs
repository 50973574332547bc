//! Wire-frame codec for the wireless publishing collaborator.
//!
//! The snapshot is serialized into a fixed 12-byte little-endian frame and
//! transmitted verbatim as a notification payload. Consumers decode the same
//! layout. Byte map: 0-1 heart rate, 2-3 SpO2 x100, 4-5 RR interval,
//! 6-7 HRV, 8 status, 9 sequence counter, 10-11 reserved zero.

use thiserror::Error;

use crate::snapshot::VitalSnapshot;

/// Size of the notification payload in bytes.
pub const FRAME_LEN: usize = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame truncated: expected {FRAME_LEN} bytes, got {0}")]
    Truncated(usize),
}

/// Serializes snapshots into wire frames, stamping each with a wrapping
/// per-publish sequence counter.
#[derive(Debug, Default)]
pub struct FrameEncoder {
    sequence: u8,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode one snapshot and advance the sequence counter.
    pub fn encode(&mut self, snapshot: &VitalSnapshot) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0..2].copy_from_slice(&snapshot.heart_rate_bpm.to_le_bytes());
        frame[2..4].copy_from_slice(&snapshot.spo2_x100.to_le_bytes());
        frame[4..6].copy_from_slice(&snapshot.rr_interval_ms.to_le_bytes());
        frame[6..8].copy_from_slice(&snapshot.hrv_rmssd_ms.to_le_bytes());
        frame[8] = snapshot.status;
        frame[9] = self.sequence;
        // bytes 10-11 reserved zero
        self.sequence = self.sequence.wrapping_add(1);
        frame
    }
}

/// Decode a wire frame back into a snapshot and its sequence number.
pub fn decode_frame(frame: &[u8]) -> Result<(VitalSnapshot, u8), FrameError> {
    if frame.len() < FRAME_LEN {
        return Err(FrameError::Truncated(frame.len()));
    }
    let snapshot = VitalSnapshot {
        heart_rate_bpm: u16::from_le_bytes([frame[0], frame[1]]),
        spo2_x100: u16::from_le_bytes([frame[2], frame[3]]),
        rr_interval_ms: u16::from_le_bytes([frame[4], frame[5]]),
        hrv_rmssd_ms: u16::from_le_bytes([frame[6], frame[7]]),
        status: frame[8],
    };
    Ok((snapshot, frame[9]))
}
