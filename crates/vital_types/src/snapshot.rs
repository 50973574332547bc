use serde::{Deserialize, Serialize};

/// Status bitfield flags published alongside the numeric vitals.
///
/// Bit positions are part of the wire contract and must not be reordered.
pub mod status {
    /// At least one RR-derived vital updated this cycle.
    pub const VITALS_VALID: u8 = 1 << 0;
    /// Device uninitialized, bus failure, stale data, or implausible beat.
    pub const SENSOR_ERROR: u8 = 1 << 1;
    /// Current RR interval is fresh and within physiological bounds.
    pub const RRI_VALID: u8 = 1 << 2;
    /// HRV has at least two history samples and was recomputed.
    pub const HRV_VALID: u8 = 1 << 3;
    /// Reserved for the battery subsystem.
    pub const LOW_BATTERY: u8 = 1 << 4;
}

/// Published vitals state.
///
/// Every numeric field retains its last-known-good value when not currently
/// computable; only the corresponding status bit toggles. Fields are never
/// reset to zero on a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VitalSnapshot {
    /// Heart rate in beats per minute.
    pub heart_rate_bpm: u16,
    /// Blood-oxygen saturation, percent scaled by 100.
    pub spo2_x100: u16,
    /// Most recent beat-to-beat interval in milliseconds.
    pub rr_interval_ms: u16,
    /// RMSSD heart-rate variability in milliseconds.
    pub hrv_rmssd_ms: u16,
    /// Status bitfield, see [`status`].
    pub status: u8,
}

impl VitalSnapshot {
    /// Returns true if the given status flag is set.
    pub fn has_flag(&self, flag: u8) -> bool {
        self.status & flag != 0
    }
}
