//! Ratio-of-ratios SpO2 estimation.
//!
//! The linear approximation `spo2 = 110 - 25 * R` with a 70..100 clamp is an
//! empirical, uncalibrated contract carried over from the device firmware.
//! It is evaluated on every sample with valid magnitudes, independent of
//! beat detection.

/// Estimate SpO2 (percent scaled by 100) from the current per-channel AC/DC
/// values. Returns `None` when the inputs cannot produce a defensible
/// estimate (a zero DC term, or no infrared pulsation); callers keep
/// their last value in that case.
pub fn estimate_spo2_x100(red_ac: u32, red_dc: u32, ir_ac: u32, ir_dc: u32) -> Option<u16> {
    if red_dc == 0 || ir_dc == 0 || ir_ac == 0 {
        return None;
    }
    let red_ratio = red_ac as f32 / red_dc as f32;
    let ir_ratio = ir_ac as f32 / ir_dc as f32;
    let r = red_ratio / ir_ratio;
    let spo2 = (110.0 - 25.0 * r).clamp(70.0, 100.0);
    Some((spo2 * 100.0).round() as u16)
}
