//! Beat detection over the infrared AC magnitude.
//!
//! A two-state threshold machine: a provisional beat fires on the
//! below-to-above threshold transition, gated by a non-decreasing-magnitude
//! check to reject jittery false edges. The threshold adapts to signal
//! strength with a fixed floor. Raw intervals are validated against the
//! refractory period and physiological bounds; implausible intervals still
//! advance the last-beat timestamp so one bad beat cannot cascade into the
//! next measurement.

/// Minimum spacing between accepted beats, rejects double-triggering on a
/// single physiological pulse.
pub const REFRACTORY_MS: u32 = 250;
/// Physiological RR bounds (200 bpm down to 30 bpm).
pub const RR_MIN_MS: u32 = 300;
pub const RR_MAX_MS: u32 = 2000;

const THRESHOLD_DC_DIVISOR: u32 = 64;
const THRESHOLD_FLOOR: u32 = 400;

/// Result of evaluating one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatOutcome {
    /// No beat this sample.
    None,
    /// A crossing fired but the interval is outside plausible bounds; the
    /// last-beat timestamp advanced, RR/HRV state must not be updated.
    Implausible,
    /// Validated beat with its RR interval in milliseconds.
    Beat { rr_ms: u32 },
}

#[derive(Debug, Default)]
pub struct BeatDetector {
    above_threshold: bool,
    prev_ac: u32,
    last_beat_ms: Option<u32>,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Timestamp of the last provisional or accepted beat, monotonic ms.
    pub fn last_beat_ms(&self) -> Option<u32> {
        self.last_beat_ms
    }

    /// Evaluate one infrared sample. `now_ms` is a wrapping monotonic
    /// millisecond counter.
    pub fn process(&mut self, ir_ac: u32, ir_dc: u32, now_ms: u32) -> BeatOutcome {
        let threshold = ir_dc / THRESHOLD_DC_DIVISOR + THRESHOLD_FLOOR;
        let above = ir_ac > threshold;
        let rising = above && !self.above_threshold && ir_ac >= self.prev_ac;
        self.above_threshold = above;
        self.prev_ac = ir_ac;

        if !rising {
            return BeatOutcome::None;
        }

        let Some(last) = self.last_beat_ms else {
            // First crossing only anchors the timing reference
            self.last_beat_ms = Some(now_ms);
            return BeatOutcome::None;
        };

        let elapsed = now_ms.wrapping_sub(last);
        self.last_beat_ms = Some(now_ms);

        if elapsed > REFRACTORY_MS && (RR_MIN_MS..=RR_MAX_MS).contains(&elapsed) {
            BeatOutcome::Beat {
                rr_ms: elapsed.clamp(RR_MIN_MS, RR_MAX_MS),
            }
        } else {
            BeatOutcome::Implausible
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // dc 64000 -> threshold 64000/64 + 400 = 1400
    const DC: u32 = 64_000;
    const QUIET: u32 = 100;
    const PULSE: u32 = 8_000;

    fn pulse_at(detector: &mut BeatDetector, now_ms: u32) -> BeatOutcome {
        let outcome = detector.process(PULSE, DC, now_ms);
        detector.process(QUIET, DC, now_ms + 10);
        outcome
    }

    #[test]
    fn first_crossing_anchors_without_beat() {
        let mut detector = BeatDetector::new();
        assert_eq!(pulse_at(&mut detector, 1_000), BeatOutcome::None);
        assert_eq!(detector.last_beat_ms(), Some(1_000));
    }

    #[test]
    fn second_crossing_yields_rr_interval() {
        let mut detector = BeatDetector::new();
        pulse_at(&mut detector, 1_000);
        assert_eq!(
            pulse_at(&mut detector, 1_833),
            BeatOutcome::Beat { rr_ms: 833 }
        );
    }

    #[test]
    fn short_interval_is_implausible_but_advances_timestamp() {
        let mut detector = BeatDetector::new();
        pulse_at(&mut detector, 1_000);
        assert_eq!(pulse_at(&mut detector, 1_150), BeatOutcome::Implausible);
        assert_eq!(detector.last_beat_ms(), Some(1_150));

        // The next interval is measured from the implausible beat
        assert_eq!(
            pulse_at(&mut detector, 1_983),
            BeatOutcome::Beat { rr_ms: 833 }
        );
    }

    #[test]
    fn overlong_interval_is_implausible() {
        let mut detector = BeatDetector::new();
        pulse_at(&mut detector, 1_000);
        assert_eq!(pulse_at(&mut detector, 4_000), BeatOutcome::Implausible);
        assert_eq!(detector.last_beat_ms(), Some(4_000));
    }

    #[test]
    fn no_retrigger_while_above_threshold() {
        let mut detector = BeatDetector::new();
        detector.process(PULSE, DC, 1_000);
        // still above threshold: the plateau must not fire again
        assert_eq!(detector.process(PULSE + 100, DC, 1_010), BeatOutcome::None);
        assert_eq!(detector.process(PULSE + 200, DC, 1_020), BeatOutcome::None);
        assert_eq!(detector.last_beat_ms(), Some(1_000));
    }

    #[test]
    fn decreasing_magnitude_edge_is_rejected() {
        let mut detector = BeatDetector::new();
        // Previous sample sat below a high adaptive threshold (dc 400k ->
        // threshold 6650) with large magnitude
        detector.process(5_000, 400_000, 1_000);
        // Signal strength dropped: the magnitude now clears the lower
        // threshold but shrank versus the previous sample, which is jitter
        assert_eq!(detector.process(4_500, DC, 1_010), BeatOutcome::None);
        assert!(detector.last_beat_ms().is_none());
    }

    #[test]
    fn threshold_scales_with_dc_level() {
        // ac 1500 crosses the floor-dominated threshold at low dc
        let mut weak = BeatDetector::new();
        weak.process(1_500, 1_000, 0); // threshold 415
        assert_eq!(weak.last_beat_ms(), Some(0));

        // but not the scaled threshold at high dc
        let mut strong = BeatDetector::new();
        strong.process(1_500, 256_000, 0); // threshold 4400
        assert!(strong.last_beat_ms().is_none());
    }

    #[test]
    fn interval_survives_counter_wraparound() {
        let mut detector = BeatDetector::new();
        pulse_at(&mut detector, u32::MAX - 400);
        assert_eq!(
            pulse_at(&mut detector, 432),
            BeatOutcome::Beat { rr_ms: 833 }
        );
    }
}
