//! RR-interval history and RMSSD-based HRV estimation.
//!
//! The history is a fixed-capacity ring of the most recent valid RR
//! intervals, insertion-ordered, overwritten oldest-first once full. It is
//! cleared at initialization and lives for device uptime.

/// Number of RR intervals retained for HRV estimation.
pub const RR_HISTORY_CAPACITY: usize = 20;
/// Physiological band the integer HRV estimate is clamped into.
pub const HRV_MIN_MS: u32 = 10;
pub const HRV_MAX_MS: u32 = 300;

/// Root-mean-square of successive differences over an interval sequence,
/// oldest to newest. Needs at least two intervals.
pub fn rmssd(intervals: impl IntoIterator<Item = u32>) -> Option<f64> {
    let mut sum_sq = 0.0f64;
    let mut diff_count = 0u32;
    let mut prev: Option<u32> = None;
    for rr in intervals {
        if let Some(p) = prev {
            let diff = rr as f64 - p as f64;
            sum_sq += diff * diff;
            diff_count += 1;
        }
        prev = Some(rr);
    }
    if diff_count == 0 {
        return None;
    }
    Some((sum_sq / diff_count as f64).sqrt())
}

#[derive(Debug, Clone)]
pub struct RrHistory {
    intervals: [u32; RR_HISTORY_CAPACITY],
    head: usize,
    len: usize,
}

impl Default for RrHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RrHistory {
    pub fn new() -> Self {
        Self {
            intervals: [0; RR_HISTORY_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record one validated RR interval, overwriting the oldest entry once
    /// the ring is full.
    pub fn push(&mut self, rr_ms: u32) {
        self.intervals[self.head] = rr_ms;
        self.head = (self.head + 1) % RR_HISTORY_CAPACITY;
        self.len = (self.len + 1).min(RR_HISTORY_CAPACITY);
    }

    /// Iterate buffered intervals oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let start = if self.len < RR_HISTORY_CAPACITY {
            0
        } else {
            self.head
        };
        (0..self.len).map(move |i| self.intervals[(start + i) % RR_HISTORY_CAPACITY])
    }

    /// Integer-millisecond HRV estimate: RMSSD rounded to nearest and
    /// clamped into the physiological band. `None` with fewer than two
    /// buffered intervals, in which case the caller keeps its last value.
    pub fn hrv_ms(&self) -> Option<u32> {
        let value = rmssd(self.iter())?;
        Some((value.round() as u32).clamp(HRV_MIN_MS, HRV_MAX_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rmssd_of_constant_intervals_is_zero() {
        assert_eq!(rmssd([500, 500, 500, 500]), Some(0.0));
    }

    #[test]
    fn rmssd_matches_closed_form() {
        // diffs: +20, -40, +20 -> sqrt((400 + 1600 + 400) / 3)
        let expected = (2_400.0f64 / 3.0).sqrt();
        let value = rmssd([500, 520, 480, 500]).unwrap();
        assert!((value - expected).abs() < 1e-9);
        assert!(value > 0.0);
    }

    #[test]
    fn rmssd_needs_two_intervals() {
        assert_eq!(rmssd([]), None);
        assert_eq!(rmssd([800]), None);
    }

    #[test]
    fn hrv_is_clamped_into_physiological_band() {
        let mut history = RrHistory::new();
        history.push(500);
        history.push(500);
        // RMSSD 0 clamps up to the band floor
        assert_eq!(history.hrv_ms(), Some(HRV_MIN_MS));

        let mut wild = RrHistory::new();
        wild.push(300);
        wild.push(2_000);
        // RMSSD 1700 clamps down to the band ceiling
        assert_eq!(wild.hrv_ms(), Some(HRV_MAX_MS));
    }

    #[test]
    fn fewer_than_two_samples_yields_none() {
        let mut history = RrHistory::new();
        assert_eq!(history.hrv_ms(), None);
        history.push(800);
        assert_eq!(history.hrv_ms(), None);
    }

    #[test]
    fn ring_overwrites_oldest_first() {
        let mut history = RrHistory::new();
        for i in 0..RR_HISTORY_CAPACITY as u32 + 5 {
            history.push(400 + i);
        }
        assert_eq!(history.len(), RR_HISTORY_CAPACITY);
        let collected: Vec<u32> = history.iter().collect();
        assert_eq!(collected.first(), Some(&405));
        assert_eq!(collected.last(), Some(&424));
        // insertion order preserved
        assert!(collected.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn clear_empties_the_ring() {
        let mut history = RrHistory::new();
        history.push(800);
        history.push(810);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.hrv_ms(), None);
    }
}
