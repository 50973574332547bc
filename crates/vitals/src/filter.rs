//! Per-channel DC baseline tracking and AC magnitude extraction.
//!
//! The baseline is a single-pole exponential smoother with an effective time
//! constant of about 32 samples. The AC magnitude is the unsigned deviation
//! of the current sample from the baseline.

/// Current filter output for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcDc {
    pub ac: u32,
    pub dc: u32,
}

/// Running DC estimate for one PPG channel. Persists across calls; reset
/// only at driver re-initialization.
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    dc: u32,
    seeded: bool,
}

impl ChannelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one nonzero sample into the baseline and return the AC/DC pair.
    /// Zero samples are a sensor glitch and must be filtered out by the
    /// caller before reaching this point.
    pub fn update(&mut self, sample: u32) -> AcDc {
        debug_assert!(sample != 0, "zero intensity is not a valid reading");
        if self.seeded {
            self.dc = (self.dc * 31 + sample) / 32;
        } else {
            self.dc = sample;
            self.seeded = true;
        }
        AcDc {
            ac: self.dc.abs_diff(sample),
            dc: self.dc,
        }
    }

    pub fn dc(&self) -> u32 {
        self.dc
    }

    pub fn reset(&mut self) {
        self.dc = 0;
        self.seeded = false;
    }
}
