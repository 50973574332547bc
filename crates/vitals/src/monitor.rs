//! Vital state aggregation: one tick of the sampling pipeline per update
//! call.
//!
//! Single-threaded and cooperative: the owning scheduler calls
//! [`VitalMonitor::update`] on a fixed cadence. Each tick drains a bounded
//! burst of samples from the sensor FIFO, runs every sample through the
//! filter, SpO2 estimator, beat detector and RR/HRV estimator in order, then
//! finalizes the status bitfield. Numeric fields always keep their
//! last-known-good values; only status bits report degraded confidence.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use ppg_sensor::{DriverError, I2cBus, Max30102Driver, PpgSample};
use vital_types::{status, SensorError, VitalSnapshot};

use crate::beat::{BeatDetector, BeatOutcome};
use crate::filter::ChannelFilter;
use crate::hrv::RrHistory;
use crate::spo2::estimate_spo2_x100;

/// Aggregator tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// No fresh sample within this window means the sensor data is stale.
    #[serde(default = "default_stale_timeout_ms")]
    pub stale_timeout_ms: u32,
    /// Upper bound on FIFO samples consumed per tick, bounds per-tick
    /// latency under sample bursts.
    #[serde(default = "default_drain_burst_limit")]
    pub drain_burst_limit: usize,
}

fn default_stale_timeout_ms() -> u32 {
    3_000
}
fn default_drain_burst_limit() -> usize {
    8
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            stale_timeout_ms: default_stale_timeout_ms(),
            drain_burst_limit: default_drain_burst_limit(),
        }
    }
}

/// Outcome flags gathered while processing one tick's samples.
#[derive(Debug, Default)]
struct TickState {
    vitals_updated: bool,
    invalid_rr: bool,
}

pub struct VitalMonitor<B: I2cBus> {
    driver: Max30102Driver<B>,
    config: MonitorConfig,
    red_filter: ChannelFilter,
    ir_filter: ChannelFilter,
    detector: BeatDetector,
    history: RrHistory,
    snapshot: VitalSnapshot,
    last_data_ms: Option<u32>,
    last_error: Option<SensorError>,
    rri_valid: bool,
    hrv_valid: bool,
}

impl<B: I2cBus> VitalMonitor<B> {
    pub fn new(driver: Max30102Driver<B>, config: MonitorConfig) -> Self {
        Self {
            driver,
            config,
            red_filter: ChannelFilter::new(),
            ir_filter: ChannelFilter::new(),
            detector: BeatDetector::new(),
            history: RrHistory::new(),
            snapshot: VitalSnapshot::default(),
            last_data_ms: None,
            last_error: None,
            rri_valid: false,
            hrv_valid: false,
        }
    }

    /// Bring the sensor up and reset all pipeline state. Also the explicit
    /// recovery path after a bus failure; the pipeline never self-heals
    /// silently.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        self.driver.initialize()?;
        self.red_filter.reset();
        self.ir_filter.reset();
        self.detector.reset();
        self.history.clear();
        self.last_data_ms = None;
        self.last_error = None;
        self.rri_valid = false;
        self.hrv_valid = false;
        Ok(())
    }

    /// Run one update tick. `now_ms` is a wrapping monotonic millisecond
    /// counter supplied by the clock collaborator.
    pub fn update(&mut self, now_ms: u32) {
        let mut tick = TickState::default();
        let mut bus_failed = false;
        self.last_error = None;

        let mut drained = 0usize;
        while drained < self.config.drain_burst_limit {
            match self.driver.read_sample() {
                Ok(Some(sample)) => {
                    drained += 1;
                    self.process_sample(sample, now_ms, &mut tick);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("sample drain aborted: {}", e);
                    bus_failed = true;
                    self.last_error = Some(e.into());
                    break;
                }
            }
        }
        if drained > 0 {
            self.last_data_ms = Some(now_ms);
        }

        let stale = match self.last_data_ms {
            None => true,
            Some(t) => now_ms.wrapping_sub(t) > self.config.stale_timeout_ms,
        };
        if stale {
            debug!("sensor data stale at t={}", now_ms);
            self.rri_valid = false;
            self.hrv_valid = false;
            if self.last_error.is_none() {
                self.last_error = Some(SensorError::StaleData);
            }
        }
        if tick.invalid_rr {
            self.rri_valid = false;
        }

        let sensor_error =
            bus_failed || stale || tick.invalid_rr || !self.driver.is_initialized();

        let mut bits = 0u8;
        if tick.vitals_updated {
            bits |= status::VITALS_VALID;
        }
        if sensor_error {
            bits |= status::SENSOR_ERROR;
        }
        if self.rri_valid {
            bits |= status::RRI_VALID;
        }
        if self.hrv_valid {
            bits |= status::HRV_VALID;
        }
        // LOW_BATTERY is owned by the battery subsystem
        self.snapshot.status = bits;
    }

    fn process_sample(&mut self, sample: PpgSample, now_ms: u32, tick: &mut TickState) {
        // Zero is not a physically valid intensity; treat the whole pair as
        // a glitch and leave every piece of filter state untouched
        if sample.red == 0 || sample.ir == 0 {
            debug!("glitch sample skipped: red={} ir={}", sample.red, sample.ir);
            return;
        }

        let red = self.red_filter.update(sample.red);
        let ir = self.ir_filter.update(sample.ir);

        if let Some(spo2) = estimate_spo2_x100(red.ac, red.dc, ir.ac, ir.dc) {
            self.snapshot.spo2_x100 = spo2;
        }

        match self.detector.process(ir.ac, ir.dc, now_ms) {
            BeatOutcome::None => {}
            BeatOutcome::Implausible => {
                tick.invalid_rr = true;
            }
            BeatOutcome::Beat { rr_ms } => {
                self.snapshot.rr_interval_ms = rr_ms as u16;
                self.snapshot.heart_rate_bpm = (60_000 / rr_ms) as u16;
                self.history.push(rr_ms);
                self.rri_valid = true;
                tick.vitals_updated = true;
                if let Some(hrv) = self.history.hrv_ms() {
                    self.snapshot.hrv_rmssd_ms = hrv as u16;
                    self.hrv_valid = true;
                }
            }
        }
    }

    /// Read-only snapshot for the publishing collaborator.
    pub fn snapshot(&self) -> VitalSnapshot {
        self.snapshot
    }

    /// Most recent error recorded during the last tick, for diagnostics.
    pub fn last_error(&self) -> Option<&SensorError> {
        self.last_error.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.driver.is_initialized()
    }

    /// Direct access to the device controller, mainly for scripted runs.
    pub fn driver_mut(&mut self) -> &mut Max30102Driver<B> {
        &mut self.driver
    }
}
