//! PPG signal-processing pipeline: DC/AC filtering, beat detection,
//! RR-interval history with RMSSD HRV, SpO2 estimation, and the per-tick
//! vital state aggregator.

pub mod beat;
pub mod filter;
pub mod hrv;
pub mod monitor;
pub mod spo2;

pub use monitor::{MonitorConfig, VitalMonitor};
