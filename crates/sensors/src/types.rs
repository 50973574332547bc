//! Common types for the optical sensor driver

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bus::BusError;
use vital_types::SensorError;

/// Configuration for the pulse-oximetry sensor driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// I2C bus number the sensor is wired to
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u8,
    /// Fixed device address for this device family
    #[serde(default = "default_device_address")]
    pub device_address: u16,
    /// LED drive current register value applied to both channels
    #[serde(default = "default_led_current")]
    pub led_current: u8,
}

fn default_i2c_bus() -> u8 {
    1
}
fn default_device_address() -> u16 {
    crate::bus::MAX30102_ADDRESS
}
fn default_led_current() -> u8 {
    crate::max30102::registers::LED_CURRENT_DEFAULT
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            device_address: default_device_address(),
            led_current: default_led_current(),
        }
    }
}

/// One decoded FIFO sample pair: raw 18-bit LED intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpgSample {
    pub red: u32,
    pub ir: u32,
}

/// Status of the sensor driver
#[derive(Debug, Clone, PartialEq)]
pub enum DriverStatus {
    /// Driver is not initialized
    NotInitialized,
    /// Driver is initialized and ready
    Ok,
    /// Driver encountered an error and must be re-initialized
    Error(String),
}

/// Errors that can occur in the sensor driver
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    /// Bus transaction failure
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),
    /// Identity register did not match the expected device signature
    #[error("Hardware not found: {0}")]
    HardwareNotFound(String),
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Driver not initialized
    #[error("Driver not initialized")]
    NotInitialized,
}

impl From<DriverError> for SensorError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Bus(e) => SensorError::HardwareFault(e.to_string()),
            DriverError::HardwareNotFound(msg) => SensorError::HardwareFault(msg),
            DriverError::NotInitialized => SensorError::Disconnected,
            other => SensorError::DriverError(other.to_string()),
        }
    }
}
