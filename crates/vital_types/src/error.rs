use serde::{Deserialize, Serialize};

/// Represents errors that can occur within the sensor pipeline.
///
/// These are reported to the publishing layer as degraded-confidence status
/// bits rather than process failures; nothing in the core is fatal.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SensorError {
    /// A hardware-related fault.
    #[error("Sensor hardware fault: {0}")]
    HardwareFault(String),
    /// The sensor stopped producing fresh samples.
    #[error("Sensor data is stale")]
    StaleData,
    /// The sensor was disconnected.
    #[error("Sensor disconnected")]
    Disconnected,
    /// A driver-level error.
    #[error("Driver error: {0}")]
    DriverError(String),
}
