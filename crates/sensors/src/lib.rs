pub mod bus;
pub mod max30102;
#[cfg(any(test, feature = "mock_bus"))]
pub mod mock_bus;
pub mod types;

// Re-export the main types that users need
pub use bus::{BusError, I2cBus, RppalI2cBus, MAX30102_ADDRESS};
pub use max30102::Max30102Driver;
pub use types::{DriverError, DriverStatus, PpgSample, SensorConfig};
