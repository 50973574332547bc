//! Two-wire serial bus abstraction for register-level sensor access.
//!
//! The trait keeps the transaction surface minimal: single-register writes
//! and multi-byte register reads. Failures propagate immediately; retry
//! policy belongs to the layers above.

use rppal::i2c::I2c;
use thiserror::Error;

/// Fixed bus address for the MAX3010x device family.
pub const MAX30102_ADDRESS: u16 = 0x57;

/// Transaction-level bus failure. Non-fatal; the caller aborts the current
/// read/write and reports failure upward.
#[derive(Error, Debug, Clone)]
pub enum BusError {
    #[error("bus write failed: {0}")]
    Write(String),
    #[error("bus read failed: {0}")]
    Read(String),
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },
}

/// Register-level transactions against a single bus device.
pub trait I2cBus: Send {
    /// Write one byte to a register.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError>;

    /// Read `buf.len()` bytes starting at a register. Fewer bytes than
    /// requested is a failure.
    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError>;
}

/// Hardware bus bound to one device address over the Raspberry Pi I2C
/// peripheral.
pub struct RppalI2cBus {
    i2c: I2c,
}

impl RppalI2cBus {
    pub fn new(bus: u8, address: u16) -> Result<Self, BusError> {
        let mut i2c = I2c::with_bus(bus).map_err(|e| BusError::Write(e.to_string()))?;
        i2c.set_slave_address(address)
            .map_err(|e| BusError::Write(e.to_string()))?;
        Ok(Self { i2c })
    }
}

impl I2cBus for RppalI2cBus {
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        let written = self
            .i2c
            .write(&[reg, value])
            .map_err(|e| BusError::Write(e.to_string()))?;
        if written != 2 {
            return Err(BusError::Write(format!(
                "incomplete write: {} of 2 bytes",
                written
            )));
        }
        Ok(())
    }

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c
            .write_read(&[reg], buf)
            .map_err(|e| BusError::Read(e.to_string()))
    }
}
