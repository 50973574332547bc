//! Device controller for the MAX30102 pulse-oximetry sensor.
//!
//! Owns the bus handle, performs the identity check and fixed configuration
//! sequence at bring-up, and drains the hardware FIFO one sample at a time.
//! A bus failure during a drain marks the controller uninitialized; recovery
//! requires an explicit re-initialization by the owning update cycle.

use log::{debug, info, warn};

use super::registers::{
    channel_to_raw, FIFO_CONFIG_ADDR, FIFO_CONFIG_REG, FIFO_PTR_MASK, FIFO_RD_PTR_ADDR,
    FIFO_SAMPLE_BYTES, FIFO_DATA_ADDR, FIFO_WR_PTR_ADDR, INT_ENABLE_1_ADDR, INT_ENABLE_2_ADDR,
    LED1_PA_ADDR, LED2_PA_ADDR, MODE_CONFIG_ADDR, MODE_RESET, MODE_SHUTDOWN, MODE_SPO2,
    OVF_COUNTER_ADDR, PART_ID, PART_ID_ADDR, SPO2_CONFIG_ADDR, SPO2_CONFIG_REG,
};
use crate::bus::{BusError, I2cBus};
use crate::types::{DriverError, DriverStatus, PpgSample, SensorConfig};

pub struct Max30102Driver<B: I2cBus> {
    bus: B,
    config: SensorConfig,
    status: DriverStatus,
}

impl<B: I2cBus> Max30102Driver<B> {
    pub fn new(bus: B, config: SensorConfig) -> Self {
        Self {
            bus,
            config,
            status: DriverStatus::NotInitialized,
        }
    }

    /// Bring the sensor up: identity check, reset pulse, then the fixed
    /// configuration sequence. Any single register write failure marks
    /// initialization failed overall; partial configuration is not
    /// tolerated.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        self.status = DriverStatus::NotInitialized;

        let mut id = [0u8; 1];
        self.bus.read_registers(PART_ID_ADDR, &mut id)?;
        if id[0] != PART_ID {
            return Err(DriverError::HardwareNotFound(format!(
                "Invalid part ID: 0x{:02X}, expected 0x{:02X}",
                id[0], PART_ID
            )));
        }

        // Reset pulse, then configure from a known state
        self.bus.write_register(MODE_CONFIG_ADDR, MODE_RESET)?;

        self.bus.write_register(INT_ENABLE_1_ADDR, 0x00)?;
        self.bus.write_register(INT_ENABLE_2_ADDR, 0x00)?;
        self.bus.write_register(FIFO_WR_PTR_ADDR, 0x00)?;
        self.bus.write_register(OVF_COUNTER_ADDR, 0x00)?;
        self.bus.write_register(FIFO_RD_PTR_ADDR, 0x00)?;
        self.bus.write_register(FIFO_CONFIG_ADDR, FIFO_CONFIG_REG)?;
        self.bus.write_register(MODE_CONFIG_ADDR, MODE_SPO2)?;
        self.bus.write_register(SPO2_CONFIG_ADDR, SPO2_CONFIG_REG)?;
        self.bus
            .write_register(LED1_PA_ADDR, self.config.led_current)?;
        self.bus
            .write_register(LED2_PA_ADDR, self.config.led_current)?;

        self.status = DriverStatus::Ok;
        info!("MAX30102 initialized, LED current 0x{:02X}", self.config.led_current);
        Ok(())
    }

    /// Read one sample from the hardware FIFO.
    ///
    /// Returns `Ok(None)` when the FIFO is empty (read pointer has caught up
    /// with the write pointer); this is not an error. Any bus failure is
    /// escalated: the controller marks itself uninitialized and subsequent
    /// calls fail until re-initialized.
    pub fn read_sample(&mut self) -> Result<Option<PpgSample>, DriverError> {
        if self.status != DriverStatus::Ok {
            return Err(DriverError::NotInitialized);
        }
        match self.try_read_sample() {
            Ok(sample) => Ok(sample),
            Err(e) => {
                warn!("FIFO drain failed, marking sensor uninitialized: {}", e);
                self.status = DriverStatus::Error(e.to_string());
                Err(DriverError::Bus(e))
            }
        }
    }

    fn try_read_sample(&mut self) -> Result<Option<PpgSample>, BusError> {
        // WR_PTR, OVF_COUNTER and RD_PTR are consecutive registers
        let mut pointers = [0u8; 3];
        self.bus.read_registers(FIFO_WR_PTR_ADDR, &mut pointers)?;
        let wr_ptr = pointers[0] & FIFO_PTR_MASK;
        let rd_ptr = pointers[2] & FIFO_PTR_MASK;
        if wr_ptr == rd_ptr {
            return Ok(None);
        }

        let mut raw = [0u8; FIFO_SAMPLE_BYTES];
        self.bus.read_registers(FIFO_DATA_ADDR, &mut raw)?;
        let sample = PpgSample {
            red: channel_to_raw(raw[0], raw[1], raw[2]),
            ir: channel_to_raw(raw[3], raw[4], raw[5]),
        };
        debug!("FIFO sample red={} ir={}", sample.red, sample.ir);
        Ok(Some(sample))
    }

    /// Put the chip in shutdown (low power) mode.
    pub fn shutdown(&mut self) -> Result<(), DriverError> {
        self.bus.write_register(MODE_CONFIG_ADDR, MODE_SHUTDOWN)?;
        self.status = DriverStatus::NotInitialized;
        info!("MAX30102 shut down");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.status == DriverStatus::Ok
    }

    pub fn status(&self) -> DriverStatus {
        self.status.clone()
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Direct access to the underlying bus, mainly for scripted mock buses.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_bus::MockBus;

    fn driver() -> Max30102Driver<MockBus> {
        Max30102Driver::new(MockBus::new(), SensorConfig::default())
    }

    #[test]
    fn initialize_configures_device() {
        let mut drv = driver();
        drv.initialize().unwrap();
        assert!(drv.is_initialized());

        let bus = drv.bus_mut();
        assert_eq!(bus.register(INT_ENABLE_1_ADDR), 0x00);
        assert_eq!(bus.register(FIFO_CONFIG_ADDR), FIFO_CONFIG_REG);
        assert_eq!(bus.register(MODE_CONFIG_ADDR), MODE_SPO2);
        assert_eq!(bus.register(SPO2_CONFIG_ADDR), SPO2_CONFIG_REG);
        assert_eq!(bus.register(LED1_PA_ADDR), 0x24);
        assert_eq!(bus.register(LED2_PA_ADDR), 0x24);
    }

    #[test]
    fn initialize_rejects_wrong_part_id() {
        let mut bus = MockBus::new();
        bus.set_part_id(0x11);
        let mut drv = Max30102Driver::new(bus, SensorConfig::default());
        assert!(matches!(
            drv.initialize(),
            Err(DriverError::HardwareNotFound(_))
        ));
        assert!(!drv.is_initialized());
    }

    #[test]
    fn initialize_fails_on_any_write_failure() {
        let mut bus = MockBus::new();
        bus.fail_writes(true);
        let mut drv = Max30102Driver::new(bus, SensorConfig::default());
        assert!(matches!(drv.initialize(), Err(DriverError::Bus(_))));
        assert!(!drv.is_initialized());
    }

    #[test]
    fn empty_fifo_is_not_an_error() {
        let mut drv = driver();
        drv.initialize().unwrap();
        assert_eq!(drv.read_sample().unwrap(), None);
        assert!(drv.is_initialized());
    }

    #[test]
    fn reads_queued_samples_in_order() {
        let mut drv = driver();
        drv.initialize().unwrap();
        drv.bus_mut().push_sample(1000, 2000);
        drv.bus_mut().push_sample(1001, 2001);

        assert_eq!(
            drv.read_sample().unwrap(),
            Some(PpgSample { red: 1000, ir: 2000 })
        );
        assert_eq!(
            drv.read_sample().unwrap(),
            Some(PpgSample { red: 1001, ir: 2001 })
        );
        assert_eq!(drv.read_sample().unwrap(), None);
    }

    #[test]
    fn samples_are_masked_to_18_bits() {
        let mut drv = driver();
        drv.initialize().unwrap();
        drv.bus_mut().push_sample(0xFFFF_FFFF, 0xFFFF_FFFF);
        let sample = drv.read_sample().unwrap().unwrap();
        assert_eq!(sample.red, 0x3_FFFF);
        assert_eq!(sample.ir, 0x3_FFFF);
    }

    #[test]
    fn bus_failure_marks_uninitialized_until_reinit() {
        let mut drv = driver();
        drv.initialize().unwrap();
        drv.bus_mut().push_sample(1000, 2000);
        drv.bus_mut().fail_reads(true);

        assert!(drv.read_sample().is_err());
        assert!(!drv.is_initialized());
        // Subsequent calls fail fast without touching the bus
        assert!(matches!(
            drv.read_sample(),
            Err(DriverError::NotInitialized)
        ));

        drv.bus_mut().fail_reads(false);
        drv.initialize().unwrap();
        assert!(drv.is_initialized());
    }

    #[test]
    fn uninitialized_driver_refuses_reads() {
        let mut drv = driver();
        assert!(matches!(
            drv.read_sample(),
            Err(DriverError::NotInitialized)
        ));
    }
}
