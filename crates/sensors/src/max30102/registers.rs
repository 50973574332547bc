//! Register definitions and low-level decode helpers for the MAX30102
//! pulse-oximetry sensor.

// Register Addresses
pub const INT_ENABLE_1_ADDR: u8 = 0x02;
pub const INT_ENABLE_2_ADDR: u8 = 0x03;
pub const FIFO_WR_PTR_ADDR: u8 = 0x04;
pub const OVF_COUNTER_ADDR: u8 = 0x05;
pub const FIFO_RD_PTR_ADDR: u8 = 0x06;
pub const FIFO_DATA_ADDR: u8 = 0x07;
pub const FIFO_CONFIG_ADDR: u8 = 0x08;
pub const MODE_CONFIG_ADDR: u8 = 0x09;
pub const SPO2_CONFIG_ADDR: u8 = 0x0A;
pub const LED1_PA_ADDR: u8 = 0x0C; // red LED pulse amplitude
pub const LED2_PA_ADDR: u8 = 0x0D; // infrared LED pulse amplitude
pub const PART_ID_ADDR: u8 = 0xFF;

/// Expected device signature in the PART_ID register.
pub const PART_ID: u8 = 0x15;

// MODE_CONFIG bits
pub const MODE_RESET: u8 = 1 << 6;
pub const MODE_SHUTDOWN: u8 = 1 << 7;
pub const MODE_SPO2: u8 = 0x03; // continuous red + IR acquisition

// FIFO_CONFIG fields
pub const SMP_AVE_4: u8 = 0b010 << 5; // average 4 samples per FIFO entry
pub const FIFO_ROLLOVER_EN: u8 = 1 << 4;
pub const FIFO_CONFIG_REG: u8 = SMP_AVE_4 | FIFO_ROLLOVER_EN;

// SPO2_CONFIG fields
pub const ADC_RGE_4096: u8 = 0b01 << 5;
pub const SR_100HZ: u8 = 0b001 << 2;
pub const LED_PW_411US: u8 = 0b11; // 411 us pulse width, 18-bit resolution
pub const SPO2_CONFIG_REG: u8 = ADC_RGE_4096 | SR_100HZ | LED_PW_411US;

/// Fixed operating amplitude for both LED drivers (~7.1 mA).
pub const LED_CURRENT_DEFAULT: u8 = 0x24;

/// FIFO pointers are 5 bits wide (32 entries).
pub const FIFO_PTR_MASK: u8 = 0x1F;

/// One FIFO entry: 3 bytes red + 3 bytes infrared.
pub const FIFO_SAMPLE_BYTES: usize = 6;

/// Channels are 18-bit values left-packed in a 3-byte big-endian field;
/// the top 6 bits are ignored.
pub const SAMPLE_MASK: u32 = 0x3_FFFF;

/// Decode one 3-byte big-endian channel field into its 18-bit intensity.
pub fn channel_to_raw(msb: u8, mid: u8, lsb: u8) -> u32 {
    (((msb as u32) << 16) | ((mid as u32) << 8) | (lsb as u32)) & SAMPLE_MASK
}
