//! A scripted bus that emulates the MAX30102 register file, for tests and
//! hardware-free demo runs. No real hardware is accessed.

use std::collections::VecDeque;

use crate::bus::{BusError, I2cBus};
use crate::max30102::registers::{
    FIFO_DATA_ADDR, FIFO_PTR_MASK, FIFO_RD_PTR_ADDR, FIFO_SAMPLE_BYTES, FIFO_WR_PTR_ADDR,
    PART_ID, PART_ID_ADDR,
};

pub struct MockBus {
    registers: [u8; 256],
    fifo: VecDeque<(u32, u32)>,
    wr_ptr: u8,
    rd_ptr: u8,
    fail_reads: bool,
    fail_writes: bool,
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBus {
    pub fn new() -> Self {
        let mut registers = [0u8; 256];
        registers[PART_ID_ADDR as usize] = PART_ID;
        Self {
            registers,
            fifo: VecDeque::new(),
            wr_ptr: 0,
            rd_ptr: 0,
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Queue one (red, infrared) sample pair in the emulated FIFO.
    pub fn push_sample(&mut self, red: u32, ir: u32) {
        self.fifo.push_back((red, ir));
        self.wr_ptr = (self.wr_ptr + 1) & FIFO_PTR_MASK;
    }

    /// Report a fake device signature for identity-check tests.
    pub fn set_part_id(&mut self, id: u8) {
        self.registers[PART_ID_ADDR as usize] = id;
    }

    /// Make every subsequent read transaction fail.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent write transaction fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Last value written to a register, for configuration assertions.
    pub fn register(&self, reg: u8) -> u8 {
        self.registers[reg as usize]
    }

    fn encode_channel(value: u32, out: &mut [u8]) {
        out[0] = ((value >> 16) & 0xFF) as u8;
        out[1] = ((value >> 8) & 0xFF) as u8;
        out[2] = (value & 0xFF) as u8;
    }
}

impl I2cBus for MockBus {
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        if self.fail_writes {
            return Err(BusError::Write("injected write fault".to_string()));
        }
        // Zeroing either FIFO pointer discards queued samples, as on the
        // real part
        if reg == FIFO_WR_PTR_ADDR || reg == FIFO_RD_PTR_ADDR {
            self.fifo.clear();
            self.wr_ptr = value & FIFO_PTR_MASK;
            self.rd_ptr = value & FIFO_PTR_MASK;
        }
        self.registers[reg as usize] = value;
        Ok(())
    }

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if self.fail_reads {
            return Err(BusError::Read("injected read fault".to_string()));
        }
        if reg == FIFO_WR_PTR_ADDR && buf.len() >= 3 {
            buf[0] = self.wr_ptr;
            buf[1] = 0; // overflow counter
            buf[2] = self.rd_ptr;
            return Ok(());
        }
        if reg == FIFO_DATA_ADDR {
            if buf.len() < FIFO_SAMPLE_BYTES {
                return Err(BusError::ShortRead {
                    expected: FIFO_SAMPLE_BYTES,
                    got: buf.len(),
                });
            }
            let (red, ir) = self.fifo.pop_front().unwrap_or((0, 0));
            Self::encode_channel(red, &mut buf[0..3]);
            Self::encode_channel(ir, &mut buf[3..6]);
            self.rd_ptr = (self.rd_ptr + 1) & FIFO_PTR_MASK;
            return Ok(());
        }
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = self.registers[(reg as usize + i) & 0xFF];
        }
        Ok(())
    }
}
