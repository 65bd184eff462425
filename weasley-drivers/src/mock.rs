//! Recording I2C bus for driver tests

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// I2C bus that records writes and serves reads from a register file
pub struct MockBus {
    /// Every write as (address, bytes)
    pub writes: Vec<(u8, Vec<u8>)>,
    registers: [u8; 256],
    pointer: u8,
    fail: bool,
}

impl Default for MockBus {
    fn default() -> Self {
        Self {
            writes: Vec::new(),
            registers: [0; 256],
            pointer: 0,
            fail: false,
        }
    }
}

impl MockBus {
    /// Bus where every transfer fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl I2c for MockBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.writes.push((address, bytes.to_vec()));
                    if let Some((&register, data)) = bytes.split_first() {
                        self.pointer = register;
                        for (i, value) in data.iter().enumerate() {
                            let r = register.wrapping_add(i as u8);
                            self.registers[usize::from(r)] = *value;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (i, slot) in buf.iter_mut().enumerate() {
                        let r = self.pointer.wrapping_add(i as u8);
                        *slot = self.registers[usize::from(r)];
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
