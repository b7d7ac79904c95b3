//! In-memory register map used by the driver tests.
#![allow(dead_code)]

use super::Adxl345Interface;
use crate::registers::REG_DATAX0;

/// Bus error reported by [`RegisterMap`] when a register is marked as failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// One recorded bus access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read { register: u8, len: usize },
    Write { register: u8, len: usize },
}

/// Register-file fake.
///
/// Plain reads and writes hit a 64-byte register file. Reads starting at `DATAX0`
/// are served from `data`, so a single burst can stand in for several FIFO pops.
pub struct RegisterMap {
    pub registers: [u8; 64],
    pub data: Vec<u8>,
    pub accesses: Vec<Access>,
    pub fail_on: Option<u8>,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self {
            registers: [0; 64],
            data: Vec::new(),
            accesses: Vec::new(),
            fail_on: None,
        }
    }

    pub fn with(mut self, register: u8, value: u8) -> Self {
        self.registers[register as usize] = value;
        self
    }

    pub fn with_data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    pub fn failing_on(mut self, register: u8) -> Self {
        self.fail_on = Some(register);
        self
    }

    pub fn reads_of(&self, register: u8) -> usize {
        self.accesses
            .iter()
            .filter(|access| matches!(access, Access::Read { register: r, .. } if *r == register))
            .count()
    }
}

impl Adxl345Interface for RegisterMap {
    type Error = BusFault;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.accesses.push(Access::Read {
            register,
            len: buf.len(),
        });
        if self.fail_on == Some(register) {
            return Err(BusFault);
        }

        if register == REG_DATAX0 {
            buf.copy_from_slice(&self.data[..buf.len()]);
        } else {
            let start = register as usize;
            buf.copy_from_slice(&self.registers[start..start + buf.len()]);
        }
        Ok(())
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.accesses.push(Access::Write {
            register,
            len: data.len(),
        });
        if self.fail_on == Some(register) {
            return Err(BusFault);
        }

        let start = register as usize;
        self.registers[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}
