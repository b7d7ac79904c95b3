//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use super::Adxl345Interface;

/// 7-bit address with `ALT ADDRESS` tied low.
pub const DEFAULT_ADDRESS: u8 = 0x53;
/// 7-bit address with `ALT ADDRESS` tied high.
pub const ALTERNATE_ADDRESS: u8 = 0x1D;

// Register pointer plus payload bytes sent in a single write frame.
const MAX_WRITE_CHUNK: usize = 8;

/// I2C-based interface implementation for the ADXL345 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to the device at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Creates a new interface using [`DEFAULT_ADDRESS`].
    pub const fn with_default_address(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    /// Returns the 7-bit bus address in use.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Adxl345Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.i2c.write_read(self.address, &[register], buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        let mut frame = [0u8; MAX_WRITE_CHUNK];
        let mut register = register;

        for chunk in data.chunks(MAX_WRITE_CHUNK - 1) {
            frame[0] = register;
            frame[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.address, &frame[..=chunk.len()])?;
            register = register.wrapping_add(chunk.len() as u8);
        }

        Ok(())
    }
}
