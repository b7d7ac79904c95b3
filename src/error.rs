//! Error handling primitives for the ADXL345 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// A sample read was requested into an empty output buffer.
    LengthZero,
    /// The driver has not been initialized with [`Adxl345::init`](crate::Adxl345::init).
    NotInitialized,
    /// `DEVID` did not hold the ADXL345 identifier; carries the value read.
    DeviceIdMismatch(u8),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
