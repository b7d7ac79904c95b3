//! Sample acquisition from the data registers and the FIFO.

use crate::decode::{decode_one, DecodeConfig, PhysicalSample, SAMPLE_BYTES};
use crate::error::{Error, Result};
use crate::interface::Adxl345Interface;
use crate::log;
use crate::params::{FifoMode, InterruptPin};
use crate::registers::{
    DataFormat, FifoControl, FifoStatus, REG_DATAX0, REG_DATA_FORMAT, REG_FIFO_CTL,
    REG_FIFO_STATUS,
};

/// Number of samples the hardware FIFO can hold.
pub const FIFO_DEPTH: usize = 32;

/// Snapshot of the FIFO control configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSettings {
    /// Watermark level expressed in samples.
    pub watermark: u8,
    /// FIFO operating mode.
    pub mode: FifoMode,
    /// Pin whose interrupt latches the trigger event.
    pub trigger_pin: InterruptPin,
}

impl FifoSettings {
    /// Creates a new settings snapshot.
    pub const fn new(watermark: u8, mode: FifoMode, trigger_pin: InterruptPin) -> Self {
        Self {
            watermark,
            mode,
            trigger_pin,
        }
    }
}

impl From<FifoControl> for FifoSettings {
    fn from(ctl: FifoControl) -> Self {
        Self::new(ctl.samples(), ctl.mode(), ctl.trigger())
    }
}

/// Reads `FIFO_CTL` and `DATA_FORMAT` to learn how samples must be fetched and decoded.
pub fn resolve_decode_config<IFACE>(interface: &mut IFACE) -> Result<DecodeConfig, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    let fifo = FifoControl::from(interface.read_register(REG_FIFO_CTL)?);
    let format = DataFormat::from(interface.read_register(REG_DATA_FORMAT)?);

    Ok(DecodeConfig::from_registers(fifo, format))
}

/// Reads `FIFO_STATUS`.
pub fn read_fifo_status<IFACE>(interface: &mut IFACE) -> Result<FifoStatus, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    Ok(FifoStatus::from(interface.read_register(REG_FIFO_STATUS)?))
}

/// Reads up to `samples.len()` samples and decodes them into `samples`.
///
/// In bypass mode exactly one sample is read. Otherwise the request is clamped to
/// the number of entries reported by `FIFO_STATUS`, and an empty FIFO yields `Ok(0)`
/// without touching the data registers. Samples are stored oldest first. On error
/// `samples` is left unmodified.
pub fn read_samples<IFACE>(
    interface: &mut IFACE,
    samples: &mut [PhysicalSample],
) -> Result<usize, IFACE::Error>
where
    IFACE: Adxl345Interface,
{
    if samples.is_empty() {
        return Err(Error::LengthZero);
    }

    let config = resolve_decode_config(interface)?;
    let count = match config.mode {
        FifoMode::Bypass => 1,
        FifoMode::Fifo | FifoMode::Stream | FifoMode::Trigger => {
            let available = read_fifo_status(interface)?.entries() as usize;
            if available == 0 {
                log::trace!("fifo empty");
                return Ok(0);
            }
            samples.len().min(available).min(FIFO_DEPTH)
        }
    };

    let mut raw = [0u8; FIFO_DEPTH * SAMPLE_BYTES];
    let raw = &mut raw[..count * SAMPLE_BYTES];
    interface.read_many(REG_DATAX0, raw)?;

    for (sample, chunk) in samples.iter_mut().zip(raw.chunks_exact(SAMPLE_BYTES)) {
        let mut record = [0u8; SAMPLE_BYTES];
        record.copy_from_slice(chunk);
        *sample = decode_one(&record, config);
    }

    log::trace!("read {=usize} samples", count);
    Ok(count)
}
