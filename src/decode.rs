//! Conversion of raw `DATAX0..DATAZ1` bytes into acceleration.
//!
//! The output format depends on three `DATA_FORMAT` fields. With right
//! justification the device sign-extends every sample to 16 bits itself. With left
//! justification the sample sits in the top `width` bits of the word, where `width`
//! is 10 bits in fixed resolution and 10 to 13 bits in full resolution depending on
//! the range. Scaling is 3.9 mg/LSB for every range in full resolution, and doubles
//! with each range step in fixed resolution.

use crate::params::{FifoMode, Justify, Range, FULL_RESOLUTION_SCALE_G};
use crate::registers::{DataFormat, FifoControl};

/// Number of bytes in one X/Y/Z record.
pub const SAMPLE_BYTES: usize = 6;

/// Axis words exactly as read from the data registers, before any correction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X-axis word.
    pub x: i16,
    /// Y-axis word.
    pub y: i16,
    /// Z-axis word.
    pub z: i16,
}

impl RawSample {
    /// Reassembles the three little-endian axis words of one record.
    pub fn from_bytes(bytes: &[u8; SAMPLE_BYTES]) -> Self {
        Self {
            x: i16::from_le_bytes([bytes[0], bytes[1]]),
            y: i16::from_le_bytes([bytes[2], bytes[3]]),
            z: i16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }

    fn map(self, f: impl Fn(i16) -> i16) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}

/// Acceleration in g.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysicalSample {
    /// X-axis acceleration.
    pub x: f32,
    /// Y-axis acceleration.
    pub y: f32,
    /// Z-axis acceleration.
    pub z: f32,
}

/// Snapshot of the device settings that determine how samples are read and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeConfig {
    /// FIFO acquisition mode.
    pub mode: FifoMode,
    /// `DATA_FORMAT.FULL_RES`.
    pub full_resolution: bool,
    /// `DATA_FORMAT.JUSTIFY`.
    pub justify: Justify,
    /// `DATA_FORMAT.RANGE`.
    pub range: Range,
}

impl DecodeConfig {
    /// Builds the snapshot from the `FIFO_CTL` and `DATA_FORMAT` register values.
    pub fn from_registers(fifo: FifoControl, format: DataFormat) -> Self {
        Self {
            mode: fifo.mode(),
            full_resolution: format.full_resolution(),
            justify: format.justify(),
            range: format.range(),
        }
    }

    /// Number of significant bits per axis sample.
    pub const fn data_width(&self) -> u32 {
        self.range.data_width(self.full_resolution)
    }

    /// Sensitivity in g/LSB.
    pub const fn scale_g(&self) -> f32 {
        if self.full_resolution {
            FULL_RESOLUTION_SCALE_G
        } else {
            self.range.fixed_resolution_scale_g()
        }
    }

    /// Turns raw axis words into signed LSB counts.
    ///
    /// Right-justified words are already sign-extended by the device and pass
    /// through unchanged.
    pub fn correct(&self, raw: RawSample) -> RawSample {
        match self.justify {
            Justify::Right => raw,
            Justify::Left => {
                let width = self.data_width();
                raw.map(|word| sign_extend_left_justified(word, width))
            }
        }
    }

    /// Converts corrected LSB counts into g.
    pub fn scale(&self, counts: RawSample) -> PhysicalSample {
        let scale = self.scale_g();
        PhysicalSample {
            x: counts.x as f32 * scale,
            y: counts.y as f32 * scale,
            z: counts.z as f32 * scale,
        }
    }
}

/// Decodes one 6-byte record into acceleration.
pub fn decode_one(bytes: &[u8; SAMPLE_BYTES], config: DecodeConfig) -> PhysicalSample {
    config.scale(config.correct(RawSample::from_bytes(bytes)))
}

/// Moves a `width`-bit two's complement value from the top of `word` to the bottom.
fn sign_extend_left_justified(word: i16, width: u32) -> i16 {
    let mask: u16 = (1 << width) - 1;
    let magnitude = ((word as u16) >> (16 - width)) & mask;

    if word < 0 {
        (magnitude | !mask) as i16
    } else {
        magnitude as i16
    }
}
