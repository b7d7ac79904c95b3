//! Strongly typed parameter enumerations for the ADXL345 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use adxl345::params::{FifoMode, OutputDataRate, Range};
//!
//! let odr = OutputDataRate::Hz100;
//! let range = Range::G16;
//! let mode = FifoMode::Stream;
//! let _ = (odr, range, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Sensitivity in g/LSB shared by every range in full-resolution mode.
pub const FULL_RESOLUTION_SCALE_G: f32 = 0.0039;

/// Full-scale measurement range encoded in `DATA_FORMAT[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl Range {
    /// Number of significant data bits delivered in the given resolution mode.
    pub const fn data_width(self, full_resolution: bool) -> u32 {
        if !full_resolution {
            return 10;
        }

        match self {
            Self::G2 => 10,
            Self::G4 => 11,
            Self::G8 => 12,
            Self::G16 => 13,
        }
    }

    /// Sensitivity in g/LSB of 10-bit (fixed resolution) samples.
    pub const fn fixed_resolution_scale_g(self) -> f32 {
        match self {
            Self::G2 => 0.0039,
            Self::G4 => 0.0078,
            Self::G8 => 0.0156,
            Self::G16 => 0.0312,
        }
    }

    /// Upper bound of the range in g.
    pub const fn max_g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// Output justification bit (`DATA_FORMAT.JUSTIFY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum Justify {
    /// Right-justified, sign-extended by the device.
    Right = 0,
    /// Left-justified (MSB aligned).
    Left = 1,
}

/// Interrupt pin polarity (`DATA_FORMAT.INT_INVERT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum InterruptPolarity {
    /// Interrupts drive the pins high.
    ActiveHigh = 0,
    /// Interrupts drive the pins low.
    ActiveLow = 1,
}

/// SPI wiring selection (`DATA_FORMAT.SPI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum SpiWire {
    /// 4-wire SPI.
    FourWire = 0,
    /// 3-wire SPI (SDI/SDO shared).
    ThreeWire = 1,
}

/// Output data rate codes in `BW_RATE[3:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum OutputDataRate {
    /// 0.10 Hz.
    Hz0_10 = 0b0000,
    /// 0.20 Hz.
    Hz0_20 = 0b0001,
    /// 0.39 Hz.
    Hz0_39 = 0b0010,
    /// 0.78 Hz.
    Hz0_78 = 0b0011,
    /// 1.56 Hz.
    Hz1_56 = 0b0100,
    /// 3.13 Hz.
    Hz3_13 = 0b0101,
    /// 6.25 Hz.
    Hz6_25 = 0b0110,
    /// 12.5 Hz.
    Hz12_5 = 0b0111,
    /// 25 Hz.
    Hz25 = 0b1000,
    /// 50 Hz.
    Hz50 = 0b1001,
    /// 100 Hz (reset default).
    Hz100 = 0b1010,
    /// 200 Hz.
    Hz200 = 0b1011,
    /// 400 Hz.
    Hz400 = 0b1100,
    /// 800 Hz.
    Hz800 = 0b1101,
    /// 1600 Hz.
    Hz1600 = 0b1110,
    /// 3200 Hz.
    Hz3200 = 0b1111,
}

impl OutputDataRate {
    /// Returns the ODR in millihertz.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Hz0_10 => 100,
            Self::Hz0_20 => 200,
            Self::Hz0_39 => 390,
            Self::Hz0_78 => 780,
            Self::Hz1_56 => 1_560,
            Self::Hz3_13 => 3_130,
            Self::Hz6_25 => 6_250,
            Self::Hz12_5 => 12_500,
            Self::Hz25 => 25_000,
            Self::Hz50 => 50_000,
            Self::Hz100 => 100_000,
            Self::Hz200 => 200_000,
            Self::Hz400 => 400_000,
            Self::Hz800 => 800_000,
            Self::Hz1600 => 1_600_000,
            Self::Hz3200 => 3_200_000,
        }
    }

    /// Returns `true` when the rate may be combined with `BW_RATE.LOW_POWER`.
    pub const fn supports_low_power(self) -> bool {
        matches!(
            self,
            Self::Hz12_5 | Self::Hz25 | Self::Hz50 | Self::Hz100 | Self::Hz200 | Self::Hz400
        )
    }
}

/// Reading frequency while asleep (`POWER_CTL.WAKEUP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum WakeupFrequency {
    /// 8 Hz.
    Hz8 = 0b00,
    /// 4 Hz.
    Hz4 = 0b01,
    /// 2 Hz.
    Hz2 = 0b10,
    /// 1 Hz.
    Hz1 = 0b11,
}

/// FIFO operating modes encoded in `FIFO_CTL.FIFO_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FifoMode {
    /// FIFO bypassed; only the latest sample is available.
    Bypass = 0b00,
    /// Collects up to 32 samples, then stops.
    Fifo = 0b01,
    /// Keeps the latest 32 samples, discarding the oldest.
    Stream = 0b10,
    /// Holds samples around a trigger event.
    Trigger = 0b11,
}

/// Interrupt output pin selection (`INT_MAP` bits and `FIFO_CTL.TRIGGER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum InterruptPin {
    /// INT1 pin.
    Int1 = 0,
    /// INT2 pin.
    Int2 = 1,
}

/// AC/DC coupling of activity and inactivity detection (`ACT_INACT_CTL` bits 7 and 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum Coupling {
    /// Acceleration is compared directly against the threshold.
    Dc = 0,
    /// Acceleration is compared against the reference taken when detection started.
    Ac = 1,
}

/// Sensor axis selector for the per-axis tap and activity enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

/// Offset register sensitivity in g/LSB (`OFSX`, `OFSY`, `OFSZ`).
pub const OFFSET_SCALE_G: f32 = 0.0156;

/// Threshold sensitivity in g/LSB shared by `THRESH_TAP`, `THRESH_ACT`,
/// `THRESH_INACT` and `THRESH_FF`.
pub const THRESHOLD_SCALE_G: f32 = 0.0625;

/// Tap duration sensitivity in µs/LSB (`DUR`).
pub const TAP_DURATION_SCALE_US: u32 = 625;

/// Tap latency and window sensitivity in ms/LSB (`LATENT`, `WINDOW`).
pub const TAP_TIMING_SCALE_MS: f32 = 1.25;

/// Free-fall time sensitivity in ms/LSB (`TIME_FF`).
pub const FREE_FALL_TIME_SCALE_MS: u16 = 5;

/// Converts an offset in g to the signed `OFSx` register encoding.
///
/// Values outside the representable ±2 g span saturate.
pub fn offset_from_g(g: f32) -> i8 {
    (libm::roundf(g / OFFSET_SCALE_G) as i32).clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

/// Converts an `OFSx` register value to g.
pub fn offset_to_g(reg: i8) -> f32 {
    reg as f32 * OFFSET_SCALE_G
}

/// Converts a threshold in g to the unsigned 62.5 mg/LSB encoding.
pub fn threshold_from_g(g: f32) -> u8 {
    scale_to_u8(g, THRESHOLD_SCALE_G)
}

/// Converts a threshold register value to g.
pub fn threshold_to_g(reg: u8) -> f32 {
    reg as f32 * THRESHOLD_SCALE_G
}

/// Converts a maximum tap duration in µs to the `DUR` encoding.
pub fn tap_duration_from_us(us: u32) -> u8 {
    (us / TAP_DURATION_SCALE_US).min(u8::MAX as u32) as u8
}

/// Converts a `DUR` register value to µs.
pub fn tap_duration_to_us(reg: u8) -> u32 {
    reg as u32 * TAP_DURATION_SCALE_US
}

/// Converts a tap latency or window in ms to the `LATENT`/`WINDOW` encoding.
pub fn tap_timing_from_ms(ms: f32) -> u8 {
    scale_to_u8(ms, TAP_TIMING_SCALE_MS)
}

/// Converts a `LATENT`/`WINDOW` register value to ms.
pub fn tap_timing_to_ms(reg: u8) -> f32 {
    reg as f32 * TAP_TIMING_SCALE_MS
}

/// Converts a free-fall time in ms to the `TIME_FF` encoding.
pub fn free_fall_time_from_ms(ms: u16) -> u8 {
    (ms / FREE_FALL_TIME_SCALE_MS).min(u8::MAX as u16) as u8
}

/// Converts a `TIME_FF` register value to ms.
pub fn free_fall_time_to_ms(reg: u8) -> u16 {
    reg as u16 * FREE_FALL_TIME_SCALE_MS
}

fn scale_to_u8(value: f32, scale: f32) -> u8 {
    (libm::roundf(value / scale) as i32).clamp(0, u8::MAX as i32) as u8
}
