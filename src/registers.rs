//! Register map definitions for the ADXL345 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    Axis, Coupling, FifoMode, InterruptPin, InterruptPolarity, Justify, OutputDataRate, Range,
    SpiWire, WakeupFrequency,
};

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `THRESH_TAP`.
pub const REG_THRESH_TAP: u8 = 0x1D;
/// Register address of `OFSX`.
pub const REG_OFSX: u8 = 0x1E;
/// Register address of `OFSY`.
pub const REG_OFSY: u8 = 0x1F;
/// Register address of `OFSZ`.
pub const REG_OFSZ: u8 = 0x20;
/// Register address of `DUR`.
pub const REG_DUR: u8 = 0x21;
/// Register address of `LATENT`.
pub const REG_LATENT: u8 = 0x22;
/// Register address of `WINDOW`.
pub const REG_WINDOW: u8 = 0x23;
/// Register address of `THRESH_ACT`.
pub const REG_THRESH_ACT: u8 = 0x24;
/// Register address of `THRESH_INACT`.
pub const REG_THRESH_INACT: u8 = 0x25;
/// Register address of `TIME_INACT`.
pub const REG_TIME_INACT: u8 = 0x26;
/// Register address of `ACT_INACT_CTL`.
pub const REG_ACT_INACT_CTL: u8 = 0x27;
/// Register address of `THRESH_FF`.
pub const REG_THRESH_FF: u8 = 0x28;
/// Register address of `TIME_FF`.
pub const REG_TIME_FF: u8 = 0x29;
/// Register address of `TAP_AXES`.
pub const REG_TAP_AXES: u8 = 0x2A;
/// Register address of `ACT_TAP_STATUS`.
pub const REG_ACT_TAP_STATUS: u8 = 0x2B;
/// Register address of `BW_RATE`.
pub const REG_BW_RATE: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `INT_ENABLE`.
pub const REG_INT_ENABLE: u8 = 0x2E;
/// Register address of `INT_MAP`.
pub const REG_INT_MAP: u8 = 0x2F;
/// Register address of `INT_SOURCE`.
pub const REG_INT_SOURCE: u8 = 0x30;
/// Register address of `DATA_FORMAT`.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Register address of `DATAX0`.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAX1`.
pub const REG_DATAX1: u8 = 0x33;
/// Register address of `DATAY0`.
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAY1`.
pub const REG_DATAY1: u8 = 0x35;
/// Register address of `DATAZ0`.
pub const REG_DATAZ0: u8 = 0x36;
/// Register address of `DATAZ1`.
pub const REG_DATAZ1: u8 = 0x37;
/// Register address of `FIFO_CTL`.
pub const REG_FIFO_CTL: u8 = 0x38;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x39;

/// Fixed content of `DEVID`.
pub const EXPECTED_DEVID: u8 = 0xE5;

/// Single-byte register with a typed bitfield image.
pub trait Register: Copy + From<u8> + Into<u8> {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
}

/// Bitfield representation of the `BW_RATE` register (address `0x2C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BwRate {
    // Output data rate code (bits 3:0).
    pub rate: OutputDataRate,
    // Reduced power operation (bit 4).
    pub low_power: bool,
    #[skip]
    __: B3,
}

impl From<u8> for BwRate {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<BwRate> for u8 {
    fn from(value: BwRate) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Sleep-mode reading frequency (bits 1:0).
    pub wakeup: WakeupFrequency,
    // Sleep mode (bit 2).
    pub sleep: bool,
    // Measurement mode (bit 3).
    pub measure: bool,
    // Automatic sleep on inactivity (bit 4).
    pub auto_sleep: bool,
    // Serially linked activity/inactivity detection (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Shared layout of `INT_ENABLE`, `INT_MAP` and `INT_SOURCE` (addresses `0x2E`-`0x30`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptFlags {
    // FIFO overrun (bit 0).
    pub overrun: bool,
    // FIFO watermark reached (bit 1).
    pub watermark: bool,
    // Free fall (bit 2).
    pub free_fall: bool,
    // Inactivity (bit 3).
    pub inactivity: bool,
    // Activity (bit 4).
    pub activity: bool,
    // Double tap (bit 5).
    pub double_tap: bool,
    // Single tap (bit 6).
    pub single_tap: bool,
    // Data ready (bit 7).
    pub data_ready: bool,
}

impl From<u8> for InterruptFlags {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<InterruptFlags> for u8 {
    fn from(value: InterruptFlags) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `DATA_FORMAT` register (address `0x31`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFormat {
    // g-range selection (bits 1:0).
    pub range: Range,
    // Output justification (bit 2).
    pub justify: Justify,
    // Full resolution enable (bit 3).
    pub full_resolution: bool,
    #[skip]
    __: B1,
    // Interrupt polarity (bit 5).
    pub interrupt_polarity: InterruptPolarity,
    // SPI wiring (bit 6).
    pub spi_wire: SpiWire,
    // Self-test force (bit 7).
    pub self_test: bool,
}

impl From<u8> for DataFormat {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<DataFormat> for u8 {
    fn from(value: DataFormat) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_CTL` register (address `0x38`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoControl {
    // Watermark sample count (bits 4:0).
    pub samples: B5,
    // Trigger event pin (bit 5).
    pub trigger: InterruptPin,
    // FIFO operating mode (bits 7:6).
    pub mode: FifoMode,
}

impl From<u8> for FifoControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoControl> for u8 {
    fn from(value: FifoControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_STATUS` register (address `0x39`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoStatus {
    // Number of samples available (bits 5:0).
    pub entries: B6,
    #[skip]
    __: B1,
    // Trigger event occurred (bit 7).
    pub triggered: bool,
}

impl From<u8> for FifoStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoStatus> for u8 {
    fn from(value: FifoStatus) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACT_INACT_CTL` register (address `0x27`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityControl {
    // Inactivity Z participation (bit 0).
    pub inactivity_z: bool,
    // Inactivity Y participation (bit 1).
    pub inactivity_y: bool,
    // Inactivity X participation (bit 2).
    pub inactivity_x: bool,
    // Inactivity coupling (bit 3).
    pub inactivity_coupling: Coupling,
    // Activity Z participation (bit 4).
    pub activity_z: bool,
    // Activity Y participation (bit 5).
    pub activity_y: bool,
    // Activity X participation (bit 6).
    pub activity_x: bool,
    // Activity coupling (bit 7).
    pub activity_coupling: Coupling,
}

impl ActivityControl {
    /// Returns `true` if `axis` participates in activity detection.
    pub fn activity_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.activity_x(),
            Axis::Y => self.activity_y(),
            Axis::Z => self.activity_z(),
        }
    }

    /// Includes or excludes `axis` from activity detection.
    pub fn set_activity_axis(&mut self, axis: Axis, enabled: bool) {
        match axis {
            Axis::X => self.set_activity_x(enabled),
            Axis::Y => self.set_activity_y(enabled),
            Axis::Z => self.set_activity_z(enabled),
        }
    }

    /// Returns `true` if `axis` participates in inactivity detection.
    pub fn inactivity_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.inactivity_x(),
            Axis::Y => self.inactivity_y(),
            Axis::Z => self.inactivity_z(),
        }
    }

    /// Includes or excludes `axis` from inactivity detection.
    pub fn set_inactivity_axis(&mut self, axis: Axis, enabled: bool) {
        match axis {
            Axis::X => self.set_inactivity_x(enabled),
            Axis::Y => self.set_inactivity_y(enabled),
            Axis::Z => self.set_inactivity_z(enabled),
        }
    }
}

impl From<u8> for ActivityControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ActivityControl> for u8 {
    fn from(value: ActivityControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `TAP_AXES` register (address `0x2A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapAxes {
    // Z-axis tap detection (bit 0).
    pub z: bool,
    // Y-axis tap detection (bit 1).
    pub y: bool,
    // X-axis tap detection (bit 2).
    pub x: bool,
    // Double-tap suppression on high acceleration between taps (bit 3).
    pub suppress: bool,
    #[skip]
    __: B4,
}

impl TapAxes {
    /// Returns `true` if tap detection is enabled on `axis`.
    pub fn axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x(),
            Axis::Y => self.y(),
            Axis::Z => self.z(),
        }
    }

    /// Enables or disables tap detection on `axis`.
    pub fn set_axis(&mut self, axis: Axis, enabled: bool) {
        match axis {
            Axis::X => self.set_x(enabled),
            Axis::Y => self.set_y(enabled),
            Axis::Z => self.set_z(enabled),
        }
    }
}

impl From<u8> for TapAxes {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<TapAxes> for u8 {
    fn from(value: TapAxes) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACT_TAP_STATUS` register (address `0x2B`).
///
/// Axis bits name the first axis involved in the last tap or activity event.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityTapStatus {
    // Tap on Z (bit 0).
    pub tap_z: bool,
    // Tap on Y (bit 1).
    pub tap_y: bool,
    // Tap on X (bit 2).
    pub tap_x: bool,
    // Device is asleep (bit 3).
    pub asleep: bool,
    // Activity on Z (bit 4).
    pub activity_z: bool,
    // Activity on Y (bit 5).
    pub activity_y: bool,
    // Activity on X (bit 6).
    pub activity_x: bool,
    #[skip]
    __: B1,
}

impl From<u8> for ActivityTapStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ActivityTapStatus> for u8 {
    fn from(value: ActivityTapStatus) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for BwRate {
    const ADDRESS: u8 = REG_BW_RATE;
}

impl Register for PowerControl {
    const ADDRESS: u8 = REG_POWER_CTL;
}

impl Register for DataFormat {
    const ADDRESS: u8 = REG_DATA_FORMAT;
}

impl Register for FifoControl {
    const ADDRESS: u8 = REG_FIFO_CTL;
}

impl Register for FifoStatus {
    const ADDRESS: u8 = REG_FIFO_STATUS;
}

impl Register for ActivityControl {
    const ADDRESS: u8 = REG_ACT_INACT_CTL;
}

impl Register for TapAxes {
    const ADDRESS: u8 = REG_TAP_AXES;
}

impl Register for ActivityTapStatus {
    const ADDRESS: u8 = REG_ACT_TAP_STATUS;
}
