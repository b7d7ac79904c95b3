//! Configuration primitives for the ADXL345 driver.

use crate::params::{
    FifoMode, InterruptPin, InterruptPolarity, Justify, OutputDataRate, Range, SpiWire,
    WakeupFrequency,
};
use crate::registers::{BwRate, DataFormat, FifoControl, InterruptFlags, PowerControl};

/// Largest value accepted by `FIFO_CTL.SAMPLES`.
pub const MAX_WATERMARK: u8 = 31;

/// User-facing configuration for the ADXL345 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Full-scale range.
    pub range: Range,
    /// Output justification.
    pub justify: Justify,
    /// Full-resolution mode (3.9 mg/LSB for every range).
    pub full_resolution: bool,
    /// Interrupt pin polarity.
    pub interrupt_polarity: InterruptPolarity,
    /// SPI wiring; irrelevant on I2C.
    pub spi_wire: SpiWire,
    /// Output data rate.
    pub output_data_rate: OutputDataRate,
    /// Reduced power operation.
    pub low_power: bool,
    /// FIFO operating mode.
    pub fifo_mode: FifoMode,
    /// Pin whose interrupt latches the trigger event in trigger mode.
    pub trigger_pin: InterruptPin,
    /// FIFO watermark in samples.
    pub watermark: u8,
    /// Interrupts enabled in `INT_ENABLE`.
    pub interrupts_enabled: InterruptFlags,
    /// Interrupts routed to INT2 in `INT_MAP`; the rest go to INT1.
    pub interrupts_on_int2: InterruptFlags,
    /// Reading frequency while asleep.
    pub wakeup: WakeupFrequency,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.watermark > MAX_WATERMARK {
            return Err(ConfigError::WatermarkOutOfRange);
        }

        if self.low_power && !self.output_data_rate.supports_low_power() {
            return Err(ConfigError::LowPowerRateUnsupported);
        }

        Ok(())
    }

    pub(crate) fn data_format(&self) -> DataFormat {
        DataFormat::new()
            .with_range(self.range)
            .with_justify(self.justify)
            .with_full_resolution(self.full_resolution)
            .with_interrupt_polarity(self.interrupt_polarity)
            .with_spi_wire(self.spi_wire)
    }

    pub(crate) fn bw_rate(&self) -> BwRate {
        BwRate::new()
            .with_rate(self.output_data_rate)
            .with_low_power(self.low_power)
    }

    pub(crate) fn fifo_control(&self) -> FifoControl {
        FifoControl::new()
            .with_mode(self.fifo_mode)
            .with_trigger(self.trigger_pin)
            .with_samples(self.watermark)
    }

    pub(crate) fn power_control(&self, measure: bool) -> PowerControl {
        PowerControl::new()
            .with_wakeup(self.wakeup)
            .with_measure(measure)
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the full-scale range.
    pub fn range(mut self, range: Range) -> Self {
        self.config.range = range;
        self
    }

    /// Overrides the output justification.
    pub fn justify(mut self, justify: Justify) -> Self {
        self.config.justify = justify;
        self
    }

    /// Enables or disables full-resolution mode.
    pub fn full_resolution(mut self, enabled: bool) -> Self {
        self.config.full_resolution = enabled;
        self
    }

    /// Sets the interrupt pin polarity.
    pub fn interrupt_polarity(mut self, polarity: InterruptPolarity) -> Self {
        self.config.interrupt_polarity = polarity;
        self
    }

    /// Selects 3- or 4-wire SPI.
    pub fn spi_wire(mut self, wire: SpiWire) -> Self {
        self.config.spi_wire = wire;
        self
    }

    /// Overrides the output data rate.
    pub fn output_data_rate(mut self, rate: OutputDataRate) -> Self {
        self.config.output_data_rate = rate;
        self
    }

    /// Enables reduced power operation.
    pub fn low_power(mut self, enabled: bool) -> Self {
        self.config.low_power = enabled;
        self
    }

    /// Sets the FIFO mode.
    pub fn fifo_mode(mut self, mode: FifoMode) -> Self {
        self.config.fifo_mode = mode;
        self
    }

    /// Sets the trigger pin used in trigger mode.
    pub fn trigger_pin(mut self, pin: InterruptPin) -> Self {
        self.config.trigger_pin = pin;
        self
    }

    /// Sets the FIFO watermark.
    pub fn watermark(mut self, samples: u8) -> Self {
        self.config.watermark = samples;
        self
    }

    /// Sets the enabled interrupts.
    pub fn interrupts_enabled(mut self, flags: InterruptFlags) -> Self {
        self.config.interrupts_enabled = flags;
        self
    }

    /// Routes the given interrupts to INT2.
    pub fn interrupts_on_int2(mut self, flags: InterruptFlags) -> Self {
        self.config.interrupts_on_int2 = flags;
        self
    }

    /// Sets the sleep-mode reading frequency.
    pub fn wakeup(mut self, wakeup: WakeupFrequency) -> Self {
        self.config.wakeup = wakeup;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range: Range::G2,
            justify: Justify::Right,
            full_resolution: false,
            interrupt_polarity: InterruptPolarity::ActiveHigh,
            spi_wire: SpiWire::FourWire,
            output_data_rate: OutputDataRate::Hz100,
            low_power: false,
            fifo_mode: FifoMode::Bypass,
            trigger_pin: InterruptPin::Int1,
            watermark: 0,
            interrupts_enabled: InterruptFlags::new(),
            interrupts_on_int2: InterruptFlags::new(),
            wakeup: WakeupFrequency::Hz8,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Watermark does not fit in the 5-bit `FIFO_CTL.SAMPLES` field.
    WatermarkOutOfRange,
    /// Low power mode is only available from 12.5 Hz to 400 Hz.
    LowPowerRateUnsupported,
}
