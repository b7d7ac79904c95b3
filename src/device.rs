//! High-level ADXL345 device driver implementation.

use crate::config::{Config, MAX_WATERMARK};
use crate::decode::{DecodeConfig, PhysicalSample};
use crate::error::{Error, Result};
use crate::fifo::{self, FifoSettings};
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::interface::Adxl345Interface;
use crate::interrupt::{self, InterruptEvent};
use crate::log;
use crate::params::{
    Axis, Coupling, FifoMode, InterruptPin, Justify, OutputDataRate, Range, WakeupFrequency,
};
use crate::registers::{
    ActivityControl,
    ActivityTapStatus,
    BwRate,
    DataFormat,
    FifoControl,
    FifoStatus,
    InterruptFlags,
    PowerControl,
    Register,
    TapAxes,
    EXPECTED_DEVID,
    REG_BW_RATE,
    REG_DATA_FORMAT,
    REG_DEVID,
    REG_DUR,
    REG_FIFO_CTL,
    REG_INT_ENABLE,
    REG_INT_MAP,
    REG_INT_SOURCE,
    REG_LATENT,
    REG_OFSX,
    REG_POWER_CTL,
    REG_THRESH_ACT,
    REG_THRESH_FF,
    REG_THRESH_INACT,
    REG_THRESH_TAP,
    REG_TIME_FF,
    REG_TIME_INACT,
    REG_WINDOW,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

// ADXL345 datasheet turn-on time is 1.1 ms; rounded up.
const POWER_UP_DELAY_MS: u32 = 2;

/// Static chip characteristics from the datasheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipInfo {
    /// Chip name.
    pub chip_name: &'static str,
    /// Manufacturer name.
    pub manufacturer_name: &'static str,
    /// Supported bus interfaces.
    pub interface: &'static str,
    /// Minimum supply voltage in volts.
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage in volts.
    pub supply_voltage_max_v: f32,
    /// Maximum supply current in milliamps.
    pub max_current_ma: f32,
    /// Minimum operating temperature in °C.
    pub temperature_min: f32,
    /// Maximum operating temperature in °C.
    pub temperature_max: f32,
    /// Driver version, `major * 1000 + minor * 100 + patch`.
    pub driver_version: u32,
}

/// Datasheet characteristics of the ADXL345.
pub const CHIP_INFO: ChipInfo = ChipInfo {
    chip_name: "Analog Devices ADXL345",
    manufacturer_name: "Analog Devices",
    interface: "I2C SPI",
    supply_voltage_min_v: 2.0,
    supply_voltage_max_v: 3.6,
    max_current_ma: 0.14,
    temperature_min: -40.0,
    temperature_max: 85.0,
    driver_version: 100,
};

/// High-level synchronous driver for the ADXL345 accelerometer.
///
/// The driver owns its bus interface. Apart from construction, [`device_id`](Self::device_id)
/// and [`init`](Self::init), every operation fails with [`Error::NotInitialized`] until
/// `init` has succeeded.
pub struct Adxl345<IFACE> {
    interface: IFACE,
    config: Config,
    initialized: bool,
}

impl<IFACE> Adxl345<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            initialized: false,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns a shared reference to the last applied configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` once [`init`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the static chip characteristics.
    pub const fn info() -> ChipInfo {
        CHIP_INFO
    }
}

impl<SPI> Adxl345<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == Bus Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<I2C> Adxl345<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports.
    pub fn new_i2c(i2c: I2C, address: u8, config: Config) -> Self {
        Self::new(I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I2C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Adxl345<IFACE>
where
    IFACE: Adxl345Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Initializes the sensor using the current configuration.
    ///
    /// Waits out the power-up time, verifies `DEVID`, programs every configuration
    /// register and starts measuring.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        delay.delay_ms(POWER_UP_DELAY_MS);
        self.check_device_id()?;

        let config = self.config;
        self.apply_config(&config, config.power_control(true))?;

        self.initialized = true;
        log::debug!("adxl345 initialized");
        Ok(())
    }

    /// Stops measuring, puts the device to sleep and marks the driver uninitialized.
    pub fn deinit(&mut self) -> Result<(), CommE> {
        self.ensure_initialized()?;

        self.update_power_control(|power| {
            power.set_measure(false);
            power.set_sleep(true);
        })?;

        self.initialized = false;
        log::debug!("adxl345 deinitialized");
        Ok(())
    }

    /// Applies a new configuration to the device.
    ///
    /// The measurement, sleep, link and auto-sleep bits of `POWER_CTL` are preserved.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        self.ensure_initialized()?;
        config.validate().map_err(|_| Error::InvalidConfig)?;

        let mut power = self.read_image::<PowerControl>()?;
        power.set_wakeup(config.wakeup);
        self.apply_config(&config, power)?;

        self.config = config;
        Ok(())
    }

    // ==================================================================
    // == Identification & Raw Access ===================================
    // ==================================================================
    /// Reads `DEVID`.
    pub fn device_id(&mut self) -> Result<u8, CommE> {
        Ok(self.interface.read_register(REG_DEVID)?)
    }

    /// Verifies `DEVID` against the ADXL345 identifier.
    pub fn check_device_id(&mut self) -> Result<(), CommE> {
        let id = self.device_id()?;
        if id != EXPECTED_DEVID {
            log::warn!("unexpected DEVID {=u8:#x}", id);
            return Err(Error::DeviceIdMismatch(id));
        }

        Ok(())
    }

    /// Reads consecutive registers starting at `register`.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CommE> {
        self.ensure_initialized()?;
        Ok(self.interface.read_many(register, buf)?)
    }

    /// Writes consecutive registers starting at `register`.
    pub fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), CommE> {
        self.ensure_initialized()?;
        Ok(self.interface.write_many(register, data)?)
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads the acquisition mode and output format currently programmed in the device.
    pub fn decode_config(&mut self) -> Result<DecodeConfig, CommE> {
        self.ensure_initialized()?;
        fifo::resolve_decode_config(&mut self.interface)
    }

    /// Reads and decodes acceleration samples into `samples`, returning how many were
    /// written.
    ///
    /// In bypass mode exactly one sample is read. In FIFO, stream and trigger modes
    /// up to `samples.len()` buffered samples are drained, oldest first, and an empty
    /// FIFO returns `Ok(0)`. The output format is re-read from the device on every
    /// call. On error `samples` is left unmodified.
    pub fn read(&mut self, samples: &mut [PhysicalSample]) -> Result<usize, CommE> {
        self.ensure_initialized()?;
        fifo::read_samples(&mut self.interface, samples).inspect_err(|err| {
            if matches!(err, Error::Interface(_)) {
                log::error!("sample read failed");
            }
        })
    }

    /// Reads `INT_SOURCE` and calls `on_event` once for each pending interrupt,
    /// from data ready down to overrun.
    ///
    /// Nothing is called if the register read fails.
    pub fn dispatch<F>(&mut self, on_event: F) -> Result<(), CommE>
    where
        F: FnMut(InterruptEvent),
    {
        self.ensure_initialized()?;
        interrupt::dispatch(&mut self.interface, on_event)
    }

    /// Reads the raw `INT_SOURCE` flags without dispatching them.
    pub fn interrupt_source(&mut self) -> Result<InterruptFlags, CommE> {
        self.ensure_initialized()?;
        Ok(InterruptFlags::from(self.interface.read_register(REG_INT_SOURCE)?))
    }

    // ==================================================================
    // == Output Format =================================================
    // ==================================================================
    /// Reads `DATA_FORMAT`.
    pub fn data_format(&mut self) -> Result<DataFormat, CommE> {
        self.ensure_initialized()?;
        self.read_image()
    }

    /// Sets the full-scale range.
    pub fn set_range(&mut self, range: Range) -> Result<(), CommE> {
        self.update_data_format(|format| format.set_range(range))
    }

    /// Sets the output justification.
    pub fn set_justify(&mut self, justify: Justify) -> Result<(), CommE> {
        self.update_data_format(|format| format.set_justify(justify))
    }

    /// Enables or disables full-resolution mode.
    pub fn set_full_resolution(&mut self, enabled: bool) -> Result<(), CommE> {
        self.update_data_format(|format| format.set_full_resolution(enabled))
    }

    /// Applies or removes the self-test electrostatic force.
    pub fn set_self_test(&mut self, enabled: bool) -> Result<(), CommE> {
        self.update_data_format(|format| format.set_self_test(enabled))
    }

    /// Updates the output data rate and low-power selection.
    pub fn set_output_data_rate(
        &mut self,
        rate: OutputDataRate,
        low_power: bool,
    ) -> Result<(), CommE> {
        self.ensure_initialized()?;
        if low_power && !rate.supports_low_power() {
            return Err(Error::InvalidConfig);
        }

        let updated = BwRate::new().with_rate(rate).with_low_power(low_power);
        self.interface.write_register(REG_BW_RATE, u8::from(updated))?;

        self.config.output_data_rate = rate;
        self.config.low_power = low_power;
        Ok(())
    }

    // ==================================================================
    // == FIFO ==========================================================
    // ==================================================================
    /// Updates FIFO mode, trigger pin, or watermark.
    pub fn configure_fifo(
        &mut self,
        mode: Option<FifoMode>,
        trigger_pin: Option<InterruptPin>,
        watermark: Option<u8>,
    ) -> Result<(), CommE> {
        self.ensure_initialized()?;
        if watermark.is_some_and(|samples| samples > MAX_WATERMARK) {
            return Err(Error::InvalidConfig);
        }

        let ctl = self.update_register(|ctl: &mut FifoControl| {
            if let Some(mode) = mode {
                ctl.set_mode(mode);
            }

            if let Some(pin) = trigger_pin {
                ctl.set_trigger(pin);
            }

            if let Some(samples) = watermark {
                ctl.set_samples(samples);
            }
        })?;

        self.config.fifo_mode = ctl.mode();
        self.config.trigger_pin = ctl.trigger();
        self.config.watermark = ctl.samples();
        Ok(())
    }

    /// Snapshot of the FIFO configuration register.
    pub fn fifo_settings(&mut self) -> Result<FifoSettings, CommE> {
        self.ensure_initialized()?;
        Ok(FifoSettings::from(self.read_image::<FifoControl>()?))
    }

    /// Reads `FIFO_STATUS` (entry count and trigger flag).
    pub fn fifo_status(&mut self) -> Result<FifoStatus, CommE> {
        self.ensure_initialized()?;
        fifo::read_fifo_status(&mut self.interface)
    }

    // ==================================================================
    // == Power =========================================================
    // ==================================================================
    /// Starts or stops measuring.
    pub fn set_measurement(&mut self, enabled: bool) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.update_power_control(|power| power.set_measure(enabled))
    }

    /// Enters or leaves sleep mode.
    pub fn set_sleep(&mut self, enabled: bool) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.update_power_control(|power| power.set_sleep(enabled))
    }

    /// Updates the `POWER_CTL` fields that do not change the measurement state.
    pub fn configure_power_ctl(
        &mut self,
        link: Option<bool>,
        auto_sleep: Option<bool>,
        wakeup: Option<WakeupFrequency>,
    ) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.update_power_control(|power| {
            if let Some(enabled) = link {
                power.set_link(enabled);
            }

            if let Some(enabled) = auto_sleep {
                power.set_auto_sleep(enabled);
            }

            if let Some(frequency) = wakeup {
                power.set_wakeup(frequency);
            }
        })?;

        if let Some(frequency) = wakeup {
            self.config.wakeup = frequency;
        }
        Ok(())
    }

    // ==================================================================
    // == Interrupts ====================================================
    // ==================================================================
    /// Writes `INT_ENABLE`.
    pub fn enable_interrupts(&mut self, flags: InterruptFlags) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.interface.write_register(REG_INT_ENABLE, u8::from(flags))?;
        self.config.interrupts_enabled = flags;
        Ok(())
    }

    /// Writes `INT_MAP`; set bits route to INT2, cleared bits to INT1.
    pub fn map_interrupts(&mut self, int2: InterruptFlags) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.interface.write_register(REG_INT_MAP, u8::from(int2))?;
        self.config.interrupts_on_int2 = int2;
        Ok(())
    }

    // ==================================================================
    // == Offsets =======================================================
    // ==================================================================
    /// Writes the X, Y and Z offset registers (15.6 mg/LSB).
    pub fn set_offsets(&mut self, x: i8, y: i8, z: i8) -> Result<(), CommE> {
        self.ensure_initialized()?;
        let data = [x as u8, y as u8, z as u8];
        Ok(self.interface.write_many(REG_OFSX, &data)?)
    }

    /// Reads the X, Y and Z offset registers.
    pub fn offsets(&mut self) -> Result<[i8; 3], CommE> {
        self.ensure_initialized()?;
        let mut raw = [0u8; 3];
        self.interface.read_many(REG_OFSX, &mut raw)?;
        Ok(raw.map(|value| value as i8))
    }

    // ==================================================================
    // == Tap Detection =================================================
    // ==================================================================
    /// Writes `THRESH_TAP` (62.5 mg/LSB). Zero may cause spurious tap interrupts.
    pub fn set_tap_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_byte(REG_THRESH_TAP, threshold)
    }

    /// Reads `THRESH_TAP`.
    pub fn tap_threshold(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_THRESH_TAP)
    }

    /// Writes `DUR`, the longest event that still counts as a tap (625 µs/LSB).
    ///
    /// Zero disables single and double tap detection.
    pub fn set_tap_duration(&mut self, duration: u8) -> Result<(), CommE> {
        self.write_byte(REG_DUR, duration)
    }

    /// Reads `DUR`.
    pub fn tap_duration(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_DUR)
    }

    /// Writes `LATENT`, the wait after a tap before the double-tap window opens
    /// (1.25 ms/LSB). Zero disables double tap detection.
    pub fn set_tap_latency(&mut self, latency: u8) -> Result<(), CommE> {
        self.write_byte(REG_LATENT, latency)
    }

    /// Reads `LATENT`.
    pub fn tap_latency(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_LATENT)
    }

    /// Writes `WINDOW`, the span in which a second tap is accepted (1.25 ms/LSB).
    pub fn set_tap_window(&mut self, window: u8) -> Result<(), CommE> {
        self.write_byte(REG_WINDOW, window)
    }

    /// Reads `WINDOW`.
    pub fn tap_window(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_WINDOW)
    }

    /// Enables or disables tap detection on one axis.
    pub fn set_tap_axis(&mut self, axis: Axis, enabled: bool) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.update_register(|axes: &mut TapAxes| axes.set_axis(axis, enabled))?;
        Ok(())
    }

    /// Suppresses double taps when acceleration above the threshold is seen between taps.
    pub fn set_tap_suppress(&mut self, enabled: bool) -> Result<(), CommE> {
        self.ensure_initialized()?;
        self.update_register(|axes: &mut TapAxes| axes.set_suppress(enabled))?;
        Ok(())
    }

    /// Reads `TAP_AXES`.
    pub fn tap_axes(&mut self) -> Result<TapAxes, CommE> {
        self.ensure_initialized()?;
        self.read_image()
    }

    // ==================================================================
    // == Activity & Inactivity =========================================
    // ==================================================================
    /// Writes `THRESH_ACT` (62.5 mg/LSB).
    pub fn set_activity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_byte(REG_THRESH_ACT, threshold)
    }

    /// Reads `THRESH_ACT`.
    pub fn activity_threshold(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_THRESH_ACT)
    }

    /// Writes `THRESH_INACT` (62.5 mg/LSB).
    pub fn set_inactivity_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_byte(REG_THRESH_INACT, threshold)
    }

    /// Reads `THRESH_INACT`.
    pub fn inactivity_threshold(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_THRESH_INACT)
    }

    /// Writes `TIME_INACT`, the seconds below threshold before inactivity is declared.
    pub fn set_inactivity_time(&mut self, seconds: u8) -> Result<(), CommE> {
        self.write_byte(REG_TIME_INACT, seconds)
    }

    /// Reads `TIME_INACT`.
    pub fn inactivity_time(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_TIME_INACT)
    }

    /// Includes or excludes one axis from activity detection.
    pub fn set_activity_axis(&mut self, axis: Axis, enabled: bool) -> Result<(), CommE> {
        self.update_activity_control(|ctl| ctl.set_activity_axis(axis, enabled))
    }

    /// Includes or excludes one axis from inactivity detection.
    pub fn set_inactivity_axis(&mut self, axis: Axis, enabled: bool) -> Result<(), CommE> {
        self.update_activity_control(|ctl| ctl.set_inactivity_axis(axis, enabled))
    }

    /// Selects AC or DC coupling for activity detection.
    pub fn set_activity_coupling(&mut self, coupling: Coupling) -> Result<(), CommE> {
        self.update_activity_control(|ctl| ctl.set_activity_coupling(coupling))
    }

    /// Selects AC or DC coupling for inactivity detection.
    pub fn set_inactivity_coupling(&mut self, coupling: Coupling) -> Result<(), CommE> {
        self.update_activity_control(|ctl| ctl.set_inactivity_coupling(coupling))
    }

    /// Reads `ACT_INACT_CTL`.
    pub fn activity_control(&mut self) -> Result<ActivityControl, CommE> {
        self.ensure_initialized()?;
        self.read_image()
    }

    /// Reads `ACT_TAP_STATUS`, naming the axes of the last tap or activity event.
    ///
    /// Read it before clearing `INT_SOURCE`; the axis bits change on the next event.
    pub fn activity_tap_status(&mut self) -> Result<ActivityTapStatus, CommE> {
        self.ensure_initialized()?;
        self.read_image()
    }

    // ==================================================================
    // == Free Fall =====================================================
    // ==================================================================
    /// Writes `THRESH_FF` (62.5 mg/LSB); 300 mg to 600 mg is recommended.
    pub fn set_free_fall_threshold(&mut self, threshold: u8) -> Result<(), CommE> {
        self.write_byte(REG_THRESH_FF, threshold)
    }

    /// Reads `THRESH_FF`.
    pub fn free_fall_threshold(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_THRESH_FF)
    }

    /// Writes `TIME_FF` (5 ms/LSB); 100 ms to 350 ms is recommended.
    pub fn set_free_fall_time(&mut self, time: u8) -> Result<(), CommE> {
        self.write_byte(REG_TIME_FF, time)
    }

    /// Reads `TIME_FF`.
    pub fn free_fall_time(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_TIME_FF)
    }

    // ==================================================================
    // == Internal Configuration Helpers =================================
    // ==================================================================
    fn ensure_initialized(&self) -> Result<(), CommE> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.ensure_initialized()?;
        Ok(self.interface.write_register(register, value)?)
    }

    fn read_byte(&mut self, register: u8) -> Result<u8, CommE> {
        self.ensure_initialized()?;
        Ok(self.interface.read_register(register)?)
    }

    fn apply_config(&mut self, config: &Config, power: PowerControl) -> Result<(), CommE> {
        self.interface
            .write_register(REG_DATA_FORMAT, u8::from(config.data_format()))?;
        self.interface
            .write_register(REG_BW_RATE, u8::from(config.bw_rate()))?;
        self.interface
            .write_register(REG_FIFO_CTL, u8::from(config.fifo_control()))?;
        self.interface
            .write_register(REG_INT_MAP, u8::from(config.interrupts_on_int2))?;
        self.interface
            .write_register(REG_INT_ENABLE, u8::from(config.interrupts_enabled))?;
        self.interface.write_register(REG_POWER_CTL, u8::from(power))?;
        Ok(())
    }

    fn read_image<R: Register>(&mut self) -> Result<R, CommE> {
        Ok(R::from(self.interface.read_register(R::ADDRESS)?))
    }

    /// Read-modify-write of a single register; the write is skipped when nothing changed.
    fn update_register<R, F>(&mut self, mutate: F) -> Result<R, CommE>
    where
        R: Register,
        F: FnOnce(&mut R),
    {
        let current = self.interface.read_register(R::ADDRESS)?;

        let mut value = R::from(current);
        mutate(&mut value);

        let updated: u8 = value.into();
        if updated != current {
            self.interface.write_register(R::ADDRESS, updated)?;
        }

        Ok(value)
    }

    fn update_data_format<F>(&mut self, mutate: F) -> Result<(), CommE>
    where
        F: FnOnce(&mut DataFormat),
    {
        self.ensure_initialized()?;
        let format = self.update_register::<DataFormat, F>(mutate)?;

        self.config.range = format.range();
        self.config.justify = format.justify();
        self.config.full_resolution = format.full_resolution();
        self.config.interrupt_polarity = format.interrupt_polarity();
        self.config.spi_wire = format.spi_wire();
        Ok(())
    }

    fn update_power_control<F>(&mut self, mutate: F) -> Result<(), CommE>
    where
        F: FnOnce(&mut PowerControl),
    {
        self.update_register::<PowerControl, F>(mutate)?;
        Ok(())
    }

    fn update_activity_control<F>(&mut self, mutate: F) -> Result<(), CommE>
    where
        F: FnOnce(&mut ActivityControl),
    {
        self.ensure_initialized()?;
        self.update_register::<ActivityControl, F>(mutate)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::mock::{Access, BusFault, RegisterMap};
    use crate::params::{
        free_fall_time_from_ms, tap_duration_from_us, tap_timing_from_ms, threshold_from_g,
    };
    use crate::registers::{
        REG_ACT_INACT_CTL, REG_ACT_TAP_STATUS, REG_DATAX0, REG_FIFO_STATUS, REG_TAP_AXES,
    };
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn powered_up(bus: RegisterMap, config: Config) -> Adxl345<RegisterMap> {
        let mut device = Adxl345::new(bus.with(REG_DEVID, EXPECTED_DEVID), config);
        device.init(&mut NoopDelay::new()).unwrap();
        device.interface_mut().accesses.clear();
        device
    }

    #[test]
    fn init_programs_configuration_and_starts_measuring() {
        let config = Config::new()
            .range(Range::G8)
            .full_resolution(true)
            .fifo_mode(FifoMode::Stream)
            .watermark(20)
            .interrupts_enabled(InterruptFlags::from_events(&[InterruptEvent::Watermark]))
            .interrupts_on_int2(InterruptFlags::from_events(&[InterruptEvent::Overrun]))
            .build();
        let device = powered_up(RegisterMap::new(), config);

        assert!(device.is_initialized());
        let (bus, _) = device.release();
        assert_eq!(bus.registers[REG_DATA_FORMAT as usize], 0b0000_1010);
        assert_eq!(bus.registers[REG_BW_RATE as usize], 0x0A);
        assert_eq!(bus.registers[REG_FIFO_CTL as usize], 0b1001_0100);
        assert_eq!(bus.registers[REG_INT_ENABLE as usize], 0b0000_0010);
        assert_eq!(bus.registers[REG_INT_MAP as usize], 0b0000_0001);
        assert_eq!(bus.registers[REG_POWER_CTL as usize], 0b0000_1000);
    }

    #[test]
    fn init_rejects_foreign_device_id() {
        let mut device = Adxl345::new(RegisterMap::new().with(REG_DEVID, 0xE6), Config::default());

        assert_eq!(
            device.init(&mut NoopDelay::new()),
            Err(Error::DeviceIdMismatch(0xE6))
        );
        assert!(!device.is_initialized());
        assert_eq!(device.interface_mut().registers[REG_POWER_CTL as usize], 0);
    }

    #[test]
    fn init_rejects_invalid_config_before_bus_traffic() {
        let config = Config::new().watermark(40).build();
        let mut device = Adxl345::new(RegisterMap::new(), config);

        assert_eq!(device.init(&mut NoopDelay::new()), Err(Error::InvalidConfig));
        assert!(device.interface_mut().accesses.is_empty());
    }

    #[test]
    fn uninitialized_driver_refuses_core_operations_without_bus_traffic() {
        let mut device = Adxl345::new(RegisterMap::new(), Config::default());
        let mut out = [PhysicalSample::default(); 2];
        let mut calls = 0;

        assert_eq!(device.read(&mut out), Err(Error::NotInitialized));
        assert_eq!(device.dispatch(|_| calls += 1), Err(Error::NotInitialized));
        assert_eq!(device.decode_config(), Err(Error::NotInitialized));
        assert_eq!(device.set_range(Range::G4), Err(Error::NotInitialized));
        assert_eq!(
            device.read_registers(REG_DEVID, &mut [0u8; 1]),
            Err(Error::NotInitialized)
        );
        assert_eq!(calls, 0);
        assert!(device.interface_mut().accesses.is_empty());
    }

    #[test]
    fn read_rejects_empty_buffer() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        assert_eq!(device.read(&mut []), Err(Error::LengthZero));
        assert!(device.interface_mut().accesses.is_empty());
    }

    #[test]
    fn read_follows_reconfiguration_between_calls() {
        let record = [0x00, 0x19, 0, 0, 0, 0]; // 100 counts, left-justified in 10 bits
        let mut device = powered_up(RegisterMap::new().with_data(&record), Config::default());
        let mut out = [PhysicalSample::default(); 1];

        device.set_justify(Justify::Left).unwrap();
        assert_eq!(device.read(&mut out), Ok(1));
        assert!((out[0].x - 0.39).abs() < 1e-4);

        device.set_range(Range::G16).unwrap();
        assert_eq!(device.read(&mut out), Ok(1));
        assert!((out[0].x - 3.12).abs() < 1e-4);
    }

    #[test]
    fn fifo_mode_read_drains_available_samples() {
        let config = Config::new().fifo_mode(FifoMode::Fifo).build();
        let data = [1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0];
        let mut device = powered_up(
            RegisterMap::new().with(REG_FIFO_STATUS, 2).with_data(&data),
            config,
        );
        let mut out = [PhysicalSample::default(); 10];

        assert_eq!(device.read(&mut out), Ok(2));
        assert!((out[1].z - 6.0 * 0.0039).abs() < 1e-4);
        assert_eq!(
            device.interface_mut().accesses.last(),
            Some(&Access::Read {
                register: REG_DATAX0,
                len: 12
            })
        );
    }

    #[test]
    fn dispatch_reports_events_in_priority_order() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        device.interface_mut().registers[REG_INT_SOURCE as usize] = 0b0101_0001;

        let mut seen = Vec::new();
        device.dispatch(|event| seen.push(event)).unwrap();
        assert_eq!(
            seen,
            [
                InterruptEvent::SingleTap,
                InterruptEvent::Activity,
                InterruptEvent::Overrun
            ]
        );
    }

    #[test]
    fn dispatch_failure_invokes_nothing() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        device.interface_mut().registers[REG_INT_SOURCE as usize] = 0xFF;
        device.interface_mut().fail_on = Some(REG_INT_SOURCE);

        let mut calls = 0;
        assert_eq!(
            device.dispatch(|_| calls += 1),
            Err(Error::Interface(BusFault))
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn data_format_setters_preserve_other_fields() {
        let config = Config::new().full_resolution(true).build();
        let mut device = powered_up(RegisterMap::new(), config);

        device.set_range(Range::G4).unwrap();
        device.set_justify(Justify::Left).unwrap();

        let format = device.data_format().unwrap();
        assert_eq!(format.range(), Range::G4);
        assert_eq!(format.justify(), Justify::Left);
        assert!(format.full_resolution());
        assert_eq!(device.config().range, Range::G4);
    }

    #[test]
    fn unchanged_fifo_settings_skip_the_write() {
        let config = Config::new().fifo_mode(FifoMode::Stream).watermark(8).build();
        let mut device = powered_up(RegisterMap::new(), config);

        device
            .configure_fifo(Some(FifoMode::Stream), None, Some(8))
            .unwrap();
        assert_eq!(
            device.interface_mut().accesses,
            [Access::Read {
                register: REG_FIFO_CTL,
                len: 1
            }]
        );

        device
            .configure_fifo(None, Some(InterruptPin::Int2), None)
            .unwrap();
        assert_eq!(
            device.fifo_settings().unwrap(),
            FifoSettings::new(8, FifoMode::Stream, InterruptPin::Int2)
        );
    }

    #[test]
    fn oversized_watermark_is_rejected() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        assert_eq!(
            device.configure_fifo(None, None, Some(32)),
            Err(Error::InvalidConfig)
        );
        assert!(device.interface_mut().accesses.is_empty());
    }

    #[test]
    fn low_power_rate_outside_window_is_rejected() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        assert_eq!(
            device.set_output_data_rate(OutputDataRate::Hz1600, true),
            Err(Error::InvalidConfig)
        );
        device
            .set_output_data_rate(OutputDataRate::Hz200, true)
            .unwrap();
        assert_eq!(device.interface_mut().registers[REG_BW_RATE as usize], 0x1B);
    }

    #[test]
    fn offsets_are_written_as_one_burst() {
        let mut device = powered_up(RegisterMap::new(), Config::default());

        device.set_offsets(-2, 0, 127).unwrap();
        assert_eq!(device.offsets().unwrap(), [-2, 0, 127]);
        assert_eq!(
            device.interface_mut().accesses[0],
            Access::Write {
                register: REG_OFSX,
                len: 3
            }
        );
    }

    #[test]
    fn deinit_sleeps_and_blocks_further_use() {
        let mut device = powered_up(RegisterMap::new(), Config::default());

        device.deinit().unwrap();
        assert!(!device.is_initialized());
        assert_eq!(device.interface_mut().registers[REG_POWER_CTL as usize], 0b0000_0100);
        assert_eq!(device.deinit(), Err(Error::NotInitialized));
    }

    #[test]
    fn configure_keeps_measurement_running() {
        let mut device = powered_up(RegisterMap::new(), Config::default());
        let config = Config::new()
            .range(Range::G16)
            .wakeup(WakeupFrequency::Hz1)
            .build();

        device.configure(config).unwrap();
        let (bus, applied) = device.release();
        assert_eq!(applied, config);
        assert_eq!(bus.registers[REG_DATA_FORMAT as usize], 0b0000_0011);
        assert_eq!(bus.registers[REG_POWER_CTL as usize], 0b0000_1011);
    }

    #[test]
    fn init_and_read_over_i2c() {
        let address = crate::interface::i2c::DEFAULT_ADDRESS;
        let expectations = [
            I2cTransaction::write_read(address, vec![REG_DEVID], vec![EXPECTED_DEVID]),
            I2cTransaction::write(address, vec![REG_DATA_FORMAT, 0x00]),
            I2cTransaction::write(address, vec![REG_BW_RATE, 0x0A]),
            I2cTransaction::write(address, vec![REG_FIFO_CTL, 0x00]),
            I2cTransaction::write(address, vec![REG_INT_MAP, 0x00]),
            I2cTransaction::write(address, vec![REG_INT_ENABLE, 0x00]),
            I2cTransaction::write(address, vec![REG_POWER_CTL, 0x08]),
            I2cTransaction::write_read(address, vec![REG_FIFO_CTL], vec![0x00]),
            I2cTransaction::write_read(address, vec![REG_DATA_FORMAT], vec![0x00]),
            I2cTransaction::write_read(
                address,
                vec![REG_DATAX0],
                vec![0x64, 0x00, 0x9C, 0xFF, 0x00, 0x01],
            ),
        ];
        let mut device = Adxl345::new_i2c(I2cMock::new(&expectations), address, Config::default());

        device.init(&mut NoopDelay::new()).unwrap();
        let mut out = [PhysicalSample::default(); 4];
        assert_eq!(device.read(&mut out), Ok(1));
        assert!((out[0].x - 0.39).abs() < 1e-4);
        assert!((out[0].y + 0.39).abs() < 1e-4);
        assert!((out[0].z - 256.0 * 0.0039).abs() < 1e-4);

        let (mut i2c, _) = device.release_i2c();
        i2c.done();
    }

    #[test]
    fn chip_info_reports_adxl345() {
        let info = Adxl345::<RegisterMap>::info();
        assert_eq!(info.chip_name, "Analog Devices ADXL345");
        assert_eq!(info.supply_voltage_max_v, 3.6);
    }

    #[test]
    fn motion_settings_refuse_uninitialized_driver() {
        let mut device = Adxl345::new(RegisterMap::new(), Config::default());

        assert_eq!(device.set_tap_duration(16), Err(Error::NotInitialized));
        assert_eq!(device.set_tap_axis(Axis::X, true), Err(Error::NotInitialized));
        assert_eq!(
            device.set_activity_coupling(Coupling::Ac),
            Err(Error::NotInitialized)
        );
        assert_eq!(device.free_fall_time(), Err(Error::NotInitialized));
        assert_eq!(device.activity_tap_status(), Err(Error::NotInitialized));
        assert!(device.interface_mut().accesses.is_empty());
    }

    #[test]
    fn tap_timing_lands_in_its_registers() {
        let mut device = powered_up(RegisterMap::new(), Config::default());

        device.set_tap_threshold(threshold_from_g(3.0)).unwrap();
        device.set_tap_duration(tap_duration_from_us(10_000)).unwrap();
        device.set_tap_latency(tap_timing_from_ms(20.0)).unwrap();
        device.set_tap_window(tap_timing_from_ms(300.0)).unwrap();

        assert_eq!(device.tap_threshold(), Ok(48));
        assert_eq!(device.tap_duration(), Ok(16));
        assert_eq!(device.tap_latency(), Ok(16));
        assert_eq!(device.tap_window(), Ok(240));
        let registers = device.interface_mut().registers;
        assert_eq!(registers[0x1D..=0x23], [48, 0, 0, 0, 16, 16, 240]);
    }

    #[test]
    fn tap_axis_updates_preserve_suppress_bit() {
        let mut device = powered_up(
            RegisterMap::new().with(REG_TAP_AXES, 0b0000_1000),
            Config::default(),
        );

        device.set_tap_axis(Axis::Z, true).unwrap();
        device.set_tap_axis(Axis::X, true).unwrap();
        assert_eq!(
            device.interface_mut().registers[REG_TAP_AXES as usize],
            0b0000_1101
        );

        device.set_tap_suppress(false).unwrap();
        let axes = device.tap_axes().unwrap();
        assert!(!axes.suppress());
        assert!(axes.axis(Axis::X));
        assert!(!axes.axis(Axis::Y));
    }

    #[test]
    fn repeated_tap_axis_update_skips_the_write() {
        let mut device = powered_up(
            RegisterMap::new().with(REG_TAP_AXES, 0b0000_0001),
            Config::default(),
        );

        device.set_tap_axis(Axis::Z, true).unwrap();
        assert_eq!(
            device.interface_mut().accesses,
            [Access::Read {
                register: REG_TAP_AXES,
                len: 1
            }]
        );
    }

    #[test]
    fn activity_control_is_built_up_field_by_field() {
        let mut device = powered_up(RegisterMap::new(), Config::default());

        device.set_activity_threshold(threshold_from_g(0.5)).unwrap();
        device.set_inactivity_threshold(threshold_from_g(0.25)).unwrap();
        device.set_inactivity_time(5).unwrap();
        device.set_activity_axis(Axis::Z, true).unwrap();
        device.set_activity_coupling(Coupling::Ac).unwrap();
        device.set_inactivity_axis(Axis::X, true).unwrap();
        device.set_inactivity_axis(Axis::Y, true).unwrap();
        device.set_inactivity_axis(Axis::Y, false).unwrap();

        assert_eq!(device.activity_threshold(), Ok(8));
        assert_eq!(device.inactivity_threshold(), Ok(4));
        assert_eq!(device.inactivity_time(), Ok(5));
        assert_eq!(
            device.interface_mut().registers[REG_ACT_INACT_CTL as usize],
            0b1001_0100
        );

        let ctl = device.activity_control().unwrap();
        assert_eq!(ctl.activity_coupling(), Coupling::Ac);
        assert_eq!(ctl.inactivity_coupling(), Coupling::Dc);
        assert!(ctl.activity_axis(Axis::Z));
        assert!(!ctl.inactivity_axis(Axis::Y));
    }

    #[test]
    fn free_fall_settings_round_trip() {
        let mut device = powered_up(RegisterMap::new(), Config::default());

        device.set_free_fall_threshold(threshold_from_g(0.5)).unwrap();
        device.set_free_fall_time(free_fall_time_from_ms(350)).unwrap();

        assert_eq!(device.free_fall_threshold(), Ok(8));
        assert_eq!(device.free_fall_time(), Ok(70));
    }

    #[test]
    fn tap_event_reports_axis_through_status() {
        let config = Config::new()
            .interrupts_enabled(InterruptFlags::from_events(&[InterruptEvent::SingleTap]))
            .build();
        let mut device = powered_up(RegisterMap::new(), config);
        device.set_tap_axis(Axis::Y, true).unwrap();

        device.interface_mut().registers[REG_INT_SOURCE as usize] = 0b0100_0000;
        device.interface_mut().registers[REG_ACT_TAP_STATUS as usize] = 0b0000_0010;

        let mut seen = Vec::new();
        device.dispatch(|event| seen.push(event)).unwrap();
        assert_eq!(seen, [InterruptEvent::SingleTap]);

        let status = device.activity_tap_status().unwrap();
        assert!(status.tap_y());
        assert!(!status.tap_x());
        assert!(!status.asleep());
    }

    #[test]
    fn self_test_toggles_only_its_bit() {
        let config = Config::new().range(Range::G16).full_resolution(true).build();
        let mut device = powered_up(RegisterMap::new(), config);

        device.set_self_test(true).unwrap();
        assert_eq!(
            device.interface_mut().registers[REG_DATA_FORMAT as usize],
            0b1000_1011
        );

        device.set_self_test(false).unwrap();
        assert!(!device.data_format().unwrap().self_test());
        assert_eq!(device.config().range, Range::G16);
    }
}
