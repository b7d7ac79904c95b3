//! Interrupt sources and event dispatch.

use crate::error::Result;
use crate::interface::Adxl345Interface;
use crate::log;
use crate::registers::{InterruptFlags, REG_INT_SOURCE};

/// A single interrupt condition reported in `INT_SOURCE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptEvent {
    /// New data is available (bit 7).
    DataReady,
    /// Single tap detected (bit 6).
    SingleTap,
    /// Double tap detected (bit 5).
    DoubleTap,
    /// Acceleration above the activity threshold (bit 4).
    Activity,
    /// Acceleration below the inactivity threshold for the inactivity time (bit 3).
    Inactivity,
    /// Free fall detected (bit 2).
    FreeFall,
    /// FIFO holds at least the watermark number of samples (bit 1).
    Watermark,
    /// FIFO samples were overwritten before being read (bit 0).
    Overrun,
}

impl InterruptEvent {
    /// All events in dispatch order, highest bit first.
    pub const PRIORITY: [Self; 8] = [
        Self::DataReady,
        Self::SingleTap,
        Self::DoubleTap,
        Self::Activity,
        Self::Inactivity,
        Self::FreeFall,
        Self::Watermark,
        Self::Overrun,
    ];

    /// Bit position of the event in `INT_SOURCE`, `INT_ENABLE` and `INT_MAP`.
    pub const fn bit(self) -> u8 {
        match self {
            Self::DataReady => 7,
            Self::SingleTap => 6,
            Self::DoubleTap => 5,
            Self::Activity => 4,
            Self::Inactivity => 3,
            Self::FreeFall => 2,
            Self::Watermark => 1,
            Self::Overrun => 0,
        }
    }

    /// Register mask selecting the event.
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }
}

impl InterruptFlags {
    /// Returns `true` if the bit for `event` is set.
    pub fn contains(self, event: InterruptEvent) -> bool {
        u8::from(self) & event.mask() != 0
    }

    /// Returns a copy with the bit for `event` set or cleared.
    pub fn with_event(self, event: InterruptEvent, enabled: bool) -> Self {
        let raw = u8::from(self);
        Self::from(if enabled {
            raw | event.mask()
        } else {
            raw & !event.mask()
        })
    }

    /// Builds a flag set from a list of events.
    pub fn from_events(events: &[InterruptEvent]) -> Self {
        events
            .iter()
            .fold(Self::new(), |flags, event| flags.with_event(*event, true))
    }

    /// Iterates over the set events in dispatch order.
    pub fn events(self) -> impl Iterator<Item = InterruptEvent> {
        InterruptEvent::PRIORITY
            .into_iter()
            .filter(move |event| self.contains(*event))
    }
}

/// Reads `INT_SOURCE` once and invokes `on_event` for every set bit, from bit 7
/// down to bit 0.
///
/// If the register read fails `on_event` is never called. Reading `INT_SOURCE`
/// does not clear the data ready, watermark or overrun bits; those stay set until
/// the data registers are read and fire again on the next dispatch.
pub fn dispatch<IFACE, F>(interface: &mut IFACE, mut on_event: F) -> Result<(), IFACE::Error>
where
    IFACE: Adxl345Interface,
    F: FnMut(InterruptEvent),
{
    let source = match interface.read_register(REG_INT_SOURCE) {
        Ok(value) => InterruptFlags::from(value),
        Err(err) => {
            log::error!("INT_SOURCE read failed");
            return Err(err.into());
        }
    };

    for event in source.events() {
        log::trace!("interrupt {}", event);
        on_event(event);
    }

    Ok(())
}
