#![cfg_attr(not(test), no_std)]

mod error;
mod log;

pub mod config;
pub mod decode;
pub mod device;
pub mod fifo;
pub mod interface;
pub mod interrupt;
pub mod params;
pub mod registers;

pub use crate::config::Config;
pub use crate::decode::{DecodeConfig, PhysicalSample, RawSample};
pub use crate::device::{Adxl345, ChipInfo};
pub use crate::error::{Error, Result};
pub use crate::interrupt::InterruptEvent;
