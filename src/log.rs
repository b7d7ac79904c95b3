//! Logging shims.
//!
//! With the `defmt` feature enabled these forward to the matching `defmt` macro,
//! otherwise they expand to nothing and their arguments are never evaluated.

#![allow(unused_macros, unused_imports)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
    }};
}

macro_rules! warn_ {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::error!($($arg)*);
    }};
}

pub(crate) use {debug, error, trace};
pub(crate) use warn_ as warn;
