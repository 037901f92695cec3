#![cfg_attr(not(test), no_std)]

// Interface exported by the kernel to loadable drivers

mod lock;
mod regmap;
mod irq;
mod rtc;

pub use lock::*;
pub use regmap::*;
pub use irq::*;
pub use rtc::*;


use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KError {
    InvalidArgument,
    IoError,
    NoDevice
}

impl fmt::Display for KError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            KError::InvalidArgument => "Invalid argument",
            KError::IoError => "I/O error",
            KError::NoDevice => "No such device"
        };
        write!(f, "{}", description)
    }
}

pub trait Delay {
    // Sleep for at least min_us, the kernel may stretch it up to max_us
    fn usleep_range(&mut self, min_us: u32, max_us: u32);
}
