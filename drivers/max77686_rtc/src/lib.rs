#![cfg_attr(not(test), no_std)]

//! RTC driver for the Maxim MAX77686 family of PMICs (MAX77686, MAX77802,
//! MAX77620, MAX77714).

mod error;
mod variant;
mod codec;
mod sequencer;
mod alarm;
mod rtc;

#[cfg(test)]
mod tests;

pub use error::RtcError;
pub use variant::*;
pub use codec::{decode, encode, RegisterImage, TimeField, RTC_NR_TIME, YEAR_OFFSET};
pub use alarm::MAX77802_ALARM_ENABLE_VALUE;
pub use rtc::{Max77686Rtc, RtcResources};
