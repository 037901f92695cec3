//! Conversion between `RtcTime` and the packed 7 byte register image used by
//! the time block and both alarm blocks.

use core::ops::{Index, IndexMut};

use common::{bit, first_set_bit};
use kernel_intf::RtcTime;
use log::error;

use crate::variant::{AlarmScheme, VariantProfile};
use crate::RtcError;

pub const RTC_NR_TIME: usize = 7;

// Per-field chips only count 0..99, shifted so the range is 2000..2099
pub const YEAR_OFFSET: u16 = 100;

const HOUR_MASK: u8 = 0x1f;
const MDAY_MASK: u8 = 0x1f;
const MONTH_MASK: u8 = 0x0f;

/// Position of each field inside a register image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum TimeField {
    Sec = 0,
    Min,
    Hour,
    Weekday,
    Month,
    Year,
    MonthDay
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterImage(pub [u8; RTC_NR_TIME]);

impl Index<TimeField> for RegisterImage {
    type Output = u8;

    fn index(&self, field: TimeField) -> &u8 {
        &self.0[field as usize]
    }
}

impl IndexMut<TimeField> for RegisterImage {
    fn index_mut(&mut self, field: TimeField) -> &mut u8 {
        &mut self.0[field as usize]
    }
}

impl RegisterImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

pub fn decode(image: &RegisterImage, profile: &VariantProfile) -> RtcTime {
    let mask = profile.mask;

    let mut year = (image[TimeField::Year] & mask) as u16;
    if profile.alarm_scheme == AlarmScheme::PerField {
        year += YEAR_OFFSET;
    }

    RtcTime {
        sec: image[TimeField::Sec] & mask,
        min: image[TimeField::Min] & mask,
        hour: image[TimeField::Hour] & HOUR_MASK,
        // Only a single bit is set, None if the chip reports none
        wday: first_set_bit(image[TimeField::Weekday] & mask).map(|idx| idx as u8),
        mday: image[TimeField::MonthDay] & MDAY_MASK,
        // Month 0 only shows up in alarms, where it matches any month
        mon: (image[TimeField::Month] & MONTH_MASK).checked_sub(1),
        year
    }
}

pub fn encode(tm: &RtcTime, profile: &VariantProfile) -> Result<RegisterImage, RtcError> {
    if tm.sec > 59 || tm.min > 59 || tm.hour > 23 || tm.mday > 31 {
        error!("RTC cannot handle time {:?}", tm);
        return Err(RtcError::OutOfRange);
    }

    let weekday = match tm.wday {
        Some(wday) if wday < 7 => bit::<u8>(wday as u32),
        Some(wday) => {
            error!("RTC cannot handle weekday {}", wday);
            return Err(RtcError::OutOfRange);
        },
        None => 0
    };

    let month = match tm.mon {
        Some(mon) if mon < 12 => mon + 1,
        Some(mon) => {
            error!("RTC cannot handle month {}", mon);
            return Err(RtcError::OutOfRange);
        },
        None => 0
    };

    let year = match profile.alarm_scheme {
        AlarmScheme::DedicatedRegister => tm.year,
        AlarmScheme::PerField => {
            if tm.year < YEAR_OFFSET {
                error!("RTC cannot handle the year {}", 1900 + tm.year as u32);
                return Err(RtcError::OutOfRange);
            }
            tm.year - YEAR_OFFSET
        }
    };

    if year > profile.mask as u16 {
        error!("RTC cannot handle the year {}", 1900 + tm.year as u32);
        return Err(RtcError::OutOfRange);
    }

    let mut image = RegisterImage::default();
    image[TimeField::Sec] = tm.sec;
    image[TimeField::Min] = tm.min;
    image[TimeField::Hour] = tm.hour;
    image[TimeField::Weekday] = weekday;
    image[TimeField::Month] = month;
    image[TimeField::Year] = year as u8;
    image[TimeField::MonthDay] = tm.mday;

    Ok(image)
}
