//! Alarm 1 handling.
//!
//! MAX77686, MAX77620 and MAX77714 arm an alarm field by setting bit 7 of its
//! byte in the alarm block. MAX77802 instead has RTC_AE1, one bit per field,
//! and leaves the alarm bytes holding plain values.
//!
//! All functions expect the driver lock to be held, which owning `RtcRegs`
//! through the guard guarantees.

use common::{bit, clear_bits, is_set, set_bits};
use kernel_intf::{Delay, RegisterMap, RtcWkAlarm};
use log::{debug, error};

use crate::codec::{decode, RegisterImage, TimeField};
use crate::sequencer::{RtcRegs, UpdateOp};
use crate::variant::{AlarmScheme, RegOffset};
use crate::RtcError;

const ALARM_ENABLE_SHIFT: u32 = 7;

// Every field of RTC_AE1 participates
pub const MAX77802_ALARM_ENABLE_VALUE: u8 = 0x77;

// RTCA1 bit of the parent status register
const STATUS2_RTCA1_SHIFT: u32 = 4;

fn alarm_enable_mask() -> u8 {
    bit(ALARM_ENABLE_SHIFT)
}

impl<M: RegisterMap, D: Delay> RtcRegs<M, D> {
    fn alarm_enable_reg(&self) -> Result<u8, RtcError> {
        self.reg(RegOffset::RtcAe1)
            .map_err(|e| {
                error!("alarm enable register not set");
                e
            })
    }

    fn read_alarm_image(&mut self) -> Result<RegisterImage, RtcError> {
        self.read_image(RegOffset::Alarm1Sec)
            .map_err(|e| {
                error!("Fail to read alarm reg({})", e);
                e
            })
    }

    fn write_alarm_image(&mut self, image: &RegisterImage) -> Result<(), RtcError> {
        self.write_image(RegOffset::Alarm1Sec, image)
            .map_err(|e| {
                error!("Fail to write alarm reg({})", e);
                e
            })
    }

    pub fn read_alarm(&mut self) -> Result<RtcWkAlarm, RtcError> {
        self.update(UpdateOp::Read)?;

        let image = self.read_alarm_image()?;
        let time = decode(&image, self.profile);

        let enabled = match self.profile.alarm_scheme {
            AlarmScheme::DedicatedRegister => {
                let reg = self.alarm_enable_reg()?;
                let val = self.rtc_map()
                    .read(reg)
                    .map_err(|e| {
                        error!("fail to read alarm enable({})", e);
                        e
                    })?;
                val != 0
            },
            AlarmScheme::PerField => {
                image.0.iter().any(|byte| is_set(*byte, alarm_enable_mask()))
            }
        };

        let pending = self.alarm_pending()?;

        Ok(RtcWkAlarm { time, enabled, pending })
    }

    // Chips without a status register report the alarm as never pending
    fn alarm_pending(&mut self) -> Result<bool, RtcError> {
        let Some(status_reg) = self.profile.alarm_pending_status_reg else {
            return Ok(false);
        };

        let val = self.regmap
            .read(status_reg)
            .map_err(|e| {
                error!("Fail to read alarm pending status reg({})", e);
                e
            })?;

        Ok(is_set(val, bit(STATUS2_RTCA1_SHIFT)))
    }

    pub fn stop_alarm(&mut self) -> Result<(), RtcError> {
        self.update(UpdateOp::Read)?;

        match self.profile.alarm_scheme {
            AlarmScheme::DedicatedRegister => {
                let reg = self.alarm_enable_reg()?;
                self.rtc_map()
                    .write(reg, 0)
                    .map_err(|e| {
                        error!("Fail to write alarm reg({})", e);
                        e
                    })?;
            },
            AlarmScheme::PerField => {
                let mut image = self.read_alarm_image()?;
                for byte in image.0.iter_mut() {
                    *byte = clear_bits(*byte, alarm_enable_mask());
                }
                self.write_alarm_image(&image)?;
            }
        }

        debug!("{}: alarm disabled", self.profile.name);
        self.update(UpdateOp::Write)
    }

    pub fn start_alarm(&mut self) -> Result<(), RtcError> {
        self.update(UpdateOp::Read)?;

        match self.profile.alarm_scheme {
            AlarmScheme::DedicatedRegister => {
                let reg = self.alarm_enable_reg()?;
                self.rtc_map()
                    .write(reg, MAX77802_ALARM_ENABLE_VALUE)
                    .map_err(|e| {
                        error!("Fail to write alarm reg({})", e);
                        e
                    })?;
            },
            AlarmScheme::PerField => {
                let mut image = self.read_alarm_image()?;
                arm_fields(&mut image, self.profile.mask);
                self.write_alarm_image(&image)?;
            }
        }

        debug!("{}: alarm enabled", self.profile.name);
        self.update(UpdateOp::Write)
    }

    pub fn set_alarm(&mut self, image: &RegisterImage, enabled: bool) -> Result<(), RtcError> {
        self.stop_alarm()?;

        self.write_alarm_image(image)?;
        self.update(UpdateOp::Write)?;

        if enabled {
            self.start_alarm()?;
        }

        Ok(())
    }
}

// Zero date fields are wildcards and stay out of the comparison
fn arm_fields(image: &mut RegisterImage, mask: u8) {
    let enable = alarm_enable_mask();

    image[TimeField::Sec] = set_bits(image[TimeField::Sec], enable);
    image[TimeField::Min] = set_bits(image[TimeField::Min], enable);
    image[TimeField::Hour] = set_bits(image[TimeField::Hour], enable);
    image[TimeField::Weekday] = clear_bits(image[TimeField::Weekday], enable);

    if is_set(image[TimeField::Month], 0x0f) {
        image[TimeField::Month] = set_bits(image[TimeField::Month], enable);
    }
    if is_set(image[TimeField::Year], mask) {
        image[TimeField::Year] = set_bits(image[TimeField::Year], enable);
    }
    if is_set(image[TimeField::MonthDay], 0x1f) {
        image[TimeField::MonthDay] = set_bits(image[TimeField::MonthDay], enable);
    }
}
