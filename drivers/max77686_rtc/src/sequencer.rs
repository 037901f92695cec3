//! Register context of one RTC instance and the two-phase update protocol.
//!
//! The time and alarm registers are shadowed. Writes only reach the live
//! counters after RTC_UDR is pulsed, and reads only see fresh values after
//! RTC_RBUDR is pulsed. Either pulse needs `delay_us` to settle.

use common::bit;
use kernel_intf::{reg_at, Delay, RegisterMap};
use log::{debug, error};

use crate::codec::{RegisterImage, RTC_NR_TIME};
use crate::variant::{RegOffset, VariantProfile};
use crate::RtcError;

// RTC Update Register1
const RTC_UDR_SHIFT: u32 = 0;
const RTC_RBUDR_SHIFT: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    // Push shadow registers to the live clock
    Write,
    // Reload shadow registers from the live clock
    Read
}

/// Everything guarded by the driver lock
pub struct RtcRegs<M, D> {
    pub(crate) profile: &'static VariantProfile,
    // Parent PMIC registers
    pub(crate) regmap: M,
    // None when the RTC block lives in the parent's register space
    pub(crate) rtc_regmap: Option<M>,
    pub(crate) delay: D
}

impl<M: RegisterMap, D: Delay> RtcRegs<M, D> {
    pub fn new(profile: &'static VariantProfile, regmap: M, rtc_regmap: Option<M>, delay: D) -> Self {
        Self {
            profile,
            regmap,
            rtc_regmap,
            delay
        }
    }

    pub fn rtc_map(&mut self) -> &mut M {
        match &mut self.rtc_regmap {
            Some(map) => map,
            None => &mut self.regmap
        }
    }

    pub fn reg(&self, offset: RegOffset) -> Result<u8, RtcError> {
        self.profile.reg(offset).ok_or_else(|| {
            error!("{}: register {:?} not present on this chip", self.profile.name, offset);
            RtcError::InvalidConfig
        })
    }

    pub fn update(&mut self, op: UpdateOp) -> Result<(), RtcError> {
        let data = match op {
            UpdateOp::Write => bit::<u8>(RTC_UDR_SHIFT),
            UpdateOp::Read => bit::<u8>(RTC_RBUDR_SHIFT)
        };

        let reg = self.reg(RegOffset::RtcUpdate0)?;
        self.rtc_map()
            .update_bits(reg, data, data)
            .map_err(|e| {
                error!("Fail to write update reg(ret={}, data={:#x})", e, data);
                e
            })?;

        // Minimum delay required before RTC update
        let delay = self.profile.delay_us;
        debug!("RTC {:?} update pulsed, settling {}us", op, delay);
        self.delay.usleep_range(delay, delay.saturating_mul(2));

        Ok(())
    }

    pub fn write_block(&mut self, reg: u8, data: &[u8]) -> Result<(), RtcError> {
        let single_write = self.profile.single_write;
        let map = self.rtc_map();

        if single_write {
            for (idx, byte) in data.iter().enumerate() {
                map.write(reg_at(reg, idx)?, *byte)?;
            }
        } else {
            map.bulk_write(reg, data)?;
        }

        Ok(())
    }

    // Callers pulse UpdateOp::Read first
    pub fn read_image(&mut self, base: RegOffset) -> Result<RegisterImage, RtcError> {
        let reg = self.reg(base)?;
        let mut data = [0u8; RTC_NR_TIME];
        self.rtc_map().bulk_read(reg, &mut data)?;

        Ok(RegisterImage(data))
    }

    // Callers pulse UpdateOp::Write afterwards
    pub fn write_image(&mut self, base: RegOffset, image: &RegisterImage) -> Result<(), RtcError> {
        let reg = self.reg(base)?;
        self.write_block(reg, image.as_bytes())
    }
}
