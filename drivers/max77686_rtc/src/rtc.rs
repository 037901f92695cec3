//! Driver instance: lifecycle, power management and the `RtcOps` surface.

use core::sync::atomic::{AtomicBool, Ordering};

use common::bit;
use kernel_intf::{
    AlarmClient, Delay, I2cParent, IrqController, KError, Mutex, RegisterMap, RtcOps, RtcTime,
    RtcWkAlarm, Spinlock, Yield, IRQF_ONESHOT, IRQF_SHARED, RTC_AF, RTC_IRQF
};
use log::{debug, error, info};

use crate::codec::{decode, encode};
use crate::sequencer::{RtcRegs, UpdateOp};
use crate::variant::{ChipModel, RegOffset, VariantProfile, RTCIRQ_RTCA1};
use crate::RtcError;

// RTC Control Register
const BCD_EN_SHIFT: u32 = 0;
const MODEL24_SHIFT: u32 = 1;

const ALARM_IRQ_NAME: &str = "rtc-alarm1";

/// What the bus driver hands over when binding the RTC
pub struct RtcResources<'a, P, D, I> {
    pub parent: &'a mut P,
    // Only consulted by profiles with irq_from_platform
    pub platform_irq: Option<u32>,
    pub delay: D,
    pub irq_ctl: I,
    pub client: Option<&'static dyn AlarmClient>
}

pub struct Max77686Rtc<M, D, I> {
    profile: &'static VariantProfile,
    // Held across settle delays
    pub(crate) regs: Mutex<RtcRegs<M, D>, D>,
    irq_ctl: Spinlock<I>,
    rtc_irq: u32,
    virq: u32,
    wakeup: AtomicBool,
    client: Option<&'static dyn AlarmClient>
}

impl<M, D, I> Max77686Rtc<M, D, I>
where
    M: RegisterMap,
    D: Delay,
    I: IrqController
{
    pub fn probe<P>(model: ChipModel, res: RtcResources<'_, P, D, I>) -> Result<Self, RtcError>
    where
        P: I2cParent<Map = M>
    {
        Self::probe_with_profile(model.profile(), res)
    }

    pub fn probe_with_profile<P>(
        profile: &'static VariantProfile,
        res: RtcResources<'_, P, D, I>
    ) -> Result<Self, RtcError>
    where
        P: I2cParent<Map = M>
    {
        let RtcResources { parent, platform_irq, delay, mut irq_ctl, client } = res;

        let rtc_irq = if profile.irq_from_platform {
            platform_irq.ok_or_else(|| {
                error!("{}: no platform interrupt for RTC", profile.name);
                RtcError::Transport(KError::NoDevice)
            })?
        } else {
            parent.irq()
        };

        let regmap = parent.regmap().ok_or_else(|| {
            error!("Failed to get rtc regmap");
            RtcError::Transport(KError::NoDevice)
        })?;

        let rtc_regmap = match profile.rtc_i2c_addr {
            Some(addr) => Some(
                parent.new_dummy_device(addr)
                    .map_err(|e| {
                        error!("Failed to allocate I2C device for RTC at {:#x}: {}", addr, e);
                        e
                    })?
            ),
            None => None
        };

        irq_ctl.add_irq_chip(rtc_irq, IRQF_ONESHOT | IRQF_SHARED, profile.irq_chip)
            .map_err(|e| {
                error!("Failed to add RTC irq chip: {}", e);
                e
            })?;

        let mut regs = RtcRegs::new(profile, regmap, rtc_regmap, delay);

        let virq = match Self::setup(&mut regs, &mut irq_ctl, rtc_irq) {
            Ok(virq) => virq,
            Err(e) => {
                irq_ctl.del_irq_chip(rtc_irq);
                return Err(e);
            }
        };

        info!("{}: RTC registered, irq={} alarm virq={}", profile.name, rtc_irq, virq);

        Ok(Self {
            profile,
            regs: Mutex::new(regs),
            irq_ctl: Spinlock::new(irq_ctl),
            rtc_irq,
            virq,
            wakeup: AtomicBool::new(true),
            client
        })
    }

    fn setup(regs: &mut RtcRegs<M, D>, irq_ctl: &mut I, rtc_irq: u32) -> Result<u32, RtcError> {
        Self::init_reg(regs)
            .map_err(|e| {
                error!("Failed to initialize RTC reg:{}", e);
                e
            })?;

        let virq = irq_ctl.get_virq(rtc_irq, RTCIRQ_RTCA1).ok_or_else(|| {
            error!("No virtual irq for RTC alarm 1");
            RtcError::Transport(KError::NoDevice)
        })?;

        irq_ctl.request_irq(virq, ALARM_IRQ_NAME)
            .map_err(|e| {
                error!("Failed to request alarm IRQ: {}: {}", virq, e);
                e
            })?;

        Ok(virq)
    }

    // Binary mode, 24 hour mode
    fn init_reg(regs: &mut RtcRegs<M, D>) -> Result<(), RtcError> {
        let data = [
            bit::<u8>(BCD_EN_SHIFT) | bit::<u8>(MODEL24_SHIFT),
            bit::<u8>(MODEL24_SHIFT)
        ];

        let reg = regs.reg(RegOffset::RtcControlM)?;
        regs.write_block(reg, &data)
            .map_err(|e| {
                error!("Fail to write controlm reg({})", e);
                e
            })?;

        regs.update(UpdateOp::Write)
    }

    pub fn shutdown(self) {
        let mut irq_ctl = self.irq_ctl.into_inner();
        irq_ctl.free_irq(self.virq);
        irq_ctl.del_irq_chip(self.rtc_irq);
    }

    pub fn suspend(&self) -> Result<(), RtcError> {
        let mut irq_ctl = self.irq_ctl.lock();

        let ret = if self.may_wakeup() {
            irq_ctl.set_irq_wake(self.virq, true).map_err(RtcError::from)
        } else {
            Ok(())
        };

        // A shared parent line firing while suspended would be handled
        // before the bus is back, every user of it has to mask it
        if !self.profile.irq_from_platform {
            irq_ctl.disable_irq(self.rtc_irq);
        }

        ret
    }

    pub fn resume(&self) -> Result<(), RtcError> {
        let mut irq_ctl = self.irq_ctl.lock();

        if !self.profile.irq_from_platform {
            irq_ctl.enable_irq(self.rtc_irq);
        }

        if self.may_wakeup() {
            irq_ctl.set_irq_wake(self.virq, false)?;
        }

        Ok(())
    }
}

impl<M, D, I> Max77686Rtc<M, D, I> {
    pub fn profile(&self) -> &'static VariantProfile {
        self.profile
    }

    pub fn rtc_irq(&self) -> u32 {
        self.rtc_irq
    }

    pub fn virq(&self) -> u32 {
        self.virq
    }

    pub fn set_wakeup(&self, enable: bool) {
        self.wakeup.store(enable, Ordering::Relaxed);
    }

    pub fn may_wakeup(&self) -> bool {
        self.wakeup.load(Ordering::Relaxed)
    }

    // Called from the alarm 1 interrupt thread, touches no registers
    pub fn on_alarm_fired(&self) {
        debug!("RTC alarm IRQ: {}", self.virq);

        if let Some(client) = self.client {
            client.alarm_fired(1, RTC_IRQF | RTC_AF);
        }
    }
}

impl<M, D, I> RtcOps for Max77686Rtc<M, D, I>
where
    M: RegisterMap,
    D: Delay + Yield
{
    type Error = RtcError;

    fn read_time(&self) -> Result<RtcTime, RtcError> {
        let mut regs = self.regs.lock();

        regs.update(UpdateOp::Read)?;
        let image = regs.read_image(RegOffset::RtcSec)
            .map_err(|e| {
                error!("Fail to read time reg({})", e);
                e
            })?;

        Ok(decode(&image, self.profile))
    }

    fn set_time(&self, tm: &RtcTime) -> Result<(), RtcError> {
        let image = encode(tm, self.profile)?;

        let mut regs = self.regs.lock();

        regs.write_image(RegOffset::RtcSec, &image)
            .map_err(|e| {
                error!("Fail to write time reg({})", e);
                e
            })?;

        regs.update(UpdateOp::Write)
    }

    fn read_alarm(&self) -> Result<RtcWkAlarm, RtcError> {
        self.regs.lock().read_alarm()
    }

    fn set_alarm(&self, alrm: &RtcWkAlarm) -> Result<(), RtcError> {
        let image = encode(&alrm.time, self.profile)?;

        self.regs.lock().set_alarm(&image, alrm.enabled)
    }

    fn alarm_irq_enable(&self, enabled: bool) -> Result<(), RtcError> {
        let mut regs = self.regs.lock();

        if enabled {
            regs.start_alarm()
        } else {
            regs.stop_alarm()
        }
    }
}
