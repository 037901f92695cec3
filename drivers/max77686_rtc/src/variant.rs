//! Per-model configuration of the MAX77686 family RTC blocks.
//!
//! All four chips share the same register layout for the time and alarm
//! blocks but place it at different addresses, behind different I2C
//! addresses, and arm alarms in one of two ways.

use kernel_intf::{IrqChip, IrqSource};

pub const MAX77686_I2C_ADDR_RTC: u8 = 0x0C >> 1;
pub const MAX77620_I2C_ADDR_RTC: u8 = 0x68;
pub const MAX77714_I2C_ADDR_RTC: u8 = 0x48;

// Parent PMIC status register holding the RTCA1 pending flag
pub const MAX77686_REG_STATUS2: u8 = 0x07;

// hwirq number of alarm 1 in the RTCINT source table
pub const RTCIRQ_RTCA1: usize = 1;

/// How the chip decides whether alarm 1 is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmScheme {
    // Bit 7 of each alarm field byte takes part in the comparison
    PerField,
    // A separate RTC_AE1 register holds the field participation mask
    DedicatedRegister
}

/// Logical registers, translated to addresses through a profile's map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum RegOffset {
    RtcControlM = 0,
    RtcControl,
    RtcUpdate0,
    WtsrSmplCntl,
    RtcSec,
    RtcMin,
    RtcHour,
    RtcWeekday,
    RtcMonth,
    RtcYear,
    RtcMonthDay,
    Alarm1Sec,
    Alarm1Min,
    Alarm1Hour,
    Alarm1Weekday,
    Alarm1Month,
    Alarm1Year,
    Alarm1Date,
    Alarm2Sec,
    Alarm2Min,
    Alarm2Hour,
    Alarm2Weekday,
    Alarm2Month,
    Alarm2Year,
    Alarm2Date,
    RtcAe1
}

pub const REG_RTC_END: usize = RegOffset::RtcAe1 as usize + 1;

// None marks a register the chip does not have
pub type RegisterTable = [Option<u8>; REG_RTC_END];

#[derive(Debug)]
pub struct VariantProfile {
    pub name: &'static str,
    // Minimum usecs needed after pulsing an update bit
    pub delay_us: u32,
    // Valid bits of the multi-purpose time fields
    pub mask: u8,
    pub map: &'static RegisterTable,
    pub alarm_scheme: AlarmScheme,
    // None when the RTC answers on the parent's address
    pub rtc_i2c_addr: Option<u8>,
    // RTC interrupt comes from a platform resource instead of the parent line
    pub irq_from_platform: bool,
    pub alarm_pending_status_reg: Option<u8>,
    pub irq_chip: &'static IrqChip,
    // Bus cannot auto-increment, block writes go out one register at a time
    pub single_write: bool
}

impl VariantProfile {
    pub fn reg(&self, offset: RegOffset) -> Option<u8> {
        self.map[offset as usize]
    }
}

pub static MAX77686_MAP: RegisterTable = [
    Some(0x02), // RTC_CONTROLM
    Some(0x03), // RTC_CONTROL
    Some(0x04), // RTC_UPDATE0
    Some(0x06), // WTSR_SMPL_CNTL
    Some(0x07), Some(0x08), Some(0x09), Some(0x0A), Some(0x0B), Some(0x0C), Some(0x0D),
    Some(0x0E), Some(0x0F), Some(0x10), Some(0x11), Some(0x12), Some(0x13), Some(0x14),
    Some(0x15), Some(0x16), Some(0x17), Some(0x18), Some(0x19), Some(0x1A), Some(0x1B),
    None        // RTC_AE1
];

pub static MAX77802_MAP: RegisterTable = [
    Some(0xC2), // RTC_CONTROLM
    Some(0xC3), // RTC_CONTROL
    Some(0xC4), // RTC_UPDATE0
    Some(0xC6), // WTSR_SMPL_CNTL
    Some(0xC7), Some(0xC8), Some(0xC9), Some(0xCA), Some(0xCB), Some(0xCC), Some(0xCD),
    Some(0xCF), Some(0xD0), Some(0xD1), Some(0xD2), Some(0xD3), Some(0xD4), Some(0xD5),
    Some(0xD7), Some(0xD8), Some(0xD9), Some(0xDA), Some(0xDB), Some(0xDC), Some(0xDD),
    Some(0xCE)  // RTC_AE1
];

const MAX77686_RTC_INT: u8 = 0x00;
const MAX77686_RTC_INTM: u8 = 0x01;
const MAX77802_RTC_INT: u8 = 0xC0;
const MAX77802_RTC_INTM: u8 = 0xC1;

const MAX77686_NUM_RTC_IRQS: usize = 6;

pub static MAX77686_RTC_IRQS: [IrqSource; MAX77686_NUM_RTC_IRQS] = [
    IrqSource { reg_offset: 0, mask: 0x01 }, // RTC60S
    IrqSource { reg_offset: 0, mask: 0x02 }, // RTCA1
    IrqSource { reg_offset: 0, mask: 0x04 }, // RTCA2
    IrqSource { reg_offset: 0, mask: 0x08 }, // SMPL
    IrqSource { reg_offset: 0, mask: 0x10 }, // RTC1S
    IrqSource { reg_offset: 0, mask: 0x20 }  // WTSR
];

pub static MAX77686_RTC_IRQ_CHIP: IrqChip = IrqChip {
    name: "max77686-rtc",
    status_base: MAX77686_RTC_INT,
    mask_base: MAX77686_RTC_INTM,
    num_regs: 1,
    irqs: &MAX77686_RTC_IRQS,
    num_irqs: MAX77686_NUM_RTC_IRQS
};

// No WTSR on MAX77714
pub static MAX77714_RTC_IRQ_CHIP: IrqChip = IrqChip {
    name: "max77714-rtc",
    status_base: MAX77686_RTC_INT,
    mask_base: MAX77686_RTC_INTM,
    num_regs: 1,
    irqs: &MAX77686_RTC_IRQS,
    num_irqs: MAX77686_NUM_RTC_IRQS - 1
};

pub static MAX77802_RTC_IRQ_CHIP: IrqChip = IrqChip {
    name: "max77802-rtc",
    status_base: MAX77802_RTC_INT,
    mask_base: MAX77802_RTC_INTM,
    num_regs: 1,
    irqs: &MAX77686_RTC_IRQS,
    num_irqs: MAX77686_NUM_RTC_IRQS
};

pub static MAX77686_PROFILE: VariantProfile = VariantProfile {
    name: "max77686-rtc",
    delay_us: 16000,
    mask: 0x7f,
    map: &MAX77686_MAP,
    alarm_scheme: AlarmScheme::PerField,
    rtc_i2c_addr: Some(MAX77686_I2C_ADDR_RTC),
    irq_from_platform: false,
    alarm_pending_status_reg: Some(MAX77686_REG_STATUS2),
    irq_chip: &MAX77686_RTC_IRQ_CHIP,
    single_write: false
};

pub static MAX77802_PROFILE: VariantProfile = VariantProfile {
    name: "max77802-rtc",
    delay_us: 200,
    mask: 0xff,
    map: &MAX77802_MAP,
    alarm_scheme: AlarmScheme::DedicatedRegister,
    rtc_i2c_addr: None,
    irq_from_platform: false,
    alarm_pending_status_reg: Some(MAX77686_REG_STATUS2),
    irq_chip: &MAX77802_RTC_IRQ_CHIP,
    single_write: false
};

pub static MAX77620_PROFILE: VariantProfile = VariantProfile {
    name: "max77620-rtc",
    delay_us: 16000,
    mask: 0x7f,
    map: &MAX77686_MAP,
    alarm_scheme: AlarmScheme::PerField,
    rtc_i2c_addr: Some(MAX77620_I2C_ADDR_RTC),
    irq_from_platform: true,
    alarm_pending_status_reg: None,
    irq_chip: &MAX77686_RTC_IRQ_CHIP,
    single_write: true
};

// RTCA1 is bit 1 of RTCINT on MAX77714, the pending flag is not read there
pub static MAX77714_PROFILE: VariantProfile = VariantProfile {
    name: "max77714-rtc",
    delay_us: 16000,
    mask: 0x7f,
    map: &MAX77686_MAP,
    alarm_scheme: AlarmScheme::PerField,
    rtc_i2c_addr: Some(MAX77714_I2C_ADDR_RTC),
    irq_from_platform: false,
    alarm_pending_status_reg: None,
    irq_chip: &MAX77714_RTC_IRQ_CHIP,
    single_write: false
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipModel {
    Max77686,
    Max77802,
    Max77620,
    Max77714
}

pub const RTC_ID_TABLE: [(&str, ChipModel); 4] = [
    ("max77686-rtc", ChipModel::Max77686),
    ("max77802-rtc", ChipModel::Max77802),
    ("max77620-rtc", ChipModel::Max77620),
    ("max77714-rtc", ChipModel::Max77714)
];

impl ChipModel {
    pub fn from_id(id: &str) -> Option<Self> {
        RTC_ID_TABLE.iter()
            .find(|(name, _)| *name == id)
            .map(|(_, model)| *model)
    }

    pub fn profile(self) -> &'static VariantProfile {
        match self {
            ChipModel::Max77686 => &MAX77686_PROFILE,
            ChipModel::Max77802 => &MAX77802_PROFILE,
            ChipModel::Max77620 => &MAX77620_PROFILE,
            ChipModel::Max77714 => &MAX77714_PROFILE
        }
    }
}
