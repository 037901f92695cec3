use crate::KError;

pub const IRQF_SHARED: u32 = 0x0000_0080;
pub const IRQF_ONESHOT: u32 = 0x0000_2000;

// Event flags handed to AlarmClient
pub const RTC_IRQF: u32 = 0x80;
pub const RTC_AF: u32 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqSource {
    pub reg_offset: u8,
    pub mask: u8
}

/// Description of a demultiplexing interrupt chip.
///
/// One status register (read to find out which source fired) and one mask
/// register per `num_regs`, starting at `status_base` and `mask_base`.
#[derive(Debug)]
pub struct IrqChip {
    pub name: &'static str,
    pub status_base: u8,
    pub mask_base: u8,
    pub num_regs: u8,
    pub irqs: &'static [IrqSource],
    pub num_irqs: usize
}

impl IrqChip {
    pub fn sources(&self) -> &'static [IrqSource] {
        &self.irqs[..self.num_irqs.min(self.irqs.len())]
    }
}

pub trait IrqController {
    fn add_irq_chip(&mut self, irq: u32, flags: u32, chip: &'static IrqChip) -> Result<(), KError>;

    fn del_irq_chip(&mut self, irq: u32);

    /// Virtual interrupt number of source `hwirq` of the chip registered on `irq`
    fn get_virq(&self, irq: u32, hwirq: usize) -> Option<u32>;

    fn request_irq(&mut self, virq: u32, name: &'static str) -> Result<(), KError>;

    fn free_irq(&mut self, virq: u32);

    fn enable_irq(&mut self, irq: u32);

    fn disable_irq(&mut self, irq: u32);

    fn set_irq_wake(&mut self, virq: u32, on: bool) -> Result<(), KError>;
}

/// Receives alarm notifications from an RTC driver
pub trait AlarmClient: Sync {
    fn alarm_fired(&self, count: u32, events: u32);
}
