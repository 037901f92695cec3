use crate::KError;

/// 8-bit register space of a device sitting on a bus.
///
/// Only `read` and `write` are mandatory. The block variants default to one
/// access per register, transports that support auto-increment should
/// override them.
pub trait RegisterMap {
    fn read(&mut self, reg: u8) -> Result<u8, KError>;

    fn write(&mut self, reg: u8, value: u8) -> Result<(), KError>;

    fn bulk_read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), KError> {
        for (idx, byte) in buf.iter_mut().enumerate() {
            *byte = self.read(reg_at(reg, idx)?)?;
        }

        Ok(())
    }

    fn bulk_write(&mut self, reg: u8, data: &[u8]) -> Result<(), KError> {
        for (idx, byte) in data.iter().enumerate() {
            self.write(reg_at(reg, idx)?, *byte)?;
        }

        Ok(())
    }

    // Read-modify-write, always issues the write
    fn update_bits(&mut self, reg: u8, mask: u8, value: u8) -> Result<(), KError> {
        let old = self.read(reg)?;
        self.write(reg, (old & !mask) | (value & mask))
    }
}

pub fn reg_at(base: u8, idx: usize) -> Result<u8, KError> {
    u8::try_from(idx)
        .ok()
        .and_then(|idx| base.checked_add(idx))
        .ok_or(KError::InvalidArgument)
}

/// Parent multi-function device the driver hangs off.
pub trait I2cParent {
    type Map: RegisterMap;

    /// Register map of the parent itself, `None` if the parent never created one
    fn regmap(&mut self) -> Option<Self::Map>;

    /// Register map of an extra client at `addr` on the parent's adapter
    fn new_dummy_device(&mut self, addr: u8) -> Result<Self::Map, KError>;

    /// Interrupt line of the parent
    fn irq(&self) -> u32;
}
