use core::fmt;
use kernel_intf::KError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    // Bus or interrupt controller failure
    Transport(KError),
    // Profile references a register the chip does not have
    InvalidConfig,
    // Time value the hardware cannot hold
    OutOfRange
}

impl From<KError> for RtcError {
    fn from(e: KError) -> Self {
        RtcError::Transport(e)
    }
}

impl fmt::Display for RtcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RtcError::Transport(e) => write!(f, "Transport error: {}", e),
            RtcError::InvalidConfig => write!(f, "Invalid register configuration"),
            RtcError::OutOfRange => write!(f, "Value out of range")
        }
    }
}
