use serde::{Deserialize, Serialize};

use crate::cpu::cpu_modes::Mode;

/// Exceptions of the ARM7TDMI, in vector table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exception {
    Reset,
    Undefined,
    SoftwareInterrupt,
    PrefetchAbort,
    DataAbort,
    Irq,
    Fiq,
}

impl Exception {
    /// Address the PC is set to on entry.
    #[must_use]
    pub const fn vector(self) -> u32 {
        match self {
            Self::Reset => 0x00,
            Self::Undefined => 0x04,
            Self::SoftwareInterrupt => 0x08,
            Self::PrefetchAbort => 0x0C,
            Self::DataAbort => 0x10,
            // 0x14 is the unused address exception vector.
            Self::Irq => 0x18,
            Self::Fiq => 0x1C,
        }
    }

    /// Mode the CPU is in while handling the exception.
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::Reset | Self::SoftwareInterrupt => Mode::Supervisor,
            Self::Undefined => Mode::Undefined,
            Self::PrefetchAbort | Self::DataAbort => Mode::Abort,
            Self::Irq => Mode::Irq,
            Self::Fiq => Mode::Fiq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_vectors() {
        let vectors = [
            Exception::Reset,
            Exception::Undefined,
            Exception::SoftwareInterrupt,
            Exception::PrefetchAbort,
            Exception::DataAbort,
            Exception::Irq,
            Exception::Fiq,
        ]
        .map(Exception::vector);

        assert_eq!(vectors, [0x00, 0x04, 0x08, 0x0C, 0x10, 0x18, 0x1C]);
    }

    #[test]
    fn check_every_exception_mode_owns_a_saved_status() {
        for exception in [
            Exception::Reset,
            Exception::Undefined,
            Exception::SoftwareInterrupt,
            Exception::PrefetchAbort,
            Exception::DataAbort,
            Exception::Irq,
            Exception::Fiq,
        ] {
            assert!(exception.mode().saved_status_index().is_some());
        }
    }
}
