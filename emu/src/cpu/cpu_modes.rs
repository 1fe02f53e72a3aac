//! # Operating Modes and Register Banking
//!
//! ```text
//! Mode        Bits    R8-R12   R13/R14   SPSR
//! ──────────  ──────  ───────  ────────  ─────────
//! User        10000   0        0         none
//! System      11111   0        0         none
//! FIQ         10001   1        1         0
//! IRQ         10010   0        2         1
//! Supervisor  10011   0        3         2
//! Abort       10111   0        4         3
//! Undefined   11011   0        5         4
//! ```
//!
//! The columns are the slot indices used by
//! [`RegisterBank`](super::register_bank::RegisterBank) and
//! [`ModeState`](super::mode_state::ModeState).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of slots for R13 and R14 (user/system plus five exception modes).
pub const SP_LR_BANKS: usize = 6;

/// Number of slots for R8-R12 (normal and FIQ).
pub const FIQ_BANKS: usize = 2;

/// Number of saved status registers (one per privileged exception mode).
pub const SPSR_SLOTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// The normal ARM program execution state.
    User = 0b10000,

    /// Designed to support a data transfer or channel process.
    Fiq = 0b10001,

    /// Used for general-purpose interrupt handling.
    Irq = 0b10010,

    /// Protected mode for the operating system
    Supervisor = 0b10011,

    /// Entered after a data or instruction prefetch abort.
    Abort = 0b10111,

    /// Entered when an undefined instruction is executed
    Undefined = 0b11011,

    /// A privileged user mode for the operating system.
    System = 0b11111,
}

impl Mode {
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Fiq,
        Self::Irq,
        Self::Supervisor,
        Self::Abort,
        Self::Undefined,
        Self::System,
    ];

    /// Slot used for R13 (SP) and R14 (LR).
    #[must_use]
    pub const fn bank_index_r13_r14(self) -> usize {
        match self {
            Self::User | Self::System => 0,
            Self::Fiq => 1,
            Self::Irq => 2,
            Self::Supervisor => 3,
            Self::Abort => 4,
            Self::Undefined => 5,
        }
    }

    /// Slot used for R8-R12. Only FIQ has its own copy.
    #[must_use]
    pub const fn bank_index_r8_r12(self) -> usize {
        match self {
            Self::Fiq => 1,
            _ => 0,
        }
    }

    /// SPSR slot owned by this mode, `None` for User and System.
    #[must_use]
    pub const fn saved_status_index(self) -> Option<usize> {
        match self {
            Self::User | Self::System => None,
            Self::Fiq => Some(0),
            Self::Irq => Some(1),
            Self::Supervisor => Some(2),
            Self::Abort => Some(3),
            Self::Undefined => Some(4),
        }
    }

    #[must_use]
    pub const fn is_privileged(self) -> bool {
        !matches!(self, Self::User)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected value for mode bits: 0b{0:05b}")]
pub struct InvalidModeBits(pub u32);

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m as Self
    }
}

impl TryFrom<u32> for Mode {
    type Error = InvalidModeBits;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            0b10000 => Ok(Self::User),
            0b10001 => Ok(Self::Fiq),
            0b10010 => Ok(Self::Irq),
            0b10011 => Ok(Self::Supervisor),
            0b10111 => Ok(Self::Abort),
            0b11011 => Ok(Self::Undefined),
            0b11111 => Ok(Self::System),
            _ => Err(InvalidModeBits(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn check_mode_bits_round_trip() {
        for mode in Mode::ALL {
            let bits: u32 = mode.into();
            assert_eq!(Mode::try_from(bits), Ok(mode));
        }
    }

    #[test]
    fn check_invalid_mode_bits() {
        assert_eq!(Mode::try_from(0), Err(InvalidModeBits(0)));
        assert_eq!(Mode::try_from(0b10100), Err(InvalidModeBits(0b10100)));
        assert_eq!(
            InvalidModeBits(0b00101).to_string(),
            "unexpected value for mode bits: 0b00101"
        );
    }

    #[test]
    fn check_bank_index_r13_r14() {
        assert_eq!(Mode::User.bank_index_r13_r14(), 0);
        assert_eq!(Mode::System.bank_index_r13_r14(), 0);
        assert_eq!(Mode::Fiq.bank_index_r13_r14(), 1);
        assert_eq!(Mode::Irq.bank_index_r13_r14(), 2);
        assert_eq!(Mode::Supervisor.bank_index_r13_r14(), 3);
        assert_eq!(Mode::Abort.bank_index_r13_r14(), 4);
        assert_eq!(Mode::Undefined.bank_index_r13_r14(), 5);
    }

    #[test]
    fn check_bank_index_r8_r12() {
        for mode in Mode::ALL {
            let expected = usize::from(mode == Mode::Fiq);
            assert_eq!(mode.bank_index_r8_r12(), expected, "{mode:?}");
        }
    }

    #[test]
    fn check_saved_status_index() {
        assert_eq!(Mode::User.saved_status_index(), None);
        assert_eq!(Mode::System.saved_status_index(), None);

        let indices: HashSet<usize> = Mode::ALL
            .iter()
            .filter_map(|m| m.saved_status_index())
            .collect();

        assert_eq!(indices, (0..SPSR_SLOTS).collect());
    }

    #[test]
    fn check_privileged() {
        assert!(!Mode::User.is_privileged());
        assert!(Mode::System.is_privileged());
        assert!(Mode::Fiq.is_privileged());
    }
}
