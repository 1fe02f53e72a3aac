//! # Banked Registers
//!
//! Physical storage for the registers that have more than one copy.
//! See [`cpu_modes`](super::cpu_modes) for the slot each mode selects.
//!
//! - R8-R12: a normal copy and a FIQ copy.
//! - R13 (SP) and R14 (LR): one copy for User/System and one per exception mode.

use serde::{Deserialize, Serialize};

use crate::cpu::cpu_modes::{FIQ_BANKS, SP_LR_BANKS};

/// Banked R8-R14. Never indexed by mode directly, always through the
/// slot index a [`ModeState`](super::mode_state::ModeState) reports.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBank {
    /// R8-R12, `[register - 8][slot]`.
    r8_r12: [[u32; FIQ_BANKS]; 5],

    /// R13 and R14, `[register - 13][slot]`.
    r13_r14: [[u32; SP_LR_BANKS]; 2],
}

impl RegisterBank {
    /// `idx` is 0 for R8 up to 4 for R12.
    pub(crate) const fn r8_r12(&self, idx: usize, slot: usize) -> u32 {
        self.r8_r12[idx][slot]
    }

    pub(crate) const fn set_r8_r12(&mut self, idx: usize, slot: usize, value: u32) {
        self.r8_r12[idx][slot] = value;
    }

    /// `idx` is 0 for R13 and 1 for R14.
    pub(crate) const fn r13_r14(&self, idx: usize, slot: usize) -> u32 {
        self.r13_r14[idx][slot]
    }

    pub(crate) const fn set_r13_r14(&mut self, idx: usize, slot: usize, value: u32) {
        self.r13_r14[idx][slot] = value;
    }
}
