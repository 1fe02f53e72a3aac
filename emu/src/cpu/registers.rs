//! # ARM7TDMI Register File
//!
//! The 16 architectural registers as seen from the current mode.
//!
//! - **R0-R7**: never banked
//! - **R8-R12**: banked for FIQ
//! - **R13 (SP)**: stack pointer, banked per exception mode
//! - **R14 (LR)**: link register, banked per exception mode
//! - **R15 (PC)**: program counter, never banked
//!
//! Every access resolves its slot through the [`ModeState`] passed in, so a
//! mode switch needs no copying. Register numbers are masked (`& 0x7` for the
//! low/high halves, `& 0xF` for architectural numbers) instead of checked.

use serde::{Deserialize, Serialize};

use crate::cpu::mode_state::ModeState;
use crate::cpu::register_bank::RegisterBank;

/// Stack Pointer register index.
pub const REG_SP: usize = 0xD;

/// Link Register index (return address for subroutines).
pub const REG_LR: usize = 0xE;

/// Program Counter register index.
pub const REG_PROGRAM_COUNTER: usize = 0xF;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    /// Single-slot registers, only R0-R7 and R15 are stored here.
    unbanked: [u32; 16],
    bank: RegisterBank,
}

impl RegisterFile {
    /// R0-R7, `reg` is masked to 3 bits.
    #[must_use]
    pub const fn read_low(&self, reg: usize) -> u32 {
        self.unbanked[reg & 0x7]
    }

    pub const fn write_low(&mut self, reg: usize, value: u32) {
        self.unbanked[reg & 0x7] = value;
    }

    /// R8-R15, `reg` is the register number minus 8 (masked to 3 bits).
    /// 0-4 go through the FIQ bank, 5-6 through the per-mode SP/LR bank.
    #[must_use]
    pub fn read_high(&self, state: &ModeState, reg: usize) -> u32 {
        match reg & 0x7 {
            idx @ 0..=4 => self.bank.r8_r12(idx, state.bank_index_r8_r12()),
            idx @ 5..=6 => self.bank.r13_r14(idx - 5, state.bank_index_r13_r14()),
            _ => self.read_pc(),
        }
    }

    pub fn write_high(&mut self, state: &ModeState, reg: usize, value: u32) {
        match reg & 0x7 {
            idx @ 0..=4 => self
                .bank
                .set_r8_r12(idx, state.bank_index_r8_r12(), value),
            idx @ 5..=6 => self
                .bank
                .set_r13_r14(idx - 5, state.bank_index_r13_r14(), value),
            _ => self.write_pc(value),
        }
    }

    /// Any of R0-R15 by its architectural number (masked to 4 bits).
    #[must_use]
    pub fn read_arch(&self, state: &ModeState, reg: usize) -> u32 {
        match reg & 0xF {
            low @ 0..=7 => self.read_low(low),
            high => self.read_high(state, high - 8),
        }
    }

    pub fn write_arch(&mut self, state: &ModeState, reg: usize, value: u32) {
        match reg & 0xF {
            low @ 0..=7 => self.write_low(low, value),
            high => self.write_high(state, high - 8, value),
        }
    }

    #[must_use]
    pub fn read_sp(&self, state: &ModeState) -> u32 {
        self.read_high(state, REG_SP - 8)
    }

    pub fn write_sp(&mut self, state: &ModeState, value: u32) {
        self.write_high(state, REG_SP - 8, value);
    }

    #[must_use]
    pub fn read_lr(&self, state: &ModeState) -> u32 {
        self.read_high(state, REG_LR - 8)
    }

    pub fn write_lr(&mut self, state: &ModeState, value: u32) {
        self.write_high(state, REG_LR - 8, value);
    }

    #[must_use]
    pub const fn read_pc(&self) -> u32 {
        self.unbanked[REG_PROGRAM_COUNTER]
    }

    pub const fn write_pc(&mut self, value: u32) {
        self.unbanked[REG_PROGRAM_COUNTER] = value;
    }

    pub const fn advance_program_counter(&mut self, bytes: u32) {
        self.unbanked[REG_PROGRAM_COUNTER] = self.unbanked[REG_PROGRAM_COUNTER].wrapping_add(bytes);
    }

    /// The 16 registers visible in the current mode, R0 first.
    #[must_use]
    pub fn visible(&self, state: &ModeState) -> [u32; 16] {
        std::array::from_fn(|reg| self.read_arch(state, reg))
    }
}
