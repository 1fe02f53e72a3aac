//! # Current and saved status
//!
//! [`ModeState`] owns the CPSR and the five SPSR slots. The CPSR mode field
//! picks the bank for every banked register and the SPSR a privileged mode
//! sees. User and System have no SPSR: reading it yields the CPSR and every
//! write is dropped.

use serde::{Deserialize, Serialize};

use crate::cpu::alu::ArithmeticOpResult;
use crate::cpu::cpu_modes::{Mode, SPSR_SLOTS};
use crate::cpu::psr::{CpuState, Psr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeState {
    cpsr: Psr,
    spsr: [Psr; SPSR_SLOTS],
}

impl Default for ModeState {
    /// Reset state: Supervisor mode, ARM state, flags and saved slots zeroed.
    fn default() -> Self {
        Self::new(Mode::Supervisor)
    }
}

impl ModeState {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            cpsr: Psr::from(mode),
            spsr: [Psr::default(); SPSR_SLOTS],
        }
    }

    #[must_use]
    pub fn current_mode(&self) -> Mode {
        self.cpsr.mode()
    }

    /// Changes only the mode field. Nothing is saved or restored here.
    pub fn set_mode(&mut self, mode: Mode) {
        self.cpsr.set_mode(mode);
    }

    #[must_use]
    pub fn bank_index_r13_r14(&self) -> usize {
        self.current_mode().bank_index_r13_r14()
    }

    #[must_use]
    pub fn bank_index_r8_r12(&self) -> usize {
        self.current_mode().bank_index_r8_r12()
    }

    #[must_use]
    pub fn saved_status_index(&self) -> Option<usize> {
        self.current_mode().saved_status_index()
    }

    #[must_use]
    pub const fn cpsr(&self) -> Psr {
        self.cpsr
    }

    /// The whole CPSR as a word: flags, control bits and mode.
    #[must_use]
    pub fn pack(&self) -> u32 {
        self.cpsr.into()
    }

    /// Overwrites every CPSR field from `word`.
    pub fn unpack(&mut self, word: u32) {
        self.cpsr = Psr::from(word);
    }

    /// SPSR of the current mode, or the packed CPSR in User and System.
    #[must_use]
    pub fn read_saved_status(&self) -> u32 {
        self.saved_status_index()
            .map_or_else(|| self.pack(), |idx| self.spsr[idx].into())
    }

    pub fn write_saved_status(&mut self, word: u32) {
        self.write_saved_status_of(self.current_mode(), word);
    }

    /// Writes the SPSR slot owned by `mode`, whatever the current mode is.
    /// Used on exception entry, where the slot of the target mode is filled
    /// before switching to it.
    pub fn write_saved_status_of(&mut self, mode: Mode, word: u32) {
        if let Some(idx) = mode.saved_status_index() {
            self.spsr[idx] = Psr::from(word);
        }
    }

    /// CPSR = SPSR. Does nothing in User and System.
    pub fn copy_saved_status_into_current(&mut self) {
        if self.saved_status_index().is_some() {
            self.unpack(self.read_saved_status());
        }
    }

    /// Replaces the N/Z/C/V bits of the current SPSR with those of `word`.
    pub fn merge_flag_bits_into_saved_status(&mut self, word: u32) {
        if let Some(idx) = self.saved_status_index() {
            self.spsr[idx].merge_flag_bits(word);
        }
    }

    #[must_use]
    pub fn sign_flag(&self) -> bool {
        self.cpsr.sign_flag()
    }

    #[must_use]
    pub fn zero_flag(&self) -> bool {
        self.cpsr.zero_flag()
    }

    #[must_use]
    pub fn carry_flag(&self) -> bool {
        self.cpsr.carry_flag()
    }

    #[must_use]
    pub fn overflow_flag(&self) -> bool {
        self.cpsr.overflow_flag()
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.cpsr.set_sign_flag(value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.cpsr.set_zero_flag(value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.cpsr.set_carry_flag(value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.cpsr.set_overflow_flag(value);
    }

    pub fn set_flags(&mut self, op_result: &ArithmeticOpResult) {
        self.cpsr.set_flags(op_result);
    }

    #[must_use]
    pub fn cpu_state(&self) -> CpuState {
        self.cpsr.cpu_state()
    }

    pub fn set_cpu_state(&mut self, state: CpuState) {
        self.cpsr.set_cpu_state(state);
    }
}
