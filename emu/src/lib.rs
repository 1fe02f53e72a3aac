//! ARM7TDMI register banking, status words and flag-setting arithmetic.
//!
//! The crate is the state a decoder drives: an [`Arm7tdmi`](cpu::arm7tdmi::Arm7tdmi)
//! owns one [`ModeState`](cpu::mode_state::ModeState) and one
//! [`RegisterFile`](cpu::registers::RegisterFile), and [`cpu::alu`] computes
//! results with their N/Z/C/V flags. Memory is reached through [`bus::Bus`].

mod bitwise;

pub mod bus;
pub mod cpu;
