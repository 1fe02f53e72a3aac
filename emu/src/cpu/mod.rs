#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_possible_truncation)]
pub mod alu;

#[allow(clippy::module_name_repetitions)]
pub mod arm7tdmi;
pub mod condition;
pub mod cpu_modes;
pub mod exception;
pub mod mode_state;
pub mod psr;
pub mod register_bank;
pub mod registers;
