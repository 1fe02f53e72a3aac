use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::alu::ArithmeticOpResult;
use crate::cpu::cpu_modes::Mode;
use crate::cpu::exception::Exception;
use crate::cpu::mode_state::ModeState;
use crate::cpu::psr::CpuState;
use crate::cpu::registers::RegisterFile;

pub const SIZE_OF_ARM_INSTRUCTION: u32 = 4;
pub const SIZE_OF_THUMB_INSTRUCTION: u32 = 2;

/// Decode-execute loop for one instruction set.
///
/// The core ships no implementation: ARM and THUMB executors live with the
/// decoder and are picked by [`Arm7tdmi::step`] from the T bit.
pub trait Processor {
    /// Executes the instruction at `pc`. The executor is responsible for
    /// moving the PC on (or branching).
    fn execute(&mut self, cpu: &mut Arm7tdmi, bus: &mut dyn Bus, pc: u32);
}

/// One CPU instance. Owns every mutable register and status word, nothing is
/// shared between instances.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arm7tdmi {
    pub state: ModeState,
    pub registers: RegisterFile,
}

impl Arm7tdmi {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            state: ModeState::new(mode),
            registers: RegisterFile::default(),
        }
    }

    #[must_use]
    pub fn register_at(&self, reg: usize) -> u32 {
        self.registers.read_arch(&self.state, reg)
    }

    pub fn set_register_at(&mut self, reg: usize, value: u32) {
        self.registers.write_arch(&self.state, reg, value);
    }

    #[must_use]
    pub fn sp(&self) -> u32 {
        self.registers.read_sp(&self.state)
    }

    pub fn set_sp(&mut self, value: u32) {
        self.registers.write_sp(&self.state, value);
    }

    #[must_use]
    pub fn lr(&self) -> u32 {
        self.registers.read_lr(&self.state)
    }

    pub fn set_lr(&mut self, value: u32) {
        self.registers.write_lr(&self.state, value);
    }

    #[must_use]
    pub const fn program_counter(&self) -> u32 {
        self.registers.read_pc()
    }

    pub const fn set_program_counter(&mut self, value: u32) {
        self.registers.write_pc(value);
    }

    /// Writes an ALU result to `rd` and, when `set_conditions` is on, its
    /// flags to the CPSR.
    pub fn store_result(&mut self, rd: usize, op_result: &ArithmeticOpResult, set_conditions: bool) {
        self.set_register_at(rd, op_result.result);

        if set_conditions {
            self.state.set_flags(op_result);
        }
    }

    /// Exception entry, in this order: the CPSR is saved into the SPSR of the
    /// target mode, the mode is switched, LR of the new mode gets
    /// `return_address` and the PC jumps to the vector.
    pub fn enter_exception(&mut self, exception: Exception, return_address: u32) {
        let target = exception.mode();
        let cpsr = self.state.pack();

        tracing::trace!(
            "entering {exception:?}: {:?} -> {target:?}, CPSR=0x{cpsr:08X}, LR=0x{return_address:08X}",
            self.state.current_mode()
        );

        self.state.write_saved_status_of(target, cpsr);
        self.state.set_mode(target);
        self.registers.write_lr(&self.state, return_address);
        self.registers.write_pc(exception.vector());
    }

    /// Exception return: CPSR is restored from the SPSR and the PC from the
    /// LR of the mode being left.
    pub fn return_from_exception(&mut self) {
        let from = self.state.current_mode();
        let return_address = self.registers.read_lr(&self.state);

        self.state.copy_saved_status_into_current();
        self.registers.write_pc(return_address);

        tracing::trace!(
            "returning from {from:?} to {:?} at 0x{return_address:08X}",
            self.state.current_mode()
        );
    }

    /// Aligns the PC for the current instruction set and hands it to `arm`
    /// or `thumb`.
    pub fn step<A, T>(&mut self, arm: &mut A, thumb: &mut T, bus: &mut dyn Bus)
    where
        A: Processor,
        T: Processor,
    {
        match self.state.cpu_state() {
            CpuState::Thumb => {
                let pc = self.program_counter() & !0b1;
                self.set_program_counter(pc);
                thumb.execute(self, bus, pc);
            }
            CpuState::Arm => {
                let pc = self.program_counter() & !0b11;
                self.set_program_counter(pc);
                arm.execute(self, bus, pc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Ram;
    use crate::cpu::alu;
    use crate::cpu::condition::Condition;
    use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER, REG_SP};
    use pretty_assertions::assert_eq;

    /// Understands only `ADDS Rd, Rn, Rm` (cond 1110, opcode 0100, S=1,
    /// register operand without shift) and `BX Rm`.
    #[derive(Default)]
    struct TinyArm {
        executed: Vec<u32>,
    }

    impl Processor for TinyArm {
        fn execute(&mut self, cpu: &mut Arm7tdmi, bus: &mut dyn Bus, pc: u32) {
            self.executed.push(pc);
            let op_code = bus.read32(pc);

            if !cpu.state.cpsr().can_execute(Condition::of_arm_instruction(op_code)) {
                cpu.registers.advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
                return;
            }

            if op_code & 0x0FFF_FFF0 == 0x012F_FF10 {
                let target = cpu.register_at((op_code & 0xF) as usize);
                cpu.state.set_cpu_state(CpuState::from(target & 1 == 1));
                cpu.set_program_counter(target);
                return;
            }

            let rn = ((op_code >> 16) & 0xF) as usize;
            let rd = ((op_code >> 12) & 0xF) as usize;
            let rm = (op_code & 0xF) as usize;
            let set_conditions = op_code & (1 << 20) != 0;

            let result = alu::add(cpu.register_at(rn), cpu.register_at(rm));
            cpu.store_result(rd, &result, set_conditions);
            cpu.registers.advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
        }
    }

    #[derive(Default)]
    struct CountingThumb {
        executed: Vec<u32>,
    }

    impl Processor for CountingThumb {
        fn execute(&mut self, cpu: &mut Arm7tdmi, _bus: &mut dyn Bus, pc: u32) {
            self.executed.push(pc);
            cpu.registers.advance_program_counter(SIZE_OF_THUMB_INSTRUCTION);
        }
    }

    #[test]
    fn check_default_cpu() {
        let cpu = Arm7tdmi::default();
        assert_eq!(cpu.state.current_mode(), Mode::Supervisor);
        assert_eq!(cpu.state.cpu_state(), CpuState::Arm);
        assert_eq!(cpu.registers.visible(&cpu.state), [0; 16]);
    }

    #[test]
    fn check_instances_are_independent() {
        let mut a = Arm7tdmi::new(Mode::Irq);
        let b = Arm7tdmi::new(Mode::Irq);

        a.set_sp(0x1000);
        a.set_register_at(0, 1);

        assert_eq!(b.sp(), 0);
        assert_eq!(b.register_at(0), 0);
    }

    #[test]
    fn check_store_result() {
        let mut cpu = Arm7tdmi::new(Mode::User);

        cpu.store_result(2, &alu::add(0xFFFF_FFFF, 1), false);
        assert_eq!(cpu.register_at(2), 0);
        assert!(!cpu.state.zero_flag());

        cpu.store_result(3, &alu::add(0xFFFF_FFFF, 1), true);
        assert!(cpu.state.zero_flag());
        assert!(cpu.state.carry_flag());
    }

    #[test]
    fn check_irq_entry_and_return() {
        let mut cpu = Arm7tdmi::new(Mode::User);
        cpu.state.set_flags(&alu::sub(1, 2));
        cpu.state.set_cpu_state(CpuState::Thumb);
        cpu.set_sp(0x0300_7F00);
        cpu.set_lr(0x0800_0100);
        cpu.set_program_counter(0x0800_0200);
        let user_cpsr = cpu.state.pack();

        cpu.enter_exception(Exception::Irq, 0x0800_0204);

        assert_eq!(cpu.state.current_mode(), Mode::Irq);
        assert_eq!(cpu.state.read_saved_status(), user_cpsr);
        assert_eq!(cpu.lr(), 0x0800_0204);
        assert_eq!(cpu.program_counter(), 0x18);
        assert_eq!(cpu.sp(), 0);

        // Flags and control bits are carried over, only the mode changed.
        assert_eq!(cpu.state.pack(), (user_cpsr & !0x1F) | u32::from(Mode::Irq));

        cpu.set_sp(0x0300_7FA0);
        cpu.state.set_flags(&alu::add(0, 0));

        cpu.return_from_exception();

        assert_eq!(cpu.state.current_mode(), Mode::User);
        assert_eq!(cpu.state.pack(), user_cpsr);
        assert_eq!(cpu.program_counter(), 0x0800_0204);
        assert_eq!(cpu.sp(), 0x0300_7F00);
        assert_eq!(cpu.lr(), 0x0800_0100);
    }

    #[test]
    fn check_nested_exceptions_keep_their_own_banks() {
        let mut cpu = Arm7tdmi::new(Mode::User);

        cpu.enter_exception(Exception::SoftwareInterrupt, 0x100);
        cpu.set_sp(0x0300_7FE0);
        let svc_cpsr = cpu.state.pack();

        cpu.enter_exception(Exception::Fiq, 0x200);
        assert_eq!(cpu.state.current_mode(), Mode::Fiq);
        assert_eq!(cpu.state.read_saved_status(), svc_cpsr);
        cpu.set_register_at(8, 0xF1F1);

        cpu.return_from_exception();
        assert_eq!(cpu.state.current_mode(), Mode::Supervisor);
        assert_eq!(cpu.program_counter(), 0x200);
        assert_eq!(cpu.lr(), 0x100);
        assert_eq!(cpu.sp(), 0x0300_7FE0);
        assert_eq!(cpu.register_at(8), 0);

        cpu.return_from_exception();
        assert_eq!(cpu.state.current_mode(), Mode::User);
        assert_eq!(cpu.program_counter(), 0x100);
    }

    #[test]
    fn check_return_from_user_mode_keeps_cpsr() {
        let mut cpu = Arm7tdmi::new(Mode::User);
        cpu.set_lr(0x44);
        let cpsr = cpu.state.pack();

        cpu.return_from_exception();

        assert_eq!(cpu.state.pack(), cpsr);
        assert_eq!(cpu.program_counter(), 0x44);
    }

    #[test]
    fn check_step_dispatches_on_state_bit() {
        let mut bus = Ram::new(0x100);
        // ADDS R2, R0, R1
        bus.write32(0x10, 0b1110_00_0_0100_1_0000_0010_00000000_0001);
        // BX R3
        bus.write32(0x14, 0xE12F_FF13);

        let mut cpu = Arm7tdmi::new(Mode::System);
        cpu.set_register_at(0, 0x7FFF_FFFF);
        cpu.set_register_at(1, 1);
        cpu.set_register_at(3, 0x41);
        cpu.set_program_counter(0x12);

        let mut arm = TinyArm::default();
        let mut thumb = CountingThumb::default();

        cpu.step(&mut arm, &mut thumb, &mut bus);
        assert_eq!(cpu.register_at(2), 0x8000_0000);
        assert!(cpu.state.sign_flag());
        assert!(cpu.state.overflow_flag());
        assert_eq!(cpu.program_counter(), 0x14);

        cpu.step(&mut arm, &mut thumb, &mut bus);
        assert_eq!(cpu.state.cpu_state(), CpuState::Thumb);

        cpu.step(&mut arm, &mut thumb, &mut bus);
        assert_eq!(arm.executed, vec![0x10, 0x14]);
        assert_eq!(thumb.executed, vec![0x40]);
        assert_eq!(cpu.register_at(REG_PROGRAM_COUNTER), 0x42);
    }

    #[test]
    fn check_step_skips_failed_condition() {
        let mut bus = Ram::new(0x10);
        // ADDNES R2, R0, R1
        bus.write32(0, 0b0001_00_0_0100_1_0000_0010_00000000_0001);

        let mut cpu = Arm7tdmi::new(Mode::User);
        cpu.state.set_zero_flag(true);
        cpu.set_register_at(1, 5);

        cpu.step(&mut TinyArm::default(), &mut CountingThumb::default(), &mut bus);

        assert_eq!(cpu.register_at(2), 0);
        assert_eq!(cpu.program_counter(), 4);
    }

    #[test]
    fn check_snapshot_round_trip() {
        let mut cpu = Arm7tdmi::new(Mode::User);
        cpu.set_register_at(REG_SP, 0x0300_7F00);
        cpu.enter_exception(Exception::Undefined, 0x0800_0008);
        cpu.set_register_at(REG_LR, 0x0800_000C);
        cpu.state.merge_flag_bits_into_saved_status(0xF000_0000);

        let json = serde_json::to_string(&cpu).unwrap();
        let restored: Arm7tdmi = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, cpu);
        assert_eq!(restored.state.current_mode(), Mode::Undefined);
        assert_eq!(restored.lr(), 0x0800_000C);
    }
}
