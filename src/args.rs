use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use emu::cpu::cpu_modes::Mode;
use emu::cpu::exception::Exception;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Runs one exception round trip on an ARM7TDMI register file")]
pub struct Args {
    /// Mode the CPU is in before the exception.
    #[arg(long, value_enum, default_value_t = ModeArg::Svc)]
    pub mode: ModeArg,

    /// Exception to take.
    #[arg(long, value_enum, default_value_t = ExceptionArg::Irq)]
    pub exception: ExceptionArg,

    /// Address stored in the link register on entry (hex: 0x1234 or decimal: 1234)
    #[arg(long, value_parser = parse_hex_or_dec, default_value = "0x08000000")]
    pub return_address: u32,

    /// Also write logs to a daily-rolling file in this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    User,
    Fiq,
    Irq,
    Svc,
    Abt,
    Und,
    System,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::User => Self::User,
            ModeArg::Fiq => Self::Fiq,
            ModeArg::Irq => Self::Irq,
            ModeArg::Svc => Self::Supervisor,
            ModeArg::Abt => Self::Abort,
            ModeArg::Und => Self::Undefined,
            ModeArg::System => Self::System,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionArg {
    Reset,
    Undefined,
    Swi,
    PrefetchAbort,
    DataAbort,
    Irq,
    Fiq,
}

impl From<ExceptionArg> for Exception {
    fn from(arg: ExceptionArg) -> Self {
        match arg {
            ExceptionArg::Reset => Self::Reset,
            ExceptionArg::Undefined => Self::Undefined,
            ExceptionArg::Swi => Self::SoftwareInterrupt,
            ExceptionArg::PrefetchAbort => Self::PrefetchAbort,
            ExceptionArg::DataAbort => Self::DataAbort,
            ExceptionArg::Irq => Self::Irq,
            ExceptionArg::Fiq => Self::Fiq,
        }
    }
}

pub fn parse_hex_or_dec(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}
