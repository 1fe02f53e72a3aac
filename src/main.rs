use std::{error, fs, path::Path};

use clap::Parser;
use emu::cpu::alu;
use emu::cpu::arm7tdmi::Arm7tdmi;
use emu::cpu::exception::Exception;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod args;

use args::Args;

fn main() -> Result<(), Box<dyn error::Error>> {
    let args = Args::parse();

    // The guard flushes the log file when dropped, keep it until the end.
    let _guard = init_logging(args.log_dir.as_deref())?;

    println!("arm7core v{}", env!("CARGO_PKG_VERSION"));

    let mut cpu = Arm7tdmi::new(args.mode.into());
    for reg in 0..13 {
        cpu.set_register_at(reg, u32::try_from(reg)? * 0x0101_0101);
    }
    cpu.set_sp(0x0300_7F00);
    cpu.set_program_counter(args.return_address.wrapping_sub(4));

    let exception: Exception = args.exception.into();
    info!("before {exception:?}");
    dump(&cpu);

    cpu.enter_exception(exception, args.return_address);
    info!("in handler");
    dump(&cpu);

    // Handler body: compare R0 with R1 and clobber the banked stack pointer.
    let cmp = alu::sub(cpu.register_at(0), cpu.register_at(1));
    cpu.state.set_flags(&cmp);
    cpu.set_sp(cpu.sp().wrapping_sub(0x20));

    cpu.return_from_exception();
    info!("after return");
    dump(&cpu);

    Ok(())
}

fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, Box<dyn error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    let Some(dir) = log_dir else {
        registry.init();
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, "arm7core.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    registry
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(Some(guard))
}

fn dump(cpu: &Arm7tdmi) {
    let visible = cpu.registers.visible(&cpu.state);

    for (row, chunk) in visible.chunks(4).enumerate() {
        let line = chunk
            .iter()
            .enumerate()
            .map(|(col, value)| format!("R{:<2} {value:08X}", row * 4 + col))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
    }

    println!(
        "CPSR {:08X}  SPSR {:08X}  mode {:?}",
        cpu.state.pack(),
        cpu.state.read_saved_status(),
        cpu.state.current_mode()
    );
}
