//! rv32i_sim 命令行入口
//!
//! 装载 `<name>text.bin` / `<name>data.bin`（或 ELF），然后单步、慢速或全速运行。
//! 日志写到 stderr，stdout 只留给仿真程序自己的输出。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use rv32i_sim::cpu::{DumpFormat, RunExit, RunSummary, StepOutcome, SubwordStores};
use rv32i_sim::memory::AddressPolicy;
use rv32i_sim::sim_env::{SimConfig, SimEnv, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// 菜单驱动：单步 / 慢速 / 全速
    Interactive,
    /// 全速运行到结束
    Run,
    /// 每条指令之间暂停
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Radix {
    Hex,
    Dec,
}

impl From<Radix> for DumpFormat {
    fn from(radix: Radix) -> Self {
        match radix {
            Radix::Hex => DumpFormat::Hex,
            Radix::Dec => DumpFormat::Decimal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "RV32I instruction-set simulator")]
struct Args {
    /// Program name; images are read from <NAME>text.bin and <NAME>data.bin
    program: Option<String>,

    /// Directory containing the program images
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Load a RISC-V ELF instead of raw images
    #[arg(long)]
    elf: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Mode::Interactive)]
    mode: Mode,

    /// Stop a run after N instructions (0 = no limit)
    #[arg(long, default_value_t = 0)]
    max_instructions: u64,

    /// Delay between instructions in slow mode, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Log filter, e.g. "info" or "rv32i_sim=trace"; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Dump registers after a non-interactive run
    #[arg(long, value_enum)]
    dump_regs: Option<Radix>,

    /// Dump memory words START..=END (word indices) after a non-interactive run
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    dump_mem: Option<Vec<usize>>,

    /// Radix used by --dump-mem
    #[arg(long, value_enum, default_value_t = Radix::Hex)]
    mem_radix: Radix,

    /// Mirror out-of-range addresses into memory instead of faulting
    #[arg(long)]
    wrap_addresses: bool,

    /// SB/SH overwrite the whole word slot like SW
    #[arg(long)]
    legacy_subword_stores: bool,

    /// Stop a run at the first unimplemented instruction
    #[arg(long)]
    stop_on_unimplemented: bool,
}

impl Args {
    fn to_config(&self, program: Option<String>) -> SimConfig {
        let mut config = SimConfig::new()
            .with_image_dir(&self.dir)
            .with_max_instructions(self.max_instructions)
            .with_slow_delay(Duration::from_millis(self.delay_ms))
            .with_stop_on_unimplemented(self.stop_on_unimplemented);
        if let Some(name) = program {
            config = config.with_program(name);
        }
        if let Some(elf) = &self.elf {
            config = config.with_elf_path(elf);
        }
        if self.wrap_addresses {
            config = config.with_address_policy(AddressPolicy::Wrap);
        }
        if self.legacy_subword_stores {
            config = config.with_subword_stores(SubwordStores::Legacy);
        }
        config
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let program = match (&args.program, &args.elf) {
        (Some(name), _) => Some(name.clone()),
        (None, Some(_)) => None,
        (None, None) => Some(prompt(&mut input, "Program name (without text.bin/data.bin): ")?),
    };

    let mut env = match SimEnv::from_config(args.to_config(program)) {
        Ok(env) => env,
        Err(SimError::MissingImage { path }) => {
            error!(path = %path.display(), "file not found");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    info!(entry = format_args!("0x{:08x}", env.entry_pc()), "program loaded");

    match args.mode {
        Mode::Run => report(env.run()?),
        Mode::Slow => report(env.run_slow()?),
        Mode::Interactive => {
            interactive(&mut env, &mut input)?;
            return Ok(());
        }
    }

    if let Some(radix) = args.dump_regs {
        env.dump_regs(radix.into())?;
    }
    if let Some(range) = &args.dump_mem {
        if let [start, end] = range[..] {
            env.dump_mem(start, end, args.mem_radix.into())?;
        }
    }
    Ok(())
}

fn report(summary: RunSummary) {
    match summary.exit {
        RunExit::Unimplemented(raw) => {
            error!(executed = summary.executed, "stopped at unimplemented instruction 0x{raw:08x}")
        }
        exit => info!(executed = summary.executed, ?exit, "simulation finished"),
    }
}

fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

const MENU: &str = "\
What would you like to do?
1 -> Step one instruction
2 -> Run slowly, one instruction at a time
3 -> Run the whole program
4 -> Dump registers
5 -> Dump memory
6 -> Reset
0 -> Quit";

fn interactive(env: &mut SimEnv, input: &mut impl BufRead) -> Result<(), SimError> {
    loop {
        println!("{MENU}");
        let choice = prompt(input, "Option: ")?;
        println!();

        match choice.as_str() {
            "1" => match env.step()? {
                StepOutcome::Halted => return Ok(()),
                StepOutcome::Unimplemented { raw, pc } => {
                    println!("unimplemented instruction 0x{raw:08x} at 0x{pc:08x}, skipped");
                }
                StepOutcome::Retired => {
                    println!("pc = 0x{:08x}", env.cpu.pc());
                }
            },
            "2" => {
                let summary = env.run_slow()?;
                report(summary);
                if summary.exit == RunExit::Halted {
                    return Ok(());
                }
            }
            "3" => {
                let summary = env.run()?;
                report(summary);
                if summary.exit == RunExit::Halted {
                    return Ok(());
                }
            }
            "4" => {
                let radix = prompt(input, "Format (h/d): ")?;
                env.dump_regs(parse_format(&radix))?;
            }
            "5" => {
                let range = prompt(input, "Word range (start end): ")?;
                let mut parts = range.split_whitespace().map(str::parse::<usize>);
                match (parts.next(), parts.next()) {
                    (Some(Ok(start)), Some(Ok(end))) => {
                        let radix = prompt(input, "Format (h/d): ")?;
                        if let Err(e) = env.dump_mem(start, end, parse_format(&radix)) {
                            println!("{e}");
                        }
                    }
                    _ => println!("Expected two word indices."),
                }
            }
            "6" => {
                env.reset()?;
                println!("Program reloaded.");
            }
            "0" | "q" | "quit" => return Ok(()),
            // stdin 已关闭
            "" => return Ok(()),
            _ => println!("Options are 0 to 6."),
        }
        println!();
    }
}

fn parse_format(text: &str) -> DumpFormat {
    if text.starts_with('d') {
        DumpFormat::Decimal
    } else {
        DumpFormat::Hex
    }
}
