//! 仿真环境初始化模块
//!
//! 本模块负责：
//! - 读取仿真配置
//! - 加载 `<name>text.bin` / `<name>data.bin` 镜像或 ELF 文件
//! - 初始化 CPU 和内存
//! - 寄存器与内存转储
//!
//! # 示例
//!
//! ```no_run
//! use rv32i_sim::sim_env::{SimConfig, SimEnv};
//!
//! let config = SimConfig::new()
//!     .with_image_dir("programs")
//!     .with_program("hello")
//!     .with_max_instructions(100_000);
//!
//! let mut env = SimEnv::from_config(config).expect("Failed to create sim env");
//! env.run().expect("simulation failed");
//! ```

use std::fs;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use elf::ElfBytes;
use elf::abi::{EM_RISCV, PF_W, PF_X, PT_LOAD};
use elf::endian::AnyEndian;
use thiserror::Error;
use tracing::{debug, info};

use crate::cpu::{
    CpuBuilder, CpuCore, CpuError, DEFAULT_TEXT_LIMIT, DumpFormat, RunSummary, StepOutcome,
    SubwordStores,
};
use crate::memory::{
    AccessSize, AddressPolicy, DATA_BASE, MEM_BYTES, MEM_WORDS, MemError, TEXT_BASE, WordMemory,
};

/// 仿真环境错误
#[derive(Debug, Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("ELF parse error: {0}")]
    ElfParse(String),
    #[error("memory error: {0}")]
    Memory(#[from] MemError),
    #[error("CPU error: {0}")]
    Cpu(#[from] CpuError),
    #[error("image not found: {}", path.display())]
    MissingImage { path: PathBuf },
    #[error("bad word range [{start}, {end}]")]
    BadRange { start: usize, end: usize },
}

/// 仿真配置
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 程序名前缀，镜像文件为 `<name>text.bin` 与 `<name>data.bin`
    pub program: Option<String>,
    /// 镜像所在目录
    pub image_dir: PathBuf,
    /// 显式指定的代码段镜像，优先于程序名
    pub text_path: Option<PathBuf>,
    /// 显式指定的数据段镜像，优先于程序名
    pub data_path: Option<PathBuf>,
    /// ELF 文件，优先于原始镜像
    pub elf_path: Option<PathBuf>,
    /// `run` 在 PC 到达此地址时停止
    pub text_limit: u32,
    /// 数据段装载地址
    pub data_base: u32,
    /// 单次 run 的最大指令数，0 表示不限制
    pub max_instructions: u64,
    pub address_policy: AddressPolicy,
    pub subword_stores: SubwordStores,
    pub stop_on_unimplemented: bool,
    /// 慢速运行时每条指令之间的间隔
    pub slow_delay: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            program: None,
            image_dir: PathBuf::from("."),
            text_path: None,
            data_path: None,
            elf_path: None,
            text_limit: DEFAULT_TEXT_LIMIT,
            data_base: DATA_BASE,
            max_instructions: 0,
            address_policy: AddressPolicy::default(),
            subword_stores: SubwordStores::default(),
            stop_on_unimplemented: false,
            slow_delay: Duration::from_secs(1),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, name: impl Into<String>) -> Self {
        self.program = Some(name.into());
        self
    }

    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    pub fn with_text_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.text_path = Some(path.into());
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_elf_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.elf_path = Some(path.into());
        self
    }

    pub fn with_text_limit(mut self, limit: u32) -> Self {
        self.text_limit = limit;
        self
    }

    pub fn with_data_base(mut self, base: u32) -> Self {
        self.data_base = base;
        self
    }

    pub fn with_max_instructions(mut self, max: u64) -> Self {
        self.max_instructions = max;
        self
    }

    pub fn with_address_policy(mut self, policy: AddressPolicy) -> Self {
        self.address_policy = policy;
        self
    }

    pub fn with_subword_stores(mut self, mode: SubwordStores) -> Self {
        self.subword_stores = mode;
        self
    }

    pub fn with_stop_on_unimplemented(mut self, stop: bool) -> Self {
        self.stop_on_unimplemented = stop;
        self
    }

    pub fn with_slow_delay(mut self, delay: Duration) -> Self {
        self.slow_delay = delay;
        self
    }

    /// 代码段镜像路径
    pub fn text_image_path(&self) -> Option<PathBuf> {
        self.text_path.clone().or_else(|| {
            self.program
                .as_ref()
                .map(|name| self.image_dir.join(format!("{name}text.bin")))
        })
    }

    /// 数据段镜像路径
    pub fn data_image_path(&self) -> Option<PathBuf> {
        self.data_path.clone().or_else(|| {
            self.program
                .as_ref()
                .map(|name| self.image_dir.join(format!("{name}data.bin")))
        })
    }
}

/// ELF 程序段信息
#[derive(Debug, Clone)]
pub struct ElfSegment {
    /// 虚拟地址
    pub vaddr: u32,
    /// 内存中的大小
    pub mem_size: usize,
    /// 段数据（文件中的部分）
    pub data: Vec<u8>,
    pub executable: bool,
    pub writable: bool,
}

/// ELF 文件解析结果
#[derive(Debug, Clone)]
pub struct ElfInfo {
    /// 入口点地址
    pub entry: u32,
    /// PT_LOAD 程序段
    pub segments: Vec<ElfSegment>,
}

impl ElfInfo {
    /// 解析 ELF 文件
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let data = read_image(path.as_ref())?;
        Self::parse_bytes(&data)
    }

    /// 从字节数组解析 ELF（使用 elf crate）
    pub fn parse_bytes(data: &[u8]) -> Result<Self, SimError> {
        let elf_file = ElfBytes::<AnyEndian>::minimal_parse(data)
            .map_err(|e| SimError::ElfParse(format!("Failed to parse ELF: {e}")))?;

        let header = &elf_file.ehdr;
        if header.e_machine != EM_RISCV {
            return Err(SimError::ElfParse(format!(
                "Not a RISC-V ELF (machine type: 0x{:x}, expected 0x{:x})",
                header.e_machine, EM_RISCV
            )));
        }
        if header.class != elf::file::Class::ELF32 {
            return Err(SimError::ElfParse("Only 32-bit ELF is supported".into()));
        }
        if header.endianness != AnyEndian::Little {
            return Err(SimError::ElfParse("Only little-endian ELF is supported".into()));
        }

        let mut segments = Vec::new();
        if let Some(phdrs) = elf_file.segments() {
            for phdr in phdrs.iter().filter(|p| p.p_type == PT_LOAD) {
                let data = elf_file
                    .segment_data(&phdr)
                    .map_err(|e| SimError::ElfParse(format!("Failed to read segment data: {e}")))?
                    .to_vec();
                segments.push(ElfSegment {
                    vaddr: phdr.p_vaddr as u32,
                    mem_size: phdr.p_memsz as usize,
                    data,
                    executable: phdr.p_flags & PF_X != 0,
                    writable: phdr.p_flags & PF_W != 0,
                });
            }
        }

        Ok(ElfInfo {
            entry: header.e_entry as u32,
            segments,
        })
    }

    /// 把所有 PT_LOAD 段写入内存，`.bss` 部分清零
    pub fn load_into(&self, memory: &mut WordMemory) -> Result<(), SimError> {
        for seg in &self.segments {
            memory.write_image(seg.vaddr, &seg.data, MEM_BYTES)?;
            if seg.mem_size > seg.data.len() {
                let bss_start = seg.vaddr.wrapping_add(seg.data.len() as u32);
                let zeros = vec![0u8; seg.mem_size - seg.data.len()];
                memory.write_image(bss_start, &zeros, MEM_BYTES)?;
            }
            debug!(
                vaddr = seg.vaddr,
                size = seg.mem_size,
                "loaded segment {}{}",
                if seg.executable { "X" } else { "-" },
                if seg.writable { "W" } else { "R" },
            );
        }
        Ok(())
    }
}

/// 读取镜像文件，文件不存在时返回 `MissingImage`
fn read_image(path: &Path) -> Result<Vec<u8>, SimError> {
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SimError::MissingImage {
            path: path.to_path_buf(),
        },
        _ => SimError::Io(e),
    })
}

/// 按配置装载程序，返回入口 PC
///
/// 优先级：ELF 文件 > 代码/数据段镜像 > 空内存。
pub fn load_program(memory: &mut WordMemory, config: &SimConfig) -> Result<u32, SimError> {
    if let Some(elf_path) = &config.elf_path {
        let elf = ElfInfo::parse(elf_path)?;
        elf.load_into(memory)?;
        info!(
            path = %elf_path.display(),
            entry = format_args!("0x{:08x}", elf.entry),
            segments = elf.segments.len(),
            "loaded ELF"
        );
        return Ok(elf.entry);
    }

    if let Some(text_path) = config.text_image_path() {
        let text = read_image(&text_path)?;
        memory.write_image(TEXT_BASE, &text, config.data_base)?;
        info!(path = %text_path.display(), bytes = text.len(), "loaded text image");
    }
    if let Some(data_path) = config.data_image_path() {
        let data = read_image(&data_path)?;
        memory.write_image(config.data_base, &data, MEM_BYTES)?;
        info!(path = %data_path.display(), bytes = data.len(), "loaded data image");
    }
    Ok(TEXT_BASE)
}

/// 以 `mem[i] = value` 的形式打印闭区间 `[start, end]` 内的字
pub fn write_mem_dump(
    memory: &WordMemory,
    out: &mut dyn Write,
    start: usize,
    end: usize,
    format: DumpFormat,
) -> Result<(), SimError> {
    if start > end {
        return Err(SimError::BadRange { start, end });
    }
    if end >= MEM_WORDS {
        return Err(MemError::OutOfRange {
            addr: (end as u32).wrapping_mul(4),
            access: AccessSize::Word,
        }
        .into());
    }
    for (index, &word) in memory.words()[start..=end].iter().enumerate() {
        writeln!(out, "mem[{}] = {}", start + index, format.format_word(word))?;
    }
    Ok(())
}

/// 仿真环境
///
/// 封装了 CPU、内存、控制台输出和仿真配置，提供统一的仿真接口
pub struct SimEnv<W: Write = Stdout> {
    /// CPU 核心
    pub cpu: CpuCore,
    /// 主内存
    pub memory: WordMemory,
    /// 配置
    pub config: SimConfig,
    /// 系统调用与转储的输出
    console: W,
    /// 已执行的指令数
    pub instructions_executed: u64,
    entry_pc: u32,
}

impl SimEnv<Stdout> {
    /// 从配置创建仿真环境，输出到标准输出
    pub fn from_config(config: SimConfig) -> Result<Self, SimError> {
        Self::with_console(config, io::stdout())
    }
}

impl<W: Write> SimEnv<W> {
    /// 从配置创建仿真环境，输出写入 `console`
    pub fn with_console(config: SimConfig, console: W) -> Result<Self, SimError> {
        let mut memory = WordMemory::with_policy(config.address_policy);
        let entry_pc = load_program(&mut memory, &config)?;
        let cpu = Self::build_cpu(&config, entry_pc);

        Ok(SimEnv {
            cpu,
            memory,
            config,
            console,
            instructions_executed: 0,
            entry_pc,
        })
    }

    fn build_cpu(config: &SimConfig, entry_pc: u32) -> CpuCore {
        CpuBuilder::new(entry_pc)
            .with_text_limit(config.text_limit)
            .with_subword_stores(config.subword_stores)
            .with_stop_on_unimplemented(config.stop_on_unimplemented)
            .build()
    }

    /// 执行单条指令
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        let was_halted = self.cpu.is_halted();
        let outcome = self.cpu.step(&mut self.memory, &mut self.console)?;
        if !was_halted {
            self.instructions_executed += 1;
        }
        self.console.flush()?;
        Ok(outcome)
    }

    /// 全速运行，受 `max_instructions` 限制
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let summary =
            self.cpu
                .run(&mut self.memory, &mut self.console, self.config.max_instructions)?;
        self.instructions_executed += summary.executed;
        self.console.flush()?;
        Ok(summary)
    }

    /// 逐条执行，每条之间暂停 `slow_delay`，并以 info 级别记录每条指令
    pub fn run_slow(&mut self) -> Result<RunSummary, SimError> {
        let delay = self.config.slow_delay;
        let summary = self.cpu.run_with(
            &mut self.memory,
            &mut self.console,
            self.config.max_instructions,
            |cpu, outcome| {
                info!(
                    pc = format_args!("0x{:08x}", cpu.prev_pc()),
                    next = format_args!("0x{:08x}", cpu.pc()),
                    ?outcome,
                    "step"
                );
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            },
        )?;
        self.instructions_executed += summary.executed;
        self.console.flush()?;
        Ok(summary)
    }

    /// 打印 32 个通用寄存器与 PC
    pub fn dump_regs(&mut self, format: DumpFormat) -> Result<(), SimError> {
        self.cpu.write_regs(&mut self.console, format)?;
        self.console.flush()?;
        Ok(())
    }

    /// 打印字下标闭区间 `[start, end]` 的内存
    pub fn dump_mem(&mut self, start: usize, end: usize, format: DumpFormat) -> Result<(), SimError> {
        write_mem_dump(&self.memory, &mut self.console, start, end, format)?;
        self.console.flush()?;
        Ok(())
    }

    /// 清空内存、重新装载程序并复位 CPU
    pub fn reset(&mut self) -> Result<(), SimError> {
        self.memory.clear();
        self.entry_pc = load_program(&mut self.memory, &self.config)?;
        self.cpu.reset(self.entry_pc);
        self.instructions_executed = 0;
        Ok(())
    }

    pub fn entry_pc(&self) -> u32 {
        self.entry_pc
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    pub fn into_console(self) -> W {
        self.console
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{RunExit, SP_INIT};
    use crate::memory::Memory;

    /// 测试用临时目录，测试结束时删除
    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("rv32i_sim_{}_{tag}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            TempDir(dir)
        }

        fn write(&self, name: &str, bytes: &[u8]) {
            fs::write(self.0.join(name), bytes).unwrap();
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn words_to_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn env_with_text(words: &[u32]) -> SimEnv<Vec<u8>> {
        let mut env = SimEnv::with_console(SimConfig::new(), Vec::new()).unwrap();
        env.memory
            .write_image(0, &words_to_bytes(words), DATA_BASE)
            .unwrap();
        env
    }

    #[test]
    fn test_sim_config_builder() {
        let config = SimConfig::new()
            .with_image_dir("/tmp/progs")
            .with_program("fib")
            .with_max_instructions(1000)
            .with_subword_stores(SubwordStores::Legacy)
            .with_address_policy(AddressPolicy::Wrap);

        assert_eq!(config.max_instructions, 1000);
        assert_eq!(
            config.text_image_path(),
            Some(PathBuf::from("/tmp/progs/fibtext.bin"))
        );
        assert_eq!(
            config.data_image_path(),
            Some(PathBuf::from("/tmp/progs/fibdata.bin"))
        );
        assert_eq!(config.subword_stores, SubwordStores::Legacy);
        assert_eq!(config.address_policy, AddressPolicy::Wrap);
        assert_eq!(config.text_limit, 0x2000);
    }

    #[test]
    fn test_explicit_paths_override_program_name() {
        let config = SimConfig::new()
            .with_program("fib")
            .with_text_path("a.bin");
        assert_eq!(config.text_image_path(), Some(PathBuf::from("a.bin")));
        assert_eq!(config.data_image_path(), Some(PathBuf::from("./fibdata.bin")));
    }

    #[test]
    fn test_load_images_from_dir() {
        let dir = TempDir::new("load_images");
        // addi x1, x0, 42 ; ecall
        dir.write("progtext.bin", &words_to_bytes(&[0x02A00093, 0x00000073]));
        dir.write("progdata.bin", b"hi\0");

        let config = SimConfig::new().with_image_dir(&dir.0).with_program("prog");
        let env = SimEnv::with_console(config, Vec::new()).unwrap();

        assert_eq!(env.memory.load32(0).unwrap(), 0x02A00093);
        assert_eq!(env.memory.load32(4).unwrap(), 0x00000073);
        assert_eq!(env.memory.word_at(0x800), Some(0x0000_6968));
        assert_eq!(env.entry_pc(), 0);
    }

    #[test]
    fn test_missing_image_reported() {
        let dir = TempDir::new("missing_image");
        dir.write("progtext.bin", &words_to_bytes(&[0x00000013]));

        let config = SimConfig::new().with_image_dir(&dir.0).with_program("prog");
        let err = SimEnv::with_console(config, Vec::new()).err().unwrap();

        match err {
            SimError::MissingImage { path } => assert!(path.ends_with("progdata.bin")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_text_image_must_fit_below_data() {
        let dir = TempDir::new("text_too_large");
        dir.write("bigtext.bin", &vec![0u8; DATA_BASE as usize + 4]);
        dir.write("bigdata.bin", b"");

        let config = SimConfig::new().with_image_dir(&dir.0).with_program("big");
        let err = SimEnv::with_console(config, Vec::new()).err().unwrap();
        assert!(matches!(err, SimError::Memory(MemError::ImageTooLarge { .. })));
    }

    #[test]
    fn test_hello_program_prints_string() {
        let dir = TempDir::new("hello");
        dir.write(
            "hellotext.bin",
            &words_to_bytes(&[
                0x00400893, // addi a7, x0, 4
                0x00002537, // lui a0, 2 (a0 = 0x2000)
                0x00000073, // ecall
                0x00A00893, // addi a7, x0, 10
                0x00000073, // ecall
            ]),
        );
        dir.write("hellodata.bin", b"Hello, RISC-V!\0");

        let config = SimConfig::new().with_image_dir(&dir.0).with_program("hello");
        let mut env = SimEnv::with_console(config, Vec::new()).unwrap();
        let summary = env.run().unwrap();

        assert_eq!(summary.exit, RunExit::Halted);
        assert_eq!(env.instructions_executed, 5);
        let out = String::from_utf8(env.into_console()).unwrap();
        assert_eq!(out, "Hello, RISC-V!\n-- program is finished running --\n");
    }

    #[test]
    fn test_step_counts_only_executed_instructions() {
        let mut env = env_with_text(&[
            0x00A00893, // addi a7, x0, 10
            0x00000073, // ecall
        ]);
        env.step().unwrap();
        assert_eq!(env.step().unwrap(), StepOutcome::Halted);
        assert_eq!(env.step().unwrap(), StepOutcome::Halted);
        assert_eq!(env.instructions_executed, 2);
    }

    #[test]
    fn test_run_respects_budget() {
        // jal x0, 0 死循环
        let mut env = env_with_text(&[0x0000006F]);
        env.config.max_instructions = 50;
        let summary = env.run().unwrap();
        assert_eq!(summary.exit, RunExit::BudgetExhausted);
        assert_eq!(summary.executed, 50);
        assert_eq!(env.cpu.pc(), 0);
    }

    #[test]
    fn test_run_slow_without_delay() {
        let mut env = env_with_text(&[
            0x00100093, // addi x1, x0, 1
            0x00A00893, // addi a7, x0, 10
            0x00000073, // ecall
        ]);
        env.config.slow_delay = Duration::ZERO;
        let summary = env.run_slow().unwrap();
        assert_eq!(summary.exit, RunExit::Halted);
        assert_eq!(summary.executed, 3);
        assert_eq!(env.cpu.read_reg(1), 1);
    }

    #[test]
    fn test_address_fault_surfaces_as_cpu_error() {
        // lui x1, 4 (x1 = 0x4000) ; lw x2, 0(x1)
        let mut env = env_with_text(&[0x000040B7, 0x0000A103]);
        let err = env.run().unwrap_err();
        assert!(matches!(
            err,
            SimError::Cpu(CpuError::AddressFault { pc: 4, .. })
        ));
    }

    #[test]
    fn test_wrap_policy_mirrors_address() {
        let config = SimConfig::new().with_address_policy(AddressPolicy::Wrap);
        let mut env = SimEnv::with_console(config, Vec::new()).unwrap();
        // lui x1, 4 (x1 = 0x4000) ; addi x2, x0, 7 ; sw x2, 8(x1)
        env.memory
            .write_image(0, &words_to_bytes(&[0x000040B7, 0x00700113, 0x0020A423]), DATA_BASE)
            .unwrap();
        env.config.max_instructions = 3;
        env.run().unwrap();
        assert_eq!(env.memory.load32(8).unwrap(), 7);
    }

    #[test]
    fn test_dump_regs_and_mem() {
        let mut env = env_with_text(&[0x02A00093]);
        env.step().unwrap();
        env.dump_regs(DumpFormat::Decimal).unwrap();
        env.dump_mem(0, 1, DumpFormat::Hex).unwrap();

        let out = String::from_utf8(env.console().clone()).unwrap();
        assert!(out.contains("reg[ 1]   ra = 42"));
        assert!(out.contains(&format!("reg[ 2]   sp = {SP_INIT}")));
        assert!(out.contains("reg[32]   pc = 4"));
        assert!(out.ends_with("mem[0] = 0x02A00093\nmem[1] = 0x00000000\n"));
    }

    #[test]
    fn test_dump_mem_rejects_bad_range() {
        let mut env = env_with_text(&[]);
        assert!(matches!(
            env.dump_mem(5, 4, DumpFormat::Hex),
            Err(SimError::BadRange { start: 5, end: 4 })
        ));
        assert!(matches!(
            env.dump_mem(0, MEM_WORDS, DumpFormat::Hex),
            Err(SimError::Memory(MemError::OutOfRange { .. }))
        ));
        assert!(env.dump_mem(MEM_WORDS - 1, MEM_WORDS - 1, DumpFormat::Decimal).is_ok());
    }

    #[test]
    fn test_reset_reloads_images() {
        let dir = TempDir::new("reset");
        dir.write(
            "ctext.bin",
            &words_to_bytes(&[
                0x00002137, // lui x2, 2
                0x00012023, // sw x0, 0(x2)
            ]),
        );
        dir.write("cdata.bin", &words_to_bytes(&[0xDEAD_BEEF]));

        let config = SimConfig::new().with_image_dir(&dir.0).with_program("c");
        let mut env = SimEnv::with_console(config, Vec::new()).unwrap();
        env.config.max_instructions = 2;
        env.run().unwrap();
        assert_eq!(env.memory.load32(0x2000).unwrap(), 0);

        env.reset().unwrap();
        assert_eq!(env.memory.load32(0x2000).unwrap(), 0xDEAD_BEEF);
        assert_eq!(env.cpu.pc(), 0);
        assert_eq!(env.cpu.read_reg(2), SP_INIT);
        assert_eq!(env.instructions_executed, 0);
    }

    /// 构造一个只有一个 PT_LOAD 段的最小 RV32 ELF
    fn minimal_elf(entry: u32, vaddr: u32, code: &[u8], mem_size: u32) -> Vec<u8> {
        let mut elf = Vec::new();
        elf.extend_from_slice(&[0x7F, b'E', b'L', b'F', 1, 1, 1, 0]);
        elf.extend_from_slice(&[0; 8]);
        elf.extend_from_slice(&2u16.to_le_bytes()); // e_type = EXEC
        elf.extend_from_slice(&EM_RISCV.to_le_bytes());
        elf.extend_from_slice(&1u32.to_le_bytes()); // e_version
        elf.extend_from_slice(&entry.to_le_bytes());
        elf.extend_from_slice(&52u32.to_le_bytes()); // e_phoff
        elf.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
        elf.extend_from_slice(&0u32.to_le_bytes()); // e_flags
        elf.extend_from_slice(&52u16.to_le_bytes()); // e_ehsize
        elf.extend_from_slice(&32u16.to_le_bytes()); // e_phentsize
        elf.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
        elf.extend_from_slice(&40u16.to_le_bytes()); // e_shentsize
        elf.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
        elf.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

        elf.extend_from_slice(&PT_LOAD.to_le_bytes());
        elf.extend_from_slice(&84u32.to_le_bytes()); // p_offset
        elf.extend_from_slice(&vaddr.to_le_bytes());
        elf.extend_from_slice(&vaddr.to_le_bytes());
        elf.extend_from_slice(&(code.len() as u32).to_le_bytes());
        elf.extend_from_slice(&mem_size.to_le_bytes());
        elf.extend_from_slice(&(PF_X | 4).to_le_bytes()); // R|X
        elf.extend_from_slice(&4u32.to_le_bytes());

        elf.extend_from_slice(code);
        elf
    }

    #[test]
    fn test_elf_parse_and_run() {
        let code = words_to_bytes(&[
            0x02A00093, // addi x1, x0, 42
            0x00A00893, // addi a7, x0, 10
            0x00000073, // ecall
        ]);
        let image = minimal_elf(0x100, 0x100, &code, code.len() as u32 + 8);

        let elf = ElfInfo::parse_bytes(&image).unwrap();
        assert_eq!(elf.entry, 0x100);
        assert_eq!(elf.segments.len(), 1);
        assert!(elf.segments[0].executable);
        assert!(!elf.segments[0].writable);

        let dir = TempDir::new("elf");
        dir.write("prog.elf", &image);
        let config = SimConfig::new().with_elf_path(dir.0.join("prog.elf"));
        let mut env = SimEnv::with_console(config, Vec::new()).unwrap();

        assert_eq!(env.entry_pc(), 0x100);
        let summary = env.run().unwrap();
        assert_eq!(summary.exit, RunExit::Halted);
        assert_eq!(env.cpu.read_reg(1), 42);
    }

    #[test]
    fn test_elf_rejects_wrong_machine() {
        let mut image = minimal_elf(0, 0, &[0; 4], 4);
        // e_machine = x86
        image[18..20].copy_from_slice(&3u16.to_le_bytes());
        let err = ElfInfo::parse_bytes(&image).unwrap_err();
        assert!(matches!(err, SimError::ElfParse(_)));
    }

    #[test]
    fn test_elf_rejects_garbage() {
        assert!(matches!(
            ElfInfo::parse_bytes(b"not an elf"),
            Err(SimError::ElfParse(_))
        ));
    }
}
