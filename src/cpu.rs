//! CPU 核心与执行引擎
//!
//! 本模块定义了单线程 RV32I CPU 核心 `CpuCore`，
//! 包含寄存器文件、程序计数器以及执行引擎。

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, trace, warn};

use crate::isa::{DecodedInstr, DecoderRegistry, RvInstr};
use crate::memory::{DATA_BASE, MemError, Memory};

mod builder;
mod exu;
mod status;
pub mod syscall;

pub use builder::CpuBuilder;
pub use status::{ABI_NAMES, GP_INIT, SP_INIT};
use status::Status;
use syscall::SyscallAction;

/// 寄存器检查接口中 PC 所在的下标（紧跟 x0..x31）
pub const PC_INDEX: usize = 32;

/// 默认代码段上界：数据段起始地址
pub const DEFAULT_TEXT_LIMIT: u32 = DATA_BASE;

/// 执行过程中的致命错误
#[derive(Debug, Error)]
pub enum CpuError {
    /// 取指地址越界
    #[error("instruction fetch failed at pc 0x{pc:08x}")]
    Fetch {
        pc: u32,
        #[source]
        source: MemError,
    },
    /// load/store 或系统调用访问越界
    #[error("address fault in instruction at pc 0x{pc:08x}")]
    AddressFault {
        pc: u32,
        #[source]
        source: MemError,
    },
    /// 写控制台失败
    #[error("console write failed")]
    Console(#[from] io::Error),
}

/// CPU 执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// 正常运行中
    Running,
    /// 已执行退出系统调用
    Halted,
}

/// SB/SH 写入字槽的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubwordStores {
    /// 只替换字槽的低字节/低半字
    #[default]
    Merge,
    /// 与 SW 相同，整个寄存器写入字槽
    Legacy,
}

/// 寄存器/内存转储的数值格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    #[default]
    Hex,
    Decimal,
}

impl DumpFormat {
    pub fn format_word(self, value: u32) -> String {
        match self {
            DumpFormat::Hex => format!("0x{value:08X}"),
            DumpFormat::Decimal => (value as i32).to_string(),
        }
    }
}

/// 单步执行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 指令正常退休
    Retired,
    /// 解码未命中，按空操作处理，PC 已前进
    Unimplemented { raw: u32, pc: u32 },
    /// CPU 已停机
    Halted,
}

/// `run` 停止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// PC 离开了代码段
    PcOutOfText,
    /// 执行了退出系统调用
    Halted,
    /// 达到指令数上限
    BudgetExhausted,
    /// 遇到未实现指令且配置为停止
    Unimplemented(u32),
}

/// `run` 的统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: u64,
    pub exit: RunExit,
}

/// 单线程 CPU 核心
///
/// 包含 RV32I 的最小状态：
/// - 32 个 32-bit 通用寄存器 x0..x31（x0 恒为 0）
/// - 程序计数器以及上一条指令的地址
///
/// 设计约定：
/// - PC 只保存一份，通过 `inspect(PC_INDEX)` 与寄存器一起暴露
/// - 分支、JAL、AUIPC 相对上一条指令地址 `prev_pc` 计算
/// - 核心状态不依赖全局变量，多个实例互不影响
pub struct CpuCore {
    /// 架构状态（寄存器文件）
    status: Status,
    /// 程序计数器
    pc: u32,
    /// 最近一次取指的地址
    prev_pc: u32,
    /// 当前 CPU 状态
    state: CpuState,
    /// 指令解码器
    decoder: Arc<DecoderRegistry>,
    subword_stores: SubwordStores,
    /// `run` 在 PC 到达此地址时停止
    text_limit: u32,
    stop_on_unimplemented: bool,
}

impl CpuCore {
    /// 创建一个新的 CPU 核心
    ///
    /// # 参数
    ///
    /// * `entry_pc` - 初始程序计数器值
    ///
    /// # 示例
    ///
    /// ```
    /// use rv32i_sim::cpu::CpuCore;
    ///
    /// let cpu = CpuCore::new(0x100);
    /// assert_eq!(cpu.pc(), 0x100);
    /// assert_eq!(cpu.read_reg(2), 0x3FFC);
    /// ```
    pub fn new(entry_pc: u32) -> Self {
        CpuBuilder::new(entry_pc).build()
    }

    /// 使用构建器给出的配置创建 CPU 核心
    pub(crate) fn with_config(
        entry_pc: u32,
        decoder: Arc<DecoderRegistry>,
        subword_stores: SubwordStores,
        text_limit: u32,
        stop_on_unimplemented: bool,
    ) -> Self {
        CpuCore {
            status: Status::new(),
            pc: entry_pc,
            prev_pc: entry_pc,
            state: CpuState::Running,
            decoder,
            subword_stores,
            text_limit,
            stop_on_unimplemented,
        }
    }

    /// 恢复到复位状态，保留配置
    pub fn reset(&mut self, entry_pc: u32) {
        self.status = Status::new();
        self.pc = entry_pc;
        self.prev_pc = entry_pc;
        self.state = CpuState::Running;
    }

    /// 获取当前程序计数器值
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// 最近一次取指的地址
    pub fn prev_pc(&self) -> u32 {
        self.prev_pc
    }

    /// 设置程序计数器
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// 获取当前 CPU 状态
    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// 读取 x0 总是返回 0
    pub fn read_reg(&self, reg: u8) -> i32 {
        self.status.int_read(reg)
    }

    /// 写入 x0 会被丢弃
    pub fn write_reg(&mut self, reg: u8, value: i32) {
        self.status.int_write(reg, value)
    }

    pub fn subword_stores(&self) -> SubwordStores {
        self.subword_stores
    }

    pub fn text_limit(&self) -> u32 {
        self.text_limit
    }

    /// 按下标检查寄存器，`PC_INDEX` 对应程序计数器
    pub fn inspect(&self, index: usize) -> Option<i32> {
        match index {
            0..32 => Some(self.read_reg(index as u8)),
            PC_INDEX => Some(self.pc as i32),
            _ => None,
        }
    }

    /// 执行单步指令
    ///
    /// # 流程
    ///
    /// 1. 从 PC 处取指，记录 `prev_pc`
    /// 2. PC += 4
    /// 3. 解码指令
    /// 4. 执行指令（可能修改 PC）
    ///
    /// 停机后再调用不会执行任何指令，直接返回 `Halted`。
    pub fn step(
        &mut self,
        mem: &mut dyn Memory,
        console: &mut dyn Write,
    ) -> Result<StepOutcome, CpuError> {
        if self.state == CpuState::Halted {
            return Ok(StepOutcome::Halted);
        }

        // 取指
        let current_pc = self.pc;
        let raw = mem
            .load32(current_pc)
            .map_err(|source| CpuError::Fetch { pc: current_pc, source })?;

        // 默认顺序执行
        self.prev_pc = current_pc;
        self.pc = current_pc.wrapping_add(4);

        let decoded = self.decoder.decode(raw);
        trace!("0x{current_pc:08x}: {raw:08x}  {}", decoded.instr);

        self.execute(mem, console, decoded, current_pc)
    }

    /// 连续执行，直到 PC 离开代码段、停机或达到指令上限
    ///
    /// `max_instructions` 为 0 表示不限制。
    pub fn run(
        &mut self,
        mem: &mut dyn Memory,
        console: &mut dyn Write,
        max_instructions: u64,
    ) -> Result<RunSummary, CpuError> {
        self.run_with(mem, console, max_instructions, |_, _| {})
    }

    /// 与 `run` 相同，但每执行一条指令后调用一次 `after_step`
    pub fn run_with(
        &mut self,
        mem: &mut dyn Memory,
        console: &mut dyn Write,
        max_instructions: u64,
        mut after_step: impl FnMut(&CpuCore, StepOutcome),
    ) -> Result<RunSummary, CpuError> {
        let mut executed = 0;
        let exit = loop {
            if self.state == CpuState::Halted {
                break RunExit::Halted;
            }
            if self.pc >= self.text_limit {
                break RunExit::PcOutOfText;
            }
            if max_instructions != 0 && executed >= max_instructions {
                break RunExit::BudgetExhausted;
            }

            let outcome = self.step(mem, console)?;
            executed += 1;
            after_step(self, outcome);
            match outcome {
                StepOutcome::Halted => break RunExit::Halted,
                StepOutcome::Unimplemented { raw, .. } if self.stop_on_unimplemented => {
                    break RunExit::Unimplemented(raw);
                }
                _ => {}
            }
        };

        info!(executed, ?exit, pc = self.pc, "run finished");
        Ok(RunSummary { executed, exit })
    }

    /// 执行已解码的指令，委托到各执行单元
    fn execute(
        &mut self,
        mem: &mut dyn Memory,
        console: &mut dyn Write,
        decoded: DecodedInstr,
        current_pc: u32,
    ) -> Result<StepOutcome, CpuError> {
        let instr = decoded.instr;

        if exu::alu::execute(self, instr, current_pc)
            || exu::lsu::execute(self, mem, instr, current_pc)?
            || exu::bru::execute(self, instr, current_pc)
        {
            return Ok(StepOutcome::Retired);
        }

        match instr {
            RvInstr::Ecall => match syscall::handle_ecall(self, &*mem, console, current_pc)? {
                SyscallAction::Continue => Ok(StepOutcome::Retired),
                SyscallAction::Halt => {
                    self.state = CpuState::Halted;
                    info!(pc = current_pc, "program halted");
                    Ok(StepOutcome::Halted)
                }
            },
            _ => {
                warn!(
                    pc = current_pc,
                    "unimplemented instruction 0x{:08x}, treated as no-op", decoded.raw
                );
                Ok(StepOutcome::Unimplemented {
                    raw: decoded.raw,
                    pc: current_pc,
                })
            }
        }
    }

    /// 打印 x0..x31 与 PC
    pub fn write_regs(&self, out: &mut dyn Write, format: DumpFormat) -> io::Result<()> {
        for index in 0..=PC_INDEX {
            let value = self.inspect(index).unwrap_or_default() as u32;
            let name = ABI_NAMES.get(index).copied().unwrap_or("pc");
            writeln!(out, "reg[{index:2}] {name:>4} = {}", format.format_word(value))?;
        }
        Ok(())
    }
}

impl Default for CpuCore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for CpuCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuCore")
            .field("pc", &format_args!("0x{:08x}", self.pc))
            .field("prev_pc", &format_args!("0x{:08x}", self.prev_pc))
            .field("state", &self.state)
            .field("subword_stores", &self.subword_stores)
            .field("text_limit", &format_args!("0x{:08x}", self.text_limit))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MEM_BYTES, WordMemory};

    /// 将指令写入内存
    fn write_instr(mem: &mut WordMemory, addr: u32, instr: u32) {
        mem.store32(addr, instr).unwrap();
    }

    fn step(cpu: &mut CpuCore, mem: &mut WordMemory) -> StepOutcome {
        cpu.step(mem, &mut io::sink()).unwrap()
    }

    #[test]
    fn test_addi() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x1, x0, 42
        write_instr(&mut mem, 0, 0x02A00093);
        assert_eq!(step(&mut cpu, &mut mem), StepOutcome::Retired);

        assert_eq!(cpu.read_reg(1), 42);
        assert_eq!(cpu.pc(), 4);
        assert_eq!(cpu.prev_pc(), 0);
    }

    #[test]
    fn test_add_sub() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x1, x0, 100
        write_instr(&mut mem, 0, 0x06400093);
        // addi x2, x0, 30
        write_instr(&mut mem, 4, 0x01E00113);
        // add x3, x1, x2
        write_instr(&mut mem, 8, 0x002081B3);
        // sub x4, x1, x2
        write_instr(&mut mem, 12, 0x40208233);

        let summary = cpu.run(&mut mem, &mut io::sink(), 4).unwrap();

        assert_eq!(summary.executed, 4);
        assert_eq!(summary.exit, RunExit::BudgetExhausted);
        assert_eq!(cpu.read_reg(3), 130);
        assert_eq!(cpu.read_reg(4), 70);
    }

    #[test]
    fn test_lw_sw_in_data_segment() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x1, x0, 0x42
        write_instr(&mut mem, 0, 0x04200093);
        // lui x2, 2 (x2 = 0x2000)
        write_instr(&mut mem, 4, 0x00002137);
        // sw x1, 8(x2)
        write_instr(&mut mem, 8, 0x00112423);
        // lw x3, 8(x2)
        write_instr(&mut mem, 12, 0x00812183);

        cpu.run(&mut mem, &mut io::sink(), 4).unwrap();

        assert_eq!(cpu.read_reg(2), 0x2000);
        assert_eq!(cpu.read_reg(3), 0x42);
        assert_eq!(mem.load32(0x2008).unwrap(), 0x42);
    }

    #[test]
    fn test_beq_taken() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x1, x0, 5
        write_instr(&mut mem, 0, 0x00500093);
        // addi x2, x0, 5
        write_instr(&mut mem, 4, 0x00500113);
        // beq x1, x2, 8 (跳转到 8 + 8 = 16)
        write_instr(&mut mem, 8, 0x00208463);
        // addi x5, x0, 1 (被跳过)
        write_instr(&mut mem, 12, 0x00100293);
        // addi x6, x0, 7
        write_instr(&mut mem, 16, 0x00700313);

        cpu.run(&mut mem, &mut io::sink(), 4).unwrap();

        assert_eq!(cpu.pc(), 20);
        assert_eq!(cpu.read_reg(5), 0);
        assert_eq!(cpu.read_reg(6), 7);
    }

    #[test]
    fn test_jal_sets_return_address() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // jal x1, 8
        write_instr(&mut mem, 0, 0x008000EF);
        step(&mut cpu, &mut mem);

        assert_eq!(cpu.pc(), 8);
        assert_eq!(cpu.read_reg(1), 4);
    }

    #[test]
    fn test_auipc_uses_instruction_address() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x0, x0, 0
        write_instr(&mut mem, 0, 0x00000013);
        // auipc x5, 1
        write_instr(&mut mem, 4, 0x00001297);
        cpu.run(&mut mem, &mut io::sink(), 2).unwrap();

        assert_eq!(cpu.read_reg(5), 0x1004);
    }

    #[test]
    fn test_x0_always_zero() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x0, x0, 100
        write_instr(&mut mem, 0, 0x06400013);
        step(&mut cpu, &mut mem);

        assert_eq!(cpu.read_reg(0), 0);
    }

    #[test]
    fn test_addi_then_print_int() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);
        let mut console = Vec::new();

        // addi x5, x0, 10
        write_instr(&mut mem, 0, 0x00A00293);
        // ecall
        write_instr(&mut mem, 4, 0x00000073);

        cpu.step(&mut mem, &mut console).unwrap();
        assert_eq!(cpu.read_reg(5), 10);

        // 把 x5 送入参数寄存器，调用号 1
        cpu.write_reg(syscall::REG_A0, cpu.read_reg(5));
        cpu.write_reg(syscall::REG_A7, syscall::SYS_PRINT_INT);
        cpu.step(&mut mem, &mut console).unwrap();

        assert_eq!(String::from_utf8(console).unwrap(), "10");
    }

    #[test]
    fn test_print_int_program() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);
        let mut console = Vec::new();

        // addi x5, x0, 10
        write_instr(&mut mem, 0, 0x00A00293);
        // addi a7, x0, 1
        write_instr(&mut mem, 4, 0x00100893);
        // add a0, x5, x0
        write_instr(&mut mem, 8, 0x00028533);
        // ecall
        write_instr(&mut mem, 12, 0x00000073);
        // addi a7, x0, 10
        write_instr(&mut mem, 16, 0x00A00893);
        // ecall
        write_instr(&mut mem, 20, 0x00000073);

        let summary = cpu.run(&mut mem, &mut console, 0).unwrap();

        assert_eq!(summary.exit, RunExit::Halted);
        assert_eq!(summary.executed, 6);
        assert_eq!(
            String::from_utf8(console).unwrap(),
            format!("10{}", syscall::HALT_BANNER)
        );
        assert!(cpu.is_halted());
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi a7, x0, 10
        write_instr(&mut mem, 0, 0x00A00893);
        // ecall
        write_instr(&mut mem, 4, 0x00000073);
        // addi x1, x0, 1
        write_instr(&mut mem, 8, 0x00100093);

        step(&mut cpu, &mut mem);
        assert_eq!(step(&mut cpu, &mut mem), StepOutcome::Halted);
        assert_eq!(step(&mut cpu, &mut mem), StepOutcome::Halted);
        assert_eq!(cpu.pc(), 8);
        assert_eq!(cpu.read_reg(1), 0);
    }

    #[test]
    fn test_simple_loop() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // 简单循环：计算 1+2+3 = 6
        // addi x1, x0, 0     # x1 = sum = 0
        write_instr(&mut mem, 0, 0x00000093);
        // addi x2, x0, 1     # x2 = i = 1
        write_instr(&mut mem, 4, 0x00100113);
        // addi x3, x0, 4     # x3 = limit = 4
        write_instr(&mut mem, 8, 0x00400193);
        // loop:
        // add x1, x1, x2     # sum += i
        write_instr(&mut mem, 12, 0x002080B3);
        // addi x2, x2, 1     # i++
        write_instr(&mut mem, 16, 0x00110113);
        // blt x2, x3, -8     # if i < limit goto loop
        write_instr(&mut mem, 20, 0xFE314CE3);
        // addi a7, x0, 10
        write_instr(&mut mem, 24, 0x00A00893);
        // ecall              # 结束
        write_instr(&mut mem, 28, 0x00000073);

        let summary = cpu.run(&mut mem, &mut io::sink(), 100).unwrap();

        assert_eq!(cpu.read_reg(1), 6);
        assert_eq!(summary.exit, RunExit::Halted);
        // 3 条初始化 + 3 轮循环各 3 条 + 2 条退出
        assert_eq!(summary.executed, 14);
    }

    #[test]
    fn test_run_stops_at_text_limit() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // 代码段填满 nop，数据段首字是 addi x5, x0, 1
        for addr in (0..DEFAULT_TEXT_LIMIT).step_by(4) {
            write_instr(&mut mem, addr, 0x00000013);
        }
        write_instr(&mut mem, DATA_BASE, 0x00100293);

        let summary = cpu.run(&mut mem, &mut io::sink(), 0).unwrap();

        assert_eq!(summary.exit, RunExit::PcOutOfText);
        assert_eq!(summary.executed, (DEFAULT_TEXT_LIMIT / 4) as u64);
        assert_eq!(cpu.pc(), DEFAULT_TEXT_LIMIT);
        assert_eq!(cpu.read_reg(5), 0);
    }

    #[test]
    fn test_run_with_sees_every_step() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        // addi x1, x0, 1
        write_instr(&mut mem, 0, 0x00100093);
        // addi x1, x1, 1
        write_instr(&mut mem, 4, 0x00108093);
        // addi a7, x0, 10
        write_instr(&mut mem, 8, 0x00A00893);
        // ecall
        write_instr(&mut mem, 12, 0x00000073);

        let mut seen = Vec::new();
        let summary = cpu
            .run_with(&mut mem, &mut io::sink(), 0, |cpu, outcome| {
                seen.push((cpu.prev_pc(), outcome))
            })
            .unwrap();

        assert_eq!(summary.executed, 4);
        assert_eq!(
            seen,
            vec![
                (0, StepOutcome::Retired),
                (4, StepOutcome::Retired),
                (8, StepOutcome::Retired),
                (12, StepOutcome::Halted),
            ]
        );
        assert_eq!(cpu.read_reg(1), 2);
    }

    #[test]
    fn test_unimplemented_is_reported_and_skipped() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);

        write_instr(&mut mem, 0, 0xFFFF_FFFF);
        // addi x1, x0, 1
        write_instr(&mut mem, 4, 0x00100093);

        assert_eq!(
            step(&mut cpu, &mut mem),
            StepOutcome::Unimplemented {
                raw: 0xFFFF_FFFF,
                pc: 0
            }
        );
        assert_eq!(cpu.pc(), 4);
        step(&mut cpu, &mut mem);
        assert_eq!(cpu.read_reg(1), 1);
    }

    #[test]
    fn test_run_can_stop_on_unimplemented() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuBuilder::new(0).with_stop_on_unimplemented(true).build();

        // addi x1, x0, 1
        write_instr(&mut mem, 0, 0x00100093);
        write_instr(&mut mem, 4, 0xFFFF_FFFF);

        let summary = cpu.run(&mut mem, &mut io::sink(), 0).unwrap();

        assert_eq!(summary.exit, RunExit::Unimplemented(0xFFFF_FFFF));
        assert_eq!(summary.executed, 2);
    }

    #[test]
    fn test_fetch_out_of_range() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(MEM_BYTES);

        let err = cpu.step(&mut mem, &mut io::sink()).unwrap_err();
        assert!(matches!(err, CpuError::Fetch { pc, .. } if pc == MEM_BYTES));
        assert_eq!(cpu.pc(), MEM_BYTES);
    }

    #[test]
    fn test_inspect_exposes_pc() {
        let cpu = CpuCore::new(0x40);
        assert_eq!(cpu.inspect(2), Some(SP_INIT));
        assert_eq!(cpu.inspect(PC_INDEX), Some(0x40));
        assert_eq!(cpu.inspect(PC_INDEX + 1), None);
    }

    #[test]
    fn test_write_regs_formats() {
        let mut cpu = CpuCore::new(0x10);
        cpu.write_reg(5, -1);

        let mut hex = Vec::new();
        cpu.write_regs(&mut hex, DumpFormat::Hex).unwrap();
        let hex = String::from_utf8(hex).unwrap();
        assert_eq!(hex.lines().count(), 33);
        assert!(hex.contains("reg[ 2]   sp = 0x00003FFC"));
        assert!(hex.contains("reg[ 5]   t0 = 0xFFFFFFFF"));
        assert!(hex.ends_with("reg[32]   pc = 0x00000010\n"));

        let mut dec = Vec::new();
        cpu.write_regs(&mut dec, DumpFormat::Decimal).unwrap();
        let dec = String::from_utf8(dec).unwrap();
        assert!(dec.contains("reg[ 5]   t0 = -1"));
        assert!(dec.contains("reg[ 3]   gp = 6144"));
    }

    #[test]
    fn test_reset_restores_abi_values() {
        let mut mem = WordMemory::new();
        let mut cpu = CpuCore::new(0);
        // addi x2, x0, 0
        write_instr(&mut mem, 0, 0x00000113);
        step(&mut cpu, &mut mem);
        assert_eq!(cpu.read_reg(2), 0);

        cpu.reset(0);
        assert_eq!(cpu.read_reg(2), SP_INIT);
        assert_eq!(cpu.read_reg(3), GP_INIT);
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.state(), CpuState::Running);
    }
}
