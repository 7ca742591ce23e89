//! ECALL 系统调用处理
//!
//! 约定：a7 (x17) 存调用号，a0 (x10) 存参数。
//!
//! | a7 | 行为 |
//! |----|------|
//! | 1  | 以十进制有符号整数打印 a0 |
//! | 4  | 打印 a0 指向的以 NUL 结尾的字符串；首字节为空格时只打印一个空格 |
//! | 10 | 打印结束横幅并停机 |
//!
//! 其余调用号为空操作。

use std::io::Write;

use tracing::debug;

use super::{CpuCore, CpuError};
use crate::memory::Memory;

pub const SYS_PRINT_INT: i32 = 1;
pub const SYS_PRINT_STR: i32 = 4;
pub const SYS_EXIT: i32 = 10;

/// 参数寄存器 a0
pub const REG_A0: u8 = 10;
/// 调用号寄存器 a7
pub const REG_A7: u8 = 17;

/// 停机时打印的横幅
pub const HALT_BANNER: &str = "\n-- program is finished running --\n";

/// 系统调用执行后 CPU 应如何继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallAction {
    Continue,
    Halt,
}

/// 处理一条 ECALL
///
/// 字符串按小端字节视图逐字节读取，读到内存末尾仍未遇到 NUL 时返回地址错误。
pub fn handle_ecall(
    cpu: &CpuCore,
    mem: &dyn Memory,
    console: &mut dyn Write,
    current_pc: u32,
) -> Result<SyscallAction, CpuError> {
    let number = cpu.read_reg(REG_A7);
    let arg = cpu.read_reg(REG_A0);
    debug!(pc = current_pc, number, arg, "ecall");

    match number {
        SYS_PRINT_INT => {
            write!(console, "{arg}")?;
        }
        SYS_PRINT_STR => {
            let bytes = read_c_string(mem, arg as u32, current_pc)?;
            if bytes.first() == Some(&b' ') {
                console.write_all(b" ")?;
            } else {
                console.write_all(&bytes)?;
            }
        }
        SYS_EXIT => {
            console.write_all(HALT_BANNER.as_bytes())?;
            console.flush()?;
            return Ok(SyscallAction::Halt);
        }
        _ => {}
    }

    Ok(SyscallAction::Continue)
}

/// 从 `addr` 开始读取字节直到 NUL（不含 NUL）
fn read_c_string(mem: &dyn Memory, addr: u32, current_pc: u32) -> Result<Vec<u8>, CpuError> {
    let mut bytes = Vec::new();
    let mut cursor = addr;
    loop {
        let byte = mem
            .read_byte(cursor)
            .map_err(super::exu::address_fault(current_pc))?;
        if byte == 0 {
            return Ok(bytes);
        }
        bytes.push(byte);
        cursor = cursor.wrapping_add(1);
    }
}
