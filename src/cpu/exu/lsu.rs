use super::super::{CpuCore, CpuError, SubwordStores};
use super::address_fault;
use crate::isa::RvInstr;
use crate::memory::Memory;

/// 访存单元：load / store
///
/// 有效地址 = rs1 + 符号扩展后的偏移，按字槽访问。
/// LB/LH 在被屏蔽值的符号位为 1 时做符号扩展，LBU/LHU 零扩展。
pub fn execute(
    cpu: &mut CpuCore,
    mem: &mut dyn Memory,
    instr: RvInstr,
    current_pc: u32,
) -> Result<bool, CpuError> {
    let fault = address_fault(current_pc);
    match instr {
        // ========== Load 指令 ==========
        RvInstr::Lb { rd, rs1, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = mem.load8(addr).map_err(fault)? as i8 as i32;
            cpu.write_reg(rd, value);
        }
        RvInstr::Lh { rd, rs1, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = mem.load16(addr).map_err(fault)? as i16 as i32;
            cpu.write_reg(rd, value);
        }
        RvInstr::Lw { rd, rs1, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = mem.load32(addr).map_err(fault)? as i32;
            cpu.write_reg(rd, value);
        }
        RvInstr::Lbu { rd, rs1, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = mem.load8(addr).map_err(fault)? as i32;
            cpu.write_reg(rd, value);
        }
        RvInstr::Lhu { rd, rs1, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = mem.load16(addr).map_err(fault)? as i32;
            cpu.write_reg(rd, value);
        }

        // ========== Store 指令 ==========
        RvInstr::Sb { rs1, rs2, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = cpu.read_reg(rs2);
            match cpu.subword_stores() {
                SubwordStores::Merge => mem.store8(addr, value as u8),
                SubwordStores::Legacy => mem.store32(addr, value as u32),
            }
            .map_err(fault)?;
        }
        RvInstr::Sh { rs1, rs2, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            let value = cpu.read_reg(rs2);
            match cpu.subword_stores() {
                SubwordStores::Merge => mem.store16(addr, value as u16),
                SubwordStores::Legacy => mem.store32(addr, value as u32),
            }
            .map_err(fault)?;
        }
        RvInstr::Sw { rs1, rs2, offset } => {
            let addr = effective_addr(cpu, rs1, offset);
            mem.store32(addr, cpu.read_reg(rs2) as u32).map_err(fault)?;
        }

        _ => return Ok(false),
    }

    Ok(true)
}

#[inline]
fn effective_addr(cpu: &CpuCore, rs1: u8, offset: i32) -> u32 {
    cpu.read_reg(rs1).wrapping_add(offset) as u32
}
