use tracing::debug;

use super::super::CpuCore;
use crate::isa::RvInstr;

/// 分支/跳转单元
///
/// 目标地址相对当前指令地址 `current_pc` 计算，而不是已加 4 的 PC。
/// 不跳转时保留取指阶段已前进的 PC。
pub fn execute(cpu: &mut CpuCore, instr: RvInstr, current_pc: u32) -> bool {
    match instr {
        RvInstr::Jal { rd, offset } => {
            let target = current_pc.wrapping_add(offset as u32);
            cpu.write_reg(rd, cpu.pc() as i32);
            debug!(from = current_pc, to = target, "jal");
            cpu.set_pc(target);
        }
        RvInstr::Jalr { rd, rs1, offset } => {
            // 先算目标再写 rd，rd 与 rs1 相同时也读到旧值
            let target = (cpu.read_reg(rs1).wrapping_add(offset) as u32) & !1;
            cpu.write_reg(rd, cpu.pc() as i32);
            debug!(from = current_pc, to = target, "jalr");
            cpu.set_pc(target);
        }
        RvInstr::Beq { rs1, rs2, offset } => {
            let taken = cpu.read_reg(rs1) == cpu.read_reg(rs2);
            branch(cpu, taken, current_pc, offset);
        }
        RvInstr::Bne { rs1, rs2, offset } => {
            let taken = cpu.read_reg(rs1) != cpu.read_reg(rs2);
            branch(cpu, taken, current_pc, offset);
        }
        RvInstr::Blt { rs1, rs2, offset } => {
            let taken = cpu.read_reg(rs1) < cpu.read_reg(rs2);
            branch(cpu, taken, current_pc, offset);
        }
        RvInstr::Bge { rs1, rs2, offset } => {
            let taken = cpu.read_reg(rs1) >= cpu.read_reg(rs2);
            branch(cpu, taken, current_pc, offset);
        }
        RvInstr::Bltu { rs1, rs2, offset } => {
            let taken = (cpu.read_reg(rs1) as u32) < (cpu.read_reg(rs2) as u32);
            branch(cpu, taken, current_pc, offset);
        }
        RvInstr::Bgeu { rs1, rs2, offset } => {
            let taken = (cpu.read_reg(rs1) as u32) >= (cpu.read_reg(rs2) as u32);
            branch(cpu, taken, current_pc, offset);
        }

        _ => return false,
    }

    true
}

#[inline]
fn branch(cpu: &mut CpuCore, taken: bool, current_pc: u32, offset: i32) {
    if taken {
        cpu.set_pc(current_pc.wrapping_add(offset as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 模拟取指后的状态：PC 已经前进到下一条
    fn cpu_at(current_pc: u32, regs: &[(u8, i32)]) -> CpuCore {
        let mut cpu = CpuCore::new(current_pc + 4);
        for &(reg, value) in regs {
            cpu.write_reg(reg, value);
        }
        cpu
    }

    #[test]
    fn test_blt_signed_taken() {
        let mut cpu = cpu_at(0x10, &[(1, -1), (2, 1)]);
        execute(&mut cpu, RvInstr::Blt { rs1: 1, rs2: 2, offset: 12 }, 0x10);
        assert_eq!(cpu.pc(), 0x1C);
    }

    #[test]
    fn test_bltu_unsigned_not_taken() {
        let mut cpu = cpu_at(0x10, &[(1, -1), (2, 1)]);
        execute(&mut cpu, RvInstr::Bltu { rs1: 1, rs2: 2, offset: 12 }, 0x10);
        assert_eq!(cpu.pc(), 0x14);
    }

    #[test]
    fn test_bge_and_bgeu() {
        let mut cpu = cpu_at(0x10, &[(1, -1), (2, 1)]);
        execute(&mut cpu, RvInstr::Bge { rs1: 1, rs2: 2, offset: 8 }, 0x10);
        assert_eq!(cpu.pc(), 0x14);
        execute(&mut cpu, RvInstr::Bgeu { rs1: 1, rs2: 2, offset: 8 }, 0x10);
        assert_eq!(cpu.pc(), 0x18);
    }

    #[test]
    fn test_beq_bne_backward() {
        let mut cpu = cpu_at(0x20, &[(1, 5), (2, 5)]);
        execute(&mut cpu, RvInstr::Bne { rs1: 1, rs2: 2, offset: -16 }, 0x20);
        assert_eq!(cpu.pc(), 0x24);
        execute(&mut cpu, RvInstr::Beq { rs1: 1, rs2: 2, offset: -16 }, 0x20);
        assert_eq!(cpu.pc(), 0x10);
    }

    #[test]
    fn test_jal_links_next_instruction() {
        let mut cpu = cpu_at(0, &[]);
        execute(&mut cpu, RvInstr::Jal { rd: 1, offset: 8 }, 0);
        assert_eq!(cpu.pc(), 8);
        assert_eq!(cpu.read_reg(1), 4);
    }

    #[test]
    fn test_jal_rd_zero_is_plain_jump() {
        let mut cpu = cpu_at(0x40, &[]);
        execute(&mut cpu, RvInstr::Jal { rd: 0, offset: -0x40 }, 0x40);
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.read_reg(0), 0);
    }

    #[test]
    fn test_jalr_clears_bit_zero() {
        let mut cpu = cpu_at(0x8, &[(5, 0x101)]);
        execute(&mut cpu, RvInstr::Jalr { rd: 1, rs1: 5, offset: 2 }, 0x8);
        assert_eq!(cpu.pc(), 0x102);
        assert_eq!(cpu.read_reg(1), 0xC);
    }

    #[test]
    fn test_jalr_same_rd_and_rs1() {
        let mut cpu = cpu_at(0x8, &[(1, 0x200)]);
        execute(&mut cpu, RvInstr::Jalr { rd: 1, rs1: 1, offset: 0 }, 0x8);
        assert_eq!(cpu.pc(), 0x200);
        assert_eq!(cpu.read_reg(1), 0xC);
    }
}
