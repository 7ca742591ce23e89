use super::super::CpuCore;
use crate::isa::RvInstr;

/// 整数运算单元：寄存器-寄存器、寄存器-立即数运算以及 LUI/AUIPC。
/// 所有运算按 2^32 取模回绕。
pub fn execute(cpu: &mut CpuCore, instr: RvInstr, current_pc: u32) -> bool {
    match instr {
        // ========== R-type 算术/逻辑指令 ==========
        RvInstr::Add { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1).wrapping_add(cpu.read_reg(rs2));
            cpu.write_reg(rd, result);
        }
        RvInstr::Sub { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1).wrapping_sub(cpu.read_reg(rs2));
            cpu.write_reg(rd, result);
        }
        RvInstr::Sll { rd, rs1, rs2 } => {
            // wrapping_shl 只取移位量低 5 位
            let result = cpu.read_reg(rs1).wrapping_shl(cpu.read_reg(rs2) as u32);
            cpu.write_reg(rd, result);
        }
        RvInstr::Slt { rd, rs1, rs2 } => {
            let result = (cpu.read_reg(rs1) < cpu.read_reg(rs2)) as i32;
            cpu.write_reg(rd, result);
        }
        RvInstr::Sltu { rd, rs1, rs2 } => {
            let result = ((cpu.read_reg(rs1) as u32) < (cpu.read_reg(rs2) as u32)) as i32;
            cpu.write_reg(rd, result);
        }
        RvInstr::Xor { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1) ^ cpu.read_reg(rs2);
            cpu.write_reg(rd, result);
        }
        RvInstr::Srl { rd, rs1, rs2 } => {
            let result = (cpu.read_reg(rs1) as u32).wrapping_shr(cpu.read_reg(rs2) as u32);
            cpu.write_reg(rd, result as i32);
        }
        RvInstr::Sra { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1).wrapping_shr(cpu.read_reg(rs2) as u32);
            cpu.write_reg(rd, result);
        }
        RvInstr::Or { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1) | cpu.read_reg(rs2);
            cpu.write_reg(rd, result);
        }
        RvInstr::And { rd, rs1, rs2 } => {
            let result = cpu.read_reg(rs1) & cpu.read_reg(rs2);
            cpu.write_reg(rd, result);
        }

        // ========== I-type 立即数算术/逻辑指令 ==========
        RvInstr::Addi { rd, rs1, imm } => {
            let result = cpu.read_reg(rs1).wrapping_add(imm);
            cpu.write_reg(rd, result);
        }
        RvInstr::Slti { rd, rs1, imm } => {
            let result = (cpu.read_reg(rs1) < imm) as i32;
            cpu.write_reg(rd, result);
        }
        RvInstr::Sltiu { rd, rs1, imm } => {
            // 立即数先符号扩展，再按无符号比较
            let result = ((cpu.read_reg(rs1) as u32) < (imm as u32)) as i32;
            cpu.write_reg(rd, result);
        }
        RvInstr::Xori { rd, rs1, imm } => {
            let result = cpu.read_reg(rs1) ^ imm;
            cpu.write_reg(rd, result);
        }
        RvInstr::Ori { rd, rs1, imm } => {
            let result = cpu.read_reg(rs1) | imm;
            cpu.write_reg(rd, result);
        }
        RvInstr::Andi { rd, rs1, imm } => {
            let result = cpu.read_reg(rs1) & imm;
            cpu.write_reg(rd, result);
        }
        RvInstr::Slli { rd, rs1, shamt } => {
            let result = cpu.read_reg(rs1).wrapping_shl(shamt as u32);
            cpu.write_reg(rd, result);
        }
        RvInstr::Srli { rd, rs1, shamt } => {
            let result = (cpu.read_reg(rs1) as u32).wrapping_shr(shamt as u32);
            cpu.write_reg(rd, result as i32);
        }
        RvInstr::Srai { rd, rs1, shamt } => {
            let result = cpu.read_reg(rs1).wrapping_shr(shamt as u32);
            cpu.write_reg(rd, result);
        }

        // ========== U-type 指令 ==========
        RvInstr::Lui { rd, imm } => {
            cpu.write_reg(rd, imm.wrapping_shl(12));
        }
        RvInstr::Auipc { rd, imm } => {
            let result = (current_pc as i32).wrapping_add(imm.wrapping_shl(12));
            cpu.write_reg(rd, result);
        }

        _ => return false,
    }

    true
}
