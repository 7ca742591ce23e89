//! 定义指令的语义表达式，用于解码和执行阶段

use std::fmt;

use super::fields::*;

/// 指令字拆出的全部字段
///
/// 每次取指都重新计算，不在指令之间保留任何状态。
/// 五种立即数都已做完符号扩展；`imm_u` 仍是未左移的 20 位上半部分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedFields {
    pub opcode: u32,
    pub rd: u8,
    pub rs1: u8,
    pub rs2: u8,
    pub funct3: u32,
    pub funct7: u32,
    pub shamt: u8,
    pub imm_i: i32,
    pub imm_s: i32,
    pub imm_b: i32,
    pub imm_u: i32,
    pub imm_j: i32,
}

impl DecodedFields {
    /// 从原始指令字提取字段并符号扩展立即数
    pub fn from_raw(raw: u32) -> Self {
        Self {
            opcode: opcode(raw),
            rd: rd(raw),
            rs1: rs1(raw),
            rs2: rs2(raw),
            funct3: funct3(raw),
            funct7: funct7(raw),
            shamt: shamt(raw),
            imm_i: sign_extend(imm_i_bits(raw), IMM_I_WIDTH),
            imm_s: sign_extend(imm_s_bits(raw), IMM_S_WIDTH),
            imm_b: sign_extend(imm_b_bits(raw), IMM_B_WIDTH),
            imm_u: sign_extend(imm_u_bits(raw), IMM_U_WIDTH),
            imm_j: sign_extend(imm_j_bits(raw), IMM_J_WIDTH),
        }
    }
}

/// RV32I 指令的语义化表示
///
/// 解码阶段一次性做完字段提取与符号扩展，执行阶段只需按变体匹配。
/// 没有对应实现的编码统一落到 `Unimplemented`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RvInstr {
    // ========== R-type 算术/逻辑指令 ==========
    /// ADD: rd = rs1 + rs2
    Add { rd: u8, rs1: u8, rs2: u8 },
    /// SUB: rd = rs1 - rs2
    Sub { rd: u8, rs1: u8, rs2: u8 },
    /// SLL: rd = rs1 << rs2[4:0]
    Sll { rd: u8, rs1: u8, rs2: u8 },
    /// SLT: rd = (rs1 < rs2) ? 1 : 0 (有符号比较)
    Slt { rd: u8, rs1: u8, rs2: u8 },
    /// SLTU: rd = (rs1 < rs2) ? 1 : 0 (无符号比较)
    Sltu { rd: u8, rs1: u8, rs2: u8 },
    /// XOR: rd = rs1 ^ rs2
    Xor { rd: u8, rs1: u8, rs2: u8 },
    /// SRL: rd = rs1 >> rs2[4:0] (逻辑右移)
    Srl { rd: u8, rs1: u8, rs2: u8 },
    /// SRA: rd = rs1 >> rs2[4:0] (算术右移)
    Sra { rd: u8, rs1: u8, rs2: u8 },
    /// OR: rd = rs1 | rs2
    Or { rd: u8, rs1: u8, rs2: u8 },
    /// AND: rd = rs1 & rs2
    And { rd: u8, rs1: u8, rs2: u8 },

    // ========== I-type 立即数算术/逻辑指令 ==========
    /// ADDI: rd = rs1 + imm
    Addi { rd: u8, rs1: u8, imm: i32 },
    /// SLTI: rd = (rs1 < imm) ? 1 : 0 (有符号比较)
    Slti { rd: u8, rs1: u8, imm: i32 },
    /// SLTIU: rd = (rs1 < imm) ? 1 : 0 (无符号比较)
    Sltiu { rd: u8, rs1: u8, imm: i32 },
    /// XORI: rd = rs1 ^ imm
    Xori { rd: u8, rs1: u8, imm: i32 },
    /// ORI: rd = rs1 | imm
    Ori { rd: u8, rs1: u8, imm: i32 },
    /// ANDI: rd = rs1 & imm
    Andi { rd: u8, rs1: u8, imm: i32 },
    /// SLLI: rd = rs1 << shamt
    Slli { rd: u8, rs1: u8, shamt: u8 },
    /// SRLI: rd = rs1 >> shamt (逻辑右移)
    Srli { rd: u8, rs1: u8, shamt: u8 },
    /// SRAI: rd = rs1 >> shamt (算术右移)
    Srai { rd: u8, rs1: u8, shamt: u8 },

    // ========== Load 指令 ==========
    /// LB: rd = sign_extend(word[7:0])
    Lb { rd: u8, rs1: u8, offset: i32 },
    /// LH: rd = sign_extend(word[15:0])
    Lh { rd: u8, rs1: u8, offset: i32 },
    /// LW: rd = word
    Lw { rd: u8, rs1: u8, offset: i32 },
    /// LBU: rd = zero_extend(word[7:0])
    Lbu { rd: u8, rs1: u8, offset: i32 },
    /// LHU: rd = zero_extend(word[15:0])
    Lhu { rd: u8, rs1: u8, offset: i32 },

    // ========== Store 指令 ==========
    /// SB: word[7:0] = rs2[7:0]
    Sb { rs1: u8, rs2: u8, offset: i32 },
    /// SH: word[15:0] = rs2[15:0]
    Sh { rs1: u8, rs2: u8, offset: i32 },
    /// SW: word = rs2
    Sw { rs1: u8, rs2: u8, offset: i32 },

    // ========== U-type 指令 ==========
    /// LUI: rd = imm << 12
    Lui { rd: u8, imm: i32 },
    /// AUIPC: rd = pc + (imm << 12)
    Auipc { rd: u8, imm: i32 },

    // ========== 控制流指令 ==========
    /// JAL: rd = pc + 4; pc = pc + offset
    Jal { rd: u8, offset: i32 },
    /// JALR: rd = pc + 4; pc = (rs1 + offset) & !1
    ///
    /// 目标地址用写 rd 之前的 rs1 计算，所以 `jalr x1, 0(x1)` 跳到旧的 x1。
    /// 早期的 C 版模拟器先写 rd，同样的指令会跳回自身之后。
    Jalr { rd: u8, rs1: u8, offset: i32 },
    /// BEQ: if (rs1 == rs2) pc = pc + offset
    Beq { rs1: u8, rs2: u8, offset: i32 },
    /// BNE: if (rs1 != rs2) pc = pc + offset
    Bne { rs1: u8, rs2: u8, offset: i32 },
    /// BLT: if (rs1 < rs2) pc = pc + offset (有符号)
    Blt { rs1: u8, rs2: u8, offset: i32 },
    /// BGE: if (rs1 >= rs2) pc = pc + offset (有符号)
    Bge { rs1: u8, rs2: u8, offset: i32 },
    /// BLTU: if (rs1 < rs2) pc = pc + offset (无符号)
    Bltu { rs1: u8, rs2: u8, offset: i32 },
    /// BGEU: if (rs1 >= rs2) pc = pc + offset (无符号)
    Bgeu { rs1: u8, rs2: u8, offset: i32 },

    // ========== 系统指令 ==========
    /// ECALL: 按 a7 中的系统调用号处理控制台 I/O 或停机
    Ecall,

    // ========== 特殊 ==========
    /// 未实现的 opcode / funct3 / funct7 组合，执行时为空操作
    Unimplemented { raw: u32 },
}

impl RvInstr {
    /// 指令助记符
    pub fn mnemonic(&self) -> &'static str {
        match self {
            RvInstr::Add { .. } => "add",
            RvInstr::Sub { .. } => "sub",
            RvInstr::Sll { .. } => "sll",
            RvInstr::Slt { .. } => "slt",
            RvInstr::Sltu { .. } => "sltu",
            RvInstr::Xor { .. } => "xor",
            RvInstr::Srl { .. } => "srl",
            RvInstr::Sra { .. } => "sra",
            RvInstr::Or { .. } => "or",
            RvInstr::And { .. } => "and",
            RvInstr::Addi { .. } => "addi",
            RvInstr::Slti { .. } => "slti",
            RvInstr::Sltiu { .. } => "sltiu",
            RvInstr::Xori { .. } => "xori",
            RvInstr::Ori { .. } => "ori",
            RvInstr::Andi { .. } => "andi",
            RvInstr::Slli { .. } => "slli",
            RvInstr::Srli { .. } => "srli",
            RvInstr::Srai { .. } => "srai",
            RvInstr::Lb { .. } => "lb",
            RvInstr::Lh { .. } => "lh",
            RvInstr::Lw { .. } => "lw",
            RvInstr::Lbu { .. } => "lbu",
            RvInstr::Lhu { .. } => "lhu",
            RvInstr::Sb { .. } => "sb",
            RvInstr::Sh { .. } => "sh",
            RvInstr::Sw { .. } => "sw",
            RvInstr::Lui { .. } => "lui",
            RvInstr::Auipc { .. } => "auipc",
            RvInstr::Jal { .. } => "jal",
            RvInstr::Jalr { .. } => "jalr",
            RvInstr::Beq { .. } => "beq",
            RvInstr::Bne { .. } => "bne",
            RvInstr::Blt { .. } => "blt",
            RvInstr::Bge { .. } => "bge",
            RvInstr::Bltu { .. } => "bltu",
            RvInstr::Bgeu { .. } => "bgeu",
            RvInstr::Ecall => "ecall",
            RvInstr::Unimplemented { .. } => "unimp",
        }
    }
}

impl fmt::Display for RvInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic();
        match *self {
            RvInstr::Add { rd, rs1, rs2 }
            | RvInstr::Sub { rd, rs1, rs2 }
            | RvInstr::Sll { rd, rs1, rs2 }
            | RvInstr::Slt { rd, rs1, rs2 }
            | RvInstr::Sltu { rd, rs1, rs2 }
            | RvInstr::Xor { rd, rs1, rs2 }
            | RvInstr::Srl { rd, rs1, rs2 }
            | RvInstr::Sra { rd, rs1, rs2 }
            | RvInstr::Or { rd, rs1, rs2 }
            | RvInstr::And { rd, rs1, rs2 } => write!(f, "{name} x{rd}, x{rs1}, x{rs2}"),
            RvInstr::Addi { rd, rs1, imm }
            | RvInstr::Slti { rd, rs1, imm }
            | RvInstr::Sltiu { rd, rs1, imm }
            | RvInstr::Xori { rd, rs1, imm }
            | RvInstr::Ori { rd, rs1, imm }
            | RvInstr::Andi { rd, rs1, imm } => write!(f, "{name} x{rd}, x{rs1}, {imm}"),
            RvInstr::Slli { rd, rs1, shamt }
            | RvInstr::Srli { rd, rs1, shamt }
            | RvInstr::Srai { rd, rs1, shamt } => write!(f, "{name} x{rd}, x{rs1}, {shamt}"),
            RvInstr::Lb { rd, rs1, offset }
            | RvInstr::Lh { rd, rs1, offset }
            | RvInstr::Lw { rd, rs1, offset }
            | RvInstr::Lbu { rd, rs1, offset }
            | RvInstr::Lhu { rd, rs1, offset }
            | RvInstr::Jalr { rd, rs1, offset } => write!(f, "{name} x{rd}, {offset}(x{rs1})"),
            RvInstr::Sb { rs1, rs2, offset }
            | RvInstr::Sh { rs1, rs2, offset }
            | RvInstr::Sw { rs1, rs2, offset } => write!(f, "{name} x{rs2}, {offset}(x{rs1})"),
            RvInstr::Lui { rd, imm } | RvInstr::Auipc { rd, imm } => {
                write!(f, "{name} x{rd}, 0x{:05x}", imm as u32 & 0xFFFFF)
            }
            RvInstr::Jal { rd, offset } => write!(f, "{name} x{rd}, {offset}"),
            RvInstr::Beq { rs1, rs2, offset }
            | RvInstr::Bne { rs1, rs2, offset }
            | RvInstr::Blt { rs1, rs2, offset }
            | RvInstr::Bge { rs1, rs2, offset }
            | RvInstr::Bltu { rs1, rs2, offset }
            | RvInstr::Bgeu { rs1, rs2, offset } => write!(f, "{name} x{rs1}, x{rs2}, {offset}"),
            RvInstr::Ecall => write!(f, "{name}"),
            RvInstr::Unimplemented { raw } => write!(f, "{name} 0x{raw:08x}"),
        }
    }
}

/// 已解码的指令
///
/// 包含原始编码、字段记录与语义变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstr {
    /// 原始 32-bit 指令编码
    pub raw: u32,
    /// 拆出的字段
    pub fields: DecodedFields,
    /// 解码后的语义表示
    pub instr: RvInstr,
}

impl DecodedInstr {
    pub fn is_unimplemented(&self) -> bool {
        matches!(self.instr, RvInstr::Unimplemented { .. })
    }
}
