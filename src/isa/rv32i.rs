//! RV32I 基础指令集解码器
//!
//! 基于表驱动的解码实现：opcode 选出指令族，funct3 区分族内指令，
//! 加减与右移再用 funct7 区分。

use crate::isa::fields::*;
use crate::isa::instr::RvInstr;
use crate::isa::instr_def::{
    EXACT_MASK, FUNCT3_MASK, InstrDef, OPCODE_MASK, R_TYPE_MASK, TableDrivenDecoder, f3_match,
    r_match,
};

// ========== RV32I 指令定义表 ==========

/// RV32I 指令定义表
pub static RV32I_INSTRS: &[InstrDef] = &[
    // ========== U-type ==========
    InstrDef::new("LUI", OPCODE_MASK, OP_LUI, |f| RvInstr::Lui {
        rd: f.rd,
        imm: f.imm_u,
    }),
    InstrDef::new("AUIPC", OPCODE_MASK, OP_AUIPC, |f| RvInstr::Auipc {
        rd: f.rd,
        imm: f.imm_u,
    }),

    // ========== J-type ==========
    InstrDef::new("JAL", OPCODE_MASK, OP_JAL, |f| RvInstr::Jal {
        rd: f.rd,
        offset: f.imm_j,
    }),
    InstrDef::new("JALR", FUNCT3_MASK, f3_match(0b000, OP_JALR), |f| RvInstr::Jalr {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),

    // ========== B-type ==========
    InstrDef::new("BEQ", FUNCT3_MASK, f3_match(0b000, OP_BRANCH), |f| RvInstr::Beq {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),
    InstrDef::new("BNE", FUNCT3_MASK, f3_match(0b001, OP_BRANCH), |f| RvInstr::Bne {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),
    InstrDef::new("BLT", FUNCT3_MASK, f3_match(0b100, OP_BRANCH), |f| RvInstr::Blt {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),
    InstrDef::new("BGE", FUNCT3_MASK, f3_match(0b101, OP_BRANCH), |f| RvInstr::Bge {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),
    InstrDef::new("BLTU", FUNCT3_MASK, f3_match(0b110, OP_BRANCH), |f| RvInstr::Bltu {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),
    InstrDef::new("BGEU", FUNCT3_MASK, f3_match(0b111, OP_BRANCH), |f| RvInstr::Bgeu {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_b,
    }),

    // ========== Load ==========
    InstrDef::new("LB", FUNCT3_MASK, f3_match(0b000, OP_LOAD), |f| RvInstr::Lb {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),
    InstrDef::new("LH", FUNCT3_MASK, f3_match(0b001, OP_LOAD), |f| RvInstr::Lh {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),
    InstrDef::new("LW", FUNCT3_MASK, f3_match(0b010, OP_LOAD), |f| RvInstr::Lw {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),
    InstrDef::new("LBU", FUNCT3_MASK, f3_match(0b100, OP_LOAD), |f| RvInstr::Lbu {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),
    InstrDef::new("LHU", FUNCT3_MASK, f3_match(0b101, OP_LOAD), |f| RvInstr::Lhu {
        rd: f.rd,
        rs1: f.rs1,
        offset: f.imm_i,
    }),

    // ========== Store ==========
    InstrDef::new("SB", FUNCT3_MASK, f3_match(0b000, OP_STORE), |f| RvInstr::Sb {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_s,
    }),
    InstrDef::new("SH", FUNCT3_MASK, f3_match(0b001, OP_STORE), |f| RvInstr::Sh {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_s,
    }),
    InstrDef::new("SW", FUNCT3_MASK, f3_match(0b010, OP_STORE), |f| RvInstr::Sw {
        rs1: f.rs1,
        rs2: f.rs2,
        offset: f.imm_s,
    }),

    // ========== I-type ALU ==========
    InstrDef::new("ADDI", FUNCT3_MASK, f3_match(0b000, OP_IMM), |f| RvInstr::Addi {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),
    InstrDef::new("SLTI", FUNCT3_MASK, f3_match(0b010, OP_IMM), |f| RvInstr::Slti {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),
    InstrDef::new("SLTIU", FUNCT3_MASK, f3_match(0b011, OP_IMM), |f| RvInstr::Sltiu {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),
    InstrDef::new("XORI", FUNCT3_MASK, f3_match(0b100, OP_IMM), |f| RvInstr::Xori {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),
    InstrDef::new("ORI", FUNCT3_MASK, f3_match(0b110, OP_IMM), |f| RvInstr::Ori {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),
    InstrDef::new("ANDI", FUNCT3_MASK, f3_match(0b111, OP_IMM), |f| RvInstr::Andi {
        rd: f.rd,
        rs1: f.rs1,
        imm: f.imm_i,
    }),

    // ========== Shift immediate ==========
    InstrDef::new("SLLI", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b001, OP_IMM), |f| RvInstr::Slli {
        rd: f.rd,
        rs1: f.rs1,
        shamt: f.shamt,
    }),
    InstrDef::new("SRLI", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b101, OP_IMM), |f| RvInstr::Srli {
        rd: f.rd,
        rs1: f.rs1,
        shamt: f.shamt,
    }),
    InstrDef::new("SRAI", R_TYPE_MASK, r_match(FUNCT7_ALT, 0b101, OP_IMM), |f| RvInstr::Srai {
        rd: f.rd,
        rs1: f.rs1,
        shamt: f.shamt,
    }),

    // ========== R-type ==========
    InstrDef::new("ADD", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b000, OP_REG), |f| RvInstr::Add {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SUB", R_TYPE_MASK, r_match(FUNCT7_ALT, 0b000, OP_REG), |f| RvInstr::Sub {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SLL", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b001, OP_REG), |f| RvInstr::Sll {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SLT", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b010, OP_REG), |f| RvInstr::Slt {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SLTU", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b011, OP_REG), |f| RvInstr::Sltu {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("XOR", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b100, OP_REG), |f| RvInstr::Xor {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SRL", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b101, OP_REG), |f| RvInstr::Srl {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("SRA", R_TYPE_MASK, r_match(FUNCT7_ALT, 0b101, OP_REG), |f| RvInstr::Sra {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("OR", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b110, OP_REG), |f| RvInstr::Or {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),
    InstrDef::new("AND", R_TYPE_MASK, r_match(FUNCT7_BASE, 0b111, OP_REG), |f| RvInstr::And {
        rd: f.rd,
        rs1: f.rs1,
        rs2: f.rs2,
    }),

    // ========== 系统 ==========
    InstrDef::new("ECALL", EXACT_MASK, 0x00000073, |_| RvInstr::Ecall),
];

/// RV32I 指令族的 opcode 列表
pub static RV32I_OPCODES: [u32; 10] = [
    OP_LUI, OP_AUIPC, OP_JAL, OP_JALR, OP_BRANCH,
    OP_LOAD, OP_STORE, OP_IMM, OP_REG, OP_SYSTEM,
];

// ========== 解码器实例 ==========

/// RV32I 解码器（基于 TableDrivenDecoder）
pub static RV32I_DECODER: TableDrivenDecoder =
    TableDrivenDecoder::new("RV32I", RV32I_INSTRS, &RV32I_OPCODES);
