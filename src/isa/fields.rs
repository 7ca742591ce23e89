//! 指令字段提取辅助函数
//!
//! 从 32-bit 指令字中提取各字段。立即数在这里只做位的收集（gather），
//! 返回未做符号扩展的无符号值，符号扩展统一交给 [`sign_extend`] 在解码阶段完成。

/// 提取 opcode 字段 [6:0]
#[inline]
pub fn opcode(raw: u32) -> u32 {
    raw & 0x7F
}

/// 提取 rd 字段 [11:7]
#[inline]
pub fn rd(raw: u32) -> u8 {
    ((raw >> 7) & 0x1F) as u8
}

/// 提取 funct3 字段 [14:12]
#[inline]
pub fn funct3(raw: u32) -> u32 {
    (raw >> 12) & 0x7
}

/// 提取 rs1 字段 [19:15]
#[inline]
pub fn rs1(raw: u32) -> u8 {
    ((raw >> 15) & 0x1F) as u8
}

/// 提取 rs2 字段 [24:20]
#[inline]
pub fn rs2(raw: u32) -> u8 {
    ((raw >> 20) & 0x1F) as u8
}

/// 提取 funct7 字段 [31:25]
#[inline]
pub fn funct7(raw: u32) -> u32 {
    (raw >> 25) & 0x7F
}

/// 提取移位量 shamt [24:20]，与 rs2 同位置
#[inline]
pub fn shamt(raw: u32) -> u8 {
    ((raw >> 20) & 0x1F) as u8
}

/// I-type 立即数位收集
/// imm[11:0] = raw[31:20]
#[inline]
pub fn imm_i_bits(raw: u32) -> u32 {
    raw >> 20
}

/// S-type 立即数位收集
/// imm[11:5] = raw[31:25], imm[4:0] = raw[11:7]
#[inline]
pub fn imm_s_bits(raw: u32) -> u32 {
    let imm_11_5 = (raw >> 25) & 0x7F;
    let imm_4_0 = (raw >> 7) & 0x1F;
    (imm_11_5 << 5) | imm_4_0
}

/// B-type 立即数位收集，imm[0] 恒为 0
/// imm[12] = raw[31], imm[11] = raw[7], imm[10:5] = raw[30:25], imm[4:1] = raw[11:8]
#[inline]
pub fn imm_b_bits(raw: u32) -> u32 {
    let imm_12 = (raw >> 31) & 0x1;
    let imm_11 = (raw >> 7) & 0x1;
    let imm_10_5 = (raw >> 25) & 0x3F;
    let imm_4_1 = (raw >> 8) & 0xF;
    (imm_12 << 12) | (imm_11 << 11) | (imm_10_5 << 5) | (imm_4_1 << 1)
}

/// U-type 立即数位收集
///
/// 返回 raw[31:12] 右移到低 20 位的值，左移 12 位由 LUI/AUIPC 自己完成。
#[inline]
pub fn imm_u_bits(raw: u32) -> u32 {
    raw >> 12
}

/// J-type 立即数位收集，imm[0] 恒为 0
/// imm[20] = raw[31], imm[19:12] = raw[19:12], imm[11] = raw[20], imm[10:1] = raw[30:21]
#[inline]
pub fn imm_j_bits(raw: u32) -> u32 {
    let imm_20 = (raw >> 31) & 0x1;
    let imm_19_12 = (raw >> 12) & 0xFF;
    let imm_11 = (raw >> 20) & 0x1;
    let imm_10_1 = (raw >> 21) & 0x3FF;
    (imm_20 << 20) | (imm_19_12 << 12) | (imm_11 << 11) | (imm_10_1 << 1)
}

/// 以 `bits` 位宽的最高位为符号位做符号扩展
///
/// 先左移把符号位顶到 bit31，再算术右移回来。`bits` 取值 1..=32。
#[inline]
pub fn sign_extend(value: u32, bits: u32) -> i32 {
    debug_assert!((1..=32).contains(&bits));
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

// ========== 立即数位宽 ==========
pub const IMM_I_WIDTH: u32 = 12;
pub const IMM_S_WIDTH: u32 = 12;
pub const IMM_B_WIDTH: u32 = 13;
pub const IMM_U_WIDTH: u32 = 20;
pub const IMM_J_WIDTH: u32 = 21;

// ========== Opcode 常量 ==========
pub const OP_LUI: u32 = 0b0110111;
pub const OP_AUIPC: u32 = 0b0010111;
pub const OP_JAL: u32 = 0b1101111;
pub const OP_JALR: u32 = 0b1100111;
pub const OP_BRANCH: u32 = 0b1100011;
pub const OP_LOAD: u32 = 0b0000011;
pub const OP_STORE: u32 = 0b0100011;
pub const OP_IMM: u32 = 0b0010011;
pub const OP_REG: u32 = 0b0110011;
pub const OP_SYSTEM: u32 = 0b1110011;

// ========== funct7 常量 ==========
pub const FUNCT7_BASE: u32 = 0b0000000;
pub const FUNCT7_ALT: u32 = 0b0100000;
