//! RISC-V ISA 抽象与解码
//!
//! - `fields`: 指令字段与立即数位收集
//! - `RvInstr` / `DecodedFields`: 指令的语义与字段表示
//! - `InstrDecoder` / `DecoderRegistry`: 按 opcode 分桶的解码器
//! - `InstrDef`: 统一的指令定义，同时用于解码和冲突检测

mod decoder;
mod fields;
mod instr;
mod instr_def;
mod rv32i;

pub use decoder::{DecoderRegistry, InstrDecoder, RegistryError};
pub use fields::*;
pub use instr::{DecodedFields, DecodedInstr, RvInstr};
pub use instr_def::{InstrDef, TableDrivenDecoder};
pub use rv32i::{RV32I_DECODER, RV32I_INSTRS, RV32I_OPCODES};

/// 便捷函数：使用默认 RV32I 解码器解码指令
///
/// 不会失败，未知编码得到 `RvInstr::Unimplemented`
pub fn decode(raw: u32) -> DecodedInstr {
    RV32I_DECODER.decode(raw).unwrap_or(DecodedInstr {
        raw,
        fields: DecodedFields::from_raw(raw),
        instr: RvInstr::Unimplemented { raw },
    })
}
