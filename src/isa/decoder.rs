//! 解码器框架
//!
//! 按 opcode 分桶的解码器注册表，未命中的编码解码为 `Unimplemented`

use std::sync::Arc;

use thiserror::Error;

use crate::isa::fields::opcode;
use crate::isa::{DecodedFields, DecodedInstr, RvInstr};

/// 指令解码器 trait
///
/// 实现此 trait 以创建自定义解码器
pub trait InstrDecoder: Send + Sync {
    /// 解码器名称
    fn name(&self) -> &str;

    /// 尝试解码指令
    ///
    /// 返回 `Some(decoded)` 如果能解码，否则返回 `None`
    fn decode(&self, raw: u32) -> Option<DecodedInstr>;

    /// 此解码器处理的 opcode 列表
    fn handled_opcodes(&self) -> &[u32];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("opcode 0x{opcode:02X} already handled; rejecting decoder {decoder}")]
    OpcodeTaken { opcode: u32, decoder: String },
    #[error("decoder {decoder} claims invalid opcode 0x{opcode:X}")]
    InvalidOpcode { opcode: u32, decoder: String },
}

/// 解码器注册表
///
/// 每个 opcode 至多归属一个解码器
pub struct DecoderRegistry {
    decoders: Vec<Arc<dyn InstrDecoder>>,
    /// opcode -> 解码器下标
    opcode_map: [Option<usize>; 128],
}

impl DecoderRegistry {
    /// 创建空的解码器注册表
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
            opcode_map: [None; 128],
        }
    }

    /// 创建包含默认 RV32I 解码器的注册表
    pub fn with_rv32i() -> Self {
        let mut registry = Self::new();
        // 空表上注册不会冲突
        let _ = registry.register(Arc::new(super::rv32i::RV32I_DECODER));
        registry
    }

    /// 注册一个解码器；若声明的 opcode 已被占用则返回 Err，注册表保持不变
    pub fn register(&mut self, decoder: Arc<dyn InstrDecoder>) -> Result<(), RegistryError> {
        for &op in decoder.handled_opcodes() {
            let slot = self
                .opcode_map
                .get(op as usize)
                .ok_or_else(|| RegistryError::InvalidOpcode {
                    opcode: op,
                    decoder: decoder.name().to_string(),
                })?;
            if slot.is_some() {
                return Err(RegistryError::OpcodeTaken {
                    opcode: op,
                    decoder: decoder.name().to_string(),
                });
            }
        }

        let idx = self.decoders.len();
        for &op in decoder.handled_opcodes() {
            self.opcode_map[op as usize] = Some(idx);
        }
        self.decoders.push(decoder);
        Ok(())
    }

    /// 解码指令
    ///
    /// 没有解码器认领，或认领的解码器找不到匹配项时，返回 `Unimplemented`
    pub fn decode(&self, raw: u32) -> DecodedInstr {
        self.opcode_map[opcode(raw) as usize]
            .and_then(|idx| self.decoders[idx].decode(raw))
            .unwrap_or_else(|| DecodedInstr {
                raw,
                fields: DecodedFields::from_raw(raw),
                instr: RvInstr::Unimplemented { raw },
            })
    }

    /// 获取已注册的解码器数量
    pub fn decoder_count(&self) -> usize {
        self.decoders.len()
    }

    /// 列出所有已注册的解码器名称
    pub fn decoder_names(&self) -> Vec<&str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_rv32i()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.decoder_names())
            .finish()
    }
}
