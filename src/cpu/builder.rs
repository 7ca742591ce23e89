//! CPU 配置器
//!
//! 统一配置解码器、代码段上界与访存行为。
//!
//! # 示例
//!
//! ```
//! use rv32i_sim::cpu::{CpuBuilder, SubwordStores};
//!
//! let cpu = CpuBuilder::new(0)
//!     .with_text_limit(0x1000)
//!     .with_subword_stores(SubwordStores::Legacy)
//!     .build();
//! assert_eq!(cpu.text_limit(), 0x1000);
//! ```

use std::sync::Arc;

use super::{CpuCore, DEFAULT_TEXT_LIMIT, SubwordStores};
use crate::isa::DecoderRegistry;

/// CPU 构建器
///
/// 未指定解码器时使用内置的 RV32I 注册表。
#[derive(Debug, Clone)]
pub struct CpuBuilder {
    entry_pc: u32,
    text_limit: u32,
    subword_stores: SubwordStores,
    stop_on_unimplemented: bool,
    decoder: Option<Arc<DecoderRegistry>>,
}

impl CpuBuilder {
    pub fn new(entry_pc: u32) -> Self {
        Self {
            entry_pc,
            text_limit: DEFAULT_TEXT_LIMIT,
            subword_stores: SubwordStores::default(),
            stop_on_unimplemented: false,
            decoder: None,
        }
    }

    /// `run` 在 PC 到达该地址时停止
    pub fn with_text_limit(mut self, limit: u32) -> Self {
        self.text_limit = limit;
        self
    }

    pub fn with_subword_stores(mut self, mode: SubwordStores) -> Self {
        self.subword_stores = mode;
        self
    }

    /// 遇到未实现指令时让 `run` 停下，而不是当作空操作继续
    pub fn with_stop_on_unimplemented(mut self, stop: bool) -> Self {
        self.stop_on_unimplemented = stop;
        self
    }

    /// 使用自定义解码器注册表（例如额外注册了自定义 opcode 的解码器）
    pub fn with_decoder(mut self, decoder: Arc<DecoderRegistry>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn build(self) -> CpuCore {
        let decoder = self
            .decoder
            .unwrap_or_else(|| Arc::new(DecoderRegistry::with_rv32i()));
        CpuCore::with_config(
            self.entry_pc,
            decoder,
            self.subword_stores,
            self.text_limit,
            self.stop_on_unimplemented,
        )
    }
}
