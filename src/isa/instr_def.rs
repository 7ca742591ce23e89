//! RV32I 编码表的行格式
//!
//! 每一行用 mask/match 描述一种编码，解码表与重叠检查共用同一份数据。

use std::fmt;

use super::decoder::InstrDecoder;
use super::instr::{DecodedFields, DecodedInstr, RvInstr};

/// 编码表中的一行
///
/// `raw & mask == match_val` 即命中；命中后由 `build` 把
/// [`DecodedFields`] 组装成 [`RvInstr`]。
#[derive(Clone)]
pub struct InstrDef {
    /// 助记符，出现在重叠报告里
    pub name: &'static str,
    /// 参与比较的位：opcode，加上按格式需要的 funct3 / funct7
    pub mask: u32,
    /// `mask` 覆盖的位上要求的取值
    pub match_val: u32,
    pub build: fn(&DecodedFields) -> RvInstr,
}

impl InstrDef {
    pub const fn new(
        name: &'static str,
        mask: u32,
        match_val: u32,
        build: fn(&DecodedFields) -> RvInstr,
    ) -> Self {
        Self {
            name,
            mask,
            match_val,
            build,
        }
    }

    #[inline]
    pub fn matches(&self, raw: u32) -> bool {
        raw & self.mask == self.match_val
    }

    /// 先抽取全部字段与立即数，再交给 `build`
    #[inline]
    pub fn decode_instr(&self, raw: u32) -> DecodedInstr {
        let fields = DecodedFields::from_raw(raw);
        let instr = (self.build)(&fields);
        DecodedInstr { raw, fields, instr }
    }

    /// 在双方都检查的位上取值一致时，存在同时命中两行的指令字
    pub fn conflicts_with(&self, other: &InstrDef) -> bool {
        let shared = self.mask & other.mask;
        self.match_val & shared == other.match_val & shared
    }
}

impl fmt::Debug for InstrDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (mask 0x{:08X}, match 0x{:08X})",
            self.name, self.mask, self.match_val
        )
    }
}

// ========== 类型掩码常量 ==========

/// R-type 及移位立即数的 mask（检查 opcode + funct3 + funct7）
pub const R_TYPE_MASK: u32 = 0xFE00707F;

/// I/S/B-type 的 mask（检查 opcode + funct3）
pub const FUNCT3_MASK: u32 = 0x707F;

/// U/J-type 的 mask（只检查 opcode）
pub const OPCODE_MASK: u32 = 0x7F;

/// 精确匹配整个指令（用于 ECALL）
pub const EXACT_MASK: u32 = 0xFFFFFFFF;

// ========== 辅助函数：构造 match 值 ==========

/// 构造 R-type 的 match 值
#[inline]
pub const fn r_match(funct7: u32, funct3: u32, opcode: u32) -> u32 {
    (funct7 << 25) | (funct3 << 12) | opcode
}

/// 构造只带 funct3 的 match 值
#[inline]
pub const fn f3_match(funct3: u32, opcode: u32) -> u32 {
    (funct3 << 12) | opcode
}

// ========== 表驱动解码器 ==========

/// 按表顺序取第一条命中的 [`InstrDef`]
#[derive(Clone, Copy)]
pub struct TableDrivenDecoder {
    name: &'static str,
    instrs: &'static [InstrDef],
    opcodes: &'static [u32],
}

impl TableDrivenDecoder {
    pub const fn new(
        name: &'static str,
        instrs: &'static [InstrDef],
        opcodes: &'static [u32],
    ) -> Self {
        Self { name, instrs, opcodes }
    }

    pub fn instrs(&self) -> &'static [InstrDef] {
        self.instrs
    }

    /// 表内是否存在两两冲突的定义，返回冲突的名称对
    pub fn find_conflicts(&self) -> Vec<(&'static str, &'static str)> {
        let mut conflicts = Vec::new();
        for (i, a) in self.instrs.iter().enumerate() {
            for b in &self.instrs[i + 1..] {
                if a.conflicts_with(b) {
                    conflicts.push((a.name, b.name));
                }
            }
        }
        conflicts
    }
}

impl InstrDecoder for TableDrivenDecoder {
    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, raw: u32) -> Option<DecodedInstr> {
        self.instrs
            .iter()
            .find(|def| def.matches(raw))
            .map(|def| def.decode_instr(raw))
    }

    fn handled_opcodes(&self) -> &[u32] {
        self.opcodes
    }
}
