//! 内存抽象层
//!
//! 本模块定义了内存访问的统一接口 `Memory` trait，
//! 以及按字寻址的 16 KiB 内存实现 `WordMemory`。
//!
//! 字访问用 `addr / 4` 作下标，低两位直接丢弃。字节、半字访问复用同一个字槽，
//! 只取/写该字的低 8 位或低 16 位。只有系统调用打印字符串时才把存储当作
//! 小端字节数组看待，见 [`Memory::read_byte`]。

use thiserror::Error;

/// 内存字数（4096 字 = 16 KiB）
pub const MEM_WORDS: usize = 4096;
/// 内存字节数
pub const MEM_BYTES: u32 = (MEM_WORDS * 4) as u32;
/// 代码段起始地址
pub const TEXT_BASE: u32 = 0x0000_0000;
/// 数据段起始地址
pub const DATA_BASE: u32 = 0x0000_2000;

/// 访存粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSize {
    Byte,
    Half,
    Word,
}

impl AccessSize {
    /// 该粒度在字槽中占用的低位掩码
    pub fn lane_mask(self) -> u32 {
        match self {
            AccessSize::Byte => 0x0000_00FF,
            AccessSize::Half => 0x0000_FFFF,
            AccessSize::Word => 0xFFFF_FFFF,
        }
    }
}

/// 越界地址的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressPolicy {
    /// 越界访问返回 `MemError::OutOfRange`
    #[default]
    Fault,
    /// 字下标对内存字数取模，越界地址回绕到内存内
    Wrap,
}

/// 内存访问错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemError {
    /// 地址越界（超出 16 KiB 地址空间）
    #[error("out-of-range {access:?} access at 0x{addr:08x} (memory is 0x{size:08x} bytes)", size = MEM_BYTES)]
    OutOfRange { addr: u32, access: AccessSize },
    /// 镜像大小超出所在区域
    #[error("image of {len} bytes at 0x{base:08x} does not fit below 0x{limit:08x}")]
    ImageTooLarge { base: u32, len: usize, limit: u32 },
}

pub type MemResult<T> = Result<T, MemError>;

/// 内存访问的统一接口
///
/// 所有读写都落在 `addr / 4` 所指的字槽上。
pub trait Memory {
    /// 读取整个字槽
    fn load32(&self, addr: u32) -> MemResult<u32>;

    /// 读取字槽低 16 位
    fn load16(&self, addr: u32) -> MemResult<u16>;

    /// 读取字槽低 8 位
    fn load8(&self, addr: u32) -> MemResult<u8>;

    /// 写入整个字槽
    fn store32(&mut self, addr: u32, value: u32) -> MemResult<()>;

    /// 只替换字槽低 16 位，高位保持不变
    fn store16(&mut self, addr: u32, value: u16) -> MemResult<()>;

    /// 只替换字槽低 8 位，高位保持不变
    fn store8(&mut self, addr: u32, value: u8) -> MemResult<()>;

    /// 小端字节视图：返回地址 `addr` 处的单个字节
    ///
    /// 只供系统调用读取字符串使用，始终做边界检查，不受 `AddressPolicy` 影响。
    fn read_byte(&self, addr: u32) -> MemResult<u8>;
}

/// 按字寻址的平坦内存
///
/// 固定 4096 个字。由加载器在第一次取指前填充，之后只被 store 指令修改。
#[derive(Clone)]
pub struct WordMemory {
    words: Vec<u32>,
    policy: AddressPolicy,
}

impl WordMemory {
    /// 创建全零内存，越界即报错
    ///
    /// ```
    /// use rv32i_sim::memory::{Memory, WordMemory};
    ///
    /// let mem = WordMemory::new();
    /// assert_eq!(mem.load32(0x2000).unwrap(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_policy(AddressPolicy::Fault)
    }

    /// 创建全零内存并指定越界策略
    pub fn with_policy(policy: AddressPolicy) -> Self {
        WordMemory {
            words: vec![0; MEM_WORDS],
            policy,
        }
    }

    pub fn policy(&self) -> AddressPolicy {
        self.policy
    }

    /// 所有字的只读视图，用于转储
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// 按字下标读取，越界返回 None
    pub fn word_at(&self, index: usize) -> Option<u32> {
        self.words.get(index).copied()
    }

    fn slot(&self, addr: u32, access: AccessSize) -> MemResult<usize> {
        let index = (addr / 4) as usize;
        if index < self.words.len() {
            return Ok(index);
        }
        match self.policy {
            AddressPolicy::Fault => Err(MemError::OutOfRange { addr, access }),
            AddressPolicy::Wrap => Ok(index % self.words.len()),
        }
    }

    /// 以小端字节序把一段镜像写入内存
    ///
    /// 镜像必须完整落在 `[addr, limit)` 内，`limit` 不得超过内存大小。
    pub fn write_image(&mut self, addr: u32, data: &[u8], limit: u32) -> MemResult<()> {
        let limit = limit.min(MEM_BYTES);
        let fits = u32::try_from(data.len())
            .ok()
            .and_then(|len| addr.checked_add(len))
            .is_some_and(|end| end <= limit);
        if !fits {
            return Err(MemError::ImageTooLarge {
                base: addr,
                len: data.len(),
                limit,
            });
        }

        for (offset, &byte) in data.iter().enumerate() {
            let byte_addr = addr + offset as u32;
            let index = (byte_addr / 4) as usize;
            let shift = (byte_addr % 4) * 8;
            let word = &mut self.words[index];
            *word = (*word & !(0xFF << shift)) | ((byte as u32) << shift);
        }
        Ok(())
    }

    /// 清零全部内存
    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}

impl Default for WordMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WordMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordMemory")
            .field("words", &self.words.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Memory for WordMemory {
    fn load32(&self, addr: u32) -> MemResult<u32> {
        let index = self.slot(addr, AccessSize::Word)?;
        Ok(self.words[index])
    }

    fn load16(&self, addr: u32) -> MemResult<u16> {
        let index = self.slot(addr, AccessSize::Half)?;
        Ok(self.words[index] as u16)
    }

    fn load8(&self, addr: u32) -> MemResult<u8> {
        let index = self.slot(addr, AccessSize::Byte)?;
        Ok(self.words[index] as u8)
    }

    fn store32(&mut self, addr: u32, value: u32) -> MemResult<()> {
        let index = self.slot(addr, AccessSize::Word)?;
        self.words[index] = value;
        Ok(())
    }

    fn store16(&mut self, addr: u32, value: u16) -> MemResult<()> {
        let index = self.slot(addr, AccessSize::Half)?;
        let word = &mut self.words[index];
        *word = (*word & !AccessSize::Half.lane_mask()) | value as u32;
        Ok(())
    }

    fn store8(&mut self, addr: u32, value: u8) -> MemResult<()> {
        let index = self.slot(addr, AccessSize::Byte)?;
        let word = &mut self.words[index];
        *word = (*word & !AccessSize::Byte.lane_mask()) | value as u32;
        Ok(())
    }

    fn read_byte(&self, addr: u32) -> MemResult<u8> {
        let word = self
            .words
            .get((addr / 4) as usize)
            .ok_or(MemError::OutOfRange {
                addr,
                access: AccessSize::Byte,
            })?;
        Ok((word >> ((addr % 4) * 8)) as u8)
    }
}
