//! CPU architectural state: the integer register file.

/// Default stack pointer (x2), top of the 16 KiB space.
pub const SP_INIT: i32 = 0x0000_3FFC;
/// Default global pointer (x3), middle of the data segment.
pub const GP_INIT: i32 = 0x0000_1800;

/// ABI names of x0..x31, used by the register dump.
pub const ABI_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Integer register file x0..x31. x0 is hard-wired to zero.
#[derive(Debug, Clone, Default)]
pub struct RegFile {
    regs: [i32; 32],
}

impl RegFile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn read(&self, reg: u8) -> i32 {
        if reg == 0 { 0 } else { self.regs[reg as usize] }
    }

    #[inline]
    pub fn write(&mut self, reg: u8, value: i32) {
        if reg != 0 {
            self.regs[reg as usize] = value;
        }
    }
}

/// Architectural register state at reset.
#[derive(Debug, Clone)]
pub struct Status {
    pub int: RegFile,
}

impl Status {
    /// Reset state: all zero except sp and gp, matching the default linker layout.
    pub fn new() -> Self {
        let mut int = RegFile::new();
        int.write(2, SP_INIT);
        int.write(3, GP_INIT);
        Self { int }
    }

    #[inline]
    pub fn int_read(&self, reg: u8) -> i32 {
        self.int.read(reg)
    }

    #[inline]
    pub fn int_write(&mut self, reg: u8, value: i32) {
        self.int.write(reg, value)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_values() {
        let status = Status::new();
        assert_eq!(status.int_read(2), 0x3FFC);
        assert_eq!(status.int_read(3), 0x1800);
        assert!((0..32u8).all(|r| r == 2 || r == 3 || status.int_read(r) == 0));
    }

    #[test]
    fn test_x0_writes_discarded() {
        let mut status = Status::new();
        status.int_write(0, 42);
        assert_eq!(status.int_read(0), 0);
        status.int_write(31, -7);
        assert_eq!(status.int_read(31), -7);
    }

    #[test]
    fn test_reg_file_zero_register() {
        let mut rf = RegFile::new();
        rf.write(0, 9);
        rf.write(1, 9);
        assert_eq!(rf.read(0), 0);
        assert_eq!(rf.read(1), 9);
    }
}
