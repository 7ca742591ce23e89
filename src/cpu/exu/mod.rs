//! Execution units split by instruction family.
//!
//! Returns true if handled. `lsu` wraps that in a `Result` for address faults.

pub mod alu;
pub mod bru;
pub mod lsu;

use super::CpuError;
use crate::memory::MemError;

/// Tag a memory error with the address of the faulting instruction.
pub(crate) fn address_fault(pc: u32) -> impl FnOnce(MemError) -> CpuError {
    move |source| CpuError::AddressFault { pc, source }
}
