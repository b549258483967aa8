//! Memory Access Types.
//!
//! Classifies memory accesses so that range faults can report what the
//! engine was doing when it left the address space.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch by the decoder.
    Fetch,
    /// Data read by an instruction or by the loader's relocation pass.
    Read,
    /// Data write by an instruction or by the loader.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => f.write_str("fetch"),
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}
