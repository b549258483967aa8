//! Global Machine Constants.
//!
//! This module defines the architectural constants shared across the emulator. It includes:
//! 1. **Memory Constants:** Address-space size and word width.
//! 2. **Instruction Constants:** Opcode, flag and displacement field masks.
//! 3. **Execution Constants:** The termination sentinel address.

/// Size of the simulated address space in bytes (64 KiB).
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Width of a SIC/XE data word in bytes (24 bits).
pub const WORD_SIZE: usize = 3;

/// Mask selecting the low 24 bits of a register or memory word.
pub const WORD_MASK: u32 = 0x00FF_FFFF;

/// Mask selecting the base opcode (top 6 bits) of the first instruction byte.
pub const OPCODE_MASK: u8 = 0xFC;

/// Mask selecting the `n` and `i` flag bits carried in the first instruction byte.
pub const NI_MASK: u8 = 0x03;

/// Mask for the 12-bit displacement field of a format 3 instruction.
pub const DISP_MASK: u32 = 0x0FFF;

/// Largest displacement field still read as a forward offset; larger fields are negative.
pub const DISP_SIGN_LIMIT: u32 = 0x0800;

/// Mask for the 20-bit address field of a format 4 instruction.
pub const ADDR20_MASK: u32 = 0x000F_FFFF;

/// Mask for the 15-bit direct address of a plain SIC (`n=0,i=0`) instruction.
pub const SIC_ADDR_MASK: u32 = 0x7FFF;

/// Program-counter value interpreted as "program finished".
///
/// There is no call stack: the outermost routine returns through its saved
/// `L` value, which is zero when the program was entered directly.
pub const TERMINATION_ADDRESS: u32 = 0;
