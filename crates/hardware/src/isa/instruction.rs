//! Instruction encoding structures.
//!
//! Provides the instruction formats, the `nixbpe` flag set and the decoded
//! instruction record handed from the decoder to the executor.

use std::fmt;

use crate::common::hex;
use crate::isa::mnemonic::Mnemonic;

/// Instruction format.
///
/// Catalog entries only carry `One`, `Two` or `Three`; the decoder promotes
/// `Three` to `Four` when the `e` flag is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// One byte: opcode only.
    One,
    /// Two bytes: opcode and two register numbers.
    Two,
    /// Three bytes: opcode, `nixbpe` and a 12-bit displacement.
    Three,
    /// Four bytes: opcode, `nixbpe` and a 20-bit address.
    Four,
}

impl Format {
    /// Encoded length in bytes.
    pub const fn len(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Format number as written in catalogs and listings.
    pub const fn number(self) -> u8 {
        self.len() as u8
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Bit for the indirect flag `n`.
pub const FLAG_N: u8 = 0x20;
/// Bit for the immediate flag `i`.
pub const FLAG_I: u8 = 0x10;
/// Bit for the indexed flag `x`.
pub const FLAG_X: u8 = 0x08;
/// Bit for the base-relative flag `b`.
pub const FLAG_B: u8 = 0x04;
/// Bit for the PC-relative flag `p`.
pub const FLAG_P: u8 = 0x02;
/// Bit for the extended-format flag `e`.
pub const FLAG_E: u8 = 0x01;

/// The six addressing flags `n i x b p e`, packed in the low six bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(pub u8);

impl Flags {
    /// Combines the `ni` bits of the opcode byte with the `xbpe` nibble of the
    /// second byte.
    pub const fn from_bytes(opcode_byte: u8, second_byte: u8) -> Self {
        Self(((opcode_byte & 0x03) << 4) | (second_byte >> 4))
    }

    /// Indirect flag.
    pub const fn n(self) -> bool {
        self.0 & FLAG_N != 0
    }

    /// Immediate flag.
    pub const fn i(self) -> bool {
        self.0 & FLAG_I != 0
    }

    /// Indexed flag.
    pub const fn x(self) -> bool {
        self.0 & FLAG_X != 0
    }

    /// Base-relative flag.
    pub const fn b(self) -> bool {
        self.0 & FLAG_B != 0
    }

    /// PC-relative flag.
    pub const fn p(self) -> bool {
        self.0 & FLAG_P != 0
    }

    /// Extended-format flag.
    pub const fn e(self) -> bool {
        self.0 & FLAG_E != 0
    }

    /// Addressing mode selected by `n` and `i`.
    pub const fn mode(self) -> AddressingMode {
        match (self.n(), self.i()) {
            (true, true) => AddressingMode::Simple,
            (false, true) => AddressingMode::Immediate,
            (true, false) => AddressingMode::Indirect,
            (false, false) => AddressingMode::Sic,
        }
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, name) in [
            (FLAG_N, 'n'),
            (FLAG_I, 'i'),
            (FLAG_X, 'x'),
            (FLAG_B, 'b'),
            (FLAG_P, 'p'),
            (FLAG_E, 'e'),
        ] {
            let c = if self.0 & bit != 0 { name } else { '-' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// How the operand of a format 3/4 instruction is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// `n=1, i=1`: the operand is stored at the target address.
    Simple,
    /// `n=0, i=1`: the target address itself is the operand.
    Immediate,
    /// `n=1, i=0`: the target address holds the address of the operand.
    Indirect,
    /// `n=0, i=0`: SIC-compatible encoding with a 15-bit address.
    Sic,
}

/// Operand fields of a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Format 1 carries none.
    None,
    /// Format 2 register numbers.
    Registers {
        /// First register number (high nibble).
        r1: u8,
        /// Second register number (low nibble).
        r2: u8,
    },
    /// Format 3 displacement (12 bits) or format 4 address (20 bits), raw.
    Address(u32),
}

/// A fully decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Address the instruction was fetched from.
    pub addr: u32,
    /// Instruction kind.
    pub mnemonic: Mnemonic,
    /// Actual format after applying the `e` flag.
    pub format: Format,
    /// Addressing flags (zero for formats 1 and 2).
    pub flags: Flags,
    /// Operand fields.
    pub operand: Operand,
    /// Raw encoded bytes.
    pub bytes: Vec<u8>,
}

impl Decoded {
    /// Address of the following instruction.
    pub const fn next_pc(&self) -> u32 {
        self.addr + self.format.len()
    }

    /// Object code as upper-case hex, e.g. `"4B101036"`.
    pub fn object_code(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Raw displacement or address field, zero for formats 1 and 2.
    pub const fn address_field(&self) -> u32 {
        match self.operand {
            Operand::Address(value) => value,
            Operand::None | Operand::Registers { .. } => 0,
        }
    }

    /// Register numbers of a format 2 instruction, `(0, 0)` otherwise.
    pub const fn registers(&self) -> (u8, u8) {
        match self.operand {
            Operand::Registers { r1, r2 } => (r1, r2),
            Operand::None | Operand::Address(_) => (0, 0),
        }
    }
}
