//! SIC/XE Register File.
//!
//! This module provides the `RegisterFile` struct and the `Reg` register names. It provides:
//! 1. **Storage:** The nine integer registers (`A X L B S T F PC SW`) plus the floating accumulator.
//! 2. **Validation:** Conversion from raw register numbers with rejection of unassigned numbers.
//! 3. **Observability:** Fixed-width hex formatting used by logs and frontends.

use std::fmt;

use super::constants::WORD_MASK;
use super::error::{Result, SimError};

/// Architectural register names with their SIC/XE register numbers.
///
/// Number 7 is unassigned in the architecture, so the nine registers occupy
/// numbers 0-6, 8 and 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Reg {
    /// Accumulator.
    A = 0,
    /// Index register.
    X = 1,
    /// Linkage register; holds the return address of the last `JSUB`.
    L = 2,
    /// Base register.
    B = 3,
    /// General working register.
    S = 4,
    /// General working register.
    T = 5,
    /// Low word of the floating accumulator as seen by format 2 instructions.
    F = 6,
    /// Program counter.
    PC = 8,
    /// Status word.
    SW = 9,
}

impl Reg {
    /// All registers in display order.
    pub const ALL: [Self; 9] = [
        Self::A,
        Self::X,
        Self::L,
        Self::B,
        Self::S,
        Self::T,
        Self::F,
        Self::PC,
        Self::SW,
    ];

    /// Converts a register number (as encoded in format 2 instructions) to a register.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidRegister`] for 7 and anything above 9.
    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            0 => Ok(Self::A),
            1 => Ok(Self::X),
            2 => Ok(Self::L),
            3 => Ok(Self::B),
            4 => Ok(Self::S),
            5 => Ok(Self::T),
            6 => Ok(Self::F),
            8 => Ok(Self::PC),
            9 => Ok(Self::SW),
            other => Err(SimError::InvalidRegister(other)),
        }
    }

    /// Returns the architectural register number.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns the assembler name of the register.
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::X => "X",
            Self::L => "L",
            Self::B => "B",
            Self::S => "S",
            Self::T => "T",
            Self::F => "F",
            Self::PC => "PC",
            Self::SW => "SW",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::PC => 7,
            Self::SW => 8,
            other => other as usize,
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The machine register file.
///
/// Integer registers hold 32-bit signed values; no truncation is applied
/// beyond what the arithmetic itself produces. Copying the struct yields a
/// read-only snapshot for frontends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegisterFile {
    regs: [i32; 9],
    /// Floating accumulator.
    pub f: f64,
}

impl RegisterFile {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    #[inline]
    pub const fn get(&self, reg: Reg) -> i32 {
        self.regs[reg.slot()]
    }

    /// Writes a register.
    #[inline]
    pub fn set(&mut self, reg: Reg, value: i32) {
        self.regs[reg.slot()] = value;
    }

    /// Reads a register by its architectural number.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidRegister`] if `number` names no register.
    pub fn read(&self, number: u8) -> Result<i32> {
        Ok(self.get(Reg::from_number(number)?))
    }

    /// Writes a register by its architectural number.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidRegister`] if `number` names no register.
    pub fn write(&mut self, number: u8, value: i32) -> Result<()> {
        self.set(Reg::from_number(number)?, value);
        Ok(())
    }

    /// Returns the program counter as an address.
    #[inline]
    pub const fn pc(&self) -> u32 {
        self.get(Reg::PC) as u32
    }

    /// Sets the program counter.
    #[inline]
    pub fn set_pc(&mut self, pc: u32) {
        self.set(Reg::PC, pc as i32);
    }

    /// Formats a register as six upper-case hex digits of its low 24 bits.
    pub fn hex(&self, reg: Reg) -> String {
        format!("{:06X}", self.get(reg) as u32 & WORD_MASK)
    }

    /// Zeroes every register and the floating accumulator.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reg) in Reg::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{reg}={}", self.hex(*reg))?;
        }
        write!(f, " F(acc)={}", self.f)
    }
}
