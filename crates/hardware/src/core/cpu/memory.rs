//! Memory Access Helpers.
//!
//! This module provides the interface between instruction semantics and main
//! memory. It performs the following:
//! 1. **Target Address Calculation:** Relative, direct, extended and
//!    SIC-compatible forms, plus indexing. Only PC-relative offsets exist, so
//!    the `b` flag selects the same calculation as `p`.
//! 2. **Operand Fetch:** Immediate, simple and indirect reads of words and bytes.
//!    An immediate operand is the raw displacement or address field.
//! 3. **Effective Address:** The address a store or jump finally uses.

use super::Cpu;
use crate::common::{Reg, Result};
use crate::isa::decode::sign_extend_disp;
use crate::isa::{AddressingMode, Decoded, Format};

impl Cpu {
    /// Computes the target address of a format 3/4 instruction.
    ///
    /// Arithmetic wraps at 32 bits; a negative result becomes an address far
    /// outside memory and faults on first use.
    pub fn target_address(&self, inst: &Decoded) -> u32 {
        let field = inst.address_field();
        let flags = inst.flags;

        let base = if inst.format == Format::Four || flags.mode() == AddressingMode::Sic {
            field
        } else if flags.p() || flags.b() {
            inst.next_pc().wrapping_add_signed(sign_extend_disp(field))
        } else {
            field
        };

        if flags.x() {
            base.wrapping_add(self.regs.get(Reg::X) as u32)
        } else {
            base
        }
    }

    /// Resolves the address a store or jump uses: one extra memory hop for
    /// indirect addressing, the target address otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::SimError::OutOfRange`] if the indirect word is outside memory.
    pub fn effective_address(&self, inst: &Decoded, ta: u32) -> Result<u32> {
        match inst.flags.mode() {
            AddressingMode::Indirect => self.memory.read_word_unsigned(ta),
            AddressingMode::Simple | AddressingMode::Immediate | AddressingMode::Sic => Ok(ta),
        }
    }

    /// Fetches a word operand.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::SimError::OutOfRange`] if the operand is outside memory.
    pub fn load_word(&self, inst: &Decoded, ta: u32) -> Result<i32> {
        match inst.flags.mode() {
            AddressingMode::Immediate => Ok(inst.address_field() as i32),
            _ => self.memory.read_word(self.effective_address(inst, ta)?),
        }
    }

    /// Fetches a byte operand.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::SimError::OutOfRange`] if the operand is outside memory.
    pub fn load_byte(&self, inst: &Decoded, ta: u32) -> Result<u8> {
        match inst.flags.mode() {
            AddressingMode::Immediate => Ok((inst.address_field() & 0xFF) as u8),
            _ => self.memory.read_u8(self.effective_address(inst, ta)?),
        }
    }

    /// Stores a word at the effective address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::common::SimError::OutOfRange`] if the word is outside memory.
    pub fn store_word(&mut self, inst: &Decoded, ta: u32, value: i32) -> Result<()> {
        let addr = self.effective_address(inst, ta)?;
        self.memory.write_word(addr, value)
    }
}
