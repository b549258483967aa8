//! SIC/XE Instruction Decoder.
//!
//! Decodes the variable-length instruction at a given address:
//! 1. The first byte carries the 6-bit base opcode and the `n`, `i` flags.
//! 2. The catalog gives the nominal format of the opcode.
//! 3. Format 3/4 instructions take `x`, `b`, `p`, `e` from the high nibble of
//!    the second byte; `e` promotes the instruction to format 4.
//! 4. The remaining bits form the displacement (12 bits), address (20 bits),
//!    SIC address (15 bits) or register pair, depending on the format.

use crate::common::constants::{ADDR20_MASK, DISP_MASK, DISP_SIGN_LIMIT, OPCODE_MASK, SIC_ADDR_MASK};
use crate::common::{Result, SimError, hex};
use crate::isa::catalog::InstructionCatalog;
use crate::isa::instruction::{AddressingMode, Decoded, FLAG_X, Flags, Format, Operand};
use crate::soc::Memory;

/// Decodes the instruction stored at `addr`.
///
/// # Errors
///
/// Returns [`SimError::InvalidOpcode`] if the base opcode is not in the
/// catalog and [`SimError::OutOfRange`] if the instruction runs past the end
/// of memory.
pub fn decode(memory: &Memory, catalog: &InstructionCatalog, addr: u32) -> Result<Decoded> {
    let first = memory.fetch_bytes(addr, 1)?[0];
    let entry = catalog.lookup(first).ok_or(SimError::InvalidOpcode {
        opcode: first & OPCODE_MASK,
        addr,
    })?;

    let (format, flags, operand) = match entry.format {
        Format::One => (Format::One, Flags::default(), Operand::None),
        Format::Two => {
            let regs = memory.fetch_bytes(addr + 1, 1)?[0];
            (
                Format::Two,
                Flags::default(),
                Operand::Registers {
                    r1: regs >> 4,
                    r2: regs & 0x0F,
                },
            )
        }
        Format::Three | Format::Four => {
            let second = memory.fetch_bytes(addr + 1, 1)?[0];
            let flags = Flags::from_bytes(first, second);
            if flags.mode() == AddressingMode::Sic {
                let bytes = memory.fetch_bytes(addr, 3)?;
                let address = hex::bytes_to_int(&bytes[1..]) & SIC_ADDR_MASK;
                (Format::Three, Flags(flags.0 & FLAG_X), Operand::Address(address))
            } else if flags.e() {
                let bytes = memory.fetch_bytes(addr, 4)?;
                let address = hex::bytes_to_int(&bytes[1..]) & ADDR20_MASK;
                (Format::Four, flags, Operand::Address(address))
            } else {
                let bytes = memory.fetch_bytes(addr, 3)?;
                let disp = hex::bytes_to_int(&bytes[1..]) & DISP_MASK;
                (Format::Three, flags, Operand::Address(disp))
            }
        }
    };

    let bytes = memory.fetch_bytes(addr, format.len() as usize)?.to_vec();
    Ok(Decoded {
        addr,
        mnemonic: entry.mnemonic,
        format,
        flags,
        operand,
        bytes,
    })
}

/// Sign-extends a 12-bit format 3 displacement.
///
/// Only fields above `0x800` are negative: `0x801` is `-2047` and `0xFFF` is
/// `-1`, while `0x800` stays `+2048`.
#[inline]
pub const fn sign_extend_disp(disp: u32) -> i32 {
    let disp = disp & DISP_MASK;
    if disp > DISP_SIGN_LIMIT {
        disp as i32 - (DISP_MASK as i32 + 1)
    } else {
        disp as i32
    }
}
