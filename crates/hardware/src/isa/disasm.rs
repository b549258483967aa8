//! Instruction Disassembler for SIC/XE.
//!
//! Converts a decoded instruction into assembler-style text for trace output
//! and frontends.
//!
//! # Usage
//!
//! ```ignore
//! let text = disassemble(&decoded); // e.g. "+JSUB 1036" or "LDCH 0033,X"
//! ```
//!
//! Relative targets (`p` or `b` set) are resolved to absolute addresses.
//! Immediate operands print the raw field, since that is the operand value.

use crate::common::Reg;
use crate::isa::decode::sign_extend_disp;
use crate::isa::instruction::{AddressingMode, Decoded, Format};
use crate::isa::mnemonic::Mnemonic;

/// Returns the assembler name of a register number, or `r?` for unassigned numbers.
fn reg_name(number: u8) -> String {
    Reg::from_number(number).map_or_else(|_| format!("r{number}"), |r| r.name().to_owned())
}

/// Disassembles a decoded instruction.
pub fn disassemble(inst: &Decoded) -> String {
    match inst.format {
        Format::One => inst.mnemonic.to_string(),
        Format::Two => disassemble_registers(inst),
        Format::Three | Format::Four => disassemble_memory(inst),
    }
}

fn disassemble_registers(inst: &Decoded) -> String {
    let (r1, r2) = inst.registers();
    match inst.mnemonic {
        Mnemonic::Clear | Mnemonic::Tixr => format!("{} {}", inst.mnemonic, reg_name(r1)),
        Mnemonic::Svc => format!("{} {r1}", inst.mnemonic),
        Mnemonic::Shiftl | Mnemonic::Shiftr => {
            format!("{} {},{}", inst.mnemonic, reg_name(r1), u32::from(r2) + 1)
        }
        _ => format!("{} {},{}", inst.mnemonic, reg_name(r1), reg_name(r2)),
    }
}

fn disassemble_memory(inst: &Decoded) -> String {
    let prefix = if inst.format == Format::Four { "+" } else { "" };
    if inst.mnemonic == Mnemonic::Rsub {
        return format!("{prefix}{}", inst.mnemonic);
    }

    let flags = inst.flags;
    let field = inst.address_field();
    let sigil = match flags.mode() {
        AddressingMode::Immediate => "#",
        AddressingMode::Indirect => "@",
        AddressingMode::Simple | AddressingMode::Sic => "",
    };

    let target = if inst.format == Format::Four || flags.mode() == AddressingMode::Sic {
        format!("{field:04X}")
    } else if flags.mode() == AddressingMode::Immediate {
        field.to_string()
    } else if flags.p() || flags.b() {
        let ta = inst.next_pc() as i32 + sign_extend_disp(field);
        format!("{:04X}", ta as u32 & 0xFFFF)
    } else {
        format!("{field:04X}")
    };

    let index = if flags.x() { ",X" } else { "" };
    format!("{prefix}{} {sigil}{target}{index}", inst.mnemonic)
}
