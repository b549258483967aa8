//! Instruction Decode Properties.
//!
//! Verifies that `decode()` picks the right format, extracts `nixbpe`, the
//! register nibbles and the address field, and that displacements
//! sign-extend on bit 11.
//!
//! # Coverage Matrix
//!
//! - Format 1: `FIX`
//! - Format 2: `CLEAR`, `COMPR`
//! - Format 3: PC-relative, base-relative, direct, immediate, indirect, indexed
//! - Format 4: `+JSUB`
//! - SIC:      15-bit direct address with `x`

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::InstructionBuilder;
use sicsim_core::SimError;
use sicsim_core::common::{AccessType, Reg};
use sicsim_core::isa::decode::sign_extend_disp;
use sicsim_core::isa::{AddressingMode, Flags, Format, InstructionCatalog, Mnemonic, Operand, decode};
use sicsim_core::soc::Memory;

fn decode_at(addr: u32, bytes: &[u8]) -> sicsim_core::common::Result<sicsim_core::isa::Decoded> {
    let mut memory = Memory::new();
    memory.write_bytes(addr, bytes).unwrap();
    decode(&memory, &InstructionCatalog::builtin().unwrap(), addr)
}

#[test]
fn format_one_is_a_single_byte() {
    let inst = decode_at(0x100, &[0xC4, 0xFF]).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Fix);
    assert_eq!(inst.format, Format::One);
    assert_eq!(inst.operand, Operand::None);
    assert_eq!(inst.bytes, vec![0xC4]);
    assert_eq!(inst.next_pc(), 0x101);
}

#[test]
fn format_two_carries_register_nibbles() {
    let bytes = InstructionBuilder::new(Mnemonic::Compr).regs(Reg::A, Reg::S).build();
    assert_eq!(bytes, vec![0xA0, 0x04]);
    let inst = decode_at(0x1000, &bytes).unwrap();
    assert_eq!(inst.format, Format::Two);
    assert_eq!(inst.operand, Operand::Registers { r1: 0, r2: 4 });
    assert_eq!(inst.flags, Flags::default());
    assert_eq!(inst.next_pc(), 0x1002);
}

#[test]
fn clear_a_decodes_from_b400() {
    let inst = decode_at(0x1000, &[0xB4, 0x00]).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Clear);
    assert_eq!(inst.registers(), (0, 0));
    assert_eq!(inst.object_code(), "B400");
}

#[test]
fn format_three_pc_relative() {
    // LDA RETADR from the classic COPY program
    let inst = decode_at(0, &[0x03, 0x20, 0x2D]).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Lda);
    assert_eq!(inst.format, Format::Three);
    assert_eq!(inst.flags.to_string(), "ni--p-");
    assert_eq!(inst.flags.mode(), AddressingMode::Simple);
    assert_eq!(inst.operand, Operand::Address(0x02D));
}

#[test]
fn extended_flag_promotes_to_format_four() {
    let inst = decode_at(0x0003, &[0x4B, 0x10, 0x10, 0x33]).unwrap();
    assert_eq!(inst.mnemonic, Mnemonic::Jsub);
    assert_eq!(inst.format, Format::Four);
    assert!(inst.flags.e());
    assert_eq!(inst.address_field(), 0x01033);
    assert_eq!(inst.next_pc(), 0x0007);
}

#[test]
fn sic_encoding_uses_fifteen_bit_address() {
    let bytes = InstructionBuilder::new(Mnemonic::Lda).sic(0x1033).indexed().build();
    assert_eq!(bytes, vec![0x00, 0x90, 0x33]);
    let inst = decode_at(0x2000, &bytes).unwrap();
    assert_eq!(inst.flags.mode(), AddressingMode::Sic);
    assert!(inst.flags.x());
    assert!(!inst.flags.b() && !inst.flags.p() && !inst.flags.e());
    assert_eq!(inst.address_field(), 0x1033);
    assert_eq!(inst.format, Format::Three);
}

#[rstest]
#[case::immediate(InstructionBuilder::new(Mnemonic::Comp).immediate().direct(5), AddressingMode::Immediate)]
#[case::indirect(InstructionBuilder::new(Mnemonic::J).indirect().pc_relative(3), AddressingMode::Indirect)]
#[case::simple(InstructionBuilder::new(Mnemonic::Sta).pc_relative(-6), AddressingMode::Simple)]
fn ni_bits_select_addressing_mode(#[case] builder: InstructionBuilder, #[case] mode: AddressingMode) {
    let inst = decode_at(0x1000, &builder.build()).unwrap();
    assert_eq!(inst.flags.mode(), mode);
}

#[test]
fn base_relative_keeps_raw_displacement() {
    let bytes = InstructionBuilder::new(Mnemonic::Stch).base_relative(0x7FF).indexed().build();
    let inst = decode_at(0x1000, &bytes).unwrap();
    assert!(inst.flags.b() && inst.flags.x());
    assert_eq!(inst.address_field(), 0x7FF);
}

#[test]
fn unknown_opcode_is_reported_with_address() {
    let err = decode_at(0x1234, &[0xFC, 0x00, 0x00]).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidOpcode {
            opcode: 0xFC,
            addr: 0x1234
        }
    ));
}

#[test]
fn instruction_running_off_memory_faults_as_fetch() {
    let mut memory = Memory::new();
    memory.write_u8(0xFFFF, 0x03).unwrap();
    let err = decode(&memory, &InstructionCatalog::builtin().unwrap(), 0xFFFF).unwrap_err();
    assert!(matches!(
        err,
        SimError::OutOfRange {
            access: AccessType::Fetch,
            ..
        }
    ));
}

#[rstest]
#[case(0x000, 0)]
#[case(0x7FF, 2047)]
#[case(0x800, 2048)]
#[case(0x801, -2047)]
#[case(0xFFA, -6)]
#[case(0xFFF, -1)]
fn displacement_sign_extension(#[case] field: u32, #[case] expected: i32) {
    assert_eq!(sign_extend_disp(field), expected);
}

proptest! {
    #[test]
    fn only_fields_above_0x800_are_negative(field in 0u32..0x1000) {
        let expected = if field <= 0x800 { field as i32 } else { field as i32 - 0x1000 };
        prop_assert_eq!(sign_extend_disp(field), expected);
    }

    #[test]
    fn format_three_field_round_trips(field in 0u32..0x1000, x in any::<bool>()) {
        let mut builder = InstructionBuilder::new(Mnemonic::Lda).pc_field(field);
        if x {
            builder = builder.indexed();
        }
        let inst = decode_at(0x4000, &builder.build()).unwrap();
        prop_assert_eq!(inst.address_field(), field);
        prop_assert_eq!(inst.flags.x(), x);
        prop_assert!(inst.flags.p());
        prop_assert_eq!(inst.format, Format::Three);
    }

    #[test]
    fn format_four_address_round_trips(addr in 0u32..0x10_0000) {
        let bytes = InstructionBuilder::new(Mnemonic::Jsub).extended(addr).build();
        let inst = decode_at(0x100, &bytes).unwrap();
        prop_assert_eq!(inst.format, Format::Four);
        prop_assert_eq!(inst.address_field(), addr);
    }
}
