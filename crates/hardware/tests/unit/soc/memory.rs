//! Main Memory Unit Tests.
//!
//! Verifies bounds checking, word sign extension, half-byte fields and
//! hex dumps.

use pretty_assertions::assert_eq;

use sicsim_core::SimError;
use sicsim_core::common::{AccessType, MEMORY_SIZE};
use sicsim_core::soc::Memory;
use sicsim_core::soc::memory::buffer::MemoryBuffer;

// ══════════════════════════════════════════════════════════
// 1. Bounds
// ══════════════════════════════════════════════════════════

#[test]
fn memory_is_64k_and_zeroed() {
    let memory = Memory::new();
    assert_eq!(memory.size(), MEMORY_SIZE);
    assert_eq!(memory.read_bytes(0, 4).unwrap(), &[0, 0, 0, 0]);
    assert_eq!(memory.read_u8(0xFFFF).unwrap(), 0);
}

#[test]
fn read_past_end_is_out_of_range() {
    let memory = Memory::new();
    let err = memory.read_bytes(0xFFFE, 3).unwrap_err();
    assert!(matches!(
        err,
        SimError::OutOfRange {
            addr: 0xFFFE,
            len: 3,
            access: AccessType::Read
        }
    ));
    assert!(memory.read_u8(0x1_0000).is_err());
}

#[test]
fn failed_write_leaves_memory_untouched() {
    let mut memory = Memory::new();
    let err = memory.write_bytes(0xFFFE, &[1, 2, 3]).unwrap_err();
    assert!(matches!(
        err,
        SimError::OutOfRange {
            access: AccessType::Write,
            ..
        }
    ));
    assert_eq!(memory.read_bytes(0xFFFE, 2).unwrap(), &[0, 0]);
}

#[test]
fn huge_addresses_do_not_wrap() {
    let memory = Memory::new();
    assert!(memory.read_word(u32::MAX).is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Words
// ══════════════════════════════════════════════════════════

#[test]
fn words_are_big_endian() {
    let mut memory = Memory::new();
    memory.write_word(0x100, 0x12_3456).unwrap();
    assert_eq!(memory.read_bytes(0x100, 3).unwrap(), &[0x12, 0x34, 0x56]);
    assert_eq!(memory.read_word(0x100).unwrap(), 0x12_3456);
}

#[test]
fn words_sign_extend_from_24_bits() {
    let mut memory = Memory::new();
    memory.write_word(0x10, -2).unwrap();
    assert_eq!(memory.read_bytes(0x10, 3).unwrap(), &[0xFF, 0xFF, 0xFE]);
    assert_eq!(memory.read_word(0x10).unwrap(), -2);
    assert_eq!(memory.read_word_unsigned(0x10).unwrap(), 0xFF_FFFE);
}

// ══════════════════════════════════════════════════════════
// 3. Half-byte fields
// ══════════════════════════════════════════════════════════

#[test]
fn odd_field_starts_at_low_nibble() {
    let mut memory = Memory::new();
    memory.write_bytes(0x10, &[0x4B, 0x10, 0x00, 0x00]).unwrap();
    assert_eq!(memory.read_field(0x11, 5).unwrap(), 0);
    memory.write_field(0x11, 5, 0x0_1033).unwrap();
    assert_eq!(memory.read_bytes(0x10, 4).unwrap(), &[0x4B, 0x10, 0x10, 0x33]);
    assert_eq!(memory.read_field(0x11, 5).unwrap(), 0x0_1033);
}

#[test]
fn field_write_truncates_to_width() {
    let mut memory = Memory::new();
    memory.write_bytes(0x20, &[0xAB, 0xCD, 0xEF]).unwrap();
    memory.write_field(0x20, 6, 0x0123_4567).unwrap();
    assert_eq!(memory.read_bytes(0x20, 3).unwrap(), &[0x23, 0x45, 0x67]);
}

#[test]
fn hex_dump_is_upper_case() {
    let mut memory = Memory::new();
    memory.write_bytes(0x30, &[0x45, 0x4F, 0x46]).unwrap();
    assert_eq!(memory.hex_dump(0x30, 3).unwrap(), "454F46");
}

#[test]
fn clear_zeroes_everything() {
    let mut memory = Memory::new();
    memory.write_word(0x500, 7).unwrap();
    memory.clear();
    assert_eq!(memory, Memory::new());
}

// ══════════════════════════════════════════════════════════
// 4. Buffer
// ══════════════════════════════════════════════════════════

#[test]
fn buffer_range_checks() {
    let buf = MemoryBuffer::new(16);
    assert_eq!(buf.len(), 16);
    assert_eq!(buf.range(12, 4), Some(12..16));
    assert_eq!(buf.range(13, 4), None);
    assert_eq!(buf.range(usize::MAX, 2), None);
}
