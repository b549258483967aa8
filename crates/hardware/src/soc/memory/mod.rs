//! Simulated Main Memory.
//!
//! This module implements the byte-addressable 64 KiB address space. It provides:
//! 1. **Buffer:** Backing storage (`MemoryBuffer`) for the raw bytes.
//! 2. **Memory:** Bounds-checked byte, word and half-byte field access.
//! 3. **Observability:** Hex dumps in the same format object code uses.

/// Raw byte storage for the address space.
pub mod buffer;

use self::buffer::MemoryBuffer;
use crate::common::constants::{MEMORY_SIZE, WORD_MASK, WORD_SIZE};
use crate::common::hex;
use crate::common::{AccessType, Result, SimError};

/// The machine's main memory.
///
/// Every access is checked against the address space; an access that would
/// touch a byte at or past [`MEMORY_SIZE`] fails with [`SimError::OutOfRange`]
/// instead of wrapping or clamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    buffer: MemoryBuffer,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Creates a zeroed 64 KiB memory.
    pub fn new() -> Self {
        Self {
            buffer: MemoryBuffer::new(MEMORY_SIZE),
        }
    }

    /// Returns the size of the address space in bytes.
    pub const fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Zeroes every byte.
    pub fn clear(&mut self) {
        self.buffer.fill_zero();
    }

    fn checked(&self, addr: u32, len: usize, access: AccessType) -> Result<std::ops::Range<usize>> {
        self.buffer
            .range(addr as usize, len)
            .ok_or(SimError::OutOfRange { addr, len, access })
    }

    /// Reads `len` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the range leaves the address space.
    pub fn read_bytes(&self, addr: u32, len: usize) -> Result<&[u8]> {
        let range = self.checked(addr, len, AccessType::Read)?;
        Ok(self.buffer.slice(range))
    }

    /// Reads instruction bytes for the decoder. Identical to [`Self::read_bytes`]
    /// except that a fault is reported as a fetch.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the range leaves the address space.
    pub fn fetch_bytes(&self, addr: u32, len: usize) -> Result<&[u8]> {
        let range = self.checked(addr, len, AccessType::Fetch)?;
        Ok(self.buffer.slice(range))
    }

    /// Writes `data` starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the range leaves the address space;
    /// memory is left untouched in that case.
    pub fn write_bytes(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let range = self.checked(addr, data.len(), AccessType::Write)?;
        self.buffer.slice_mut(range).copy_from_slice(data);
        Ok(())
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if `addr` is outside memory.
    pub fn read_u8(&self, addr: u32) -> Result<u8> {
        Ok(self.read_bytes(addr, 1)?[0])
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if `addr` is outside memory.
    pub fn write_u8(&mut self, addr: u32, value: u8) -> Result<()> {
        self.write_bytes(addr, &[value])
    }

    /// Reads a 24-bit word as an unsigned value (used for addresses).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the word leaves the address space.
    pub fn read_word_unsigned(&self, addr: u32) -> Result<u32> {
        Ok(hex::bytes_to_int(self.read_bytes(addr, WORD_SIZE)?))
    }

    /// Reads a 24-bit word, sign-extended to register width.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the word leaves the address space.
    pub fn read_word(&self, addr: u32) -> Result<i32> {
        Ok(hex::sign_extend(self.read_word_unsigned(addr)?, 24))
    }

    /// Writes the low 24 bits of `value` as a big-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the word leaves the address space.
    pub fn write_word(&mut self, addr: u32, value: i32) -> Result<()> {
        let bytes = hex::int_to_bytes(value as u32 & WORD_MASK, WORD_SIZE);
        self.write_bytes(addr, &bytes)
    }

    /// Reads a field of `half_bytes` hex digits starting at `addr`.
    ///
    /// Fields are right-aligned on a byte boundary: an odd-length field begins
    /// at the low half of the byte at `addr`. A five half-byte field therefore
    /// covers the address part of a format 4 instruction whose flags nibble
    /// sits in the high half of `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the field leaves the address space.
    pub fn read_field(&self, addr: u32, half_bytes: u32) -> Result<u32> {
        let len = half_bytes.div_ceil(2) as usize;
        let raw = hex::bytes_to_int(self.read_bytes(addr, len)?);
        Ok(raw & field_mask(half_bytes))
    }

    /// Writes the low `half_bytes` hex digits of `value` into a field laid out
    /// as in [`Self::read_field`]. Digits outside the field are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the field leaves the address space.
    pub fn write_field(&mut self, addr: u32, half_bytes: u32, value: u32) -> Result<()> {
        let len = half_bytes.div_ceil(2) as usize;
        let mask = field_mask(half_bytes);
        let current = hex::bytes_to_int(self.read_bytes(addr, len)?);
        let merged = (current & !mask) | (value & mask);
        self.write_bytes(addr, &hex::int_to_bytes(merged, len))
    }

    /// Formats `len` bytes starting at `addr` as upper-case hex.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] if the range leaves the address space.
    pub fn hex_dump(&self, addr: u32, len: usize) -> Result<String> {
        Ok(hex::encode(self.read_bytes(addr, len)?))
    }
}

/// Mask covering the low `half_bytes` hex digits (at most eight).
const fn field_mask(half_bytes: u32) -> u32 {
    if half_bytes >= 8 {
        u32::MAX
    } else {
        (1u32 << (half_bytes * 4)) - 1
    }
}
