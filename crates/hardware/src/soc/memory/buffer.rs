//! Memory Buffer Implementation.
//!
//! Owns the raw bytes of the simulated address space. Range validation is the
//! caller's job; this type only answers "is this range inside the buffer" and
//! hands out slices for ranges that are.

use std::ops::Range;

/// Zero-initialised, fixed-size byte storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryBuffer {
    bytes: Box<[u8]>,
}

impl MemoryBuffer {
    /// Creates a zeroed buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size].into_boxed_slice(),
        }
    }

    /// Returns the size of the buffer in bytes.
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the byte range `[offset, offset + len)` if it lies inside the buffer.
    pub fn range(&self, offset: usize, len: usize) -> Option<Range<usize>> {
        let end = offset.checked_add(len)?;
        (end <= self.bytes.len()).then_some(offset..end)
    }

    /// Borrows an in-bounds range.
    pub fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.bytes[range]
    }

    /// Mutably borrows an in-bounds range.
    pub fn slice_mut(&mut self, range: Range<usize>) -> &mut [u8] {
        &mut self.bytes[range]
    }

    /// Zeroes the whole buffer.
    pub fn fill_zero(&mut self) {
        self.bytes.fill(0);
    }
}
