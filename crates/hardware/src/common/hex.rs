//! Hexadecimal interchange helpers.
//!
//! Object-code records, instruction text and register displays all use
//! upper-case, zero-padded hex. Big-endian byte order matches the layout of
//! SIC/XE words in memory.

use std::fmt::Write;

/// Encodes bytes as upper-case hex, two digits per byte.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Decodes an even-length hex string into bytes. Either case is accepted.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

/// Parses a fixed-width hex field. Signs, prefixes and whitespace are rejected.
pub fn parse_field(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(text, 16).ok()
}

/// Interprets up to four bytes as a big-endian unsigned integer.
pub fn bytes_to_int(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}

/// Emits the low `len` bytes of `value` in big-endian order.
pub fn int_to_bytes(value: u32, len: usize) -> Vec<u8> {
    (0..len)
        .rev()
        .map(|i| if i < 4 { (value >> (i * 8)) as u8 } else { 0 })
        .collect()
}

/// Sign-extends the low `bits` bits of `value`.
#[inline]
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}
