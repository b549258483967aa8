//! Common utilities and types used throughout the SIC/XE emulator.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Address-space size, word width and instruction field masks.
//! 2. **Memory Access:** Classification of fetch/read/write accesses.
//! 3. **Error Handling:** The crate-wide [`SimError`] type and [`Result`] alias.
//! 4. **Register Management:** The register file and architectural register names.

/// Common constants used throughout the emulator.
pub mod constants;

/// Hexadecimal encoding and word conversion helpers.
pub mod hex;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use constants::{MEMORY_SIZE, TERMINATION_ADDRESS, WORD_SIZE};
pub use data::AccessType;
pub use error::{Result, SimError};
pub use reg::{Reg, RegisterFile};
