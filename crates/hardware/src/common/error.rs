//! Emulator error definitions.
//!
//! This module defines the single error type shared by every component of the emulator. It covers:
//! 1. **Load Failures:** Malformed object-code records and symbol-table violations.
//! 2. **Execution Faults:** Undecodable opcodes, out-of-range accesses and unsupported instructions.
//! 3. **Environment Failures:** Device files, catalog definitions and configuration input.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::data::AccessType;

/// Errors raised while loading or executing a SIC/XE program.
///
/// Every variant is surfaced to the caller; the engine never continues past a
/// condition it cannot give architectural meaning to. The only locally
/// recovered condition (device end-of-stream) never reaches this type.
#[derive(Debug, Error)]
pub enum SimError {
    /// An object-code record is malformed or truncated.
    #[error("parse error on line {line}: {reason}: {record:?}")]
    Parse {
        /// 1-based line number within the object program.
        line: usize,
        /// The offending record text.
        record: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A symbol was defined twice within one linked program.
    #[error("duplicate symbol `{0}`")]
    DuplicateSymbol(String),

    /// A relocation or external reference names a symbol no section defines.
    #[error("unresolved symbol `{0}`")]
    UnresolvedSymbol(String),

    /// A redefinition targets a symbol that was never defined.
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// The fetched opcode is not present in the instruction catalog.
    #[error("invalid opcode {opcode:#04X} at {addr:06X}")]
    InvalidOpcode {
        /// Base opcode (top six bits of the first byte, low bits cleared).
        opcode: u8,
        /// Address of the instruction.
        addr: u32,
    },

    /// A memory access fell outside the 64 KiB address space.
    #[error("{access} of {len} byte(s) at {addr:#X} is outside memory")]
    OutOfRange {
        /// Start address of the access.
        addr: u32,
        /// Length of the access in bytes.
        len: usize,
        /// Kind of access that faulted.
        access: AccessType,
    },

    /// A register number does not name an architectural register.
    #[error("invalid register number {0}")]
    InvalidRegister(u8),

    /// The backing resource of a device could not be opened or written.
    #[error("device `{name}`: {source}")]
    Device {
        /// Device name, e.g. `F1`.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An instruction-catalog definition line is malformed.
    #[error("instruction catalog line {line}: {reason}")]
    Catalog {
        /// 1-based line number within the definition file.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The instruction decodes but has no defined behavior in this emulator.
    #[error("unsupported instruction {mnemonic} at {addr:06X}")]
    Unsupported {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Address of the instruction.
        addr: u32,
    },

    /// Integer division with a zero divisor.
    #[error("division by zero at {0:06X}")]
    DivideByZero(u32),

    /// `step` was called before a program was loaded.
    #[error("no program loaded")]
    NotLoaded,

    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimError {
    /// Builds a [`SimError::Parse`] for the given record.
    pub fn parse(line: usize, record: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            record: record.to_owned(),
            reason: reason.into(),
        }
    }

    /// Builds a [`SimError::Catalog`] for the given definition line.
    pub fn catalog(line: usize, reason: impl Into<String>) -> Self {
        Self::Catalog {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
