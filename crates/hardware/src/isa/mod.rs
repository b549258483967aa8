//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the SIC/XE instruction kinds, the opcode catalog, instruction
//! encoding structures, the decoder and the disassembler.

/// Opcode-keyed instruction table loaded from a definition file.
pub mod catalog;

/// Instruction decoding for formats 1 through 4.
pub mod decode;

/// Instruction disassembler for tracing and frontends.
pub mod disasm;

/// Instruction formats, addressing flags and the decoded-instruction record.
pub mod instruction;

/// The closed set of SIC/XE mnemonics.
pub mod mnemonic;

pub use catalog::{CatalogEntry, InstructionCatalog};
pub use decode::decode;
pub use instruction::{AddressingMode, Decoded, Flags, Format, Operand};
pub use mnemonic::Mnemonic;
