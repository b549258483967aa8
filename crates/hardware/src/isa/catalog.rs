//! Instruction Catalog.
//!
//! The catalog maps base opcodes to `{mnemonic, format, operand count}`. It is
//! parsed once from a tab-separated definition file with one line per
//! instruction:
//!
//! ```text
//! LDA	3	00	1
//! CLEAR	2	B4	1
//! ```
//!
//! Fields are the mnemonic, the nominal format (`1`, `2` or `3`, where `3`
//! means "3 or 4"), the opcode in hex and the operand count. The catalog is
//! read-only once built.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::common::constants::OPCODE_MASK;
use crate::common::{Result, SimError};
use crate::isa::instruction::Format;
use crate::isa::mnemonic::Mnemonic;

/// Built-in definition file.
const BUILTIN_DEFINITIONS: &str = include_str!("../../data/inst.data");

/// One catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Instruction kind.
    pub mnemonic: Mnemonic,
    /// Base opcode (low two bits clear).
    pub opcode: u8,
    /// Nominal format; [`Format::Three`] stands for "3 or 4".
    pub format: Format,
    /// Number of assembler operands.
    pub operands: u8,
}

/// Opcode-keyed instruction table.
#[derive(Clone, Debug, Default)]
pub struct InstructionCatalog {
    by_opcode: HashMap<u8, CatalogEntry>,
}

impl InstructionCatalog {
    /// Returns the catalog built from the bundled definition file.
    ///
    /// # Errors
    ///
    /// Never fails for the bundled file; the `Result` mirrors [`Self::parse`].
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_DEFINITIONS)
    }

    /// Reads and parses a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Catalog`] for any malformed line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses definition text. Blank lines are skipped; anything else that is
    /// not a well-formed definition is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Catalog`] for a wrong field count, an unknown
    /// mnemonic, a bad format, opcode or operand count, or a repeated opcode.
    pub fn parse(text: &str) -> Result<Self> {
        let mut by_opcode = HashMap::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let entry = parse_line(line, raw)?;
            if by_opcode.insert(entry.opcode, entry).is_some() {
                return Err(SimError::catalog(
                    line,
                    format!("opcode {:02X} defined twice", entry.opcode),
                ));
            }
        }
        Ok(Self { by_opcode })
    }

    /// Looks up an opcode. The low two bits (`n`, `i`) are ignored.
    pub fn lookup(&self, opcode: u8) -> Option<&CatalogEntry> {
        self.by_opcode.get(&(opcode & OPCODE_MASK))
    }

    /// Finds the entry for a mnemonic.
    pub fn by_mnemonic(&self, mnemonic: Mnemonic) -> Option<&CatalogEntry> {
        self.by_opcode.values().find(|e| e.mnemonic == mnemonic)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.by_opcode.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_opcode.is_empty()
    }

    /// Iterates over entries in opcode order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        let mut entries: Vec<_> = self.by_opcode.values().collect();
        entries.sort_by_key(|e| e.opcode);
        entries.into_iter()
    }
}

fn parse_line(line: usize, raw: &str) -> Result<CatalogEntry> {
    let fields: Vec<&str> = raw.trim_end_matches('\r').split('\t').collect();
    let [name, format, opcode, operands] = fields.as_slice() else {
        return Err(SimError::catalog(
            line,
            format!("expected 4 tab-separated fields, found {}", fields.len()),
        ));
    };

    let mnemonic: Mnemonic = name
        .trim()
        .parse()
        .map_err(|e| SimError::catalog(line, format!("{e}")))?;
    let format = match format.trim() {
        "1" => Format::One,
        "2" => Format::Two,
        "3" | "3/4" => Format::Three,
        other => return Err(SimError::catalog(line, format!("bad format `{other}`"))),
    };
    let opcode = u8::from_str_radix(opcode.trim(), 16)
        .map_err(|_| SimError::catalog(line, format!("bad opcode `{}`", opcode.trim())))?;
    if opcode & !OPCODE_MASK != 0 {
        return Err(SimError::catalog(
            line,
            format!("opcode {opcode:02X} has low bits set"),
        ));
    }
    let operands = operands
        .trim()
        .parse()
        .map_err(|_| SimError::catalog(line, format!("bad operand count `{}`", operands.trim())))?;

    Ok(CatalogEntry {
        mnemonic,
        opcode,
        format,
        operands,
    })
}
