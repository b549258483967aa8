//! Object-Program Loader and Linker.
//!
//! This module turns linked SIC/XE object code into a memory image. It performs:
//! 1. **Record parsing:** Fixed-column `H`, `D`, `R`, `T`, `M` and `E` records.
//! 2. **Placement:** Each control section is placed after the previous one; its
//!    header, text and modification addresses are offset by the cumulative
//!    length of the sections before it. Exported symbols are already absolute.
//! 3. **Linking:** Section names and exported symbols go into one symbol table;
//!    modification records are applied only after every section is in memory,
//!    because a record may reference a symbol defined by a later section.
//!
//! Loading builds a fresh image and never touches the caller's state, so a
//! failed load leaves nothing half-installed.

use tracing::{debug, info, trace};

use crate::common::{MEMORY_SIZE, Result, SimError, hex};
use crate::sim::symtab::SymbolTable;
use crate::soc::Memory;

/// Width of a name field in `H`, `D`, `R` and `M` records.
const NAME_WIDTH: usize = 6;
/// Width of an address or length field.
const ADDR_WIDTH: usize = 6;
/// Width of one `D` record entry (name + address).
const DEFINE_ENTRY_WIDTH: usize = NAME_WIDTH + ADDR_WIDTH;
/// Length of a complete header record.
const HEADER_LEN: usize = 1 + NAME_WIDTH + 2 * ADDR_WIDTH;
/// Largest modification field in half-bytes.
const MAX_MODIFY_HALF_BYTES: u32 = 8;

/// Direction of a relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    /// Add the symbol's address.
    Plus,
    /// Subtract the symbol's address.
    Minus,
}

/// One parsed object-code record. Addresses are as written in the record,
/// before the section offset is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// `H`: start of a control section.
    Header {
        /// Section name.
        name: String,
        /// Start address as assembled.
        start: u32,
        /// Section length in bytes.
        length: u32,
    },
    /// `D`: symbols exported by the section, at absolute addresses.
    Define(Vec<(String, u32)>),
    /// `R`: symbols the section imports.
    Refer(Vec<String>),
    /// `T`: bytes to place in memory.
    Text {
        /// Address of the first byte.
        start: u32,
        /// Payload.
        bytes: Vec<u8>,
    },
    /// `M`: a deferred relocation.
    Modify {
        /// Address of the byte holding the first half-byte of the field.
        addr: u32,
        /// Field width in half-bytes.
        half_bytes: u32,
        /// Add or subtract.
        sign: Sign,
        /// Symbol whose address is applied; `None` means the section's own start.
        symbol: Option<String>,
    },
    /// `E`: end of the section, optionally naming the first instruction.
    End {
        /// Absolute address of the first instruction.
        first_instruction: Option<u32>,
    },
}

/// A control section as placed in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlSection {
    /// Section name.
    pub name: String,
    /// Absolute start address.
    pub start: u32,
    /// Length in bytes.
    pub length: u32,
    /// External symbols named by the section's `R` records.
    pub references: Vec<String>,
}

/// Metadata describing a loaded program, for frontends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramInfo {
    /// Name of the first control section.
    pub name: String,
    /// Absolute start address of the first control section.
    pub start_address: u32,
    /// Sum of all section lengths.
    pub length: u32,
    /// Address execution begins at.
    pub first_instruction: u32,
    /// Every section in load order.
    pub sections: Vec<ControlSection>,
}

/// The result of a successful load.
#[derive(Clone, Debug)]
pub struct LoadedProgram {
    /// Memory image with all text placed and relocations applied.
    pub memory: Memory,
    /// Section names and exported symbols.
    pub symbols: SymbolTable,
    /// Program metadata.
    pub info: ProgramInfo,
}

/// A relocation waiting for the linking pass.
#[derive(Debug)]
struct PendingModify {
    line: usize,
    addr: u32,
    half_bytes: u32,
    sign: Sign,
    symbol: String,
}

/// Reads fixed-column fields out of one record line.
struct Fields<'a> {
    line: usize,
    text: &'a str,
}

impl<'a> Fields<'a> {
    fn error(&self, reason: impl Into<String>) -> SimError {
        SimError::parse(self.line, self.text, reason)
    }

    fn str(&self, from: usize, len: usize, what: &str) -> Result<&'a str> {
        self.text
            .get(from..from + len)
            .ok_or_else(|| self.error(format!("record too short for {what}")))
    }

    fn name(&self, from: usize, what: &str) -> Result<String> {
        let name = self.str(from, NAME_WIDTH, what)?.trim_end();
        if name.is_empty() {
            return Err(self.error(format!("{what} is blank")));
        }
        Ok(name.to_owned())
    }

    fn hex(&self, from: usize, len: usize, what: &str) -> Result<u32> {
        let raw = self.str(from, len, what)?;
        hex::parse_field(raw).ok_or_else(|| self.error(format!("{what} `{raw}` is not hex")))
    }
}

/// Parses one record. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`SimError::Parse`] for an unknown record type or any missing,
/// malformed or inconsistent field.
pub fn parse_record(line: usize, text: &str) -> Result<Option<Record>> {
    let text = text.trim_end();
    if text.is_empty() {
        return Ok(None);
    }
    let f = Fields { line, text };
    if !text.is_ascii() {
        return Err(f.error("record contains non-ASCII characters"));
    }

    let record = match text.as_bytes()[0] {
        b'H' => {
            if text.len() != HEADER_LEN {
                return Err(f.error(format!("header record must be {HEADER_LEN} characters")));
            }
            Record::Header {
                name: f.name(1, "section name")?,
                start: f.hex(7, ADDR_WIDTH, "start address")?,
                length: f.hex(13, ADDR_WIDTH, "section length")?,
            }
        }
        b'D' => {
            let body = text.len() - 1;
            if body % DEFINE_ENTRY_WIDTH != 0 {
                return Err(f.error("define record entries must be 12 characters each"));
            }
            let mut symbols = Vec::with_capacity(body / DEFINE_ENTRY_WIDTH);
            for i in 0..body / DEFINE_ENTRY_WIDTH {
                let at = 1 + i * DEFINE_ENTRY_WIDTH;
                let name = f.name(at, "symbol name")?;
                let addr = f.hex(at + NAME_WIDTH, ADDR_WIDTH, "symbol address")?;
                symbols.push((name, addr));
            }
            Record::Define(symbols)
        }
        b'R' => Record::Refer(
            text.as_bytes()[1..]
                .chunks(NAME_WIDTH)
                .filter_map(|chunk| {
                    let name = std::str::from_utf8(chunk).ok()?.trim();
                    (!name.is_empty()).then(|| name.to_owned())
                })
                .collect(),
        ),
        b'T' => {
            let start = f.hex(1, ADDR_WIDTH, "text start address")?;
            let count = f.hex(7, 2, "text length")? as usize;
            let payload = &text[9..];
            if payload.len() != count * 2 {
                return Err(f.error(format!(
                    "text payload has {} hex digits, length field says {}",
                    payload.len(),
                    count * 2
                )));
            }
            let bytes = hex::decode(payload).ok_or_else(|| f.error("text payload is not hex"))?;
            Record::Text { start, bytes }
        }
        b'M' => {
            let addr = f.hex(1, ADDR_WIDTH, "modification address")?;
            let half_bytes = f.hex(7, 2, "modification length")?;
            if half_bytes == 0 || half_bytes > MAX_MODIFY_HALF_BYTES {
                return Err(f.error(format!("modification length {half_bytes} out of range")));
            }
            let (sign, symbol) = match text.get(9..) {
                None | Some("") => (Sign::Plus, None),
                Some(rest) => {
                    let sign = match rest.as_bytes()[0] {
                        b'+' => Sign::Plus,
                        b'-' => Sign::Minus,
                        _ => return Err(f.error("modification sign must be `+` or `-`")),
                    };
                    let symbol = rest[1..].trim();
                    if symbol.is_empty() {
                        return Err(f.error("modification symbol is blank"));
                    }
                    (sign, Some(symbol.to_owned()))
                }
            };
            Record::Modify {
                addr,
                half_bytes,
                sign,
                symbol,
            }
        }
        b'E' => {
            let first_instruction = if text.len() == 1 {
                None
            } else if text.len() == 1 + ADDR_WIDTH {
                Some(f.hex(1, ADDR_WIDTH, "first instruction address")?)
            } else {
                return Err(f.error("end record address must be 6 hex digits"));
            };
            Record::End { first_instruction }
        }
        other => {
            return Err(f.error(format!("unknown record type `{}`", other as char)));
        }
    };
    Ok(Some(record))
}

/// Section currently being read.
#[derive(Debug)]
struct OpenSection {
    section: ControlSection,
    header_line: usize,
}

/// Loads a linked object program into a fresh memory image.
///
/// # Errors
///
/// Returns [`SimError::Parse`] for malformed records, records outside a
/// control section or a missing end record; [`SimError::DuplicateSymbol`]
/// when two sections define the same name; [`SimError::UnresolvedSymbol`]
/// when a reference or modification names an undefined symbol; and
/// [`SimError::OutOfRange`] when text or a relocation falls outside memory.
pub fn load(source: &str) -> Result<LoadedProgram> {
    let mut memory = Memory::new();
    let mut symbols = SymbolTable::new();
    let mut sections: Vec<ControlSection> = Vec::new();
    let mut pending: Vec<PendingModify> = Vec::new();
    let mut open: Option<OpenSection> = None;
    let mut offset: u32 = 0;
    let mut first_instruction: Option<u32> = None;
    let mut last_line = 0;

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        last_line = line;
        let Some(record) = parse_record(line, text)? else {
            continue;
        };

        if let Record::Header {
            name,
            start,
            length,
        } = record
        {
            if let Some(prev) = &open {
                return Err(SimError::parse(
                    line,
                    text,
                    format!(
                        "section `{}` (line {}) has no end record",
                        prev.section.name, prev.header_line
                    ),
                ));
            }
            let absolute = start
                .checked_add(offset)
                .filter(|abs| abs.checked_add(length).is_some_and(|end| end as usize <= MEMORY_SIZE))
                .ok_or_else(|| SimError::parse(line, text, "section offset overflows address space"))?;
            symbols.define(&name, absolute)?;
            debug!(section = %name, start = format_args!("{absolute:06X}"), length = format_args!("{length:06X}"), "control section");
            open = Some(OpenSection {
                section: ControlSection {
                    name,
                    start: absolute,
                    length,
                    references: Vec::new(),
                },
                header_line: line,
            });
            continue;
        }

        let Some(current) = open.as_mut() else {
            return Err(SimError::parse(line, text, "record outside a control section"));
        };

        match record {
            Record::Header { .. } => {}
            Record::Define(entries) => {
                for (name, addr) in entries {
                    symbols.define(&name, addr)?;
                }
            }
            Record::Refer(names) => current.section.references.extend(names),
            Record::Text { start, bytes } => {
                let at = start + offset;
                trace!(addr = format_args!("{at:06X}"), len = bytes.len(), "text");
                memory.write_bytes(at, &bytes)?;
            }
            Record::Modify {
                addr,
                half_bytes,
                sign,
                symbol,
            } => pending.push(PendingModify {
                line,
                addr: addr + offset,
                half_bytes,
                sign,
                symbol: symbol.unwrap_or_else(|| current.section.name.clone()),
            }),
            Record::End {
                first_instruction: first,
            } => {
                if first_instruction.is_none() {
                    first_instruction = first;
                }
                offset += current.section.length;
                if let Some(done) = open.take() {
                    sections.push(done.section);
                }
            }
        }
    }

    if let Some(unterminated) = open {
        return Err(SimError::parse(
            last_line,
            "",
            format!("section `{}` has no end record", unterminated.section.name),
        ));
    }
    let Some(first_section) = sections.first() else {
        return Err(SimError::parse(last_line, "", "object program has no control section"));
    };

    for section in &sections {
        for name in &section.references {
            let _ = symbols.resolve(name)?;
        }
    }

    for m in &pending {
        let value = symbols.resolve(&m.symbol)?;
        let current = memory.read_field(m.addr, m.half_bytes)?;
        let updated = match m.sign {
            Sign::Plus => current.wrapping_add(value),
            Sign::Minus => current.wrapping_sub(value),
        };
        memory.write_field(m.addr, m.half_bytes, updated)?;
        trace!(
            line = m.line,
            addr = format_args!("{:06X}", m.addr),
            symbol = %m.symbol,
            before = format_args!("{current:X}"),
            after = format_args!("{updated:X}"),
            "relocation"
        );
    }

    let info = ProgramInfo {
        name: first_section.name.clone(),
        start_address: first_section.start,
        length: sections.iter().map(|s| s.length).sum(),
        first_instruction: first_instruction.unwrap_or(first_section.start),
        sections,
    };
    info!(
        program = %info.name,
        sections = info.sections.len(),
        relocations = pending.len(),
        first = format_args!("{:06X}", info.first_instruction),
        "object program loaded"
    );

    Ok(LoadedProgram {
        memory,
        symbols,
        info,
    })
}
