//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which owns the entire
//! machine state. It coordinates the following:
//! 1. **State Management:** Registers, the floating accumulator and the condition code.
//! 2. **Memory:** The 64 KiB byte-addressable main memory.
//! 3. **Devices:** The file-backed device gateway used by `RD`, `WD` and `TD`.
//! 4. **Observability:** The target address and device touched by the last instruction.

/// Instruction semantics for every mnemonic.
pub mod execution;

/// Target-address calculation and operand access.
pub mod memory;

use std::cmp::Ordering;
use std::fmt;

use crate::common::RegisterFile;
use crate::config::DeviceConfig;
use crate::soc::{DeviceGateway, Memory};

/// Outcome of the last comparison.
///
/// Before any comparison the code is `Greater`, so neither `JEQ` nor `JLT`
/// is taken by a program that branches without comparing first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConditionCode {
    /// First operand was smaller, or the tested device is ready.
    Less,
    /// Operands were equal, or the tested device is busy.
    Equal,
    /// First operand was larger.
    #[default]
    Greater,
}

impl From<Ordering> for ConditionCode {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Less => "<",
            Self::Equal => "=",
            Self::Greater => ">",
        })
    }
}

/// Machine state operated on by instruction semantics.
///
/// The CPU never decodes on its own; the simulator hands it decoded
/// instructions and writes the returned next PC back.
#[derive(Debug)]
pub struct Cpu {
    /// Integer registers and the floating accumulator.
    pub regs: RegisterFile,
    /// Condition code set by comparisons and `TD`.
    pub cc: ConditionCode,
    /// Main memory.
    pub memory: Memory,
    /// Device gateway.
    pub devices: DeviceGateway,
    /// Target address of the last format 3/4 instruction.
    pub last_target: Option<u32>,
    /// Name of the last device accessed.
    pub last_device: Option<String>,
}

impl Cpu {
    /// Creates a CPU with zeroed memory and registers.
    pub fn new(devices: &DeviceConfig) -> Self {
        Self {
            regs: RegisterFile::new(),
            cc: ConditionCode::default(),
            memory: Memory::new(),
            devices: DeviceGateway::new(devices),
            last_target: None,
            last_device: None,
        }
    }

    /// Closes devices and returns every piece of state to power-on values.
    pub fn reset(&mut self) {
        self.devices.close_all();
        self.regs.clear();
        self.cc = ConditionCode::default();
        self.memory.clear();
        self.last_target = None;
        self.last_device = None;
    }
}
