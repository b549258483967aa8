//! Simulator: owns the CPU, the instruction catalog and the loaded program.
//!
//! This is the command surface every frontend drives: `load`, `step`, `run`,
//! `reset` and `shutdown`, plus read-only snapshots of the machine after
//! each step. Nothing here assumes a particular caller cadence.

use std::fs;
use std::path::Path;

use tracing::{error, info, trace};

use crate::common::{RegisterFile, Result, SimError, TERMINATION_ADDRESS};
use crate::config::Config;
use crate::core::{ConditionCode, Cpu};
use crate::isa::disasm::disassemble;
use crate::isa::{Decoded, InstructionCatalog, Mnemonic, decode};
use crate::sim::loader::{self, ProgramInfo};
use crate::sim::symtab::SymbolTable;
use crate::soc::Memory;

/// Lifecycle of the loaded program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Nothing loaded; `step` fails with [`SimError::NotLoaded`].
    Unloaded,
    /// Loaded and able to execute.
    Running,
    /// Control reached the termination address.
    Finished,
    /// An instruction failed; state is kept for inspection.
    Faulted,
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    cpu: Cpu,
    catalog: InstructionCatalog,
    symbols: SymbolTable,
    program: Option<ProgramInfo>,
    log: Vec<Mnemonic>,
    current: Option<Decoded>,
    state: RunState,
}

impl Simulator {
    /// Creates a simulator from a configuration.
    ///
    /// The instruction catalog is read from `config.catalog.path` when set and
    /// the built-in definitions are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] or [`SimError::Catalog`] if the catalog cannot be loaded.
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => InstructionCatalog::from_file(path)?,
            None => InstructionCatalog::builtin()?,
        };
        Ok(Self::with_catalog(config, catalog))
    }

    /// Creates a simulator around an already loaded catalog.
    pub fn with_catalog(config: &Config, catalog: InstructionCatalog) -> Self {
        Self {
            cpu: Cpu::new(&config.devices),
            catalog,
            symbols: SymbolTable::new(),
            program: None,
            log: Vec::new(),
            current: None,
            state: RunState::Unloaded,
        }
    }

    /// Resets the machine and loads an object program.
    ///
    /// On success `PC` holds the program's first instruction. On failure the
    /// simulator stays reset and unloaded.
    ///
    /// # Errors
    ///
    /// Any loader error: [`SimError::Parse`], [`SimError::DuplicateSymbol`],
    /// [`SimError::UnresolvedSymbol`] or [`SimError::OutOfRange`].
    pub fn load(&mut self, source: &str) -> Result<&ProgramInfo> {
        self.reset();
        let loaded = loader::load(source)?;

        self.cpu.memory = loaded.memory;
        self.cpu.regs.set_pc(loaded.info.first_instruction);
        self.symbols = loaded.symbols;
        self.state = RunState::Running;
        info!(
            program = %loaded.info.name,
            start = format_args!("{:06X}", loaded.info.start_address),
            length = format_args!("{:06X}", loaded.info.length),
            "program ready"
        );
        Ok(self.program.insert(loaded.info))
    }

    /// Reads an object program from disk and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, or any error of [`Self::load`].
    pub fn load_file(&mut self, path: &Path) -> Result<&ProgramInfo> {
        let source = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load(&source)
    }

    /// Executes one instruction.
    ///
    /// Returns `Ok(true)` while the program continues and `Ok(false)` once
    /// control reaches the termination address. After termination or a
    /// fault, further calls return `Ok(false)` without executing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotLoaded`] before a successful load, otherwise the
    /// error of the failing instruction. A failure halts the program and
    /// keeps registers, memory and the log as they were.
    pub fn step(&mut self) -> Result<bool> {
        match self.state {
            RunState::Unloaded => return Err(SimError::NotLoaded),
            RunState::Finished | RunState::Faulted => return Ok(false),
            RunState::Running => {}
        }

        match self.execute_next() {
            Ok(next) if next == TERMINATION_ADDRESS => {
                self.state = RunState::Finished;
                self.cpu.devices.close_all();
                info!(steps = self.log.len(), "program finished");
                Ok(false)
            }
            Ok(_) => Ok(true),
            Err(e) => {
                self.state = RunState::Faulted;
                self.cpu.devices.close_all();
                error!(pc = format_args!("{:06X}", self.cpu.regs.pc()), error = %e, "execution halted");
                Err(e)
            }
        }
    }

    fn execute_next(&mut self) -> Result<u32> {
        let pc = self.cpu.regs.pc();
        let inst = decode(&self.cpu.memory, &self.catalog, pc)?;
        let inst = self.current.insert(inst);
        let next = self.cpu.execute(inst)?;
        self.log.push(inst.mnemonic);
        trace!(
            pc = format_args!("{pc:06X}"),
            code = %inst.object_code(),
            inst = %disassemble(inst),
            next = format_args!("{next:06X}"),
            "exec"
        );
        Ok(next)
    }

    /// Steps until the program stops.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Self::step`].
    pub fn run(&mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }

    /// Steps at most `max_steps` times.
    ///
    /// Returns `true` if the program can still continue.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Self::step`].
    pub fn run_for(&mut self, max_steps: u64) -> Result<bool> {
        for _ in 0..max_steps {
            if !self.step()? {
                return Ok(false);
            }
        }
        Ok(self.state == RunState::Running)
    }

    /// Closes devices and clears memory, registers, symbols and the log.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.symbols.clear();
        self.program = None;
        self.log.clear();
        self.current = None;
        self.state = RunState::Unloaded;
    }

    /// Flushes and closes every open device, keeping all other state.
    pub fn shutdown(&mut self) {
        self.cpu.devices.close_all();
    }

    /// Lifecycle state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Snapshot of the register file.
    pub const fn registers(&self) -> RegisterFile {
        self.cpu.regs
    }

    /// Current condition code.
    pub const fn condition_code(&self) -> ConditionCode {
        self.cpu.cc
    }

    /// Target address of the last format 3/4 instruction.
    pub const fn last_target(&self) -> Option<u32> {
        self.cpu.last_target
    }

    /// Name of the last device accessed.
    pub fn last_device(&self) -> Option<&str> {
        self.cpu.last_device.as_deref()
    }

    /// Mnemonics of every completed instruction, oldest first.
    pub fn log(&self) -> &[Mnemonic] {
        &self.log
    }

    /// The instruction executed by the last step.
    pub const fn current_instruction(&self) -> Option<&Decoded> {
        self.current.as_ref()
    }

    /// Address of the instruction executed by the last step.
    pub fn current_address(&self) -> Option<u32> {
        self.current.as_ref().map(|inst| inst.addr)
    }

    /// Object code of the last instruction, e.g. `"B400"`.
    pub fn current_object_code(&self) -> Option<String> {
        self.current.as_ref().map(Decoded::object_code)
    }

    /// Assembler text of the last instruction.
    pub fn disassembly(&self) -> Option<String> {
        self.current.as_ref().map(disassemble)
    }

    /// Symbols of the loaded program.
    pub const fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Main memory.
    pub const fn memory(&self) -> &Memory {
        &self.cpu.memory
    }

    /// Metadata of the loaded program.
    pub const fn program(&self) -> Option<&ProgramInfo> {
        self.program.as_ref()
    }

    /// The instruction catalog in use.
    pub const fn catalog(&self) -> &InstructionCatalog {
        &self.catalog
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.cpu.devices.close_all();
    }
}
