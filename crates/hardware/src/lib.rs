//! SIC/XE machine emulator library.
//!
//! This crate loads linked SIC/XE object programs and executes them one
//! instruction at a time:
//! 1. **Core:** Register file, condition code and the semantics of every instruction.
//! 2. **Memory:** A bounds-checked 64 KiB byte-addressable address space.
//! 3. **ISA:** Instruction catalog, format 1/2/3/4 decoding and disassembly.
//! 4. **SoC:** Main memory and the file-backed device gateway.
//! 5. **Simulation:** Object-program loader/linker, symbol table and the step loop.
//!
//! # Examples
//!
//! ```
//! use sicsim_core::{Config, Simulator};
//!
//! let mut sim = Simulator::new(&Config::default()).unwrap();
//! sim.load("HCOPY  001000000002\nT00100002B400\nE001000\n").unwrap();
//! assert!(sim.step().unwrap());
//! assert_eq!(sim.registers().get(sicsim_core::common::Reg::A), 0);
//! ```

/// Common types and constants (registers, errors, hex helpers, access types).
pub mod common;
/// Emulator configuration (tracing, step budget, devices, catalog source).
pub mod config;
/// CPU core (machine state, addressing, instruction semantics).
pub mod core;
/// Instruction set (catalog, mnemonics, decode, disassembly).
pub mod isa;
/// Object-program loader, symbol table and simulator.
pub mod sim;
/// System-on-chip (main memory, devices).
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Crate-wide error type.
pub use crate::common::SimError;
/// Main entry point; load a program and step it.
pub use crate::sim::Simulator;
