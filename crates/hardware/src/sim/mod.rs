//! Program loading and the simulation driver.
//!
//! Provides the object-program loader/linker, the symbol table it fills and
//! the `Simulator` that ties loading to step-by-step execution.

pub mod loader;

/// Command surface and step loop.
pub mod simulator;

/// Program-wide symbol table.
pub mod symtab;

pub use loader::{ControlSection, LoadedProgram, ProgramInfo};
pub use simulator::{RunState, Simulator};
pub use symtab::{Symbol, SymbolTable};
