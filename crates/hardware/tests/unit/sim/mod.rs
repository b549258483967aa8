//! # Simulation Tests
//!
//! Object-program loading, the symbol table and the simulator command surface.


/// Lifecycle, stepping and end-to-end programs.
pub mod simulator;
