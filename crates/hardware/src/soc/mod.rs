//! Machine Components.
//!
//! This module organizes the state the instruction semantics act on besides
//! the register file: main memory and the named I/O devices.

/// Named byte-stream devices.
pub mod devices;

/// Main memory.
pub mod memory;

pub use devices::DeviceGateway;
pub use memory::Memory;
