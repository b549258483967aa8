//! Core processor implementation.
//!
//! This module contains the CPU state and the semantics of every
//! instruction. Fetch and decode live in [`crate::isa`]; the simulator
//! drives the loop.

/// CPU state, addressing and instruction execution.
pub mod cpu;

pub use self::cpu::{ConditionCode, Cpu};
