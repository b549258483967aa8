//! # Core Tests
//!
//! Target-address calculation and per-instruction semantics.
