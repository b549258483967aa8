//! Fluent builders for test inputs.


/// Object-program text builder.
pub mod object;
