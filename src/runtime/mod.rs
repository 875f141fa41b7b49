/// All of the core data structures used by the virtual machine.
pub mod data_structures;

/// Module for the primitive words, the ones compiled straight to their own opcode, and their
/// handlers.
pub mod built_ins;

/// Module for defining the error reporting used by every phase.
pub mod error;

/// Module for defining the virtual machine along with the traits it exposes to the primitive
/// handlers.
pub mod interpreter;
