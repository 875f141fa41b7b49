/// Module for managing source code and turning it into packed byte-code.  Tokenizing, compiling
/// words into abstract operations and linking them into one flat address space all live here.
pub mod lang;

/// Module for the runtime, the data structures it uses, and the virtual machine itself.
pub mod runtime;
