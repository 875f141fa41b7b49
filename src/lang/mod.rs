/// Module for reading source text and tracking locations within it.
pub mod source_buffer;

/// Module for turning the source code into a stream of tokens for further processing.
pub mod tokenizing;

/// Module for defining the opcodes and instruction forms of the virtual machine, both before and
/// after linking.
pub mod code;

/// Module for compiling the token stream into words made up of abstract operations.  Jump offsets
/// are relative at this stage, absolute addresses are not known until the words are linked.
pub mod compilation;

/// Module for placing compiled words into the virtual machine's flat instruction array and
/// resolving their symbolic operands.
pub mod linking;

/// The bootstrap library, compiled ahead of user code by the entry point.
pub const BOOTSTRAP_SOURCE: &str = include_str!("bootstrap.f");
