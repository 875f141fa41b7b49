/// Module contains the Value enumeration and it's implementation.  Values are both the compiled
/// constants and the runtime data of the virtual machine.
pub mod value;

/// The dictionary module maps word names to their addresses in the instruction array.
pub mod dictionary;

/// The linked program: constant pool, dictionary and packed instructions.
pub mod program_image;
