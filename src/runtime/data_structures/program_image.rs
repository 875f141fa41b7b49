use crate::{
    lang::code::PackedOp,
    runtime::data_structures::{dictionary::Dictionary, value::Value},
};

/// Everything the linker produces and the virtual machine executes: the constant pool, the word
/// dictionary, and the flat array of packed instructions.
///
/// All three only ever grow.  Constant indices and word addresses stay valid once handed out.
#[derive(Default)]
pub struct ProgramImage {
    constants: Vec<Value>,
    dictionary: Dictionary,
    code: Vec<PackedOp>,
}

impl ProgramImage {
    pub fn new() -> ProgramImage {
        ProgramImage::default()
    }

    /// Append a value to the constant pool and return its index.  Equal values are not merged.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn constant(&self, index: usize) -> Option<&Value> {
        self.constants.get(index)
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn code(&self) -> &[PackedOp] {
        &self.code
    }

    pub fn instruction(&self, address: usize) -> Option<PackedOp> {
        self.code.get(address).copied()
    }

    pub fn push_instruction(&mut self, op: PackedOp) {
        self.code.push(op);
    }
}
