use crate::{
    lang::code::{AbstractOp, MAX_ARGUMENT, Opcode, PackedOp, TOP_LEVEL_WORD, Word, WordList},
    runtime::{
        data_structures::{dictionary::WordInfo, program_image::ProgramImage, value::Value},
        error::{self, ScriptError, compile_error},
    },
};
use log::debug;
use std::collections::HashMap;

/// The words of one source as they will be added to the image.  Nothing in here touches the image
/// until every op has been packed, so a source that fails to link leaves the image as it was.
struct PendingLink<'a> {
    image: &'a ProgramImage,

    /// Addresses of the words being linked.  These shadow the image's dictionary.
    addresses: HashMap<String, usize>,

    /// Constants to append to the image's pool, in index order.
    constants: Vec<Value>,

    /// Packed code to append to the image.
    code: Vec<PackedOp>,
}

impl<'a> PendingLink<'a> {
    fn new(image: &'a ProgramImage) -> Self {
        PendingLink {
            image,
            addresses: HashMap::new(),
            constants: Vec::new(),
            code: Vec::new(),
        }
    }

    /// Resolve a word's address, preferring the words being linked over earlier ones.
    fn address_of(&self, name: &str) -> Option<usize> {
        match self.addresses.get(name) {
            Some(address) => Some(*address),
            None => self.image.dictionary().address_of(name),
        }
    }

    /// Queue a constant and return the index it will have in the image's pool.
    fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.image.constants().len() + self.constants.len() - 1
    }
}

/// Place the words of one compiled source into the program image and pack their ops.
///
/// Words are placed in list order after any code already in the image.  Every word gets its
/// address before any op is resolved, so calls may refer to words defined later in the same
/// source as well as to words from earlier sources.  On error the image is unchanged.
///
/// Returns the address of the source's top-level word, where execution should start.
pub fn link_words(words: WordList, image: &mut ProgramImage) -> error::Result<usize> {
    let mut pending = PendingLink::new(image);
    let mut infos = Vec::with_capacity(words.len());
    let mut next_address = image.dictionary().next_address();

    for word in &words {
        debug!("Placing {} at {} ({} ops).", word.name, next_address, word.len());

        infos.push(WordInfo::new(word.location.clone(), word.name.clone(), next_address, word.len()));
        pending.addresses.insert(word.name.clone(), next_address);
        next_address += word.len();
    }

    for (word, info) in words.iter().zip(&infos) {
        for (position, op) in word.ops.iter().enumerate() {
            let packed = pack_op(word, info.address + position, op, &mut pending)?;
            pending.code.push(packed);
        }
    }

    let Some(start) = pending.addresses.get(TOP_LEVEL_WORD).copied() else {
        return ScriptError::new_as_result(None, "No top-level code was linked.".to_string(), None);
    };

    let PendingLink { constants, code, .. } = pending;

    for info in infos {
        image.dictionary_mut().insert(info);
    }

    for constant in constants {
        let _ = image.add_constant(constant);
    }

    for packed in code {
        image.push_instruction(packed);
    }

    Ok(start)
}

/// Resolve an op's symbolic operand and pack it.
///
/// Calls resolve to the target's address.  Pushes, stores and fetches queue their operand as a
/// constant and refer to it by index.  Jumps turn their relative distance into an absolute
/// address.  Every other op keeps its compiled argument.
fn pack_op(word: &Word,
           address: usize,
           op: &AbstractOp,
           pending: &mut PendingLink) -> error::Result<PackedOp> {
    let argument = match op.opcode {
        Opcode::Call => {
            let Some(name) = op.datum.as_str() else {
                return compile_error(&word.location, format!("Call in '{}' has no target name.", word.name));
            };

            match pending.address_of(name) {
                Some(target) => target,
                None => {
                    return compile_error(&word.location,
                                         format!("Word '{}' called from '{}' is not defined.", name, word.name));
                }
            }
        }

        Opcode::Push | Opcode::Store | Opcode::Fetch => pending.add_constant(op.datum.clone()),

        Opcode::Jump | Opcode::JumpIfNot => address + op.arg as usize,

        _ => op.arg as usize,
    };

    match u32::try_from(argument) {
        Ok(argument) if argument <= MAX_ARGUMENT => Ok(PackedOp::new(op.opcode, argument)),
        _ => compile_error(&word.location,
                           format!("Argument {} of {} in '{}' does not fit in an instruction.",
                                   argument, op.opcode, word.name)),
    }
}
