/// Words that manipulate the data stack.
pub mod stack_words;

/// Words that do integer arithmetic and bit manipulation.
pub mod arithmetic_words;

/// Words that write to the program's output.
pub mod io_words;

/// Handlers for storing and fetching named variables.  These have no entry in the primitive table,
/// the compiler emits them for the `name !` and `name @` forms.
pub mod variable_words;

use crate::{
    lang::code::Opcode,
    runtime::built_ins::{
        arithmetic_words::register_arithmetic_words, io_words::register_io_words,
        stack_words::register_stack_words,
    },
};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// What the compiler needs to know about a primitive word.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PrimitiveInfo {
    /// The opcode the word compiles to.
    pub opcode: Opcode,

    /// The fixed argument compiled alongside the opcode.
    pub argument: u32,

    /// A simple description of the word.
    pub description: String,

    /// The stack signature of the word.
    pub signature: String,
}

/// Primitive words by name.
pub type PrimitiveTable = HashMap<&'static str, PrimitiveInfo>;

/// Simplify adding a primitive word to the table.
#[macro_export]
macro_rules! add_primitive_word {
    (
        $table:expr ,
        $name:literal ,
        $opcode:expr ,
        $argument:expr ,
        $description:literal ,
        $signature:literal
    ) => {{
        $table.insert(
            $name,
            $crate::runtime::built_ins::PrimitiveInfo {
                opcode: $opcode,
                argument: $argument,
                description: $description.to_string(),
                signature: $signature.to_string(),
            },
        );
    }};
}

lazy_static! {
    /// Every word that compiles straight to an opcode instead of a call.
    pub static ref PRIMITIVE_WORDS: PrimitiveTable = {
        let mut table = PrimitiveTable::new();

        register_io_words(&mut table);
        register_arithmetic_words(&mut table);
        register_stack_words(&mut table);

        table
    };
}

/// Find the primitive word an instruction was compiled from, if any.  Used to annotate listings.
pub fn primitive_for(opcode: Opcode, argument: u32) -> Option<(&'static str, &'static PrimitiveInfo)> {
    let table: &'static PrimitiveTable = &PRIMITIVE_WORDS;

    table
        .iter()
        .find(|(_, info)| info.opcode == opcode && info.argument == argument)
        .map(|(name, info)| (*name, info))
}

/// Find the opcode and argument a primitive word compiles to.
pub fn lookup_primitive(name: &str) -> Option<(Opcode, u32)> {
    PRIMITIVE_WORDS
        .get(name)
        .map(|info| (info.opcode, info.argument))
}
