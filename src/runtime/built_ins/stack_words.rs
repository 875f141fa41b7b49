use crate::{
    add_primitive_word,
    lang::code::Opcode,
    runtime::{
        built_ins::PrimitiveTable,
        error,
        interpreter::Interpreter,
    },
};

/// Push a copy of the value `depth` slots below the top of the stack.  A depth of 0 is a plain
/// duplicate of the top.
///
/// Signature: `x_depth ... x_0 -- x_depth ... x_0 x_depth`
pub fn word_dup(interpreter: &mut dyn Interpreter, depth: usize) -> error::Result<()> {
    let value = interpreter.pick(depth)?;

    interpreter.push(value);
    Ok(())
}

/// Drop the top `count` values on the data stack.
///
/// Signature: `x_count ... x_1 -- `
pub fn word_drop(interpreter: &mut dyn Interpreter, count: usize) -> error::Result<()> {
    interpreter.drop_values(count)
}

/// Register the stack manipulation words.
pub fn register_stack_words(table: &mut PrimitiveTable) {
    add_primitive_word!(
        table,
        "dup",
        Opcode::Dup,
        0,
        "Duplicate the top value on the data stack.",
        "value -- value value"
    );

    add_primitive_word!(
        table,
        "over",
        Opcode::Dup,
        1,
        "Make a copy of the second value and place it on top.",
        "a b -- a b a"
    );

    add_primitive_word!(
        table,
        "drop",
        Opcode::Drop,
        1,
        "Drop the top value on the data stack.",
        "value -- "
    );
}
