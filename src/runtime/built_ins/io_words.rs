use crate::{
    add_primitive_word,
    lang::code::Opcode,
    runtime::{
        built_ins::PrimitiveTable,
        data_structures::value::Value,
        error::{self, script_error_str},
        interpreter::Interpreter,
    },
};
use std::io::Write;

/// Pop a value and write it to the output.  Integers are written in decimal and strings as their
/// raw text, with no separator or new line added.
///
/// Signature: `value -- `
pub fn word_print(interpreter: &mut dyn Interpreter, output: &mut dyn Write) -> error::Result<()> {
    let value = interpreter.pop()?;

    match value {
        Value::Int(number) => write!(output, "{}", number)?,
        Value::String(text) => output.write_all(text.as_bytes())?,
        Value::Void => return script_error_str(interpreter, "Can't print a void value."),
    }

    Ok(())
}

/// Register the output words.
pub fn register_io_words(table: &mut PrimitiveTable) {
    add_primitive_word!(
        table,
        ".",
        Opcode::Print,
        0,
        "Print the top value of the stack.",
        "value -- "
    );
}
