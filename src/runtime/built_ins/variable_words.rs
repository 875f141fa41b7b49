use crate::runtime::{error, interpreter::Interpreter};

/// Pop a value and bind it to the named variable.
///
/// Signature: `value -- `
pub fn word_store(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<()> {
    let value = interpreter.pop()?;

    interpreter.write_variable(name, value);
    Ok(())
}

/// Push the value bound to the named variable.
///
/// Signature: ` -- value`
pub fn word_fetch(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<()> {
    let value = interpreter.read_variable(name)?;

    interpreter.push(value);
    Ok(())
}
