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

/// Pop the two integer operands of a binary operation.  The right hand operand is on top so it is
/// popped first.
fn pop_operands(interpreter: &mut dyn Interpreter) -> error::Result<(i64, i64)> {
    let b = interpreter.pop_as_int()?;
    let a = interpreter.pop_as_int()?;

    Ok((a, b))
}

/// Signature: `a b -- a+b`
pub fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_operands(interpreter)?;

    interpreter.push(Value::Int(a.wrapping_add(b)));
    Ok(())
}

/// Remainder after dividing a by b, taking the sign of a.  Dividing by zero is an error.
///
/// Signature: `a b -- remainder`
pub fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_operands(interpreter)?;

    if b == 0 {
        return script_error_str(interpreter, "Modulo by zero.");
    }

    interpreter.push(Value::Int(a.wrapping_rem(b)));
    Ok(())
}

/// Signature: `a b -- a&b`
pub fn word_and(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let (a, b) = pop_operands(interpreter)?;

    interpreter.push(Value::Int(a & b));
    Ok(())
}

/// Register the arithmetic and bit manipulation words.
pub fn register_arithmetic_words(table: &mut PrimitiveTable) {
    add_primitive_word!(
        table,
        "+",
        Opcode::Add,
        0,
        "Add two integers.",
        "a b -- sum"
    );

    add_primitive_word!(
        table,
        "mod",
        Opcode::Mod,
        0,
        "Remainder after dividing a by b.",
        "a b -- remainder"
    );

    add_primitive_word!(
        table,
        "and",
        Opcode::And,
        0,
        "Bitwise and of two integers.",
        "a b -- result"
    );
}
