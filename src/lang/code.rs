use crate::{
    lang::source_buffer::SourceLocation,
    runtime::{
        built_ins::primitive_for,
        data_structures::{program_image::ProgramImage, value::Value},
    },
};
use std::fmt::{self, Debug, Display, Formatter};

/// The operations that can be performed by the virtual machine.  The discriminant is the byte
/// stored in the low 8 bits of a packed instruction.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Debug)]
pub enum Opcode {
    /// Never emitted.  Decoding it is a runtime error.
    Invalid = 0,

    /// Return to the caller, or end the run if the call stack is empty.
    Return = 1,

    /// Push a constant from the constant pool.  The argument is the constant's index.
    Push = 2,

    /// Call a word.  Before linking the operand is the word's name, after linking the argument is
    /// the word's address.
    Call = 3,

    /// Jump unconditionally.  Before linking the argument is relative to this instruction, after
    /// linking it is the absolute target address.
    Jump = 4,

    /// Pop a value and jump if it is the integer zero.  Arguments are resolved like Jump.
    JumpIfNot = 5,

    /// Pop a value and write it to the output.
    Print = 6,

    /// Pop two integers and push their sum.
    Add = 7,

    /// Pop two integers and push the remainder of dividing the first by the second.
    Mod = 8,

    /// Push a copy of the value `argument` slots down from the top of the stack.
    Dup = 9,

    /// Discard the top `argument` values from the stack.
    Drop = 10,

    /// Pop two integers and push their bitwise and.
    And = 11,

    /// Pop a value and bind it to the variable named by the string constant at the argument.
    Store = 12,

    /// Push the value bound to the variable named by the string constant at the argument.
    Fetch = 13,
}

impl Opcode {
    /// Mnemonic used in listings.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Invalid => "invalid",
            Opcode::Return => "return",
            Opcode::Push => "push",
            Opcode::Call => "call",
            Opcode::Jump => "jump",
            Opcode::JumpIfNot => "jump-if-not",
            Opcode::Print => "print",
            Opcode::Add => "add",
            Opcode::Mod => "mod",
            Opcode::Dup => "dup",
            Opcode::Drop => "drop",
            Opcode::And => "and",
            Opcode::Store => "store",
            Opcode::Fetch => "fetch",
        }
    }
}

/// Decode an opcode byte.  Only bytes with a handler decode successfully, so the invalid opcode
/// and anything past the last opcode are rejected.
impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Opcode, u8> {
        let opcode = match byte {
            1 => Opcode::Return,
            2 => Opcode::Push,
            3 => Opcode::Call,
            4 => Opcode::Jump,
            5 => Opcode::JumpIfNot,
            6 => Opcode::Print,
            7 => Opcode::Add,
            8 => Opcode::Mod,
            9 => Opcode::Dup,
            10 => Opcode::Drop,
            11 => Opcode::And,
            12 => Opcode::Store,
            13 => Opcode::Fetch,
            _ => return Err(byte),
        };

        Ok(opcode)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One compiled operation before linking.  Operands are still symbolic: calls carry the target's
/// name, pushes carry the literal itself, and jumps carry an offset relative to their own
/// position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AbstractOp {
    pub opcode: Opcode,

    /// Opcode dependent.  The relative distance of a jump, or the depth/count of a stack op.
    pub arg: u32,

    /// The call target's name or the literal to push.  Void when the op carries neither.
    pub datum: Value,
}

impl AbstractOp {
    pub fn new(opcode: Opcode, arg: u32, datum: Value) -> AbstractOp {
        AbstractOp { opcode, arg, datum }
    }

    /// An op with neither argument nor operand.
    pub fn simple(opcode: Opcode) -> AbstractOp {
        AbstractOp::new(opcode, 0, Value::Void)
    }

    pub fn push(value: Value) -> AbstractOp {
        AbstractOp::new(Opcode::Push, 0, value)
    }

    pub fn call(name: &str) -> AbstractOp {
        AbstractOp::new(Opcode::Call, 0, Value::from(name))
    }

    pub fn jump(distance: u32) -> AbstractOp {
        AbstractOp::new(Opcode::Jump, distance, Value::Void)
    }

    pub fn jump_if_not(distance: u32) -> AbstractOp {
        AbstractOp::new(Opcode::JumpIfNot, distance, Value::Void)
    }
}

/// Allow for pretty printing of the op and its operand.
impl Display for AbstractOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.datum {
            Value::Void => write!(f, "{:<11} {}", self.opcode.name(), self.arg),
            Value::String(text) if self.opcode == Opcode::Push => {
                write!(f, "{:<11} {}", self.opcode.name(), Value::stringify(text))
            }
            datum => write!(f, "{:<11} {}", self.opcode.name(), datum),
        }
    }
}

impl Debug for AbstractOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}({}, {:?})", self.opcode, self.arg, self.datum)
    }
}

/// A run of abstract operations.
pub type OpList = Vec<AbstractOp>;

/// Name given to the word holding the statements found outside of any definition.
pub const TOP_LEVEL_WORD: &str = "top-level code";

/// A named, finished sequence of abstract operations.  The last op is always a return.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Word {
    pub name: String,

    /// Where the word's definition started.
    pub location: SourceLocation,

    pub ops: OpList,
}

impl Word {
    /// Finish a word by terminating its ops with a return.
    pub fn new(name: String, location: SourceLocation, mut ops: OpList) -> Word {
        ops.push(AbstractOp::simple(Opcode::Return));
        Word {
            name,
            location,
            ops,
        }
    }

    /// The number of instructions the word will occupy once packed.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The compiled words of one source, in the order they will be placed.
pub type WordList = Vec<Word>;

/// The largest argument that fits in a packed instruction.
pub const MAX_ARGUMENT: u32 = 0x00ff_ffff;

/// One fixed width instruction.  The low byte is the opcode and the remaining 24 bits hold a
/// fully resolved argument.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedOp(u32);

impl PackedOp {
    /// Pack an opcode and argument.  The argument must not exceed MAX_ARGUMENT.
    pub fn new(opcode: Opcode, argument: u32) -> PackedOp {
        debug_assert!(argument <= MAX_ARGUMENT);
        PackedOp(opcode as u32 | (argument << 8))
    }

    /// Wrap an already encoded instruction.
    pub fn from_raw(raw: u32) -> PackedOp {
        PackedOp(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    /// The undecoded opcode byte.
    pub fn opcode_byte(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn argument(&self) -> u32 {
        self.0 >> 8
    }
}

impl Debug for PackedOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Produce a listing of the linked program for debugging purposes.  Each line shows the address,
/// the mnemonic and the resolved argument.  Constants referenced by an instruction are shown
/// alongside it.  Primitives also show the word they were compiled from and its stack signature.
/// Every word's name is printed above its first instruction.
pub fn pretty_print_code(image: &ProgramImage) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(image.code().len() * 32);

    for (address, instruction) in image.code().iter().enumerate() {
        if let Some(word) = image.dictionary().word_at(address)
            && word.address == address
        {
            writeln!(&mut result, "{}:", word.name).expect("Writing to String should never fail.");
        }

        let argument = instruction.argument();
        let line = match Opcode::try_from(instruction.opcode_byte()) {
            Ok(opcode @ (Opcode::Push | Opcode::Store | Opcode::Fetch)) => {
                let constant = match image.constant(argument as usize) {
                    Some(Value::String(text)) => Value::stringify(text),
                    Some(value) => value.to_string(),
                    None => "?".to_string(),
                };

                format!("{:<11} {:<6} {}", opcode.name(), argument, constant)
            }

            Ok(Opcode::Call) => {
                let target = image
                    .dictionary()
                    .word_at(argument as usize)
                    .map_or("?", |word| word.name.as_str());

                format!("{:<11} {:<6} {}", Opcode::Call.name(), argument, target)
            }

            Ok(opcode) => match primitive_for(opcode, argument) {
                Some((name, info)) => format!("{:<11} {:<6} {} ( {} ) {}",
                                              opcode.name(), argument, name, info.signature, info.description),
                None => format!("{:<11} {}", opcode.name(), argument),
            },
            Err(byte) => format!("{:<11} {} (opcode {})", "invalid", argument, byte),
        };

        writeln!(&mut result, "{:6}: {}", address, line.trim_end())
            .expect("Writing to String should never fail.");
    }

    result
}
