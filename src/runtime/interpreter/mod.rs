use crate::runtime::{
    data_structures::{dictionary::WordInfo, program_image::ProgramImage, value::Value},
    error,
};
use std::fmt::{self, Display, Formatter};

pub mod virtual_machine;

/// A call stack item is a record of a word being executed and the address execution had reached
/// within it.  These items are read-only and the fields are accessed by member functions.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CallItem {
    address: usize,
    word: String,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, address: usize) -> CallItem {
        CallItem { address, word }
    }

    /// The instruction address reached within the word.
    pub fn address(&self) -> usize {
        self.address
    }

    // The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

/// Make sure that this word can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:6}: {}", self.address, self.word)
    }
}

/// A snapshot of the words being executed, outermost first.  Used to give the user a trace when a
/// runtime error occurs.
pub type CallStack = Vec<CallItem>;

/// The data stack of values managed by the interpreter.
pub type ValueStack = Vec<Value>;

/// Trait for managing the interpreter's data stack.  The primitive handlers work through this.
pub trait InterpreterStack {
    /// Use to examine the full data stack when required.
    fn stack(&self) -> &ValueStack;

    /// Push a value onto the stack.
    fn push(&mut self, value: Value);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Value>;

    /// Pop the top value, which must be an integer.  Any other type is a type error, and we also
    /// fail if the stack is empty.
    fn pop_as_int(&mut self) -> error::Result<i64>;

    /// Copy the value `depth` slots down from the top of the stack, 0 being the top itself.
    fn pick(&self, depth: usize) -> error::Result<Value>;

    /// Discard the top `count` values.  Fails without changing the stack if there are fewer.
    fn drop_values(&mut self, count: usize) -> error::Result<()>;
}

/// Trait for the named variable store.  Variables are created on first write and live for the
/// rest of the run.
pub trait VariableManagement {
    /// Bind a value to a name, replacing any previous binding.
    fn write_variable(&mut self, name: &str, value: Value);

    /// Read the value bound to a name.  Reading an unbound name is an error.
    fn read_variable(&self, name: &str) -> error::Result<Value>;
}

/// Trait for loading source code into the program image.
pub trait CodeManagement {
    /// Compile and link a source into the program image.  Execution will start at the source's
    /// top-level code.
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()>;

    /// The linked program.
    fn image(&self) -> &ProgramImage;

    /// Address of the next instruction to execute.
    fn instruction_pointer(&self) -> usize;
}

/// The full interface of the interpreter.
pub trait Interpreter: InterpreterStack + VariableManagement + CodeManagement {
    /// Snapshot of the words being executed, for error reporting.
    fn call_stack(&self) -> CallStack;

    /// The word containing the instruction pointer, if any.
    fn current_word(&self) -> Option<&WordInfo>;
}
