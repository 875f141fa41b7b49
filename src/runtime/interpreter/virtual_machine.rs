use std::{ collections::HashMap,
           io::Write };
use log::{ debug,
           trace };
use crate::{ lang::{ code::Opcode,
                     compilation::compile_source,
                     linking::link_words },
             runtime::{ built_ins::{ arithmetic_words::{ word_add,
                                                         word_and,
                                                         word_mod },
                                     io_words::word_print,
                                     stack_words::{ word_drop,
                                                    word_dup },
                                     variable_words::{ word_fetch,
                                                       word_store } },
                        data_structures::{ dictionary::WordInfo,
                                           program_image::ProgramImage,
                                           value::Value },
                        error::{ self,
                                 script_error,
                                 script_error_str },
                        interpreter::{ CallItem,
                                       CallStack,
                                       CodeManagement,
                                       Interpreter,
                                       InterpreterStack,
                                       ValueStack,
                                       VariableManagement } } };



/// The variables known to a running program, by name.
pub type VariableList = HashMap<String, Value>;



/// The byte-code virtual machine.  Owns the linked program image and all of the runtime state: the
/// data stack, the stack of return addresses, and the variables.
pub struct VirtualMachine
{
    /// Constant pool, dictionary and packed instructions.
    image: ProgramImage,

    /// Address of the instruction to execute next.
    ip: usize,

    /// The data stack.
    stack: ValueStack,

    /// Return addresses, each one the address of the call instruction that pushed it.
    call_stack: Vec<usize>,

    variables: VariableList
}


impl InterpreterStack for VirtualMachine
{
    fn stack(&self) -> &ValueStack
    {
        &self.stack
    }

    fn push(&mut self, value: Value)
    {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value>
    {
        match self.stack.pop()
        {
            Some(value) => Ok(value),
            None        => script_error_str(self, "Stack underflow.")
        }
    }

    fn pop_as_int(&mut self) -> error::Result<i64>
    {
        let value = self.pop()?;

        match value
        {
            Value::Int(number) => Ok(number),
            _ => script_error(self, format!("Expected an integer, got a {} value.",
                                            value.type_name()))
        }
    }

    fn pick(&self, depth: usize) -> error::Result<Value>
    {
        if depth >= self.stack.len()
        {
            return script_error(self, format!("Stack underflow picking depth {} of {}.",
                                              depth,
                                              self.stack.len()));
        }

        Ok(self.stack[self.stack.len() - 1 - depth].clone())
    }

    fn drop_values(&mut self, count: usize) -> error::Result<()>
    {
        if count > self.stack.len()
        {
            return script_error(self, format!("Stack underflow dropping {} of {}.",
                                              count,
                                              self.stack.len()));
        }

        self.stack.truncate(self.stack.len() - count);
        Ok(())
    }
}


impl VariableManagement for VirtualMachine
{
    fn write_variable(&mut self, name: &str, value: Value)
    {
        let _ = self.variables.insert(name.to_string(), value);
    }

    fn read_variable(&self, name: &str) -> error::Result<Value>
    {
        match self.variables.get(name)
        {
            Some(value) => Ok(value.clone()),
            None        => script_error(self, format!("Variable '{}' has not been set.", name))
        }
    }
}


impl CodeManagement for VirtualMachine
{
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<()>
    {
        let words = compile_source(path, source)?;

        self.ip = link_words(words, &mut self.image)?;

        debug!("Linked {}, {} instructions and {} constants in total, starting at {}.",
               path,
               self.image.code().len(),
               self.image.constants().len(),
               self.ip);

        Ok(())
    }

    fn image(&self) -> &ProgramImage
    {
        &self.image
    }

    fn instruction_pointer(&self) -> usize
    {
        self.ip
    }
}


impl Interpreter for VirtualMachine
{
    fn call_stack(&self) -> CallStack
    {
        let word_name = |address: usize|
            {
                self.image
                    .dictionary()
                    .word_at(address)
                    .map_or_else(|| "<unknown>".to_string(), |word| word.name.clone())
            };

        let mut call_stack: CallStack = self.call_stack
                                            .iter()
                                            .map(|&address| CallItem::new(word_name(address),
                                                                          address))
                                            .collect();

        call_stack.push(CallItem::new(word_name(self.ip), self.ip));
        call_stack
    }

    fn current_word(&self) -> Option<&WordInfo>
    {
        self.image.dictionary().word_at(self.ip)
    }
}


impl VirtualMachine
{
    pub fn new() -> VirtualMachine
    {
        VirtualMachine
            {
                image: ProgramImage::new(),
                ip: 0,

                stack: Vec::with_capacity(20),
                call_stack: Vec::with_capacity(40),

                variables: VariableList::new()
            }
    }

    /// Execute from the current instruction pointer until a return is executed with nothing left
    /// on the call stack.  Printed values are written to the given output.
    pub fn run(&mut self, output: &mut dyn Write) -> error::Result<()>
    {
        loop
        {
            let Some(instruction) = self.image.instruction(self.ip) else
                {
                    return script_error(self, format!("Instruction pointer {} is outside of the \
                                                       program.",
                                                      self.ip));
                };

            let opcode = match Opcode::try_from(instruction.opcode_byte())
                {
                    Ok(opcode) => opcode,
                    Err(byte)  => return script_error(self, format!("No handler for opcode {}.",
                                                                    byte))
                };

            let argument = instruction.argument() as usize;

            trace!("{:6}: {} {}", self.ip, opcode, argument);

            let mut next_ip = self.ip + 1;

            match opcode
            {
                Opcode::Return =>
                    {
                        match self.call_stack.pop()
                        {
                            // Resume after the call instruction.
                            Some(address) => next_ip = address + 1,
                            None          => return Ok(())
                        }
                    },

                Opcode::Push =>
                    {
                        let value = self.constant(argument)?;
                        self.push(value);
                    },

                Opcode::Call =>
                    {
                        self.call_stack.push(self.ip);
                        next_ip = argument;
                    },

                Opcode::Jump => next_ip = argument,

                Opcode::JumpIfNot =>
                    {
                        if self.pop()? == Value::Int(0)
                        {
                            next_ip = argument;
                        }
                    },

                Opcode::Print => word_print(self, output)?,

                Opcode::Add => word_add(self)?,

                Opcode::Mod => word_mod(self)?,

                Opcode::And => word_and(self)?,

                Opcode::Dup => word_dup(self, argument)?,

                Opcode::Drop => word_drop(self, argument)?,

                Opcode::Store =>
                    {
                        let name = self.variable_name(argument)?;
                        word_store(self, &name)?;
                    },

                Opcode::Fetch =>
                    {
                        let name = self.variable_name(argument)?;
                        word_fetch(self, &name)?;
                    },

                Opcode::Invalid => return script_error_str(self, "No handler for opcode 0.")
            }

            self.ip = next_ip;
        }
    }

    /// Get a copy of a constant from the pool.
    fn constant(&self, index: usize) -> error::Result<Value>
    {
        match self.image.constant(index)
        {
            Some(value) => Ok(value.clone()),
            None        => script_error(self, format!("Constant index {} is out of range.", index))
        }
    }

    /// The name operand of a store or fetch, a string in the constant pool.
    fn variable_name(&self, index: usize) -> error::Result<String>
    {
        match self.constant(index)?
        {
            Value::String(name) => Ok(name),
            value => script_error(self, format!("Variable name must be a string, got a {} value.",
                                                value.type_name()))
        }
    }
}


impl Default for VirtualMachine
{
    fn default() -> Self
    {
        Self::new()
    }
}
