use std::fmt::{self, Debug, Display, Formatter};

/// Every piece of data the virtual machine knows about.  Values are used both as compiled
/// constants in the constant pool and as the contents of the data stack and variables.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// The value represents nothing and no data is associated.  Also used as the empty operand of
    /// abstract operations that don't carry one.
    #[default]
    Void,

    /// A 64-bit signed integer.  There is no other numeric type.
    Int(i64),

    /// A string value, represented by a Rust string.
    String(String),
}

impl Value {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Int(_) => "integer",
            Value::String(_) => "string",
        }
    }

    /// Get the text if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Quote a string and escape the characters that would otherwise mangle a single line of
    /// listing output.
    pub fn stringify(text: &str) -> String {
        let mut result = String::with_capacity(text.len() + 2);

        result.push('"');

        for next in text.chars() {
            match next {
                '"' => result.push_str("\\\""),
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                '\\' => result.push_str("\\\\"),
                _ => result.push(next),
            }
        }

        result.push('"');
        result
    }
}

/// The textual form written by the print operation.  Integers are decimal and strings are their
/// raw text.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Int(value) => write!(f, "{}", value),
            Value::String(text) => write!(f, "{}", text),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Int(value) => write!(f, "Int({})", value),
            Value::String(text) => write!(f, "String({})", Value::stringify(text)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Value {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Value {
        Value::String(text)
    }
}
