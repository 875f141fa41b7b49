use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::{
        data_structures::value::Value,
        error::{self, compile_error},
    },
};
use log::debug;
use std::fmt::{self, Debug, Display, Formatter};

/// The words the compiler treats as syntax rather than as calls.
pub const KEYWORDS: [&str; 6] = [":", ";", ")", "if", "then", "else"];

/// The kinds of token the lexer produces, without their payloads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    Integer,
    String,
    Keyword,
    Identifier,
    EndOfInput,
}

/// A single unit of the language along with the location in the source where it was found.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A 64-bit signed integer literal.
    Integer(SourceLocation, i64),

    /// A string literal, already decoded.
    String(SourceLocation, String),

    /// One of the reserved words in KEYWORDS.
    Keyword(SourceLocation, String),

    /// Anything else.  The name of a word to call, operator-like names included.
    Identifier(SourceLocation, String),

    /// There is no more source.  Once reached every further read returns this again.
    EndOfInput(SourceLocation),
}

/// Make sure that the tokens are nicely printable for debugging purposes.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::Integer(_, value) => write!(f, "{}", value),
            Token::String(_, text) => write!(f, "{}", Value::stringify(text)),
            Token::Keyword(_, text) => write!(f, "{}", text),
            Token::Identifier(_, text) => write!(f, "{}", text),
            Token::EndOfInput(_) => write!(f, "<end of input>"),
        }
    }
}

/// Include the original location in the debug output.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {:?} {}", self.location(), self.kind(), self)
    }
}

impl Token {
    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        match self {
            Token::Integer(location, _) => location,
            Token::String(location, _) => location,
            Token::Keyword(location, _) => location,
            Token::Identifier(location, _) => location,
            Token::EndOfInput(location) => location,
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Integer(_, _) => TokenKind::Integer,
            Token::String(_, _) => TokenKind::String,
            Token::Keyword(_, _) => TokenKind::Keyword,
            Token::Identifier(_, _) => TokenKind::Identifier,
            Token::EndOfInput(_) => TokenKind::EndOfInput,
        }
    }

    /// Is this the given keyword?
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Keyword(_, text) if text == keyword)
    }

    /// Is this an identifier with the given name?
    pub fn is_identifier(&self, name: &str) -> bool {
        matches!(self, Token::Identifier(_, text) if text == name)
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Token::EndOfInput(_))
    }
}

/// Decode the text of a lexeme wrapped in double quotes.  The four character lexeme `"\n"` is the
/// only escape, it becomes a single new line.  Anything else is taken verbatim.
fn to_string_literal(text: &str) -> Option<String> {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return None;
    }

    if text == "\"\\n\"" {
        return Some("\n".to_string());
    }

    Some(text[1..text.len() - 1].to_string())
}

/// Turns whitespace delimited source text into tokens.  Comments are skipped here, the compiler
/// never sees them.
///
/// One token of lookahead is available through `peek` and `pushback`.
pub struct Lexer<'a> {
    buffer: SourceBuffer<'a>,

    /// A token that was pushed back and will be returned by the next read.
    pending: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over the source text.  The path is only used to tag token locations.
    pub fn new(path: &str, source: &'a str) -> Self {
        Lexer {
            buffer: SourceBuffer::new(path, source),
            pending: None,
        }
    }

    /// Read the next token, either the pushed back one or a fresh one from the source.
    pub fn next_token(&mut self) -> error::Result<Token> {
        if let Some(token) = self.pending.take() {
            return Ok(token);
        }

        self.read_token()
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> error::Result<&Token> {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.read_token()?,
        };

        Ok(self.pending.insert(token))
    }

    /// Return a token so that the next read produces it again.  Only one token can be pending at a
    /// time.
    pub fn pushback(&mut self, token: Token) -> error::Result<()> {
        if let Some(pending) = &self.pending {
            return compile_error(
                token.location(),
                format!(
                    "Token {} already pushed back, can not also push back {}.",
                    pending, token
                ),
            );
        }

        self.pending = Some(token);
        Ok(())
    }

    /// Classify the next lexeme in the source, skipping over any comments first.
    fn read_token(&mut self) -> error::Result<Token> {
        loop {
            let Some((location, text)) = self.buffer.next_lexeme() else {
                return Ok(Token::EndOfInput(self.buffer.location().clone()));
            };

            debug!("Read token: {} at {}", text, location);

            if let Ok(value) = text.parse::<i64>() {
                return Ok(Token::Integer(location, value));
            }

            if let Some(literal) = to_string_literal(&text) {
                return Ok(Token::String(location, literal));
            }

            if KEYWORDS.contains(&text.as_str()) {
                return Ok(Token::Keyword(location, text));
            }

            if text == "(" {
                self.skip_comment(&location)?;
                continue;
            }

            return Ok(Token::Identifier(location, text));
        }
    }

    /// Discard lexemes up to and including the `)` that closes the comment.  A `(` inside the
    /// comment opens a nested one.
    fn skip_comment(&mut self, start: &SourceLocation) -> error::Result<()> {
        let mut depth = 1_usize;

        while depth > 0 {
            match self.buffer.next_lexeme() {
                Some((_, text)) if text == "(" => depth += 1,
                Some((_, text)) if text == ")" => depth -= 1,
                Some((_, text)) => debug!("Skipping token: {}", text),
                None => return compile_error(start, "No matching ')' for '('.".to_string()),
            }
        }

        Ok(())
    }
}
