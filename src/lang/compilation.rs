use crate::{
    lang::{
        code::{AbstractOp, OpList, Opcode, TOP_LEVEL_WORD, Word, WordList},
        source_buffer::SourceLocation,
        tokenizing::{Lexer, Token},
    },
    runtime::{
        built_ins::lookup_primitive,
        data_structures::value::Value,
        error::{self, compile_error},
    },
};
use log::debug;

/// How deeply conditionals may nest.  Each level of nesting is a level of recursion in the
/// compiler.
pub const MAX_NESTING: usize = 256;

/// Compiles a token stream into words of abstract operations.
///
/// Statements outside of any definition are gathered into a final word named by TOP_LEVEL_WORD.
/// Definitions are appended to the word list as they are finished, so the top-level word always
/// comes after every definition in its source.
pub struct Compiler<'a> {
    lexer: Lexer<'a>,

    /// Where the source starts, used as the top-level word's location.
    start: SourceLocation,

    /// Are we inside a `: ... ;` definition?  Definitions can not be nested.
    defining: bool,

    /// How many conditionals enclose the statements being compiled.
    nesting: usize,

    /// The words finished so far.
    words: WordList,
}

impl<'a> Compiler<'a> {
    /// Create a compiler over the source text.  The path is only used to tag locations.
    pub fn new(path: &str, source: &'a str) -> Self {
        Compiler {
            lexer: Lexer::new(path, source),
            start: SourceLocation::new_from_path(path),
            defining: false,
            nesting: 0,
            words: WordList::new(),
        }
    }

    /// The definitions finished so far.
    pub fn words(&self) -> &WordList {
        &self.words
    }

    /// Compile the whole source.  Returns every definition in source order followed by the
    /// top-level word.
    pub fn compile_program(mut self) -> error::Result<WordList> {
        let top_level = self.compile(&[])?;
        let word = Word::new(TOP_LEVEL_WORD.to_string(), self.start.clone(), top_level);

        debug!("Finished {} with {} ops.", TOP_LEVEL_WORD, word.len());

        self.words.push(word);
        Ok(self.words)
    }

    /// Compile statements until end of input, or until one of the stop words is read.  The stop
    /// word is pushed back so the caller can inspect it.
    pub fn compile(&mut self, stop_words: &[&str]) -> error::Result<OpList> {
        let mut ops = OpList::new();

        loop {
            let token = self.lexer.next_token()?;

            let is_stop_word = matches!(&token,
                                        Token::Keyword(_, keyword)
                                            if stop_words.contains(&keyword.as_str()));

            if is_stop_word {
                self.lexer.pushback(token)?;
                return Ok(ops);
            }

            match token {
                Token::Integer(_, value) => ops.push(AbstractOp::push(Value::Int(value))),

                Token::String(_, text) => ops.push(AbstractOp::push(Value::String(text))),

                Token::Identifier(location, name) => {
                    ops.push(self.compile_identifier(&location, name)?)
                }

                Token::Keyword(location, keyword) => match keyword.as_str() {
                    ":" => self.compile_word(&location)?,

                    ";" if self.defining => {
                        return compile_error(&location, "Unexpected ';' inside of a conditional.".to_string());
                    }

                    ";" => {
                        return compile_error(&location, "Can't use ';' outside of a word definition.".to_string());
                    }

                    "if" => ops.extend(self.compile_if(&location)?),

                    "else" | "then" => {
                        return compile_error(&location, format!("Unmatched '{}' without an 'if'.", keyword));
                    }

                    _ => return compile_error(&location, format!("Unknown token '{}'.", keyword)),
                },

                Token::EndOfInput(_) => return Ok(ops),
            }
        }
    }

    /// Compile a reference to a word.  Primitives compile to their own opcode.  A name followed by
    /// `!` or `@` stores into or fetches from the variable of that name.  Anything else is a call.
    fn compile_identifier(&mut self, location: &SourceLocation, name: String) -> error::Result<AbstractOp> {
        if let Some((opcode, argument)) = lookup_primitive(&name) {
            return Ok(AbstractOp::new(opcode, argument, Value::Void));
        }

        let next = self.lexer.peek()?;

        let variable_op = if next.is_identifier("!") {
            Some(Opcode::Store)
        } else if next.is_identifier("@") {
            Some(Opcode::Fetch)
        } else {
            None
        };

        match variable_op {
            Some(opcode) => {
                let _ = self.lexer.next_token()?;

                debug!("Variable {} {} at {}.", opcode, name, location);
                Ok(AbstractOp::new(opcode, 0, Value::String(name)))
            }

            None => Ok(AbstractOp::call(&name)),
        }
    }

    /// Compile a `: name ... ;` definition and add the finished word to the word list.
    fn compile_word(&mut self, location: &SourceLocation) -> error::Result<()> {
        if self.defining {
            return compile_error(location, "Can't nest word definitions.".to_string());
        }

        let name = match self.lexer.next_token()? {
            Token::Identifier(_, name) => name,
            token => {
                return compile_error(token.location(), format!("'{}' isn't a valid word name.", token));
            }
        };

        self.defining = true;

        let body = self.compile(&[";"])?;

        // Consume the trailing ';' token.
        let terminator = self.lexer.next_token()?;

        if !terminator.is_keyword(";") {
            return compile_error(location, format!("End of input during the definition of '{}'.", name));
        }

        self.defining = false;

        let word = Word::new(name, location.clone(), body);

        debug!("Finished word {} with {} ops.", word.name, word.len());

        self.words.push(word);
        Ok(())
    }

    /// Compile an `if ... then` or `if ... else ... then` conditional, refusing to nest past
    /// MAX_NESTING.
    fn compile_if(&mut self, location: &SourceLocation) -> error::Result<OpList> {
        if self.nesting >= MAX_NESTING {
            return compile_error(location, format!("Conditionals nested more than {} deep.", MAX_NESTING));
        }

        self.nesting += 1;
        let result = self.compile_branches(location);
        self.nesting -= 1;

        result
    }

    /// Compile the branches of a conditional up to and including its `then`.
    ///
    /// Jump distances are relative to the jump itself: the conditional jump skips the true branch,
    /// and when there is a false branch the true branch ends with a jump over it.
    fn compile_branches(&mut self, location: &SourceLocation) -> error::Result<OpList> {
        let true_branch = self.compile(&["else", "then"])?;
        let terminator = self.lexer.next_token()?;

        let mut ops = OpList::with_capacity(true_branch.len() + 2);

        if terminator.is_keyword("then") {
            ops.push(AbstractOp::jump_if_not(branch_distance(location, &true_branch, 1)?));
            ops.extend(true_branch);
        } else if terminator.is_keyword("else") {
            let false_branch = self.compile(&["then"])?;

            if !self.lexer.next_token()?.is_keyword("then") {
                return compile_error(location, "Unterminated 'if ... else', missing 'then'.".to_string());
            }

            ops.push(AbstractOp::jump_if_not(branch_distance(location, &true_branch, 2)?));
            ops.extend(true_branch);
            ops.push(AbstractOp::jump(branch_distance(location, &false_branch, 1)?));
            ops.extend(false_branch);
        } else {
            return compile_error(location, "Unterminated 'if', missing 'then'.".to_string());
        }

        Ok(ops)
    }
}

/// The distance a jump needs to cover to skip the branch plus the given number of extra ops.
fn branch_distance(location: &SourceLocation, branch: &OpList, extra: usize) -> error::Result<u32> {
    match u32::try_from(branch.len() + extra) {
        Ok(distance) => Ok(distance),
        Err(_) => compile_error(location, "Conditional branch is too long.".to_string()),
    }
}

/// Compile one source into its words, definitions first and top-level code last.
pub fn compile_source(path: &str, source: &str) -> error::Result<WordList> {
    Compiler::new(path, source).compile_program()
}
