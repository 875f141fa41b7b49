use core::str::Chars;
use std::fmt::{ self,
                Display,
                Formatter };



/// Where in the source text a token was found.  Compile errors report this so the user can find
/// the offending text.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SourceLocation
{
    /// Either the path to the file or a tag describing the source, for example `<stdin>`.
    path: String,

    /// The 1 based line number.
    line: usize,

    /// The 1 based column number.
    column: usize
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new_from_path("unspecified")
    }
}


/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl SourceLocation
{
    /// Start of the source identified by the given path or tag.
    pub fn new_from_path(path: &str) -> Self
    {
        SourceLocation { path: path.to_owned(), line: 1, column: 1 }
    }

    pub fn path(&self) -> &String
    {
        &self.path
    }

    pub fn line(&self) -> usize
    {
        self.line
    }

    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// A forward only cursor over source text.  As characters are consumed the cursor's location is
/// kept up to date so the tokenizer can stamp every lexeme with where it started.
///
/// The buffer only borrows the source text, which must outlive it.
pub struct SourceBuffer<'a>
{
    chars: Chars<'a>,

    /// The logical location of the cursor in the source code.
    location: SourceLocation,

    /// A character that has been peeked at but not yet consumed.
    current: Option<char>
}


impl<'a> SourceBuffer<'a>
{
    pub fn new(path: &str, source: &'a str) -> Self
    {
        SourceBuffer
            {
                chars: source.chars(),
                location: SourceLocation::new_from_path(path),
                current: None
            }
    }

    /// The location the cursor is at in the source code being processed.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// Take a peek at the next character in the source code without consuming it.
    pub fn peek_next(&mut self) -> Option<char>
    {
        if self.current.is_none()
        {
            self.current = self.chars.next();
        }

        self.current
    }

    /// Get and consume the next character in the source code.
    pub fn next_char(&mut self) -> Option<char>
    {
        let next = match self.current.take()
            {
                Some(current) => Some(current),
                None          => self.chars.next()
            };

        if let Some(next_char) = next
        {
            self.increment_location(next_char);
        }

        next
    }

    /// Skip any whitespace and then consume the next run of non-whitespace characters.  Returns
    /// the lexeme along with the location of its first character, or None once the source is
    /// exhausted.
    pub fn next_lexeme(&mut self) -> Option<( SourceLocation, String )>
    {
        while let Some(next) = self.peek_next()
            && next.is_whitespace()
        {
            let _ = self.next_char();
        }

        let location = self.location.clone();
        let mut text = String::new();

        while let Some(next) = self.peek_next()
            && !next.is_whitespace()
        {
            text.push(next);
            let _ = self.next_char();
        }

        if text.is_empty()
        {
            None
        }
        else
        {
            Some(( location, text ))
        }
    }

    /// Advance one column for regular characters.  Reset the column to 1 and increment the line
    /// for new line characters.
    fn increment_location(&mut self, next: char)
    {
        if next == '\n'
        {
            self.location.line += 1;
            self.location.column = 1;
        }
        else
        {
            self.location.column += 1;
        }
    }
}
