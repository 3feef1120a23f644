//! Lexical scanning of SQL text.
//!
//! Yields only the characters that SQLite would treat as code: the contents
//! of string literals, quoted identifiers and comments are skipped, along
//! with their delimiters.

use std::iter::Peekable;
use std::str::CharIndices;

/// Iterator over `(byte offset, char)` pairs outside literals and comments.
pub struct CodeChars<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> CodeChars<'a> {
    pub fn new(sql: &'a str) -> Self {
        Self {
            chars: sql.char_indices().peekable(),
        }
    }

    fn next_is(&mut self, expected: char) -> bool {
        matches!(self.chars.peek(), Some((_, c)) if *c == expected)
    }

    /// Skip to the closing delimiter. A doubled quote is an escaped quote.
    fn skip_quoted(&mut self, close: char) {
        while let Some((_, c)) = self.chars.next() {
            if c == close {
                if close != ']' && self.next_is(close) {
                    self.chars.next();
                    continue;
                }
                return;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        for (_, c) in self.chars.by_ref() {
            if c == '\n' {
                return;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        while let Some((_, c)) = self.chars.next() {
            if c == '*' && self.next_is('/') {
                self.chars.next();
                return;
            }
        }
    }
}

impl Iterator for CodeChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (offset, c) = self.chars.next()?;
            match c {
                '\'' | '"' | '`' => self.skip_quoted(c),
                '[' => self.skip_quoted(']'),
                '-' if self.next_is('-') => self.skip_line_comment(),
                '/' if self.next_is('*') => {
                    self.chars.next();
                    self.skip_block_comment();
                }
                _ => return Some((offset, c)),
            }
        }
    }
}

/// True when `sql` holds more than one statement.
///
/// A single trailing `;`, optionally followed by whitespace or comments, is
/// still one statement.
pub fn has_trailing_statement(sql: &str) -> bool {
    let mut code = CodeChars::new(sql);
    if !code.any(|(_, c)| c == ';') {
        return false;
    }
    code.any(|(_, c)| !c.is_whitespace() && c != ';')
}
