//! Lexer (tokenizer) for the circuit definition language.
//!
//! Whitespace and both comment forms are skipped between tokens:
//!
//! ```text
//! \\ line comment, runs to the end of the line
//! \* block comment, runs to the first *\ (no nesting) *\
//! ```
//!
//! The lexer never fails. Characters it cannot place become
//! [`TokenKind::Invalid`] tokens and the parser decides what to do with them.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use tracing::trace;

use super::items::Section;
use super::names::{SymbolId, SymbolTable};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
    /// Byte range of the token in the source
    pub span: Range<usize>,
}

/// Token types in the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// ','
    Comma,
    /// ';'
    Semicolon,
    /// ':'
    Colon,
    /// '.'
    Dot,
    /// '->'
    Arrow,
    /// A section header or device kind
    Keyword(SymbolId),
    /// Any other word
    Name(SymbolId),
    /// A non-negative integer
    Number(u64),
    /// End of input
    Eof,
    /// A character the language has no use for
    Invalid,
}

/// The closed set of reserved words.
///
/// Section headers are fixed; device kinds come from the device builder.
#[derive(Debug, Clone)]
pub struct Keywords {
    devices: SymbolId,
    connections: SymbolId,
    monitor: SymbolId,
    device_kinds: Vec<SymbolId>,
}

impl Keywords {
    /// Intern the section headers and the given device kinds.
    pub fn new(names: &mut SymbolTable, device_kinds: &[&str]) -> Self {
        Self {
            devices: names.intern(Section::Devices.keyword()),
            connections: names.intern(Section::Connections.keyword()),
            monitor: names.intern(Section::Monitor.keyword()),
            device_kinds: names.lookup_many(device_kinds),
        }
    }

    /// Id of a section's header keyword.
    pub fn section_id(&self, section: Section) -> SymbolId {
        match section {
            Section::Devices => self.devices,
            Section::Connections => self.connections,
            Section::Monitor => self.monitor,
        }
    }

    /// The section a keyword opens, if any.
    pub fn section(&self, id: SymbolId) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|&section| self.section_id(section) == id)
    }

    pub fn is_device_kind(&self, id: SymbolId) -> bool {
        self.device_kinds.contains(&id)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.section(id).is_some() || self.is_device_kind(id)
    }
}

/// Lexer for tokenizing circuit definitions.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    names: &'a mut SymbolTable,
    keywords: Keywords,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str, names: &'a mut SymbolTable, keywords: Keywords) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            names,
            keywords,
            line: 1,
            column: 1,
        }
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.input
    }

    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Get the next token. Keeps returning [`TokenKind::Eof`] once the input
    /// is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.pos();
        let line = self.line;
        let column = self.column;

        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(ch) if ch.is_alphabetic() => {
                let word = self.read_while(char::is_alphanumeric);
                let id = self.names.intern(word);
                if self.keywords.contains(id) {
                    TokenKind::Keyword(id)
                } else {
                    TokenKind::Name(id)
                }
            }
            Some(ch) if ch.is_ascii_digit() => {
                let digits = self.read_while(|c| c.is_ascii_digit());
                TokenKind::Number(digits.parse().unwrap_or(u64::MAX))
            }
            Some(ch) => {
                self.advance();
                match ch {
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    ':' => TokenKind::Colon,
                    '.' => TokenKind::Dot,
                    '-' => {
                        if self.peek() == Some('>') {
                            self.advance();
                            TokenKind::Arrow
                        } else {
                            TokenKind::Invalid
                        }
                    }
                    _ => TokenKind::Invalid,
                }
            }
        };

        let end = self.pos();
        let token = Token {
            kind,
            text: self.input[start..end].to_string(),
            line,
            column,
            span: start..end,
        };
        trace!(kind = ?token.kind, line, column, "token");
        token
    }

    fn pos(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn peek_second(&mut self) -> Option<char> {
        let pos = self.pos();
        self.input[pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos();
        while self.peek().is_some_and(&accept) {
            self.advance();
        }
        let end = self.pos();
        &self.input[start..end]
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }
            if self.peek() != Some('\\') {
                return;
            }
            match self.peek_second() {
                Some('\\') => self.skip_line_comment(),
                Some('*') => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.advance();
        self.advance();
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(ch) = self.advance() {
            if ch == '*' && self.peek() == Some('\\') {
                self.advance();
                return;
            }
        }
    }
}
