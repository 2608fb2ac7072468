//! Line-buffered scanner turning a character stream into [`Token`]s.

use std::collections::BTreeSet;
use std::io::{self, BufRead};

use cstar_source::{Diagnostic, ErrorReporter, Source, Stage};

mod token;

pub use token::*;

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated char literal")]
    UnterminatedChar,
    #[error("multi-character or unterminated char literal")]
    MultiCharacterChar,
    #[error("unterminated multi-line comment")]
    UnterminatedComment,
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

pub struct Lexer<'a, R> {
    input: R,
    /// The line currently being scanned, including a synthetic trailing `'\n'`.
    current_line: Vec<char>,
    /// Line number of `current_line` (1-based). `0` before the first read.
    line: usize,
    /// Index of the next character within `current_line`.
    cursor: usize,
    eof_reached: bool,
    /// Set once the iterator has yielded the `EndOfFile` token.
    exhausted: bool,
    lines_with_tokens: BTreeSet<usize>,
    errors: &'a ErrorReporter,
}

impl<'a> Lexer<'a, &'a [u8]> {
    /// Create a lexer over the content of `source`, reporting into its errors.
    pub fn from_source(source: &'a Source<'a>) -> Self {
        Self::new(source.content.as_bytes(), &source.errors)
    }
}

impl<'a, R: BufRead> Lexer<'a, R> {
    pub fn new(input: R, errors: &'a ErrorReporter) -> Self {
        Self {
            input,
            current_line: Vec::new(),
            line: 0,
            cursor: 0,
            eof_reached: false,
            exhausted: false,
            lines_with_tokens: BTreeSet::new(),
            errors,
        }
    }

    /// Scans the next token. Once the stream is exhausted, every call returns an
    /// [`TokenKind::EndOfFile`] token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let c = match self.peek() {
            Some(c) => c,
            None => return Token::new(TokenKind::EndOfFile, "", line),
        };

        // order of checks matters
        let token = if PUNCTUATION.contains(&c) {
            self.consume();
            Token::new(TokenKind::Punctuation, c, line)
        } else if c == '"' {
            self.read_string_literal()
        } else if c == '\'' {
            self.read_char_literal()
        } else if c.is_ascii_digit()
            || (c == '.' && matches!(self.peek_in_line(1), Some(d) if d.is_ascii_digit()))
        {
            self.read_number_literal()
        } else if c.is_ascii_alphabetic() || c == '_' {
            self.read_identifier_or_keyword()
        } else if is_operator_lead(c) {
            self.read_operator()
        } else {
            self.consume();
            Token::new(TokenKind::Unknown, c, line)
        };

        if token.kind != TokenKind::Unknown || !token.text.is_empty() {
            self.lines_with_tokens.insert(token.line);
        }

        token
    }

    /// Materializes the remaining stream. The last element is always the single
    /// `EndOfFile` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    /// Number of distinct lines that produced at least one token so far.
    pub fn effective_line_count(&self) -> usize {
        self.lines_with_tokens.len()
    }

    fn report(&self, error: LexError, line: usize) {
        self.errors
            .add_error(Diagnostic::at_line(Stage::Lexical, error, line));
    }

    /// Returns the current character, reading new lines as needed. `None` at end of stream.
    fn peek(&mut self) -> Option<char> {
        if self.eof_reached {
            return None;
        }

        while self.cursor >= self.current_line.len() {
            let mut buf = String::new();
            match self.input.read_line(&mut buf) {
                Ok(0) => {
                    self.eof_reached = true;
                    return None;
                }
                Ok(_) => {}
                Err(err) => {
                    self.report(LexError::Io(err), self.line);
                    self.eof_reached = true;
                    return None;
                }
            }

            if buf.ends_with('\n') {
                buf.pop();
            }
            self.line += 1;
            self.cursor = 0;
            self.current_line = buf.chars().collect();
            self.current_line.push('\n'); // handled like any other whitespace
        }

        Some(self.current_line[self.cursor])
    }

    /// Looks `offset` characters ahead without leaving the buffered line.
    fn peek_in_line(&self, offset: usize) -> Option<char> {
        self.current_line.get(self.cursor + offset).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.cursor += 1;
        }
        c
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.consume();
                continue;
            }

            if c == '/' && self.peek_in_line(1) == Some('/') {
                while !matches!(self.peek(), Some('\n') | None) {
                    self.consume();
                }
                continue;
            }

            if c == '/' && self.peek_in_line(1) == Some('*') {
                self.consume();
                self.consume();
                loop {
                    match self.consume() {
                        None => {
                            self.report(LexError::UnterminatedComment, self.line);
                            self.eof_reached = true;
                            return;
                        }
                        Some('*') if self.peek() == Some('/') => {
                            self.consume();
                            break;
                        }
                        Some(_) => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            text.push(c);
            self.consume();
        }

        let kind = if KEYWORDS.contains(text.as_str()) {
            if DATA_TYPES.contains(text.as_str()) {
                TokenKind::DataType
            } else if text == "true" || text == "false" {
                TokenKind::BoolLiteral
            } else {
                TokenKind::Keyword
            }
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, line)
    }

    /// Reads an integer or float literal. A `.` or a trailing `f` makes it a float.
    fn read_number_literal(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        let mut has_decimal = false;
        let mut is_float = false;

        if self.peek() == Some('.') {
            // the caller checked that a digit follows
            has_decimal = true;
            is_float = true;
            text.push('.');
            self.consume();
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.consume();
            } else if c == '.' && !has_decimal {
                has_decimal = true;
                is_float = true;
                text.push(c);
                self.consume();
            } else if c == 'f' && text != "." {
                is_float = true;
                text.push(c);
                self.consume();
                break; // 'f' ends the literal
            } else {
                break;
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        Token::new(kind, text, line)
    }

    /// Reads a string literal. No escape sequences; a string may not span lines.
    fn read_string_literal(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        self.consume(); // opening '"'

        while self.peek() != Some('"') {
            match self.consume() {
                None | Some('\n') => {
                    self.report(LexError::UnterminatedString, line);
                    return Token::new(TokenKind::Unknown, text, line);
                }
                Some(c) => text.push(c),
            }
        }
        self.consume(); // closing '"'

        Token::new(TokenKind::StringLiteral, text, line)
    }

    /// Reads a char literal holding exactly one character.
    fn read_char_literal(&mut self) -> Token {
        let line = self.line;
        self.consume(); // opening '\''

        let value = match self.consume() {
            None | Some('\n') => {
                self.report(LexError::UnterminatedChar, line);
                return Token::new(TokenKind::Unknown, "", line);
            }
            Some(c) => c,
        };

        if self.peek() != Some('\'') {
            self.report(LexError::MultiCharacterChar, line);
            while !matches!(self.peek(), Some('\'') | Some('\n') | None) {
                self.consume();
            }
            if self.peek() == Some('\'') {
                self.consume();
            }
            return Token::new(TokenKind::Unknown, value, line);
        }
        self.consume(); // closing '\''

        Token::new(TokenKind::CharLiteral, value, line)
    }

    /// Reads an operator, preferring the two character spelling.
    fn read_operator(&mut self) -> Token {
        let line = self.line;
        let mut text = String::new();
        if let Some(first) = self.consume() {
            text.push(first);
        }

        if let Some(second) = self.peek() {
            let two_char = format!("{}{}", text, second);
            if OPERATORS.contains(two_char.as_str()) {
                self.consume();
                return Token::new(TokenKind::Operator, two_char, line);
            }
        }

        if OPERATORS.contains(text.as_str()) {
            Token::new(TokenKind::Operator, text, line)
        } else {
            Token::new(TokenKind::Unknown, text, line)
        }
    }
}

impl<'a, R: BufRead> Iterator for Lexer<'a, R> {
    type Item = Token;

    /// Yields tokens up to and including the `EndOfFile` token, then `None`.
    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.exhausted = true;
        }
        Some(token)
    }
}
