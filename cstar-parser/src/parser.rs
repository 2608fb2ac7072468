use std::fmt;

use crate::ast::{Expr, Program, Stmt};
use crate::lexer::{Lexer, Token, TokenKind};
use cstar_source::{Config, Diagnostic, ErrorReporter, Source, Stage};

mod expr;
mod stmt;

/// Maximum number of nested blocks, else-if links and parentheses.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found '{found}'")]
    Expected {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str, line: usize },
    #[error("invalid statement at token index {index}: {text}")]
    InvalidStatement {
        index: usize,
        text: String,
        line: usize,
    },
    #[error("invalid token '{text}' for print statement")]
    InvalidPrintArgument { text: String, line: usize },
    #[error("malformed number literal '{text}'")]
    MalformedNumber { text: String, line: usize },
    #[error("nesting deeper than {limit} levels")]
    TooDeeplyNested { limit: usize, line: usize },
}

impl ParseError {
    /// Source line of the offending token.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Expected { line, .. }
            | ParseError::UnexpectedEof { line, .. }
            | ParseError::InvalidStatement { line, .. }
            | ParseError::InvalidPrintArgument { line, .. }
            | ParseError::MalformedNumber { line, .. }
            | ParseError::TooDeeplyNested { line, .. } => *line,
        }
    }
}

pub struct Parser<'a> {
    /// Materialized token sequence. Always ends with exactly one `EndOfFile` token.
    tokens: Vec<Token>,
    /// Index of the current token. Never moves past the `EndOfFile` token.
    cursor: usize,
    /// Current nesting depth, bounded by [`MAX_NESTING`].
    depth: usize,
    config: Config,
    errors: &'a ErrorReporter,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: &'a Source<'a>, config: Config) -> Self {
        let tokens = Lexer::from_source(source).tokenize();
        Self::from_tokens(tokens, &source.errors, config)
    }

    /// Create a parser over an already materialized token sequence. A missing
    /// trailing `EndOfFile` token is appended.
    pub fn from_tokens(mut tokens: Vec<Token>, errors: &'a ErrorReporter, config: Config) -> Self {
        if let Some(eof) = tokens.iter().position(Token::is_eof) {
            tokens.truncate(eof + 1);
        } else {
            let line = tokens.last().map_or(0, |token| token.line);
            tokens.push(Token::new(TokenKind::EndOfFile, "", line));
        }

        Self {
            tokens,
            cursor: 0,
            depth: 0,
            config,
            errors,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Parser<'a> {
    /// Parses top-level statements until the end of input. Parsing stops at the
    /// first syntax error; the statements parsed up to that point are returned.
    pub fn parse_program(&mut self) -> Program {
        self.trace(format_args!("starting parse of {} tokens", self.tokens.len()));

        let mut stmts = Vec::new();
        while self.cursor + 1 < self.tokens.len() {
            self.trace(format_args!(
                "parsing statement at token '{}'",
                self.current().text
            ));
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors
                        .add_error(Diagnostic::at_line(Stage::Syntax, &err, err.line()));
                    let token = self.current();
                    self.errors.add_error(Diagnostic::at_line(
                        Stage::Syntax,
                        format!(
                            "compilation stopped at token index {}: {}",
                            self.cursor, token.text
                        ),
                        token.line,
                    ));
                    break;
                }
            }
        }

        self.trace(format_args!("parsing complete, found {} statements", stmts.len()));
        Program::new(stmts)
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    /// Moves past the current token and returns it. Stays on the `EndOfFile` token.
    fn next(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is_eof() {
            self.cursor += 1;
        }
        token
    }

    /// Eats the current token if it is the punctuation `punct`.
    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.current().is_punct(punct) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, punct: &str, expected: &'static str) -> Result<(), ParseError> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<String, ParseError> {
        if self.current().kind == TokenKind::Identifier {
            Ok(self.next().text)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Runs `parse` one nesting level deeper. Fails instead of recursing past
    /// [`MAX_NESTING`] levels.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeeplyNested {
                limit: MAX_NESTING,
                line: self.current().line,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Creates an error for an unexpected current token.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.current();
        if token.is_eof() {
            ParseError::UnexpectedEof {
                expected,
                line: token.line,
            }
        } else {
            ParseError::Expected {
                expected,
                found: token.text.clone(),
                line: token.line,
            }
        }
    }

    fn trace(&self, message: fmt::Arguments<'_>) {
        if self.config.trace {
            log::trace!("{}", message);
        }
    }
}
