use std::fmt;

use phf::{phf_set, Set};

pub static KEYWORDS: Set<&'static str> = phf_set! {
    "if", "elif", "else", "switch", "case", "default",
    "while", "for", "break", "continue", "return", "set",
    "class", "struct", "interface", "private", "protected",
    "public", "static", "true", "false", "const",
    "int", "float", "double", "char", "bool", "void",
    "string", "new", "base", "extends", "print",
};

/// Subset of [`KEYWORDS`] naming a type.
pub static DATA_TYPES: Set<&'static str> = phf_set! {
    "int", "float", "double", "char", "bool", "void", "string",
};

/// `=` is both assignment and equality; `set` disambiguates at statement level.
pub static OPERATORS: Set<&'static str> = phf_set! {
    "+", "-", "*", "/", "%", "++", "--", "=", "!=",
    "<", ">", "<=", ">=", "&&", "||", "!", ".",
};

pub static PUNCTUATION: Set<char> = phf_set! {
    ';', '(', ')', '{', '}', ',', ':',
};

/// Characters that may start an operator.
pub fn is_operator_lead(c: char) -> bool {
    "+-*/%<>=!&|.".contains(c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    /// A keyword naming a type (e.g. `int`).
    DataType,
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    BoolLiteral,
    Operator,
    Punctuation,
    Unknown,
    EndOfFile,
}

impl TokenKind {
    /// Returns `true` for the literal kinds (number, char, string and bool).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::BoolLiteral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "Keyword",
            TokenKind::DataType => "Data Type",
            TokenKind::Identifier => "Identifier (Variable/Other)",
            TokenKind::IntegerLiteral => "Literal (Integer)",
            TokenKind::FloatLiteral => "Literal (Float/Double)",
            TokenKind::CharLiteral => "Literal (Char)",
            TokenKind::StringLiteral => "Literal (String)",
            TokenKind::BoolLiteral => "Literal (Boolean)",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuation => "Punctuation",
            TokenKind::Unknown => "Unknown",
            TokenKind::EndOfFile => "EOF",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit. Immutable once produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text. String and char literals exclude their quotes.
    pub text: String,
    /// Source line (1-based).
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Returns `true` if the token is the punctuation `punct`.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    /// Returns `true` if the token is the operator `op`.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns `true` if the token is the keyword `keyword`.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }
}
