//! Lexer, AST and parser for the cstar language.

pub mod ast;
pub mod display;
pub mod lexer;
pub mod parser;
pub mod visitor;
