//! Semantic passes over the cstar AST.

pub mod analyze;
pub mod scope;
