//! Runs the cstar front end: lexing, parsing and semantic analysis.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cstar_parser::ast::Program;
use cstar_parser::parser::Parser;
use cstar_passes::analyze::SemanticAnalyzer;
use cstar_source::{Config, Diagnostic, Source, Stage};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Lexical and syntax errors together.
    #[error("compilation failed with {0} syntax error(s)")]
    Syntax(usize),
    #[error("compilation failed with {0} semantic error(s)")]
    Semantic(usize),
}

/// The result of running the front end over one program.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// Statements parsed before the first syntax error, or the whole program.
    pub program: Program,
    /// Every reported problem in reporting order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compilation {
    /// Number of diagnostics reported by `stage`.
    pub fn count(&self, stage: Stage) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.stage == stage)
            .count()
    }

    pub fn has_no_errors(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Decides whether the program may proceed to code emission.
    ///
    /// Lexical and syntax errors always fail. Semantic errors fail only when
    /// `strict` is set.
    pub fn verdict(&self, strict: bool) -> Result<(), CompileError> {
        let syntax = self.count(Stage::Lexical) + self.count(Stage::Syntax);
        if syntax > 0 {
            return Err(CompileError::Syntax(syntax));
        }
        let semantic = self.count(Stage::Semantic);
        if strict && semantic > 0 {
            return Err(CompileError::Semantic(semantic));
        }
        Ok(())
    }
}

/// Lexes, parses and analyzes `text`. Analysis is skipped when parsing stopped
/// at a syntax error.
pub fn compile(text: &str, config: Config) -> Compilation {
    let source = Source::new(text);
    let program = Parser::with_config(&source, config).parse_program();

    if source.errors.count(Stage::Syntax) == 0 {
        SemanticAnalyzer::with_config(&source, config).analyze(&program);
    } else {
        log::info!("skipping semantic analysis after syntax errors");
    }

    Compilation {
        program,
        diagnostics: source.errors.diagnostics(),
    }
}

/// Reads the file at `path` and [`compile`]s its contents.
pub fn compile_file(path: impl AsRef<Path>, config: Config) -> Result<Compilation, CompileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    Ok(compile(&text, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict() {
        let clean = compile("int x = 1; print(x);", Config::default());
        assert!(clean.has_no_errors());
        assert!(clean.verdict(true).is_ok());

        let semantic = compile("set y = 1;", Config::default());
        assert_eq!(semantic.count(Stage::Semantic), 1);
        assert!(semantic.verdict(false).is_ok());
        assert!(matches!(semantic.verdict(true), Err(CompileError::Semantic(1))));

        let syntax = compile("int x = ;", Config::default());
        assert!(matches!(syntax.verdict(false), Err(CompileError::Syntax(2))));
    }

    #[test]
    fn test_analysis_skipped_after_syntax_error() {
        let compilation = compile("set y = 1; int", Config::default());
        assert_eq!(compilation.program.len(), 1);
        assert_eq!(compilation.count(Stage::Semantic), 0);
        assert_eq!(compilation.count(Stage::Syntax), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = compile_file("does/not/exist.cstar", Config::default()).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
        assert_eq!(err.to_string(), "failed to read 'does/not/exist.cstar'");
    }
}
