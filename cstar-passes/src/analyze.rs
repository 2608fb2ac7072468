//! Scope and type checking pass.

use std::fmt;

use cstar_parser::ast::{Expr, Operator, Program, Stmt};
use cstar_parser::lexer::TokenKind;
use cstar_parser::visitor::Visitor;
use cstar_source::{Config, Diagnostic, ErrorReporter, Source, Stage};

use crate::scope::ScopeStack;

/* Type tags */
pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const BOOL: &str = "bool";
pub const CHAR: &str = "char";
pub const STRING: &str = "string";
/// Tag given to declared functions.
pub const FUNC: &str = "func";
/// Tag given to function parameters.
pub const PARAM: &str = "param";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("undeclared variable '{0}'")]
    UndeclaredVariable(String),
    #[error("redeclaration of '{0}'")]
    Redeclaration(String),
    #[error("delete of unknown variable '{0}'")]
    UnknownSymbol(String),
    #[error("no active scope")]
    NoScope,
    #[error("cannot assign '{rhs}' to '{lhs}'")]
    AssignmentMismatch { lhs: String, rhs: String },
    #[error("cannot initialize '{declared}' with '{found}'")]
    InitializerMismatch { declared: String, found: String },
    #[error("operator '{op}' requires numeric operands of the same type, found '{lhs}' and '{rhs}'")]
    ArithmeticOperands {
        op: Operator,
        lhs: String,
        rhs: String,
    },
    #[error("comparison '{op}' between incompatible types '{lhs}' and '{rhs}'")]
    IncompatibleComparison {
        op: Operator,
        lhs: String,
        rhs: String,
    },
    #[error("logical '{op}' requires boolean operands, found '{lhs}' and '{rhs}'")]
    LogicalOperands {
        op: Operator,
        lhs: String,
        rhs: String,
    },
    #[error("{0} condition is not boolean")]
    NonBooleanCondition(Construct),
    #[error("call to undefined function '{0}'")]
    UndefinedFunction(String),
}

/// Statement kinds that carry a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    If,
    While,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::If => write!(f, "if"),
            Construct::While => write!(f, "while"),
        }
    }
}

fn is_numeric(ty: &str) -> bool {
    ty == INT || ty == FLOAT
}

/// Checks declarations, references and operand types of a [`Program`].
///
/// Problems are reported to the [`ErrorReporter`] and never stop the walk.
pub struct SemanticAnalyzer<'a> {
    scopes: ScopeStack,
    config: Config,
    errors: &'a ErrorReporter,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: &'a Source<'a>, config: Config) -> Self {
        Self::from_reporter(&source.errors, config)
    }

    pub fn from_reporter(errors: &'a ErrorReporter, config: Config) -> Self {
        Self {
            scopes: ScopeStack::new(),
            config,
            errors,
        }
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    /// Analyzes every top-level statement inside a global scope.
    pub fn analyze(&mut self, program: &Program) {
        self.trace(format_args!("analyzing {} statements", program.len()));
        self.enter_scope();
        for stmt in &program.stmts {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
        self.trace(format_args!(
            "analysis complete, {} semantic errors",
            self.errors.count(Stage::Semantic)
        ));
    }

    /// Computes the type tag of `expr`, reporting problems found on the way.
    /// Returns `None` when the type cannot be determined.
    pub fn type_of(&mut self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Number { is_float, .. } => Some(if *is_float { FLOAT } else { INT }.to_string()),
            Expr::String(_) => Some(STRING.to_string()),
            Expr::Char(_) => Some(CHAR.to_string()),
            Expr::Boolean(_) => Some(BOOL.to_string()),
            Expr::Variable(ident) => match self.scopes.lookup(ident) {
                Some(ty) => Some(ty.to_string()),
                None => {
                    self.report(SemanticError::UndeclaredVariable(ident.clone()));
                    None
                }
            },
            Expr::BinaryOp { lhs, op, rhs } => {
                let lhs = self.type_of(lhs);
                let rhs = self.type_of(rhs);
                // unknown operands were already reported
                if let (Some(lhs), Some(rhs)) = (&lhs, &rhs) {
                    self.check_operands(*op, lhs, rhs);
                }
                if op.is_arithmetic() {
                    lhs
                } else {
                    Some(BOOL.to_string())
                }
            }
            Expr::FunctionCall { name, args } => {
                if !self.scopes.contains(name) {
                    self.report(SemanticError::UndefinedFunction(name.clone()));
                }
                for arg in args {
                    self.type_of(arg);
                }
                Some(INT.to_string())
            }
        }
    }

    fn check_operands(&self, op: Operator, lhs: &str, rhs: &str) {
        let error = if op.is_arithmetic() {
            (!is_numeric(lhs) || lhs != rhs).then(|| SemanticError::ArithmeticOperands {
                op,
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            })
        } else if op.is_relational() {
            (lhs != rhs).then(|| SemanticError::IncompatibleComparison {
                op,
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            })
        } else if op.is_logical() {
            (lhs != BOOL || rhs != BOOL).then(|| SemanticError::LogicalOperands {
                op,
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            })
        } else {
            None
        };

        if let Some(error) = error {
            self.report(error);
        }
    }

    fn check_condition(&mut self, construct: Construct, condition: &Expr) {
        if self.type_of(condition).as_deref() != Some(BOOL) {
            self.report(SemanticError::NonBooleanCondition(construct));
        }
    }

    fn declare(&mut self, ty: &str, name: &str) {
        self.trace(format_args!("declaring {} '{}'", ty, name));
        if let Err(err) = self.scopes.declare(ty, name) {
            self.report(err);
        }
    }

    /// Visits `body` in a fresh scope.
    fn visit_scoped(&mut self, body: &[Stmt]) {
        self.enter_scope();
        for stmt in body {
            self.visit_stmt(stmt);
        }
        self.exit_scope();
    }

    fn enter_scope(&mut self) {
        self.scopes.enter_scope();
        self.trace(format_args!("entered scope {}", self.scopes.depth()));
    }

    fn exit_scope(&mut self) {
        self.trace(format_args!("exiting scope {}", self.scopes.depth()));
        self.scopes.exit_scope();
    }

    fn report(&self, error: SemanticError) {
        self.errors.add_error(Diagnostic::new(Stage::Semantic, error));
    }

    fn trace(&self, args: fmt::Arguments) {
        if self.config.trace {
            log::trace!("{}", args);
        }
    }
}

impl<'ast> Visitor<'ast> for SemanticAnalyzer<'_> {
    /// Same as [`SemanticAnalyzer::analyze`].
    fn visit_program(&mut self, program: &'ast Program) {
        self.analyze(program);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        self.type_of(expr);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        // Do not use default walking logic.

        match stmt {
            Stmt::Declaration {
                ty,
                ident,
                initializer,
            } => {
                if let Some(initializer) = initializer {
                    let found = self.type_of(initializer);
                    if let Some(found) = found {
                        if self.config.check_initializers && &found != ty {
                            self.report(SemanticError::InitializerMismatch {
                                declared: ty.clone(),
                                found,
                            });
                        }
                    }
                }
                self.declare(ty, ident);
            }
            Stmt::Assignment { target, value } => {
                let lhs = self.scopes.lookup(target).map(str::to_string);
                if lhs.is_none() {
                    self.report(SemanticError::UndeclaredVariable(target.clone()));
                }
                let rhs = self.type_of(value);
                if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
                    if lhs != rhs {
                        self.report(SemanticError::AssignmentMismatch { lhs, rhs });
                    }
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(Construct::If, condition);
                self.visit_scoped(then_branch);
                if !else_branch.is_empty() {
                    self.visit_scoped(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                self.check_condition(Construct::While, condition);
                self.visit_scoped(body);
            }
            Stmt::Switch { subject, cases } => {
                self.type_of(subject);
                for case in cases {
                    if let Some(label) = &case.label {
                        self.type_of(label);
                    }
                    self.visit_scoped(&case.body);
                }
            }
            Stmt::Break => {}
            Stmt::Print(token) => {
                if token.kind == TokenKind::Identifier && !self.scopes.contains(&token.text) {
                    self.report(SemanticError::UndeclaredVariable(token.text.clone()));
                }
            }
            Stmt::FunctionDeclaration {
                ident,
                params,
                body,
            } => {
                self.declare(FUNC, ident); // declared first to allow recursion

                self.enter_scope();
                for param in params {
                    self.declare(PARAM, param);
                }
                for stmt in body {
                    self.visit_stmt(stmt);
                }
                self.exit_scope();
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cstar_parser::parser::Parser;
    use test_log::test;

    /// Parses and analyzes `text`, returning the semantic error messages.
    fn analyze_with(text: &str, config: Config) -> Vec<String> {
        let source: Source = text.into();
        let program = Parser::with_config(&source, config).parse_program();
        assert!(source.has_no_errors(), "{}", source.errors);

        SemanticAnalyzer::with_config(&source, config).analyze(&program);
        source.errors.messages()
    }

    fn analyze(text: &str) -> Vec<String> {
        analyze_with(text, Config::default())
    }

    fn var(ident: &str) -> Expr {
        Expr::Variable(ident.to_string())
    }

    #[test]
    fn test_well_typed_program() {
        let errors = analyze(
            "int x = 1; float f = 2.5f; bool done = false; \
             while (x < 10 && done = false) { set x = x + 1; } \
             if (f > 1.0f) { set f = f * 2.0f; } else { print(x); }",
        );
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_undeclared_assignment_target() {
        assert_eq!(analyze("int x; set y = x;"), vec!["undeclared variable 'y'"]);
    }

    #[test]
    fn test_assignment_mismatch() {
        assert_eq!(
            analyze("int x; set x = 1; float f; set f = x;"),
            vec!["cannot assign 'int' to 'float'"]
        );
    }

    #[test]
    fn test_redeclaration() {
        assert_eq!(analyze("int a; int a;"), vec!["redeclaration of 'a'"]);
        // the first declaration wins
        assert_eq!(
            analyze("int a; float a; set a = 1;"),
            vec!["redeclaration of 'a'"]
        );
    }

    #[test]
    fn test_inner_declarations_are_invisible_after_block() {
        assert_eq!(
            analyze("if (true) { int y; set y = 1; } set y = 2;"),
            vec!["undeclared variable 'y'"]
        );
        assert_eq!(
            analyze("while (false) { int z; } print(z);"),
            vec!["undeclared variable 'z'"]
        );
    }

    #[test]
    fn test_shadowing() {
        let errors = analyze("int x; if (true) { float x; set x = 1.5f; } set x = 2;");
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_operand_types() {
        assert_eq!(
            analyze("int a = 1 + 2.5;"),
            vec!["operator '+' requires numeric operands of the same type, found 'int' and 'float'"]
        );
        assert_eq!(
            analyze("string s = \"a\" * 2;"),
            vec!["operator '*' requires numeric operands of the same type, found 'string' and 'int'"]
        );
        assert_eq!(
            analyze("if (1 = true) { }"),
            vec!["comparison '=' between incompatible types 'int' and 'bool'"]
        );
        assert_eq!(
            analyze("if (1 && true) { }"),
            vec!["logical '&&' requires boolean operands, found 'int' and 'bool'"]
        );
    }

    #[test]
    fn test_unknown_operand_suppresses_operator_check() {
        assert_eq!(analyze("if (q < 1) { }"), vec!["undeclared variable 'q'"]);
        assert_eq!(analyze("int a = q + 1.5;"), vec!["undeclared variable 'q'"]);
    }

    #[test]
    fn test_non_boolean_conditions() {
        assert_eq!(analyze("if (1 + 2) { }"), vec!["if condition is not boolean"]);
        assert_eq!(
            analyze("int x; while (x) { }"),
            vec!["while condition is not boolean"]
        );
        // unknown condition types are reported as well
        assert_eq!(
            analyze("while (w) { }"),
            vec!["undeclared variable 'w'", "while condition is not boolean"]
        );
    }

    #[test]
    fn test_errors_do_not_stop_analysis() {
        assert_eq!(
            analyze("set a = 1; int b; int b; set b = 'c'; print(d);"),
            vec![
                "undeclared variable 'a'",
                "redeclaration of 'b'",
                "cannot assign 'char' to 'int'",
                "undeclared variable 'd'",
            ]
        );
    }

    #[test]
    fn test_switch_cases_have_own_scopes() {
        let errors = analyze(
            "int x; switch (x) { case (1): int y; set y = x; case (2): int y; default: print(y); }",
        );
        assert_eq!(errors, vec!["undeclared variable 'y'"]);

        assert_eq!(
            analyze("switch (s) { case (t): break; }"),
            vec!["undeclared variable 's'", "undeclared variable 't'"]
        );
    }

    #[test]
    fn test_print_literals_need_no_declaration() {
        assert!(analyze("print(\"hi\"); print(1); print('c'); print(true);").is_empty());
    }

    #[test]
    fn test_check_initializers() {
        assert!(analyze("int x = 1.5f;").is_empty());
        assert_eq!(
            analyze_with("int x = 1.5f;", Config::default().with_check_initializers(true)),
            vec!["cannot initialize 'int' with 'float'"]
        );
    }

    #[test]
    fn test_initializer_resolved_before_declaration() {
        assert_eq!(analyze("int x = x;"), vec!["undeclared variable 'x'"]);
    }

    #[test]
    fn test_functions() {
        let program = Program::new(vec![
            Stmt::FunctionDeclaration {
                ident: "f".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
                body: vec![Stmt::Expr(var("a")), Stmt::Expr(var("b"))],
            },
            Stmt::Declaration {
                ty: INT.to_string(),
                ident: "r".to_string(),
                initializer: Some(Expr::FunctionCall {
                    name: "f".to_string(),
                    args: vec![Expr::binary(
                        Expr::Boolean(true),
                        Operator::Add,
                        Expr::number("1").unwrap(),
                    )],
                }),
            },
            Stmt::Expr(Expr::FunctionCall {
                name: "g".to_string(),
                args: Vec::new(),
            }),
            // parameters are only visible inside the function body
            Stmt::Expr(var("a")),
        ]);

        let source: Source = "".into();
        let mut analyzer = SemanticAnalyzer::new(&source);
        analyzer.analyze(&program);
        assert_eq!(analyzer.scopes().depth(), 0);
        assert_eq!(
            source.errors.messages(),
            vec![
                "operator '+' requires numeric operands of the same type, found 'bool' and 'int'",
                "call to undefined function 'g'",
                "undeclared variable 'a'",
            ]
        );
    }

    #[test]
    fn test_visit_program_uses_global_scope() {
        let source: Source = "int a; if (true) { int b; } int a;".into();
        let program = Parser::new(&source).parse_program();

        let mut analyzer = SemanticAnalyzer::new(&source);
        analyzer.visit_program(&program);
        assert_eq!(analyzer.scopes().depth(), 0);
        assert_eq!(source.errors.messages(), vec!["redeclaration of 'a'"]);

        // a second walk starts from a fresh global scope
        analyzer.visit_program(&program);
        assert_eq!(analyzer.scopes().depth(), 0);
        assert_eq!(source.errors.len(), 2);
    }

    #[test]
    fn test_type_of() {
        let source: Source = "".into();
        let mut analyzer = SemanticAnalyzer::new(&source);
        analyzer.scopes.enter_scope();
        analyzer.scopes.declare(FLOAT, "f").unwrap();

        fn ty(analyzer: &mut SemanticAnalyzer, text: &str) -> Option<String> {
            let source: Source = text.into();
            let expr = Parser::new(&source).parse_logic().unwrap();
            analyzer.type_of(&expr)
        }
        assert_eq!(ty(&mut analyzer, "f * 2.0f").as_deref(), Some(FLOAT));
        assert_eq!(ty(&mut analyzer, "1 % 2").as_deref(), Some(INT));
        assert_eq!(ty(&mut analyzer, "f < 1.0f || false").as_deref(), Some(BOOL));
        assert_eq!(ty(&mut analyzer, "'c'").as_deref(), Some(CHAR));
        assert_eq!(ty(&mut analyzer, "\"s\"").as_deref(), Some(STRING));
        assert_eq!(ty(&mut analyzer, "missing"), None);
        assert_eq!(
            source.errors.messages(),
            vec!["undeclared variable 'missing'"]
        );
    }

    #[test]
    fn test_trace_does_not_change_result() {
        let text = "int a; set a = 1.5f; if (a) { }";
        assert_eq!(
            analyze(text),
            analyze_with(text, Config::default().with_trace(true))
        );
    }
}
