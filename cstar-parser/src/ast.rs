use std::fmt;

use crate::lexer::{Token, TokenKind};

/// Binary (and prefix `!`) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Increment,
    Decrement,
    Equal,
    NotEqual,
    LessThan,
    LessThanEqualTo,
    GreaterThan,
    GreaterThanEqualTo,
    And,
    Or,
    Not,
}

impl Operator {
    /// Returns the operator spelled `text` or `None` if not an operator.
    pub fn from_spelling(text: &str) -> Option<Self> {
        let op = match text {
            "+" => Operator::Add,
            "-" => Operator::Subtract,
            "*" => Operator::Multiply,
            "/" => Operator::Divide,
            "%" => Operator::Modulus,
            "++" => Operator::Increment,
            "--" => Operator::Decrement,
            "=" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "<" => Operator::LessThan,
            "<=" => Operator::LessThanEqualTo,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanEqualTo,
            "&&" => Operator::And,
            "||" => Operator::Or,
            "!" => Operator::Not,
            _ => return None,
        };
        Some(op)
    }

    /// Source spelling of the operator. Equality is spelled `=`, the same way the
    /// comparison grammar reads it.
    pub fn spelling(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulus => "%",
            Operator::Increment => "++",
            Operator::Decrement => "--",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqualTo => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
        }
    }

    /// `+ - * / %`
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Subtract
                | Operator::Multiply
                | Operator::Divide
                | Operator::Modulus
        )
    }

    /// `= != < <= > >=`
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::LessThan
                | Operator::LessThanEqualTo
                | Operator::GreaterThan
                | Operator::GreaterThanEqualTo
        )
    }

    /// `&& || !`
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A reference to a variable (e.g. `foo`).
    Variable(String),
    /// A binary expression (e.g. `1 + 1`).
    BinaryOp {
        lhs: Box<Expr>,
        op: Operator,
        rhs: Box<Expr>,
    },
    /// A number literal. `text` keeps the source spelling (e.g. `2.5f`).
    Number {
        text: String,
        value: f64,
        is_float: bool,
    },
    String(String),
    Char(char),
    Boolean(bool),
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(lhs: Expr, op: Operator, rhs: Expr) -> Self {
        Expr::BinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Creates a number literal from its source spelling or `None` if `text` is not a number.
    pub fn number(text: &str) -> Option<Self> {
        let is_float = text.contains('.') || text.ends_with('f');
        let value = text.strip_suffix('f').unwrap_or(text).parse().ok()?;
        Some(Expr::Number {
            text: text.to_string(),
            value,
            is_float,
        })
    }
}

/// A `case (label):` or `default:` clause of a [`Stmt::Switch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// `None` for the `default` clause.
    pub label: Option<Expr>,
    pub body: Vec<Stmt>,
}

impl Case {
    pub fn is_default(&self) -> bool {
        self.label.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `int x = 1;`
    Declaration {
        ty: String,
        ident: String,
        initializer: Option<Expr>,
    },
    /// `set x = 1;`
    Assignment { target: String, value: Expr },
    /// An else-if chain is an `else_branch` holding a single nested `If`.
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While { condition: Expr, body: Vec<Stmt> },
    /// Case bodies fall through; only an explicit `Break` terminates one.
    Switch { subject: Expr, cases: Vec<Case> },
    Break,
    /// `print(x);` keeps the argument token as written.
    Print(Token),
    FunctionDeclaration {
        ident: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    /// A bare expression in statement position. The grammar has no production for it.
    Expr(Expr),
}

impl Stmt {
    /// Returns `true` if the print argument token is a valid one.
    pub fn is_printable(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::StringLiteral
                | TokenKind::CharLiteral
                | TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::Identifier
                | TokenKind::BoolLiteral
        )
    }
}

/// The top-level statement sequence of a program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Program {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spelling() {
        for text in ["+", "-", "*", "/", "%", "++", "--", "=", "!=", "<", "<=", ">", ">=", "&&", "||", "!"] {
            let op = Operator::from_spelling(text).unwrap();
            assert_eq!(op.spelling(), text);
        }
        assert_eq!(Operator::from_spelling("=="), None);
        assert_eq!(Operator::from_spelling("."), None);
    }

    #[test]
    fn test_operator_classes() {
        assert!(Operator::Modulus.is_arithmetic());
        assert!(!Operator::Modulus.is_relational());
        assert!(Operator::Equal.is_relational());
        assert!(Operator::Not.is_logical());
        assert!(!Operator::Increment.is_arithmetic());
        assert!(!Operator::Increment.is_relational());
        assert!(!Operator::Increment.is_logical());
    }

    #[test]
    fn test_number_literal() {
        assert_eq!(
            Expr::number("42"),
            Some(Expr::Number {
                text: "42".to_string(),
                value: 42.0,
                is_float: false
            })
        );
        assert_eq!(
            Expr::number("2.5f"),
            Some(Expr::Number {
                text: "2.5f".to_string(),
                value: 2.5,
                is_float: true
            })
        );
        assert!(matches!(Expr::number(".5"), Some(Expr::Number { is_float: true, .. })));
        assert_eq!(Expr::number("abc"), None);
    }

    #[test]
    fn test_printable_tokens() {
        assert!(Stmt::is_printable(&Token::new(TokenKind::Identifier, "x", 1)));
        assert!(Stmt::is_printable(&Token::new(TokenKind::BoolLiteral, "true", 1)));
        assert!(!Stmt::is_printable(&Token::new(TokenKind::Punctuation, "(", 1)));
        assert!(!Stmt::is_printable(&Token::new(TokenKind::Keyword, "if", 1)));
    }
}
