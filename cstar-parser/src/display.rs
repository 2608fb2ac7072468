//! Renders AST nodes back into source text. Trees produced by the parser
//! reparse to an equivalent tree: print argument tokens keep their kind and
//! text, but carry the line they are rendered on.

use std::fmt::{self, Display, Formatter, Write};

use crate::ast::{Case, Expr, Operator, Program, Stmt};
use crate::lexer::{Token, TokenKind};

const INDENT: &str = "    ";

/// Binding strength used to decide where parentheses are needed.
fn precedence(op: Operator) -> u8 {
    match op {
        Operator::And | Operator::Or => 1,
        Operator::Equal
        | Operator::NotEqual
        | Operator::LessThan
        | Operator::LessThanEqualTo
        | Operator::GreaterThan
        | Operator::GreaterThanEqualTo => 2,
        Operator::Add | Operator::Subtract => 3,
        Operator::Multiply | Operator::Divide | Operator::Modulus => 4,
        // no production yields these as binary operators
        Operator::Increment | Operator::Decrement | Operator::Not => 0,
    }
}

fn write_operand(f: &mut Formatter<'_>, operand: &Expr, parent: u8, is_rhs: bool) -> fmt::Result {
    let needs_parens = match operand {
        Expr::BinaryOp { op, .. } => {
            let child = precedence(*op);
            child < parent || (is_rhs && child == parent)
        }
        _ => false,
    };
    if needs_parens {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Variable(ident) => f.write_str(ident),
            Expr::BinaryOp { lhs, op, rhs } => {
                let parent = precedence(*op);
                write_operand(f, lhs, parent, false)?;
                write!(f, " {} ", op)?;
                write_operand(f, rhs, parent, true)
            }
            Expr::Number { text, .. } => f.write_str(text),
            Expr::String(value) => write!(f, "\"{}\"", value),
            Expr::Char(value) => write!(f, "'{}'", value),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_char(')')
            }
        }
    }
}

/// Writes a print argument token the way it was spelled.
fn write_print_arg(f: &mut Formatter<'_>, token: &Token) -> fmt::Result {
    match token.kind {
        TokenKind::StringLiteral => write!(f, "\"{}\"", token.text),
        TokenKind::CharLiteral => write!(f, "'{}'", token.text),
        _ => f.write_str(&token.text),
    }
}

fn write_indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// Writes `{`, the statements of `body` one level deeper, then `}`.
fn write_block(f: &mut Formatter<'_>, body: &[Stmt], depth: usize) -> fmt::Result {
    f.write_str("{\n")?;
    for stmt in body {
        write_stmt(f, stmt, depth + 1)?;
    }
    write_indent(f, depth)?;
    f.write_char('}')
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    write_stmt_body(f, stmt, depth)?;
    f.write_char('\n')
}

/// Writes `stmt` without leading indentation or trailing newline.
fn write_stmt_body(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    match stmt {
        Stmt::Declaration {
            ty,
            ident,
            initializer,
        } => {
            write!(f, "{} {}", ty, ident)?;
            if let Some(initializer) = initializer {
                write!(f, " = {}", initializer)?;
            }
            f.write_char(';')
        }
        Stmt::Assignment { target, value } => write!(f, "set {} = {};", target, value),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            write!(f, "if ({}) ", condition)?;
            write_block(f, then_branch, depth)?;
            match else_branch.as_slice() {
                [] => Ok(()),
                [nested @ Stmt::If { .. }] => {
                    f.write_str(" else ")?;
                    write_stmt_body(f, nested, depth)
                }
                body => {
                    f.write_str(" else ")?;
                    write_block(f, body, depth)
                }
            }
        }
        Stmt::While { condition, body } => {
            write!(f, "while ({}) ", condition)?;
            write_block(f, body, depth)
        }
        Stmt::Switch { subject, cases } => {
            writeln!(f, "switch ({}) {{", subject)?;
            for case in cases {
                write_case(f, case, depth + 1)?;
            }
            write_indent(f, depth)?;
            f.write_char('}')
        }
        Stmt::Break => f.write_str("break;"),
        Stmt::Print(token) => {
            f.write_str("print(")?;
            write_print_arg(f, token)?;
            f.write_str(");")
        }
        Stmt::FunctionDeclaration {
            ident,
            params,
            body,
        } => {
            write!(f, "func {}({}) ", ident, params.join(", "))?;
            write_block(f, body, depth)
        }
        Stmt::Expr(expr) => write!(f, "{};", expr),
    }
}

fn write_case(f: &mut Formatter<'_>, case: &Case, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    match &case.label {
        Some(label) => writeln!(f, "case ({}):", label)?,
        None => writeln!(f, "default:")?,
    }
    for stmt in &case.body {
        write_stmt(f, stmt, depth + 1)?;
    }
    Ok(())
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt_body(f, self, 0)
    }
}

impl Display for Case {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_case(f, self, 0)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            write_stmt(f, stmt, 0)?;
        }
        Ok(())
    }
}
