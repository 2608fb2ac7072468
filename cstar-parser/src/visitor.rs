//! Visitor pattern for AST nodes.

use crate::ast::{Expr, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for stmt in &program.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Variable(_) => {}
        Expr::Number { .. } => {}
        Expr::String(_) => {}
        Expr::Char(_) => {}
        Expr::Boolean(_) => {}
        Expr::BinaryOp { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::FunctionCall { name: _, args } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::Declaration {
            ty: _,
            ident: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::Assignment { target: _, value } => visitor.visit_expr(value),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visit_stmt_list!(visitor, then_branch);
            visit_stmt_list!(visitor, else_branch);
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visit_stmt_list!(visitor, body);
        }
        Stmt::Switch { subject, cases } => {
            visitor.visit_expr(subject);
            for case in cases {
                if let Some(label) = &case.label {
                    visitor.visit_expr(label);
                }
                visit_stmt_list!(visitor, &case.body);
            }
        }
        Stmt::Break => {}
        Stmt::Print(_) => {}
        Stmt::FunctionDeclaration {
            ident: _,
            params: _,
            body,
        } => visit_stmt_list!(visitor, body),
        Stmt::Expr(expr) => visitor.visit_expr(expr),
    }
}
