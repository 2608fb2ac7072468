use super::*;
use crate::ast::Operator;

/* Binding powers, low to high. All levels are left associative. */
const LOGIC_BP: u8 = 1;
const COMPARISON_BP: u8 = 3;
const ADDITIVE_BP: u8 = 5;
const MULTIPLICATIVE_BP: u8 = 7;

impl Token {
    /// Returns the binary binding power or `None` if not a binary operator.
    fn binop_bp(&self) -> Option<(u8, u8)> {
        if self.kind != TokenKind::Operator {
            return None;
        }
        let left = match self.text.as_str() {
            "&&" | "||" => LOGIC_BP,
            "=" | "!=" | "<" | "<=" | ">" | ">=" => COMPARISON_BP,
            "+" | "-" => ADDITIVE_BP,
            "*" | "/" | "%" => MULTIPLICATIVE_BP,
            _ => return None,
        };
        Some((left, left + 1))
    }
}

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses a logical expression (`&&`, `||` and everything binding tighter).
    pub fn parse_logic(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(LOGIC_BP)
    }

    /// Parses a comparison (`=`, `!=`, `<`, `<=`, `>`, `>=` and everything binding tighter).
    pub fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(COMPARISON_BP)
    }

    /// Parses an additive expression. This is the expression form used by
    /// declarations, assignments, switch subjects and parentheses.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(ADDITIVE_BP)
    }

    /// Parses a multiplicative expression.
    pub fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(MULTIPLICATIVE_BP)
    }

    /// Parses an expression whose operators all bind at least as tight as `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_factor()?;

        loop {
            let (l_bp, r_bp) = match self.current().binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current() is a valid binop
            let token = self.next();
            let op = Operator::from_spelling(&token.text).ok_or(ParseError::Expected {
                expected: "binary operator",
                found: token.text.clone(),
                line: token.line,
            })?;
            self.trace(format_args!("found operator: {}", op));

            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = Expr::binary(lhs, op, rhs);
        }

        Ok(lhs)
    }

    /* Expressions.Factor */
    /// Parses a literal, a variable or a parenthesized expression.
    pub fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        let expr = match token.kind {
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral => Expr::number(&token.text)
                .ok_or(ParseError::MalformedNumber {
                    text: token.text.clone(),
                    line: token.line,
                })?,
            TokenKind::StringLiteral => Expr::String(token.text.clone()),
            TokenKind::CharLiteral => match token.text.chars().next() {
                Some(c) => Expr::Char(c),
                None => return Err(self.unexpected("expression")),
            },
            TokenKind::BoolLiteral => Expr::Boolean(token.text == "true"),
            TokenKind::Identifier => Expr::Variable(token.text.clone()),
            TokenKind::Punctuation if token.text == "(" => {
                return self.nested(|parser| {
                    parser.next();
                    let expr = parser.parse_expr()?;
                    parser.expect_punct(")", "')' after parenthesized expression")?;
                    Ok(expr)
                });
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.next(); // eat parsed token
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;

    fn expr(source: &str) -> Expr {
        let source = source.into();
        let ast = Parser::new(&source).parse_logic().unwrap();
        assert!(source.has_no_errors());
        ast
    }

    fn var(ident: &str) -> Expr {
        Expr::Variable(ident.to_string())
    }

    #[test]
    fn test_literal() {
        assert_eq!(expr("true"), Expr::Boolean(true));
        assert_eq!(expr("false"), Expr::Boolean(false));
        assert_eq!(expr("'c'"), Expr::Char('c'));
        assert_eq!(expr("\"text\""), Expr::String("text".to_string()));
        assert_debug_snapshot!(expr("2.5f"), @r###"
        Number {
            text: "2.5f",
            value: 2.5,
            is_float: true,
        }
        "###);
    }

    #[test]
    fn test_binary_expr() {
        assert_debug_snapshot!(expr("1 + 1"), @r###"
        BinaryOp {
            lhs: Number {
                text: "1",
                value: 1.0,
                is_float: false,
            },
            op: Add,
            rhs: Number {
                text: "1",
                value: 1.0,
                is_float: false,
            },
        }
        "###);
    }

    #[test]
    fn test_left_associativity() {
        // should be (a - b) - c
        assert_eq!(
            expr("a - b - c"),
            Expr::binary(
                Expr::binary(var("a"), Operator::Subtract, var("b")),
                Operator::Subtract,
                var("c"),
            )
        );
        // should be (a = b) = c
        assert_eq!(
            expr("a = b = c"),
            Expr::binary(
                Expr::binary(var("a"), Operator::Equal, var("b")),
                Operator::Equal,
                var("c"),
            )
        );
    }

    #[test]
    fn test_precedence_ladder() {
        // a || b < c + d * e  ==>  a || (b < (c + (d * e)))
        assert_eq!(
            expr("a || b < c + d * e"),
            Expr::binary(
                var("a"),
                Operator::Or,
                Expr::binary(
                    var("b"),
                    Operator::LessThan,
                    Expr::binary(
                        var("c"),
                        Operator::Add,
                        Expr::binary(var("d"), Operator::Multiply, var("e")),
                    ),
                ),
            )
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            expr("(a + b) % c"),
            Expr::binary(
                Expr::binary(var("a"), Operator::Add, var("b")),
                Operator::Modulus,
                var("c"),
            )
        );
    }

    #[test]
    fn test_levels_stop_at_weaker_operators() {
        let source = "a * b + c < d && e".into();
        let mut parser = Parser::new(&source);
        assert_eq!(
            parser.parse_term().unwrap(),
            Expr::binary(var("a"), Operator::Multiply, var("b"))
        );
        assert!(parser.current().is_op("+"));

        let source = "a + b < c && d".into();
        let mut parser = Parser::new(&source);
        parser.parse_comparison().unwrap();
        assert!(parser.current().is_op("&&"));
    }

    #[test]
    fn test_errors() {
        let source = "(a + b".into();
        assert_eq!(
            Parser::new(&source).parse_expr(),
            Err(ParseError::UnexpectedEof {
                expected: "')' after parenthesized expression",
                line: 1,
            })
        );

        let source = "a + ;".into();
        assert_eq!(
            Parser::new(&source).parse_expr(),
            Err(ParseError::Expected {
                expected: "expression",
                found: ";".to_string(),
                line: 1,
            })
        );
    }
}
