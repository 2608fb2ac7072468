use super::*;
use crate::ast::Case;

impl<'a> Parser<'a> {
    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let (kind, text) = {
            let token = self.current();
            (token.kind, token.text.clone())
        };
        match kind {
            TokenKind::DataType => {
                self.trace(format_args!("found variable declaration"));
                self.parse_declaration()
            }
            TokenKind::Keyword => match text.as_str() {
                "if" => {
                    self.trace(format_args!("found if statement"));
                    self.parse_if()
                }
                "set" => {
                    self.trace(format_args!("found assignment statement"));
                    self.parse_assignment()
                }
                "while" => self.parse_while(),
                "print" => self.parse_print(),
                "switch" => {
                    self.trace(format_args!("found switch statement"));
                    self.parse_switch()
                }
                "break" => self.parse_break(),
                _ => Err(self.invalid_stmt()),
            },
            TokenKind::EndOfFile => Err(self.unexpected("statement")),
            _ => Err(self.invalid_stmt()),
        }
    }

    /// Parses statements up to (but not including) the first token matching `end`.
    fn parse_stmts_until(
        &mut self,
        end: impl Fn(&Token) -> bool,
        expected: &'static str,
    ) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !end(self.current()) {
            if self.current().is_eof() {
                return Err(self.unexpected(expected));
            }
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    /// Parses a `{ ... }` block.
    pub fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect_punct("{", "'{' to open block")?;
        let body = self.nested(|parser| {
            parser.parse_stmts_until(|token| token.is_punct("}"), "'}' to close block")
        })?;
        self.next(); // eat '}'

        self.trace(format_args!("block complete with {} statements", body.len()));
        Ok(body)
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let ty = self.next().text;
        let ident = self.expect_ident("variable name")?;

        let initializer = if self.current().is_op("=") {
            self.next();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_punct(";", "';' after declaration")?;

        Ok(Stmt::Declaration {
            ty,
            ident,
            initializer,
        })
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'set'
        let target = self.expect_ident("variable name after 'set'")?;
        self.trace(format_args!("variable to assign: {}", target));

        if !self.current().is_op("=") {
            return Err(self.unexpected("'=' in assignment"));
        }
        self.next();

        let value = self.parse_expr()?;
        self.expect_punct(";", "';' after assignment")?;

        Ok(Stmt::Assignment { target, value })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'if'
        self.expect_punct("(", "'(' after 'if'")?;
        let condition = self.parse_logic()?;
        self.expect_punct(")", "')' after if condition")?;

        let then_branch = self.parse_block()?;
        let else_branch = if self.current().is_keyword("else") {
            self.next();
            if self.current().is_keyword("if") {
                vec![self.nested(Self::parse_if)?]
            } else {
                self.parse_block()?
            }
        } else {
            Vec::new()
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'while'
        self.expect_punct("(", "'(' after 'while'")?;
        let condition = self.parse_logic()?;
        self.expect_punct(")", "')' after while condition")?;
        let body = self.parse_block()?;

        Ok(Stmt::While { condition, body })
    }

    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'switch'
        self.expect_punct("(", "'(' after 'switch'")?;
        let subject = self.parse_expr()?;
        self.expect_punct(")", "')' after switch subject")?;
        self.expect_punct("{", "'{' after switch subject")?;

        let mut cases = Vec::new();
        while !self.eat_punct("}") {
            let label = if self.current().is_keyword("case") {
                self.next();
                self.expect_punct("(", "'(' after 'case'")?;
                let label = self.parse_logic()?;
                self.expect_punct(")", "')' after case label")?;
                Some(label)
            } else if self.current().is_keyword("default") {
                self.next();
                None
            } else {
                return Err(self.unexpected("'case' or 'default'"));
            };
            self.expect_punct(":", "':' after case label")?;

            let body = self.nested(|parser| {
                parser.parse_stmts_until(
                    |token| {
                        token.is_keyword("case")
                            || token.is_keyword("default")
                            || token.is_punct("}")
                    },
                    "'}' to close switch",
                )
            })?;
            cases.push(Case { label, body });
        }

        Ok(Stmt::Switch { subject, cases })
    }

    /// Parses `print(arg);`. The argument is parsed as an expression for validation
    /// only; the statement keeps its first token.
    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'print'
        self.expect_punct("(", "'(' after 'print'")?;

        let token = self.current().clone();
        self.parse_expr()?;
        if !Stmt::is_printable(&token) {
            return Err(ParseError::InvalidPrintArgument {
                text: token.text,
                line: token.line,
            });
        }

        self.expect_punct(")", "')' after print argument")?;
        self.expect_punct(";", "';' after print statement")?;
        Ok(Stmt::Print(token))
    }

    fn parse_break(&mut self) -> Result<Stmt, ParseError> {
        self.next(); // eat 'break'
        self.expect_punct(";", "';' after 'break'")?;
        Ok(Stmt::Break)
    }

    fn invalid_stmt(&self) -> ParseError {
        let token = self.current();
        ParseError::InvalidStatement {
            index: self.cursor,
            text: token.text.clone(),
            line: token.line,
        }
    }
}
