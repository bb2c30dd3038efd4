//! Recursive-descent parser for the transform script language.

use super::ast::{Arg, BinOp, Expr, Stmt, UnaryOp};
use super::token::{tokenize, Token, TokenKind};
use super::ScriptError;
use crate::dataset::Scalar;

/// Parses script source into a statement list.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ScriptError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ScriptError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(ScriptError::new(format!("expected {what}"), self.line()))
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&TokenKind::Newline) {}
    }

    fn program(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut statements = Vec::new();
        self.skip_newlines();
        while self.peek().is_some() {
            statements.push(self.statement()?);
            if self.peek().is_some() {
                self.expect(&TokenKind::Newline, "end of statement")?;
                self.skip_newlines();
            }
        }
        Ok(statements)
    }

    fn statement(&mut self) -> Result<Stmt, ScriptError> {
        let line = self.line();

        // `ident = ...` is an assignment unless the `=` is `==`.
        if let Some(TokenKind::Ident(name)) = self.peek() {
            if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Assign) {
                let name = name.clone();
                self.pos += 2;
                let expr = self.expression()?;
                return Ok(Stmt::Assign { name, expr, line });
            }
        }

        let expr = self.expression()?;
        Ok(Stmt::Expr { expr, line })
    }

    fn expression(&mut self) -> Result<Expr, ScriptError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.and_expr()?;
        while self.eat(&TokenKind::Or) {
            let rhs = self.and_expr()?;
            lhs = Expr::Binary {
                op: BinOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.not_expr()?;
        while self.eat(&TokenKind::And) {
            let rhs = self.not_expr()?;
            lhs = Expr::Binary {
                op: BinOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ScriptError> {
        if self.eat(&TokenKind::Not) {
            let operand = self.not_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ScriptError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(TokenKind::Eq) => BinOp::Eq,
            Some(TokenKind::NotEq) => BinOp::NotEq,
            Some(TokenKind::Lt) => BinOp::Lt,
            Some(TokenKind::LtEq) => BinOp::LtEq,
            Some(TokenKind::Gt) => BinOp::Gt,
            Some(TokenKind::GtEq) => BinOp::GtEq,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn additive(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Rem,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ScriptError> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.postfix()
    }

    /// Postfix chain: method calls on any primary, e.g.
    /// `df.drop_nulls().sort_by("price", true)`.
    fn postfix(&mut self) -> Result<Expr, ScriptError> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let name = match self.advance() {
                Some(Token { kind: TokenKind::Ident(name), .. }) => name,
                _ => return Err(ScriptError::new("expected method name after '.'", self.line())),
            };
            self.expect(&TokenKind::LParen, "'(' after method name")?;
            let args = self.arguments()?;
            expr = Expr::Method {
                recv: Box::new(expr),
                name,
                args,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ScriptError> {
        let line = self.line();
        let token = self
            .advance()
            .ok_or_else(|| ScriptError::new("unexpected end of script", line))?;

        match token.kind {
            TokenKind::Int(i) => Ok(Expr::Literal(Scalar::Int(i))),
            TokenKind::Float(f) => Ok(Expr::Literal(Scalar::Float(f))),
            TokenKind::Str(s) => Ok(Expr::Literal(Scalar::Str(s))),
            TokenKind::True => Ok(Expr::Literal(Scalar::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Scalar::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Scalar::Null)),
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let args = self.arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            TokenKind::LParen => {
                let expr = self.expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                let mut items = Vec::new();
                self.skip_newlines();
                if !self.eat(&TokenKind::RBracket) {
                    loop {
                        items.push(self.expression()?);
                        self.skip_newlines();
                        if self.eat(&TokenKind::Comma) {
                            self.skip_newlines();
                            if self.eat(&TokenKind::RBracket) {
                                break;
                            }
                        } else {
                            self.expect(&TokenKind::RBracket, "']'")?;
                            break;
                        }
                    }
                }
                Ok(Expr::List(items))
            }
            TokenKind::LBrace => {
                let mut fields = Vec::new();
                self.skip_newlines();
                if !self.eat(&TokenKind::RBrace) {
                    loop {
                        let key = match self.advance() {
                            Some(Token { kind: TokenKind::Ident(k), .. }) => k,
                            Some(Token { kind: TokenKind::Str(k), .. }) => k,
                            _ => {
                                return Err(ScriptError::new("expected record key", self.line()))
                            }
                        };
                        self.expect(&TokenKind::Colon, "':' after record key")?;
                        let value = self.expression()?;
                        fields.push((key, value));
                        self.skip_newlines();
                        if self.eat(&TokenKind::Comma) {
                            self.skip_newlines();
                            if self.eat(&TokenKind::RBrace) {
                                break;
                            }
                        } else {
                            self.expect(&TokenKind::RBrace, "'}'")?;
                            break;
                        }
                    }
                }
                Ok(Expr::Record(fields))
            }
            other => Err(ScriptError::new(
                format!("unexpected token {other:?}"),
                token.line,
            )),
        }
    }

    /// Parses a parenthesized argument list (the `(` is already consumed).
    /// Keyword arguments use `name = expr`.
    fn arguments(&mut self) -> Result<Vec<Arg>, ScriptError> {
        let mut args = Vec::new();
        self.skip_newlines();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            let name = if let Some(TokenKind::Ident(name)) = self.peek() {
                if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Assign) {
                    let name = name.clone();
                    self.pos += 2;
                    Some(name)
                } else {
                    None
                }
            } else {
                None
            };
            let expr = self.expression()?;
            args.push(Arg { name, expr });
            self.skip_newlines();
            if self.eat(&TokenKind::Comma) {
                self.skip_newlines();
                if self.eat(&TokenKind::RParen) {
                    break;
                }
            } else {
                self.expect(&TokenKind::RParen, "')'")?;
                break;
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_assignment() {
        let stmts = parse("x = 1 + 2 * 3").unwrap();
        assert_eq!(stmts.len(), 1);
        let Stmt::Assign { name, expr, line } = &stmts[0] else {
            panic!("expected assignment");
        };
        assert_eq!(name, "x");
        assert_eq!(*line, 1);
        // Multiplication binds tighter than addition.
        let Expr::Binary { op: BinOp::Add, rhs, .. } = expr else {
            panic!("expected addition at the top");
        };
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_parse_method_chain() {
        let stmts = parse("df = df.drop_nulls().sort_by(\"price\", true)").unwrap();
        let Stmt::Assign { expr, .. } = &stmts[0] else {
            panic!("expected assignment");
        };
        let Expr::Method { recv, name, args } = expr else {
            panic!("expected method call");
        };
        assert_eq!(name, "sort_by");
        assert_eq!(args.len(), 2);
        assert!(matches!(**recv, Expr::Method { .. }));
    }

    #[test]
    fn test_parse_kwargs() {
        let stmts = parse("df = df.assign(total = price * qty)").unwrap();
        let Stmt::Assign { expr, .. } = &stmts[0] else {
            panic!("expected assignment");
        };
        let Expr::Method { args, .. } = expr else {
            panic!("expected method call");
        };
        assert_eq!(args[0].name.as_deref(), Some("total"));
    }

    #[test]
    fn test_parse_record_and_list() {
        let stmts = parse("insights = {count: 3, cities: [\"oslo\", \"voss\"]}").unwrap();
        let Stmt::Assign { expr, .. } = &stmts[0] else {
            panic!("expected assignment");
        };
        let Expr::Record(fields) = expr else {
            panic!("expected record literal");
        };
        assert_eq!(fields[0].0, "count");
        assert!(matches!(fields[1].1, Expr::List(_)));
    }

    #[test]
    fn test_parse_multiple_statements() {
        let stmts = parse("a = 1\nb = 2; c = a + b\n").unwrap();
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].line(), 1);
        assert_eq!(stmts[2].line(), 2);
    }

    #[test]
    fn test_parse_comparison_equality() {
        let stmts = parse("x == 1").unwrap();
        let Stmt::Expr { expr, .. } = &stmts[0] else {
            panic!("expected expression statement");
        };
        assert!(matches!(expr, Expr::Binary { op: BinOp::Eq, .. }));
    }

    #[test]
    fn test_parse_free_call() {
        let stmts = parse("bar_chart(df, \"city\", \"price\", \"out/p.svg\")").unwrap();
        let Stmt::Expr { expr, .. } = &stmts[0] else {
            panic!("expected expression statement");
        };
        let Expr::Call { name, args } = expr else {
            panic!("expected call");
        };
        assert_eq!(name, "bar_chart");
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse("a = 1\nb = = 2").unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_trailing_comma_allowed() {
        assert!(parse("x = [1, 2,]").is_ok());
        assert!(parse("y = {a: 1,}").is_ok());
    }
}
