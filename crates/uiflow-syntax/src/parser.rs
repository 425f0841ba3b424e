//! Recursive-descent parser producing [`Expr`] trees.

use crate::ir::{BinaryOp, Expr};
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated literal starting at offset {offset}")]
    UnterminatedLiteral { offset: usize },

    #[error("expected {expected}, found {found} at offset {offset}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },
}

/// Parse `src` as exactly one expression.
pub fn parse_expr(src: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(src)?;
    let expr = parser.expr(0)?;
    parser.finish("end of expression")?;
    Ok(expr)
}

/// Parse `src` as one expression statement with an optional trailing `;`.
pub fn parse_statement(src: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(src)?;
    let expr = parser.expr(0)?;
    parser.eat(&TokenKind::Semi);
    parser.finish("end of statement")?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: Lexer::new(src).tokenize()?,
            pos: 0,
        })
    }

    fn peek_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.peek_at(0)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
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

    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError::UnexpectedToken {
                expected,
                found: token.kind.to_string(),
                offset: token.offset,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.peek() {
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn finish(&self, expected: &'static str) -> Result<(), ParseError> {
        if self.pos < self.tokens.len() {
            Err(self.unexpected(expected))
        } else {
            Ok(())
        }
    }

    fn expr(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.postfix()?;

        while let Some(TokenKind::Op(op)) = self.peek() {
            let op: BinaryOp = *op;
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }
            self.pos += 1;
            let rhs = self.expr(r_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let name = self.ident("method name after '.'")?;
            self.expect(TokenKind::LParen, "'(' after method name")?;
            let args = self.call_args()?;
            expr = Expr::method(expr, name, args);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.bump() else {
            return Err(ParseError::UnexpectedEnd {
                expected: "expression",
            });
        };

        match token.kind {
            TokenKind::Ident(first) => {
                let mut name = first;
                while matches!(self.peek(), Some(TokenKind::Dot))
                    && matches!(self.peek_at(1), Some(TokenKind::Ident(_)))
                {
                    self.pos += 1;
                    let segment = self.ident("identifier")?;
                    name.push('.');
                    name.push_str(&segment);
                }
                if self.eat(&TokenKind::LParen) {
                    let args = self.call_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Path(name))
                }
            }
            TokenKind::Str(raw) => Ok(Expr::Str(raw)),
            TokenKind::Char(raw) => Ok(Expr::Char(raw)),
            TokenKind::Number(raw) => Ok(Expr::Number(raw)),
            TokenKind::LParen => {
                let inner = self.expr(0)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Op(BinaryOp::Sub) => Ok(Expr::Neg(Box::new(self.postfix()?))),
            other => Err(ParseError::UnexpectedToken {
                expected: "expression",
                found: other.to_string(),
                offset: token.offset,
            }),
        }
    }

    /// Arguments after an already-consumed `(`, through the closing `)`.
    fn call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expr(0)?);
            if self.eat(&TokenKind::RParen) {
                break;
            }
            self.expect(TokenKind::Comma, "',' or ')'")?;
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain() {
        let expr = parse_statement("onView(withId(R.id.button)).perform(click());").unwrap();
        match &expr {
            Expr::Method {
                receiver,
                name,
                args,
            } => {
                assert_eq!(name, "perform");
                assert!(receiver.is_call_to("onView"));
                assert_eq!(args, &vec![Expr::call("click", vec![])]);
            }
            other => panic!("expected method call, got {other:?}"),
        }
        assert_eq!(expr.to_string(), "onView(withId(R.id.button)).perform(click())");
    }

    #[test]
    fn test_qualified_call() {
        let expr = parse_expr("ViewMatchers.withId(android.R.id.home)").unwrap();
        assert_eq!(expr.callee(), Some("ViewMatchers.withId"));
        assert_eq!(expr.args(), &[Expr::Path("android.R.id.home".into())]);
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expr("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(op, BinaryOp::Add);
                assert!(matches!(*rhs, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_input() {
        let err = parse_statement("click(); click();").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { offset: 9, .. }));
    }

    #[test]
    fn test_unclosed_call() {
        let err = parse_expr("onView(withId(R.id.a)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEnd {
                expected: "',' or ')'"
            }
        );
    }

    #[test]
    fn test_field_access_rejected() {
        assert!(parse_expr("onView(x).matcher").is_err());
    }
}
