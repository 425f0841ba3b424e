//! Tokenizer for single statements.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::ir::BinaryOp;
use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    /// String literal, quotes included.
    Str(String),
    /// Char literal, quotes included.
    Char(String),
    Number(String),
    LParen,
    RParen,
    Comma,
    Dot,
    Semi,
    Op(BinaryOp),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(s) => write!(f, "identifier `{s}`"),
            TokenKind::Str(s) => write!(f, "string {s}"),
            TokenKind::Char(s) => write!(f, "char {s}"),
            TokenKind::Number(s) => write!(f, "number `{s}`"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Semi => f.write_str("';'"),
            TokenKind::Op(op) => write!(f, "'{}'", op.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the source.
    pub offset: usize,
}

pub struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(&(offset, ch)) = self.chars.peek() {
            if ch.is_whitespace() {
                self.chars.next();
                continue;
            }

            let kind = match ch {
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                ',' => self.single(TokenKind::Comma),
                '.' => self.single(TokenKind::Dot),
                ';' => self.single(TokenKind::Semi),
                '+' => self.single(TokenKind::Op(BinaryOp::Add)),
                '-' => self.single(TokenKind::Op(BinaryOp::Sub)),
                '*' => self.single(TokenKind::Op(BinaryOp::Mul)),
                '/' => self.single(TokenKind::Op(BinaryOp::Div)),
                '"' => TokenKind::Str(self.quoted(offset, '"')?),
                '\'' => TokenKind::Char(self.quoted(offset, '\'')?),
                c if c.is_ascii_digit() => TokenKind::Number(
                    self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.'),
                ),
                c if c.is_alphabetic() || c == '_' || c == '$' => TokenKind::Ident(
                    self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '$'),
                ),
                other => return Err(ParseError::UnexpectedChar { ch: other, offset }),
            };

            tokens.push(Token { kind, offset });
        }

        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.chars.next();
        kind
    }

    fn quoted(&mut self, start: usize, delim: char) -> Result<String, ParseError> {
        let mut raw = String::new();
        raw.push(delim);
        self.chars.next();

        let mut escaped = false;
        for (_, ch) in self.chars.by_ref() {
            raw.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == delim {
                return Ok(raw);
            }
        }

        Err(ParseError::UnterminatedLiteral { offset: start })
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.chars.next();
        }
        out
    }
}
