//! The lexer: `spec.md` §4.1.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, KEYWORDS};
use nanoc_util::{LineCol, Span, Symbol};
use thiserror::Error;

/// A fatal lexical error (`spec.md` §4.1 "Failure semantics").
///
/// Lexing is all-or-nothing: the first unrecognized byte aborts the whole
/// run, matching the rest of the pipeline's "errors are terminal" design
/// (`spec.md` §7).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Lexer Error at {pos}: Invalid token '{ch}'")]
pub struct LexError {
    pub pos: LineCol,
    pub ch: char,
}

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), source }
    }

    fn make(&self, kind: TokenKind, start: usize, line: u32, col: u32) -> Token<'a> {
        let end = self.cursor.offset();
        Token::new(kind, Span::new(start, end, line, col), self.cursor.slice(start, end))
    }

    /// Produce the next token, or `Ok(Eof)` once the source is exhausted.
    ///
    /// Tokens are produced lazily, one call at a time: the parser drives
    /// this with a single unit of look-ahead rather than the lexer
    /// tokenizing the whole file up front.
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.skip_whitespace();

        let start = self.cursor.offset();
        let line = self.cursor.line();
        let col = self.cursor.column();

        let Some(b) = self.cursor.peek() else {
            return Ok(self.make(TokenKind::Eof, start, line, col));
        };

        if b.is_ascii_digit() {
            return Ok(self.lex_number(start, line, col));
        }
        if is_ident_start(b) {
            return Ok(self.lex_ident_or_keyword(start, line, col));
        }

        self.cursor.bump();
        let kind = match b {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b';' => TokenKind::Semicolon,
            b'?' => TokenKind::Question,
            b':' => TokenKind::Colon,
            b'~' => TokenKind::Tilde,
            b'+' => TokenKind::Plus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'-' => {
                if self.cursor.peek() == Some(b'-') {
                    self.cursor.bump();
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            b'!' => {
                if self.cursor.peek() == Some(b'=') {
                    self.cursor.bump();
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            b'=' => {
                if self.cursor.peek() == Some(b'=') {
                    self.cursor.bump();
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            b'<' => {
                if self.cursor.peek() == Some(b'=') {
                    self.cursor.bump();
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            b'>' => {
                if self.cursor.peek() == Some(b'=') {
                    self.cursor.bump();
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            b'&' => {
                if self.cursor.peek() == Some(b'&') {
                    self.cursor.bump();
                    TokenKind::AmpAmp
                } else {
                    return Err(self.error_at(start, line, col));
                }
            }
            b'|' => {
                if self.cursor.peek() == Some(b'|') {
                    self.cursor.bump();
                    TokenKind::PipePipe
                } else {
                    return Err(self.error_at(start, line, col));
                }
            }
            _ => return Err(self.error_at(start, line, col)),
        };

        Ok(self.make(kind, start, line, col))
    }

    fn error_at(&self, start: usize, line: u32, col: u32) -> LexError {
        let ch = self.source[start..].chars().next().unwrap_or('\0');
        LexError { pos: LineCol { line, column: col }, ch }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|b| b.is_ascii_whitespace());
    }

    fn lex_number(&mut self, start: usize, line: u32, col: u32) -> Token<'a> {
        self.cursor.eat_while(|b| b.is_ascii_digit());
        let end = self.cursor.offset();
        let text = self.cursor.slice(start, end);
        // `spec.md` §4.1: decimal only; the grammar never produces a
        // literal wide enough to overflow i64 within the scope of this
        // language, so an unwrap here reflects the token just having been
        // validated as `[0-9]+`, not an unchecked external input.
        let value: i64 = text.parse().expect("lexeme matched [0-9]+");
        self.make(TokenKind::IntConst(value), start, line, col)
    }

    fn lex_ident_or_keyword(&mut self, start: usize, line: u32, col: u32) -> Token<'a> {
        self.cursor.eat_while(is_ident_continue);
        let end = self.cursor.offset();
        let text = self.cursor.slice(start, end);
        let kind = KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == text)
            .map(|(_, kind)| *kind)
            .unwrap_or_else(|| TokenKind::Ident(Symbol::intern(text)));
        self.make(kind, start, line, col)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
