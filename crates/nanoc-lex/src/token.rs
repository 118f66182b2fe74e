//! Token types.

use nanoc_util::Symbol;

/// The category of a token, per `spec.md` §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident(Symbol),
    IntConst(i64),

    KwInt,
    KwVoid,
    KwReturn,
    KwIf,
    KwElse,
    KwDo,
    KwWhile,
    KwFor,
    KwBreak,
    KwContinue,

    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Question,
    Colon,

    Tilde,
    Bang,
    Minus,
    Plus,
    Star,
    Slash,
    Percent,

    MinusMinus,
    AmpAmp,
    PipePipe,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,

    Eof,
}

/// A single fixed-table entry mapping lexeme text to a keyword token.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("int", TokenKind::KwInt),
    ("void", TokenKind::KwVoid),
    ("return", TokenKind::KwReturn),
    ("if", TokenKind::KwIf),
    ("else", TokenKind::KwElse),
    ("do", TokenKind::KwDo),
    ("while", TokenKind::KwWhile),
    ("for", TokenKind::KwFor),
    ("break", TokenKind::KwBreak),
    ("continue", TokenKind::KwContinue),
];

/// A token plus its source location and raw lexeme text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: nanoc_util::Span,
    pub lexeme: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, span: nanoc_util::Span, lexeme: &'a str) -> Self {
        Self { kind, span, lexeme }
    }
}
