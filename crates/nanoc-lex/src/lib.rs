//! Lexer for the nanoc C subset (`spec.md` §4.1).

mod cursor;
mod lexer;
mod token;

pub use lexer::{LexError, Lexer};
pub use token::{Token, TokenKind, KEYWORDS};
