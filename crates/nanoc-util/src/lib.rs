//! Shared infrastructure for the nanoc pipeline.
//!
//! Every later crate (`nanoc-lex`, `nanoc-par`, `nanoc-sem`, `nanoc-tac`,
//! `nanoc-asm`, the `nanoc` driver) depends on this crate for source
//! locations ([`Span`]), interned identifiers ([`Symbol`]), and diagnostic
//! collection ([`Handler`]).

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use error::LineCol;
pub use span::Span;
pub use symbol::Symbol;
