//! Shared `Result` aliases, re-exported by every stage crate so the driver
//! can match on a small, closed set of error families (`spec.md` §7).

use std::fmt;

/// A fatal position in the source, used by [`thiserror`]-derived variants
/// in `nanoc-lex`, `nanoc-par`, and `nanoc-sem` that need to print
/// `L:C` without pulling in the full [`crate::Span`] (which also carries
/// byte offsets irrelevant to the message).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<crate::Span> for LineCol {
    fn from(span: crate::Span) -> Self {
        LineCol { line: span.line, column: span.column }
    }
}
