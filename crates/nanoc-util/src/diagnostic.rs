//! Diagnostic collection.
//!
//! The resolver (the one stage that can report more than one error per run,
//! per `spec.md` §4.3) accumulates [`Diagnostic`]s in a [`Handler`] instead
//! of aborting on the first one, so it can describe every ill-formed
//! declaration in a block rather than stopping at the first.

use crate::Span;
use std::cell::RefCell;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported problem: a severity, a message, and a location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Error, message: message.into(), span }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}:{})", self.level, self.message, self.span.line, self.span.column)
    }
}

/// Accumulates diagnostics emitted while processing one translation unit.
///
/// # Examples
///
/// ```
/// use nanoc_util::{Handler, Span};
///
/// let handler = Handler::new();
/// handler.error("use of undeclared variable 'x'", Span::DUMMY);
/// assert!(handler.has_errors());
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.diagnostics.borrow_mut().push(Diagnostic::error(message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.level == Level::Error)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    pub fn diagnostics(&self) -> std::cell::Ref<'_, Vec<Diagnostic>> {
        self.diagnostics.borrow()
    }
}
