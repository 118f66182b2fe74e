//! String interning for identifier handling.
//!
//! [`Symbol`] is a 4-byte `Copy` handle to an interned string, backed by a
//! process-global table. Two identifiers that spell the same text intern to
//! the same `Symbol`, so later stages compare names by integer equality
//! instead of string comparison, and the resolver can mint fresh unique
//! names (`x_7`) cheaply.
//!
//! The table is a [`DashMap`] behind a [`LazyLock`] so it is safe to touch
//! from multiple threads (useful for parallel tests); the compiler itself
//! never needs more than one.

use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

struct StringTable {
    strings: DashMap<&'static str, u32, ahash::RandomState>,
    by_index: DashMap<u32, &'static str, ahash::RandomState>,
    next: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            strings: DashMap::with_hasher(ahash::RandomState::new()),
            by_index: DashMap::with_hasher(ahash::RandomState::new()),
            next: AtomicU32::new(0),
        }
    }

    fn intern(&self, s: &str) -> u32 {
        if let Some(existing) = self.strings.get(s) {
            return *existing;
        }
        // Leaked deliberately: symbols live for the process lifetime, and a
        // batch compiler never interns enough distinct names for this to
        // matter.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        self.strings.insert(leaked, idx);
        self.by_index.insert(idx, leaked);
        idx
    }

    fn resolve(&self, idx: u32) -> &'static str {
        *self
            .by_index
            .get(&idx)
            .expect("Symbol index must have been produced by Symbol::intern")
    }
}

/// An interned identifier.
///
/// # Examples
///
/// ```
/// use nanoc_util::Symbol;
///
/// let a = Symbol::intern("count");
/// let b = Symbol::intern("count");
/// let c = Symbol::intern("total");
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(a.as_str(), "count");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        Symbol(STRING_TABLE.intern(s))
    }

    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(self.0)
    }

    /// Build a fresh symbol by suffixing `self` with `_{n}`, used by the
    /// resolver to mint globally-unique variable names and by the TAC
    /// generator to mint temporaries and labels.
    pub fn with_suffix(&self, n: u32) -> Self {
        Symbol::intern(&format!("{}_{}", self.as_str(), n))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
