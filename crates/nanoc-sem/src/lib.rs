//! Resolver (semantic analysis) for the nanoc C subset (`spec.md` §4.3).

mod resolver;
mod scope;

pub use resolver::resolve;
