//! Scope stack for the resolver (`spec.md` §4.3 "Scoping model").

use nanoc_util::Symbol;
use std::collections::HashMap;

/// One lexical scope: a map from source-name to resolved-name.
#[derive(Default)]
pub struct Scope {
    bindings: HashMap<Symbol, Symbol>,
}

/// A stack of [`Scope`]s, innermost last. Pushed on entry to a function
/// body, a `Compound` statement, or a `for` header; popped on exit.
#[derive(Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// `true` if `name` is already bound in the *current* (innermost)
    /// scope — the redeclaration check only ever looks here.
    pub fn declared_in_current_scope(&self, name: Symbol) -> bool {
        self.scopes.last().is_some_and(|s| s.bindings.contains_key(&name))
    }

    pub fn bind(&mut self, name: Symbol, resolved: Symbol) {
        self.scopes
            .last_mut()
            .expect("a scope must be pushed before binding")
            .bindings
            .insert(name, resolved);
    }

    /// Walk from innermost to outermost scope looking for `name`.
    pub fn lookup(&self, name: Symbol) -> Option<Symbol> {
        self.scopes.iter().rev().find_map(|s| s.bindings.get(&name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scope_shadows_outer() {
        let mut stack = ScopeStack::new();
        let x = Symbol::intern("scope_test_x");
        stack.push();
        stack.bind(x, x.with_suffix(0));
        stack.push();
        stack.bind(x, x.with_suffix(1));
        assert_eq!(stack.lookup(x), Some(x.with_suffix(1)));
        stack.pop();
        assert_eq!(stack.lookup(x), Some(x.with_suffix(0)));
    }

    #[test]
    fn redeclaration_check_is_scoped_to_innermost() {
        let mut stack = ScopeStack::new();
        let x = Symbol::intern("scope_test_redecl");
        stack.push();
        stack.bind(x, x.with_suffix(0));
        assert!(stack.declared_in_current_scope(x));
        stack.push();
        assert!(!stack.declared_in_current_scope(x));
    }

    #[test]
    fn unbound_name_is_not_found() {
        let stack = ScopeStack::new();
        assert_eq!(stack.lookup(Symbol::intern("scope_test_missing")), None);
    }
}
