//! Lexical scopes mapping names to type tags.

use std::collections::HashMap;

use crate::analyze::SemanticError;

/// A flat mapping from name to type tag. Names are unique within one scope.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scope {
    symbols: HashMap<String, String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the type tag of `name` in this scope only.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Stack of [`Scope`]s, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an empty scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost scope. Does nothing if there are no scopes.
    pub fn exit_scope(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `name` with type tag `ty` in the innermost scope, creating one if the stack
    /// is empty. A name already declared in that scope is left untouched.
    pub fn declare(&mut self, ty: &str, name: &str) -> Result<(), SemanticError> {
        if self.scopes.is_empty() {
            self.enter_scope();
        }
        let scope = self
            .scopes
            .last_mut()
            .ok_or(SemanticError::NoScope)?;

        if scope.contains(name) {
            return Err(SemanticError::Redeclaration(name.to_string()));
        }
        scope.symbols.insert(name.to_string(), ty.to_string());
        Ok(())
    }

    /// Removes `name` from the innermost scope.
    pub fn remove(&mut self, name: &str) -> Result<(), SemanticError> {
        let scope = self.scopes.last_mut().ok_or(SemanticError::NoScope)?;
        match scope.symbols.remove(name) {
            Some(_) => Ok(()),
            None => Err(SemanticError::UnknownSymbol(name.to_string())),
        }
    }

    /// Returns the type tag of `name` from the innermost scope declaring it.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Returns `true` if `name` is declared in any active scope.
    pub fn contains(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        assert_eq!(scopes.declare("int", "x"), Ok(()));
        assert_eq!(scopes.lookup("x"), Some("int"));
        assert!(scopes.contains("x"));
        assert_eq!(scopes.lookup("y"), None);
        assert!(!scopes.contains("y"));
    }

    #[test]
    fn test_redeclaration_keeps_first() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.declare("int", "a").unwrap();
        assert_eq!(
            scopes.declare("float", "a"),
            Err(SemanticError::Redeclaration("a".to_string()))
        );
        assert_eq!(scopes.lookup("a"), Some("int"));
    }

    #[test]
    fn test_shadowing_and_exit() {
        let mut scopes = ScopeStack::new();
        scopes.enter_scope();
        scopes.declare("int", "x").unwrap();

        scopes.enter_scope();
        scopes.declare("string", "x").unwrap();
        scopes.declare("bool", "inner").unwrap();
        assert_eq!(scopes.lookup("x"), Some("string"));
        assert_eq!(scopes.depth(), 2);

        let inner = scopes.exit_scope().unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(scopes.lookup("x"), Some("int"));
        assert_eq!(scopes.lookup("inner"), None);
        assert!(!scopes.contains("inner"));
    }

    #[test]
    fn test_exit_on_empty_stack() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.exit_scope(), None);
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_declare_without_scope_creates_one() {
        let mut scopes = ScopeStack::new();
        scopes.declare("char", "c").unwrap();
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.lookup("c"), Some("char"));
    }

    #[test]
    fn test_remove() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.remove("x"), Err(SemanticError::NoScope));

        scopes.enter_scope();
        scopes.declare("int", "x").unwrap();
        assert_eq!(scopes.remove("x"), Ok(()));
        assert_eq!(scopes.lookup("x"), None);
        assert_eq!(
            scopes.remove("x"),
            Err(SemanticError::UnknownSymbol("x".to_string()))
        );
    }
}
