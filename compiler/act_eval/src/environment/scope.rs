//! Scope frames.

use rustc_hash::FxHashMap;

use super::LocalScope;
use crate::value::Value;

/// Mutation policy of a scope frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// `let`/`var` bindings: no redeclaration, updates allowed.
    Variable,
    /// `const` bindings: no redeclaration, no updates.
    Constant,
    /// Function declarations: redeclaration replaces the binding.
    Function,
}

/// Failure of a scope operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("identifier '{0}' has already been declared")]
    DuplicateDeclaration(String),
    #[error("{0} is not defined")]
    UndefinedReference(String),
    #[error("assignment to constant variable '{0}'")]
    ConstAssignment(String),
}

/// One frame of a scope chain.
///
/// The parent link is shared, not owned: whoever builds the chain keeps
/// the frames alive.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    bindings: FxHashMap<String, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// A root frame.
    pub fn new(kind: ScopeKind) -> Self {
        Scope {
            kind,
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    pub fn with_parent(kind: ScopeKind, parent: LocalScope<Scope>) -> Self {
        Scope {
            kind,
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<LocalScope<Scope>> {
        self.parent.clone()
    }

    /// Declare `name` in this frame.
    ///
    /// Fails on a local duplicate, except in function frames where the
    /// later declaration wins.
    pub fn push(&mut self, name: &str, value: Value) -> Result<(), ScopeError> {
        if self.kind != ScopeKind::Function && self.bindings.contains_key(name) {
            return Err(ScopeError::DuplicateDeclaration(name.to_string()));
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Declare or overwrite in this frame, regardless of kind.
    #[inline]
    pub fn set(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Resolve `name` through the chain.
    pub fn get(&self, name: &str) -> Result<Value, ScopeError> {
        self.lookup(name)
            .ok_or_else(|| ScopeError::UndefinedReference(name.to_string()))
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.borrow().lookup(name)
    }

    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.borrow().has(name))
    }

    #[inline]
    pub fn has_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Mutate the nearest frame holding `name`.
    ///
    /// Returns `Ok(false)` when no frame holds it. A constant frame holding
    /// it refuses with [`ScopeError::ConstAssignment`].
    pub fn update(&mut self, name: &str, value: Value) -> Result<bool, ScopeError> {
        if let Some(slot) = self.bindings.get_mut(name) {
            if self.kind == ScopeKind::Constant {
                return Err(ScopeError::ConstAssignment(name.to_string()));
            }
            *slot = value;
            return Ok(true);
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().update(name, value),
            None => Ok(false),
        }
    }

    /// Remove `name` from this frame only.
    pub fn delete(&mut self, name: &str) -> bool {
        self.bindings.remove(name).is_some()
    }

    /// Names bound in this frame, in no particular order.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl LocalScope<Scope> {
    /// A fresh frame of the same kind chained to this one.
    pub fn create_child_scope(&self) -> LocalScope<Scope> {
        let kind = self.borrow().kind;
        LocalScope::new(Scope::with_parent(kind, self.clone()))
    }
}
