//! Execution contexts.

use super::{CallStack, LocalScope, Scope, ScopeError, ScopeKind, SharedCallStack};
use crate::value::Value;

/// Source-level declaration keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
}

impl DeclarationKind {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "let" => Some(Self::Let),
            "const" => Some(Self::Const),
            "var" => Some(Self::Var),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Const => "const",
            Self::Var => "var",
        }
    }
}

/// One lexical evaluation frame.
///
/// Holds a variable, a constant and a function scope, each chained to the
/// corresponding scope of the parent context, plus the call stack shared
/// by the whole execution. Cloning a context clones handles, not frames.
#[derive(Clone, Debug)]
pub struct ExecutionContext {
    vars: LocalScope<Scope>,
    consts: LocalScope<Scope>,
    functions: LocalScope<Scope>,
    call_stack: SharedCallStack,
    /// Variable frame that `var` declarations land in (the nearest function
    /// or root frame).
    var_target: LocalScope<Scope>,
    this: Value,
}

impl ExecutionContext {
    /// A root context with empty scopes.
    pub fn new(call_stack: SharedCallStack) -> Self {
        let vars = LocalScope::new(Scope::new(ScopeKind::Variable));
        ExecutionContext {
            var_target: vars.clone(),
            vars,
            consts: LocalScope::new(Scope::new(ScopeKind::Constant)),
            functions: LocalScope::new(Scope::new(ScopeKind::Function)),
            call_stack,
            this: Value::Undefined,
        }
    }

    /// A root context with its own call stack.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(LocalScope::new(CallStack::new(max_depth)))
    }

    pub fn vars(&self) -> &LocalScope<Scope> {
        &self.vars
    }

    pub fn consts(&self) -> &LocalScope<Scope> {
        &self.consts
    }

    pub fn functions(&self) -> &LocalScope<Scope> {
        &self.functions
    }

    pub fn call_stack(&self) -> &SharedCallStack {
        &self.call_stack
    }

    /// A block-level child: fresh frames chained to ours, same call stack.
    pub fn create_child_context(&self) -> Self {
        ExecutionContext {
            vars: self.vars.create_child_scope(),
            consts: self.consts.create_child_scope(),
            functions: self.functions.create_child_scope(),
            call_stack: self.call_stack.clone(),
            var_target: self.var_target.clone(),
            this: self.this.clone(),
        }
    }

    /// A function-body child: like [`create_child_context`](Self::create_child_context)
    /// but `var` declarations stop here and `this` is rebound.
    pub fn create_function_context(&self, this: Value) -> Self {
        let mut child = self.create_child_context();
        child.var_target = child.vars.clone();
        child.this = this;
        child
    }

    pub fn this_value(&self) -> Value {
        self.this.clone()
    }

    /// Walk the three chains level by level, innermost first.
    fn levels(&self) -> Levels {
        Levels {
            cursors: [
                Some(self.vars.clone()),
                Some(self.consts.clone()),
                Some(self.functions.clone()),
            ],
        }
    }

    /// Resolve `name`. An inner declaration of any kind shadows outer ones.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.levels().find_map(|level| {
            level
                .iter()
                .flatten()
                .find_map(|scope| scope.borrow().get_local(name))
        })
    }

    pub fn get(&self, name: &str) -> Result<Value, ScopeError> {
        self.lookup(name)
            .ok_or_else(|| ScopeError::UndefinedReference(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.levels()
            .any(|level| level.iter().flatten().any(|scope| scope.borrow().has_local(name)))
    }

    /// Whether `name` is declared in this context's own frames.
    pub fn has_local(&self, name: &str) -> bool {
        self.vars.borrow().has_local(name)
            || self.consts.borrow().has_local(name)
            || self.functions.borrow().has_local(name)
    }

    /// Assign to the nearest existing binding of `name`.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ScopeError> {
        for [vars, consts, functions] in self.levels() {
            if let Some(vars) = vars.filter(|s| s.borrow().has_local(name)) {
                vars.borrow_mut().set(name, value);
                return Ok(());
            }
            if consts.as_ref().is_some_and(|s| s.borrow().has_local(name)) {
                return Err(ScopeError::ConstAssignment(name.to_string()));
            }
            if let Some(functions) = functions.filter(|s| s.borrow().has_local(name)) {
                functions.borrow_mut().set(name, value);
                return Ok(());
            }
        }
        Err(ScopeError::UndefinedReference(name.to_string()))
    }

    /// Declare `name` with source-level semantics.
    ///
    /// `let`/`const` reject a name already declared in this context. `var`
    /// lands in the nearest function frame, may be repeated, and keeps the
    /// existing value when redeclared without an initializer.
    pub fn declare(
        &self,
        kind: DeclarationKind,
        name: &str,
        value: Option<Value>,
    ) -> Result<(), ScopeError> {
        match kind {
            DeclarationKind::Let | DeclarationKind::Const => {
                if self.has_local(name) {
                    return Err(ScopeError::DuplicateDeclaration(name.to_string()));
                }
                let scope = if kind == DeclarationKind::Const {
                    &self.consts
                } else {
                    &self.vars
                };
                scope
                    .borrow_mut()
                    .push(name, value.unwrap_or(Value::Undefined))
            }
            DeclarationKind::Var => {
                if self.var_target.ptr_eq(&self.vars) && self.consts.borrow().has_local(name) {
                    return Err(ScopeError::DuplicateDeclaration(name.to_string()));
                }
                let mut target = self.var_target.borrow_mut();
                match value {
                    Some(value) => target.set(name, value),
                    None if !target.has_local(name) => target.set(name, Value::Undefined),
                    None => {}
                }
                Ok(())
            }
        }
    }

    /// Bind a function declaration; a later declaration replaces it.
    pub fn declare_function(&self, name: &str, value: Value) {
        self.functions.borrow_mut().set(name, value);
    }

    /// Bind a parameter or other engine-introduced variable in this frame.
    pub fn bind(&self, name: &str, value: Value) {
        self.vars.borrow_mut().set(name, value);
    }

    /// Bind a constant in this frame, replacing any previous one.
    pub fn bind_constant(&self, name: &str, value: Value) {
        self.consts.borrow_mut().set(name, value);
    }

    /// Number of call frames on the shared stack.
    pub fn call_depth(&self) -> usize {
        self.call_stack.borrow().depth()
    }
}

/// Iterator over the `[vars, consts, functions]` frames at each level.
struct Levels {
    cursors: [Option<LocalScope<Scope>>; 3],
}

impl Iterator for Levels {
    type Item = [Option<LocalScope<Scope>>; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursors.iter().all(Option::is_none) {
            return None;
        }
        let current = self.cursors.clone();
        for cursor in &mut self.cursors {
            *cursor = cursor.as_ref().and_then(|scope| scope.borrow().parent());
        }
        Some(current)
    }
}
