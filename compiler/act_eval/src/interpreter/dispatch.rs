//! Tag-keyed handler table.

use std::fmt;

use act_ir::Action;
use rustc_hash::FxHashMap;

use super::{calls, control, expressions, members, statements, ExecResult, Interpreter};
use crate::environment::ExecutionContext;

/// A node handler: evaluates `node` in `ctx`.
pub type Handler =
    for<'a> fn(&mut Interpreter<'a>, &'a Action, &ExecutionContext) -> ExecResult;

/// Flat map from action type to handler.
///
/// Adding behavior for a new tag is one [`register`](Self::register) call.
#[derive(Clone)]
pub struct DispatchTable {
    handlers: FxHashMap<String, Handler>,
}

impl DispatchTable {
    /// A table with no handlers.
    pub fn empty() -> Self {
        DispatchTable {
            handlers: FxHashMap::default(),
        }
    }

    /// Every built-in tag.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        statements::register(&mut table);
        expressions::register(&mut table);
        members::register(&mut table);
        control::register(&mut table);
        calls::register(&mut table);
        table
    }

    /// Install `handler` for `tag`, returning the handler it replaces.
    pub fn register(&mut self, tag: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.handlers.insert(tag.into(), handler)
    }

    #[inline]
    pub fn get(&self, tag: &str) -> Option<Handler> {
        self.handlers.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("tags", &self.tags())
            .finish()
    }
}
