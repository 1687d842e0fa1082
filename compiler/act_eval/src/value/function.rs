//! Callable values.

use std::fmt;
use std::rc::Rc;

use act_ir::{ActionId, TreeId};
use smallvec::SmallVec;

use super::Value;
use crate::environment::ExecutionContext;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

/// A script function: the defining node plus the context it closes over.
///
/// The context is held by reference, so writes made to captured variables
/// after the closure was created are visible when it runs.
pub struct Closure {
    pub(crate) name: Option<Rc<str>>,
    /// The tree `node`, `params` and `body` belong to.
    pub(crate) tree: TreeId,
    pub(crate) node: ActionId,
    pub(crate) params: SmallVec<[ActionId; 4]>,
    pub(crate) body: ActionId,
    /// Arrow functions take `this` from their defining context.
    pub(crate) arrow: bool,
    /// The body is a single expression whose value is the result.
    pub(crate) expression: bool,
    pub(crate) context: ExecutionContext,
}

impl Closure {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for call frames and diagnostics.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or("<anonymous>")
    }

    pub fn tree(&self) -> TreeId {
        self.tree
    }

    /// The `function` / `declareFunction` node this closure was made from.
    pub fn node(&self) -> ActionId {
        self.node
    }

    pub fn body(&self) -> ActionId {
        self.body
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_arrow(&self) -> bool {
        self.arrow
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.display_name())
            .field("node", &self.node)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

/// Signature of a native routine: interpreter, `this`, arguments.
pub type NativeFn = fn(&mut Interpreter<'_>, &Value, &[Value]) -> EvalResult;

/// A built-in routine, optionally bound to the receiver it was read from.
#[derive(Clone)]
pub struct NativeFunction {
    name: &'static str,
    func: NativeFn,
    receiver: Option<Box<Value>>,
}

impl NativeFunction {
    pub fn new(name: &'static str, func: NativeFn) -> Self {
        NativeFunction {
            name,
            func,
            receiver: None,
        }
    }

    /// A method read off `receiver` (`arr.push`), remembering it as `this`.
    pub(crate) fn bound(name: &'static str, func: NativeFn, receiver: Value) -> Self {
        NativeFunction {
            name,
            func,
            receiver: Some(Box::new(receiver)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_deref()
    }

    /// Run the routine. A bound receiver takes precedence over `this`.
    pub fn call(&self, interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
        let this = self.receiver.as_deref().unwrap_or(this);
        (self.func)(interp, this, args)
    }

    /// Same routine bound to the same receiver.
    pub(crate) fn same_as(&self, other: &NativeFunction) -> bool {
        self.name == other.name
            && match (&self.receiver, &other.receiver) {
                (None, None) => true,
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
