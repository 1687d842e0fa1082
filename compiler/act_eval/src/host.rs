//! Binding contract for an external object graph.
//!
//! The engine defines no DOM or window behavior. An embedder implements
//! [`HostObject`] for its document/window/element types and hands them to
//! the engine through an [`EnvironmentBinding`]; script code then reads,
//! writes and calls them exactly like any other value.
//!
//! Timers and event queues live on the host side: a host method stores the
//! callable it receives and the embedder later runs it through
//! [`Engine::invoke`](crate::Engine::invoke) from its own tick loop.

use crate::errors::{not_callable, type_error, EvalError, EvalResult};
use crate::value::Value;

/// What a host object may do back into the engine while handling a call.
pub trait HostCallbacks {
    /// Call a script or native callable with `this` unbound.
    fn call(&mut self, callee: &Value, args: &[Value]) -> EvalResult;

    /// Append a host effect record.
    fn record(&mut self, target: &str, message: String);
}

/// An object owned by the bound environment.
///
/// Methods take `&self`; hosts keep their mutable state behind their own
/// interior mutability.
pub trait HostObject {
    /// Class shown in diagnostics and by `String(obj)`.
    fn class_name(&self) -> &str;

    /// Read a property. Unknown properties read as `undefined`.
    fn get(&self, property: &str) -> Value {
        let _ = property;
        Value::Undefined
    }

    /// Write a property.
    fn set(&self, property: &str, value: Value) -> Result<(), EvalError> {
        let _ = value;
        Err(type_error(format!(
            "Cannot set property '{property}' of {}",
            self.class_name()
        )))
    }

    /// Invoke a method.
    fn call_method(
        &self,
        method: &str,
        args: &[Value],
        host: &mut dyn HostCallbacks,
    ) -> EvalResult {
        let _ = (args, host);
        Err(not_callable(format!("{}.{method}", self.class_name())))
    }

    /// Enumerable property names, for `for...in` and `Object.keys`.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A source of named globals (e.g. `document`, `window`).
pub trait EnvironmentBinding {
    fn globals(&self) -> Vec<(String, Value)>;
}

impl EnvironmentBinding for Vec<(String, Value)> {
    fn globals(&self) -> Vec<(String, Value)> {
        self.clone()
    }
}
