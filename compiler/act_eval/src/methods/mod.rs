//! Intrinsic methods of primitive and container values.
//!
//! Reading `arr.push` yields a [`NativeFunction`] bound to `arr`, so a
//! method called through a `member` callee and one extracted into a
//! variable first behave the same.

mod array;
mod number;
mod object;
mod string;

use crate::coerce::{to_display_string, type_of};
use crate::errors::{type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, NativeFunction, Value};

type MethodTable = &'static [(&'static str, NativeFn)];

const BOOL_METHODS: MethodTable = &[("toString", bool_to_string)];

fn bool_to_string(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(to_display_string(this)))
}

/// The intrinsic `key` of `base`, bound to it.
pub(crate) fn lookup(base: &Value, key: &str) -> Option<NativeFunction> {
    let table = match base {
        Value::Array(_) => array::METHODS,
        Value::Str(_) => string::METHODS,
        Value::Number(_) => number::METHODS,
        Value::Object(_) => object::METHODS,
        Value::Bool(_) => BOOL_METHODS,
        _ => return None,
    };
    let &(name, func) = table.iter().find(|(name, _)| *name == key)?;
    Some(NativeFunction::bound(name, func, base.clone()))
}

/// Argument `index`, `undefined` when absent.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Argument `index`, which must be callable.
pub(crate) fn callback(args: &[Value], index: usize, method: &str) -> Result<Value, EvalError> {
    match args.get(index) {
        Some(f) if f.is_callable() => Ok(f.clone()),
        Some(other) => Err(type_error(format!(
            "{} is not a function (in {method})",
            type_of(other)
        ))),
        None => Err(type_error(format!("undefined is not a function (in {method})"))),
    }
}

#[cfg(test)]
mod tests;
