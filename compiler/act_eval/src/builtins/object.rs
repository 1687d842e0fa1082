//! `Object` and `Array` statics.

use crate::errors::{type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::methods::arg;
use crate::value::{NativeFn, Value};

pub(super) const OBJECT_FUNCTIONS: &[(&str, NativeFn)] = &[
    ("keys", keys),
    ("values", values),
    ("entries", entries),
    ("assign", assign),
];

pub(super) const ARRAY_FUNCTIONS: &[(&str, NativeFn)] = &[("isArray", is_array)];

/// Own enumerable `(key, value)` pairs in property order.
pub(crate) fn own_entries(value: &Value) -> Result<Vec<(String, Value)>, EvalError> {
    let entries = match value {
        Value::Undefined | Value::Null => {
            return Err(type_error("Cannot convert undefined or null to object"));
        }
        Value::Object(props) => props
            .borrow()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::Str(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::string(c.to_string())))
            .collect(),
        Value::Host(host) => host
            .keys()
            .into_iter()
            .map(|key| {
                let value = host.get(&key);
                (key, value)
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(entries)
}

fn keys(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let entries = own_entries(&arg(args, 0))?;
    Ok(Value::array(
        entries.into_iter().map(|(k, _)| Value::from(k)).collect(),
    ))
}

fn values(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let entries = own_entries(&arg(args, 0))?;
    Ok(Value::array(entries.into_iter().map(|(_, v)| v).collect()))
}

fn entries(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let entries = own_entries(&arg(args, 0))?;
    Ok(Value::array(
        entries
            .into_iter()
            .map(|(k, v)| Value::array(vec![Value::from(k), v]))
            .collect(),
    ))
}

/// `Object.assign(target, ...sources)`; nullish sources are skipped.
fn assign(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let target = arg(args, 0);
    if target.is_nullish() {
        return Err(type_error("Cannot convert undefined or null to object"));
    }
    for source in args.iter().skip(1).filter(|s| !s.is_nullish()) {
        for (key, value) in own_entries(source)? {
            interp.set_property(&target, &key, value)?;
        }
    }
    Ok(target)
}

fn is_array(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Array(_)))))
}
