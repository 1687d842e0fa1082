//! Array methods.
//!
//! Callback methods iterate over a snapshot taken when they start; the
//! callback receives `(item, index, array)`.

use super::{arg, callback, MethodTable};
use crate::coerce::{relative_index, same_value_zero, strict_equal, to_boolean, to_display_string};
use crate::errors::{type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{ArrayRef, Value};

pub(super) const METHODS: MethodTable = &[
    ("push", push),
    ("pop", pop),
    ("shift", shift),
    ("unshift", unshift),
    ("slice", slice),
    ("concat", concat),
    ("join", join),
    ("indexOf", index_of),
    ("includes", includes),
    ("reverse", reverse),
    ("map", map),
    ("filter", filter),
    ("forEach", for_each),
    ("reduce", reduce),
    ("find", find),
    ("findIndex", find_index),
    ("some", some),
    ("every", every),
    ("toString", to_string),
];

fn receiver<'v>(this: &'v Value, method: &str) -> Result<&'v ArrayRef, EvalError> {
    match this {
        Value::Array(items) => Ok(items),
        other => Err(type_error(format!(
            "Array.prototype.{method} called on {}",
            other.type_name()
        ))),
    }
}

fn snapshot(this: &Value, method: &str) -> Result<Vec<Value>, EvalError> {
    Ok(receiver(this, method)?.borrow().clone())
}

fn len_value(items: &ArrayRef) -> Value {
    Value::Number(items.borrow().len() as f64)
}

fn push(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = receiver(this, "push")?;
    items.borrow_mut().extend_from_slice(args);
    Ok(len_value(items))
}

fn pop(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    let items = receiver(this, "pop")?;
    let last = items.borrow_mut().pop();
    Ok(last.unwrap_or_default())
}

fn shift(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    let mut items = receiver(this, "shift")?.borrow_mut();
    if items.is_empty() {
        return Ok(Value::Undefined);
    }
    Ok(items.remove(0))
}

fn unshift(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = receiver(this, "unshift")?;
    items.borrow_mut().splice(0..0, args.iter().cloned());
    Ok(len_value(items))
}

fn slice(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = snapshot(this, "slice")?;
    let start = relative_index(args.first(), items.len(), 0);
    let end = relative_index(args.get(1), items.len(), items.len());
    let sliced = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    Ok(Value::array(sliced))
}

fn concat(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut items = snapshot(this, "concat")?;
    for value in args {
        match value {
            Value::Array(other) => items.extend(other.borrow().iter().cloned()),
            other => items.push(other.clone()),
        }
    }
    Ok(Value::array(items))
}

/// `join`; nullish elements print as empty strings.
pub(crate) fn join_values(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| {
            if item.is_nullish() {
                String::new()
            } else {
                to_display_string(item)
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn join(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = snapshot(this, "join")?;
    let separator = match args.first() {
        None | Some(Value::Undefined) => ",".to_string(),
        Some(sep) => to_display_string(sep),
    };
    Ok(Value::string(join_values(&items, &separator)))
}

fn to_string(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    let items = snapshot(this, "toString")?;
    Ok(Value::string(join_values(&items, ",")))
}

fn index_of(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = snapshot(this, "indexOf")?;
    let needle = arg(args, 0);
    let from = relative_index(args.get(1), items.len(), 0);
    let position = items
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, item)| strict_equal(item, &needle))
        .map_or(-1.0, |(i, _)| i as f64);
    Ok(Value::Number(position))
}

fn includes(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = snapshot(this, "includes")?;
    let needle = arg(args, 0);
    let from = relative_index(args.get(1), items.len(), 0);
    let found = items.iter().skip(from).any(|item| same_value_zero(item, &needle));
    Ok(Value::Bool(found))
}

fn reverse(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    receiver(this, "reverse")?.borrow_mut().reverse();
    Ok(this.clone())
}

/// Call `f(item, index, array)` for each snapshot entry until `visit`
/// returns `false`.
fn each(
    interp: &mut Interpreter<'_>,
    this: &Value,
    args: &[Value],
    method: &str,
    mut visit: impl FnMut(usize, &Value, Value) -> bool,
) -> Result<(), EvalError> {
    let items = snapshot(this, method)?;
    let f = callback(args, 0, method)?;
    for (index, item) in items.into_iter().enumerate() {
        let result = interp.call_function(
            &f,
            Value::Undefined,
            &[item.clone(), Value::Number(index as f64), this.clone()],
            None,
        )?;
        if !visit(index, &item, result) {
            break;
        }
    }
    Ok(())
}

fn map(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut mapped = Vec::new();
    each(interp, this, args, "map", |_, _, result| {
        mapped.push(result);
        true
    })?;
    Ok(Value::array(mapped))
}

fn filter(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut kept = Vec::new();
    each(interp, this, args, "filter", |_, item, result| {
        if to_boolean(&result) {
            kept.push(item.clone());
        }
        true
    })?;
    Ok(Value::array(kept))
}

fn for_each(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    each(interp, this, args, "forEach", |_, _, _| true)?;
    Ok(Value::Undefined)
}

fn find(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut found = Value::Undefined;
    each(interp, this, args, "find", |_, item, result| {
        if to_boolean(&result) {
            found = item.clone();
            return false;
        }
        true
    })?;
    Ok(found)
}

fn find_index(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut found = -1.0;
    each(interp, this, args, "findIndex", |index, _, result| {
        if to_boolean(&result) {
            found = index as f64;
            return false;
        }
        true
    })?;
    Ok(Value::Number(found))
}

fn some(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut any = false;
    each(interp, this, args, "some", |_, _, result| {
        any = to_boolean(&result);
        !any
    })?;
    Ok(Value::Bool(any))
}

fn every(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let mut all = true;
    each(interp, this, args, "every", |_, _, result| {
        all = to_boolean(&result);
        all
    })?;
    Ok(Value::Bool(all))
}

fn reduce(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let items = snapshot(this, "reduce")?;
    let f = callback(args, 0, "reduce")?;
    let mut entries = items.into_iter().enumerate();
    let mut acc = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match entries.next() {
            Some((_, first)) => first,
            None => return Err(type_error("Reduce of empty array with no initial value")),
        },
    };
    for (index, item) in entries {
        acc = interp.call_function(
            &f,
            Value::Undefined,
            &[acc, item, Value::Number(index as f64), this.clone()],
            None,
        )?;
    }
    Ok(acc)
}
