//! String methods. Positions count Unicode scalar values.

use super::{arg, MethodTable};
use crate::coerce::{relative_index, to_display_string, to_integer, to_number, to_uint32};
use crate::errors::{type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) const METHODS: MethodTable = &[
    ("charAt", char_at),
    ("indexOf", index_of),
    ("includes", includes),
    ("startsWith", starts_with),
    ("endsWith", ends_with),
    ("slice", slice),
    ("substring", substring),
    ("toUpperCase", to_upper_case),
    ("toLowerCase", to_lower_case),
    ("trim", trim),
    ("split", split),
    ("replace", replace),
    ("toString", to_string),
];

fn receiver<'v>(this: &'v Value, method: &str) -> Result<&'v str, EvalError> {
    this.as_str().ok_or_else(|| {
        type_error(format!(
            "String.prototype.{method} called on {}",
            this.type_name()
        ))
    })
}

/// String form of argument `index`; `undefined` prints as "undefined".
fn str_arg(args: &[Value], index: usize) -> String {
    to_display_string(&arg(args, index))
}

/// Byte offset of char position `chars` (clamped to the end).
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Clamp a non-relative position argument into `0..=len`.
fn clamp_position(value: Option<&Value>, len: usize, default: usize) -> usize {
    match value {
        None | Some(Value::Undefined) => default,
        Some(v) => to_integer(to_number(v)).clamp(0.0, len as f64) as usize,
    }
}

fn sub_chars(s: &str, start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

fn char_at(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "charAt")?;
    let index = to_integer(to_number(&arg(args, 0)));
    let ch = if index < 0.0 {
        None
    } else {
        s.chars().nth(index as usize)
    };
    Ok(Value::string(ch.map(String::from).unwrap_or_default()))
}

/// Char position of `needle` at or after char `from`.
fn find_from(s: &str, needle: &str, from: usize) -> Option<usize> {
    let start = byte_offset(s, from);
    s[start..]
        .find(needle)
        .map(|offset| from + char_count(&s[start..start + offset]))
}

fn index_of(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "indexOf")?;
    let from = clamp_position(args.get(1), char_count(s), 0);
    let position = find_from(s, &str_arg(args, 0), from).map_or(-1.0, |i| i as f64);
    Ok(Value::Number(position))
}

fn includes(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "includes")?;
    let from = clamp_position(args.get(1), char_count(s), 0);
    Ok(Value::Bool(find_from(s, &str_arg(args, 0), from).is_some()))
}

fn starts_with(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "startsWith")?;
    let from = clamp_position(args.get(1), char_count(s), 0);
    Ok(Value::Bool(s[byte_offset(s, from)..].starts_with(&str_arg(args, 0))))
}

fn ends_with(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "endsWith")?;
    let len = char_count(s);
    let end = clamp_position(args.get(1), len, len);
    Ok(Value::Bool(s[..byte_offset(s, end)].ends_with(&str_arg(args, 0))))
}

fn slice(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "slice")?;
    let len = char_count(s);
    let start = relative_index(args.first(), len, 0);
    let end = relative_index(args.get(1), len, len);
    Ok(Value::string(sub_chars(s, start, end)))
}

fn substring(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "substring")?;
    let len = char_count(s);
    let a = clamp_position(args.first(), len, 0);
    let b = clamp_position(args.get(1), len, len);
    Ok(Value::string(sub_chars(s, a.min(b), a.max(b))))
}

fn to_upper_case(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver(this, "toUpperCase")?.to_uppercase()))
}

fn to_lower_case(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver(this, "toLowerCase")?.to_lowercase()))
}

fn trim(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver(this, "trim")?.trim()))
}

fn to_string(_interp: &mut Interpreter<'_>, this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string(receiver(this, "toString")?))
}

fn split(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "split")?;
    let limit = match args.get(1) {
        None | Some(Value::Undefined) => usize::MAX,
        Some(v) => to_uint32(to_number(v)) as usize,
    };
    let parts: Vec<Value> = match args.first() {
        None | Some(Value::Undefined) => vec![Value::string(s)],
        Some(sep) => {
            let sep = to_display_string(sep);
            if sep.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(Value::string).collect()
            }
        }
    };
    Ok(Value::array(parts.into_iter().take(limit).collect()))
}

/// Replaces the first occurrence. A callable replacement receives
/// `(match, position, string)`.
fn replace(interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let s = receiver(this, "replace")?;
    let pattern = str_arg(args, 0);
    let Some(byte) = s.find(pattern.as_str()) else {
        return Ok(Value::string(s));
    };
    let replacement = match args.get(1) {
        Some(f) if f.is_callable() => {
            let position = Value::Number(char_count(&s[..byte]) as f64);
            let result = interp.call_function(
                f,
                Value::Undefined,
                &[Value::string(pattern.as_str()), position, this.clone()],
                None,
            )?;
            to_display_string(&result)
        }
        _ => str_arg(args, 1),
    };
    let mut out = String::with_capacity(s.len() + replacement.len());
    out.push_str(&s[..byte]);
    out.push_str(&replacement);
    out.push_str(&s[byte + pattern.len()..]);
    Ok(Value::string(out))
}
