//! Type coercion and equality.
//!
//! These follow the abstract operations of the scripting language the tree
//! was normalized from (`ToBoolean`, `ToNumber`, `ToString`, `ToInt32`,
//! strict and abstract equality), restricted to the value kinds this
//! engine has. Strings are indexed by Unicode scalar value.

use crate::value::Value;

/// Containers nested deeper than this render as empty when stringified.
const MAX_DISPLAY_DEPTH: usize = 32;

/// `ToBoolean`.
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Str(s) => !s.is_empty(),
        Value::Array(_)
        | Value::Object(_)
        | Value::Function(_)
        | Value::Native(_)
        | Value::Host(_) => true,
    }
}

/// `ToNumber`.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::Str(s) => string_to_number(s),
        Value::Array(_) | Value::Object(_) => string_to_number(&to_display_string(value)),
        Value::Function(_) | Value::Native(_) | Value::Host(_) => f64::NAN,
    }
}

/// Numeric value of a string literal; `NaN` when it is not one.
pub fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64);
        }
    }
    let numeric = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if numeric {
        t.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// `Number::toString` in base 10.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        // Shortest round-trip digits, never in exponent form.
        format!("{n}")
    } else {
        let s = format!("{n:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    }
}

/// `ToString`.
pub fn to_display_string(value: &Value) -> String {
    display_at_depth(value, 0)
}

fn display_at_depth(value: &Value, depth: usize) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::Str(s) => s.to_string(),
        Value::Array(items) => {
            if depth >= MAX_DISPLAY_DEPTH {
                return String::new();
            }
            let Ok(items) = items.try_borrow() else {
                return String::new();
            };
            items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        display_at_depth(item, depth + 1)
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        }
        Value::Object(_) => "[object Object]".to_string(),
        Value::Function(closure) => format!("function {}() {{ ... }}", closure.name().unwrap_or("")),
        Value::Native(native) => format!("function {}() {{ [native code] }}", native.name()),
        Value::Host(host) => format!("[object {}]", host.class_name()),
    }
}

/// `ToPrimitive` with the default hint: containers become their string form.
pub fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_)
        | Value::Object(_)
        | Value::Function(_)
        | Value::Native(_)
        | Value::Host(_) => Value::string(to_display_string(value)),
        _ => value.clone(),
    }
}

/// `ToInt32`.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToUint32`.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// `ToIntegerOrInfinity`.
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolve a relative index (negative counts from the end) into `0..=len`.
pub fn relative_index(value: Option<&Value>, len: usize, default: usize) -> usize {
    let Some(value) = value.filter(|v| !matches!(v, Value::Undefined)) else {
        return default;
    };
    let n = to_integer(to_number(value));
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}

/// The `typeof` operator.
pub fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Undefined => "undefined",
        Value::Null | Value::Array(_) | Value::Object(_) | Value::Host(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Str(_) => "string",
        Value::Function(_) | Value::Native(_) => "function",
    }
}

/// `===`.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        (Value::Function(x), Value::Function(y)) => std::rc::Rc::ptr_eq(x, y),
        (Value::Native(x), Value::Native(y)) => x.same_as(y),
        (Value::Host(x), Value::Host(y)) => std::ptr::addr_eq(
            std::rc::Rc::as_ptr(x),
            std::rc::Rc::as_ptr(y),
        ),
        _ => false,
    }
}

/// `SameValueZero`: strict equality except that `NaN` equals itself.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => strict_equal(a, b),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(
        value,
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) | Value::Host(_)
    )
}

/// `==`.
pub fn loose_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(_), Value::Number(_))
        | (Value::Str(_), Value::Str(_))
        | (Value::Bool(_), Value::Bool(_)) => strict_equal(a, b),
        (Value::Number(n), Value::Str(s)) | (Value::Str(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => {
            loose_equal(&Value::Number(f64::from(u8::from(*flag))), other)
        }
        _ if is_container(a) && is_container(b) => strict_equal(a, b),
        _ if is_container(a) => loose_equal(&to_primitive(a), b),
        _ => loose_equal(a, &to_primitive(b)),
    }
}
