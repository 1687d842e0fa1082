//! `Number` statics and the global conversion functions.

use crate::coerce::{to_boolean, to_display_string, to_int32, to_number};
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::methods::arg;
use crate::value::{NativeFn, Value};

pub(super) const NUMBER_FUNCTIONS: &[(&str, NativeFn)] = &[
    ("isInteger", is_integer),
    ("isNaN", is_nan_strict),
    ("isFinite", is_finite_strict),
    ("parseInt", parse_int),
    ("parseFloat", parse_float),
];

pub(super) const GLOBAL_FUNCTIONS: &[(&str, NativeFn)] = &[
    ("parseInt", parse_int),
    ("parseFloat", parse_float),
    ("isNaN", is_nan),
    ("isFinite", is_finite),
    ("String", string),
    ("Number", number),
    ("Boolean", boolean),
];

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub(super) fn constants() -> Vec<(&'static str, Value)> {
    vec![
        ("MAX_SAFE_INTEGER", Value::Number(MAX_SAFE_INTEGER)),
        ("MIN_SAFE_INTEGER", Value::Number(-MAX_SAFE_INTEGER)),
        ("EPSILON", Value::Number(f64::EPSILON)),
        ("NaN", Value::Number(f64::NAN)),
        ("POSITIVE_INFINITY", Value::Number(f64::INFINITY)),
        ("NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY)),
    ]
}

/// `parseInt(text, radix)`: the longest valid digit prefix.
pub(crate) fn parse_int_str(text: &str, radix: Option<u32>) -> f64 {
    let mut s = text.trim_start();
    let negative = s.starts_with('-');
    if let Some(rest) = s.strip_prefix(['-', '+']) {
        s = rest;
    }
    let mut radix = radix.unwrap_or(0);
    let has_hex_prefix = s.starts_with("0x") || s.starts_with("0X");
    if (radix == 0 || radix == 16) && has_hex_prefix {
        s = &s[2..];
        radix = 16;
    }
    if radix == 0 {
        radix = 10;
    }
    if !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    let mut value = 0.0;
    let mut any = false;
    for digit in s.chars().map_while(|c| c.to_digit(radix)) {
        value = value * f64::from(radix) + f64::from(digit);
        any = true;
    }
    match (any, negative) {
        (false, _) => f64::NAN,
        (true, true) => -value,
        (true, false) => value,
    }
}

/// `parseFloat(text)`: the longest prefix that reads as a decimal literal.
pub(crate) fn parse_float_str(text: &str) -> f64 {
    let s = text.trim_start();
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    if body.starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let bytes = s.as_bytes();
    let mut end = usize::from(s.len() > body.len());
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };
    let int_end = digits_from(end);
    let mut saw_digit = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        saw_digit |= frac_end > end + 1;
        end = frac_end;
    }
    if !saw_digit {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

fn radix_arg(args: &[Value]) -> Option<u32> {
    match args.get(1) {
        None | Some(Value::Undefined) => None,
        Some(v) => Some(to_int32(to_number(v)) as u32),
    }
}

fn parse_int(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let text = to_display_string(&arg(args, 0));
    Ok(Value::Number(parse_int_str(&text, radix_arg(args))))
}

fn parse_float(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let text = to_display_string(&arg(args, 0));
    Ok(Value::Number(parse_float_str(&text)))
}

fn is_integer(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let result = matches!(args.first(), Some(Value::Number(n)) if n.is_finite() && n.fract() == 0.0);
    Ok(Value::Bool(result))
}

fn is_nan_strict(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Number(n)) if n.is_nan())))
}

fn is_finite_strict(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Number(n)) if n.is_finite())))
}

fn is_nan(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(to_number(&arg(args, 0)).is_nan()))
}

fn is_finite(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(to_number(&arg(args, 0)).is_finite()))
}

fn string(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let text = args.first().map(to_display_string).unwrap_or_default();
    Ok(Value::string(text))
}

fn number(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(args.first().map_or(0.0, to_number)))
}

fn boolean(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Bool(to_boolean(&arg(args, 0))))
}
