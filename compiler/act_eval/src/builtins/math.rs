//! `Math`. `random` draws from the engine's seeded generator.

use crate::coerce::to_number;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, Value};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("abs", abs),
    ("floor", floor),
    ("ceil", ceil),
    ("round", round),
    ("trunc", trunc),
    ("sign", sign),
    ("sqrt", sqrt),
    ("pow", pow),
    ("min", min),
    ("max", max),
    ("random", random),
];

pub(super) fn constants() -> Vec<(&'static str, Value)> {
    vec![
        ("PI", Value::Number(std::f64::consts::PI)),
        ("E", Value::Number(std::f64::consts::E)),
    ]
}

fn num(args: &[Value], index: usize) -> f64 {
    args.get(index).map_or(f64::NAN, to_number)
}

fn unary(args: &[Value], f: fn(f64) -> f64) -> EvalResult {
    Ok(Value::Number(f(num(args, 0))))
}

fn abs(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, f64::abs)
}

fn floor(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, f64::floor)
}

fn ceil(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, f64::ceil)
}

fn trunc(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, f64::trunc)
}

fn sqrt(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, f64::sqrt)
}

/// Halves round toward positive infinity.
pub(crate) fn round_half_up(x: f64) -> f64 {
    if x - x.floor() == 0.5 {
        x.ceil()
    } else {
        x.round()
    }
}

fn round(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, round_half_up)
}

fn sign(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    unary(args, |x| if x == 0.0 || x.is_nan() { x } else { x.signum() })
}

fn pow(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(num(args, 0).powf(num(args, 1))))
}

fn fold(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    args.iter().map(to_number).fold(init, |acc, x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            pick(acc, x)
        }
    })
}

fn min(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(fold(args, f64::INFINITY, f64::min)))
}

fn max(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    Ok(Value::Number(fold(args, f64::NEG_INFINITY, f64::max)))
}

fn random(interp: &mut Interpreter<'_>, _this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::Number(interp.random()))
}
