//! Number methods.

use super::MethodTable;
use crate::coerce::{number_to_string, to_integer, to_number};
use crate::errors::{range_error, type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) const METHODS: MethodTable = &[("toFixed", to_fixed), ("toString", to_string)];

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fraction digits emitted for non-decimal radixes.
const MAX_FRACTION_DIGITS: usize = 20;

fn receiver(this: &Value, method: &str) -> Result<f64, EvalError> {
    this.as_number().ok_or_else(|| {
        type_error(format!(
            "Number.prototype.{method} called on {}",
            this.type_name()
        ))
    })
}

fn to_fixed(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let n = receiver(this, "toFixed")?;
    let digits = args.first().map_or(0.0, |v| to_integer(to_number(v)));
    if !(0.0..=100.0).contains(&digits) {
        return Err(range_error("toFixed() digits argument must be between 0 and 100"));
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(Value::string(number_to_string(n)));
    }
    Ok(Value::string(format!("{:.*}", digits as usize, n)))
}

fn to_string(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let n = receiver(this, "toString")?;
    let radix = match args.first() {
        None | Some(Value::Undefined) => 10.0,
        Some(v) => to_integer(to_number(v)),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(range_error("toString() radix must be between 2 and 36"));
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(Value::string(number_to_string(n)));
    }
    Ok(Value::string(format_radix(n, radix as u32)))
}

/// Digits of `n` in `radix`.
pub(crate) fn format_radix(n: f64, radix: u32) -> String {
    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    let n = n.abs();
    let mut int = n.trunc();
    let mut frac = n - int;

    let base = f64::from(radix);
    let mut int_digits = Vec::new();
    loop {
        let digit = (int % base) as usize;
        int_digits.push(DIGITS[digit]);
        int = (int / base).trunc();
        if int < 1.0 {
            break;
        }
    }
    out.extend(int_digits.iter().rev().map(|d| char::from(*d)));

    if frac > 0.0 {
        out.push('.');
        for _ in 0..MAX_FRACTION_DIGITS {
            frac *= base;
            let digit = frac.trunc();
            out.push(char::from(DIGITS[digit as usize]));
            frac -= digit;
            if frac <= 0.0 {
                break;
            }
        }
    }
    out
}
