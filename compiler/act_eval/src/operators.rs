//! Binary operators.
//!
//! Operator symbols arrive as the `operator` attribute of `binaryOp` and
//! `assign` nodes and are parsed once into [`BinaryOp`] / [`LogicalOp`].
//! Evaluation is a direct match; the short-circuiting logical operators are
//! evaluated by the interpreter, which controls whether the right operand
//! runs at all.

use std::cmp::Ordering;

use crate::coerce::{
    loose_equal, strict_equal, to_display_string, to_int32, to_number, to_primitive, to_uint32,
};
use crate::errors::{type_error, EvalResult};
use crate::value::Value;

/// Eagerly evaluated binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    In,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Rem,
            "**" => Self::Pow,
            "==" => Self::Eq,
            "!=" => Self::NotEq,
            "===" => Self::StrictEq,
            "!==" => Self::StrictNotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "<<" => Self::Shl,
            ">>" => Self::Shr,
            ">>>" => Self::UShr,
            "in" => Self::In,
            _ => return None,
        })
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::In => "in",
        }
    }
}

/// Short-circuiting operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

impl LogicalOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(Self::And),
            "||" => Some(Self::Or),
            "??" => Some(Self::Coalesce),
            _ => None,
        }
    }

    /// Whether the left value alone decides the result.
    pub fn short_circuits(self, left: &Value) -> bool {
        match self {
            Self::And => !crate::coerce::to_boolean(left),
            Self::Or => crate::coerce::to_boolean(left),
            Self::Coalesce => !left.is_nullish(),
        }
    }
}

/// Operator of an `assign` node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Plain,
    Compound(BinaryOp),
    Logical(LogicalOp),
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol == "=" {
            return Some(Self::Plain);
        }
        let base = symbol.strip_suffix('=')?;
        LogicalOp::from_symbol(base)
            .map(Self::Logical)
            .or_else(|| {
                BinaryOp::from_symbol(base)
                    .filter(|op| !is_comparison(*op))
                    .map(Self::Compound)
            })
    }
}

fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::StrictEq
            | BinaryOp::StrictNotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
    )
}

/// Evaluate an eager binary operator.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    Ok(match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => Value::Number(to_number(left) - to_number(right)),
        BinaryOp::Mul => Value::Number(to_number(left) * to_number(right)),
        BinaryOp::Div => Value::Number(to_number(left) / to_number(right)),
        // `%` on f64 truncates toward zero and keeps the dividend's sign.
        BinaryOp::Rem => Value::Number(to_number(left) % to_number(right)),
        BinaryOp::Pow => Value::Number(power(to_number(left), to_number(right))),
        BinaryOp::Eq => Value::Bool(loose_equal(left, right)),
        BinaryOp::NotEq => Value::Bool(!loose_equal(left, right)),
        BinaryOp::StrictEq => Value::Bool(strict_equal(left, right)),
        BinaryOp::StrictNotEq => Value::Bool(!strict_equal(left, right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::BitAnd => int32(to_int32(to_number(left)) & to_int32(to_number(right))),
        BinaryOp::BitOr => int32(to_int32(to_number(left)) | to_int32(to_number(right))),
        BinaryOp::BitXor => int32(to_int32(to_number(left)) ^ to_int32(to_number(right))),
        BinaryOp::Shl => int32(to_int32(to_number(left)).wrapping_shl(shift_count(right))),
        BinaryOp::Shr => int32(to_int32(to_number(left)).wrapping_shr(shift_count(right))),
        BinaryOp::UShr => Value::Number(f64::from(
            to_uint32(to_number(left)).wrapping_shr(shift_count(right)),
        )),
        BinaryOp::In => return has_property(left, right),
    })
}

/// `+`: string concatenation when either primitive operand is a string.
fn add(left: &Value, right: &Value) -> Value {
    let left = to_primitive(left);
    let right = to_primitive(right);
    if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
        let mut s = to_display_string(&left);
        s.push_str(&to_display_string(&right));
        Value::string(s)
    } else {
        Value::Number(to_number(&left) + to_number(&right))
    }
}

fn power(base: f64, exponent: f64) -> f64 {
    // `1 ** NaN` and `(-1) ** Infinity` are NaN, unlike `powf`.
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}

#[inline]
fn int32(n: i32) -> Value {
    Value::Number(f64::from(n))
}

#[inline]
fn shift_count(value: &Value) -> u32 {
    to_uint32(to_number(value)) & 0x1f
}

/// Abstract relational comparison; `None` when either side is `NaN`.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let left = to_primitive(left);
    let right = to_primitive(right);
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Some(a.cmp(b));
    }
    to_number(&left).partial_cmp(&to_number(&right))
}

/// The `in` operator: `key in object`.
fn has_property(key: &Value, target: &Value) -> EvalResult {
    let key = to_display_string(key);
    let found = match target {
        Value::Object(obj) => obj.borrow().contains(&key),
        Value::Array(items) => {
            key == "length"
                || key
                    .parse::<usize>()
                    .is_ok_and(|index| index < items.borrow().len())
        }
        Value::Host(host) => !matches!(host.get(&key), Value::Undefined),
        Value::Function(_) | Value::Native(_) => key == "name",
        _ => {
            return Err(type_error(format!(
                "Cannot use 'in' operator to search for '{key}' in {}",
                to_display_string(target)
            )))
        }
    };
    Ok(Value::Bool(found))
}

#[cfg(test)]
mod tests;
