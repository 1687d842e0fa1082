//! Unary operators.
//!
//! `delete` and `typeof` on an unresolvable name need the operand's node,
//! so the interpreter handles those before reaching [`evaluate_unary`].

use crate::coerce::{to_boolean, to_int32, to_number, type_of};
use crate::value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "!" => Self::Not,
            "-" => Self::Neg,
            "+" => Self::Plus,
            "~" => Self::BitNot,
            "typeof" => Self::TypeOf,
            "void" => Self::Void,
            "delete" => Self::Delete,
            _ => return None,
        })
    }
}

/// Evaluate a unary operator on an already evaluated operand.
///
/// `delete` on a value (rather than a reference) is a no-op that yields
/// `true`.
pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!to_boolean(operand)),
        UnaryOp::Neg => Value::Number(-to_number(operand)),
        UnaryOp::Plus => Value::Number(to_number(operand)),
        UnaryOp::BitNot => Value::Number(f64::from(!to_int32(to_number(operand)))),
        UnaryOp::TypeOf => Value::string(type_of(operand)),
        UnaryOp::Void => Value::Undefined,
        UnaryOp::Delete => Value::Bool(true),
    }
}
