//! Methods every plain object answers to.

use super::{arg, MethodTable};
use crate::errors::{type_error, EvalResult};
use crate::interpreter::{property_key, Interpreter};
use crate::value::Value;

pub(super) const METHODS: MethodTable = &[
    ("hasOwnProperty", has_own_property),
    ("toString", to_string),
];

fn has_own_property(_interp: &mut Interpreter<'_>, this: &Value, args: &[Value]) -> EvalResult {
    let Value::Object(props) = this else {
        return Err(type_error("hasOwnProperty called on non-object"));
    };
    let key = property_key(&arg(args, 0));
    Ok(Value::Bool(props.borrow().contains(&key)))
}

fn to_string(_interp: &mut Interpreter<'_>, _this: &Value, _args: &[Value]) -> EvalResult {
    Ok(Value::string("[object Object]"))
}
