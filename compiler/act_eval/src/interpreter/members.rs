//! Property access and assignable references.

use act_ir::{Action, ActionId};

use super::{required_str, Completion, DispatchTable, ExecResult, Interpreter};
use crate::coerce::{number_to_string, to_display_string, to_number};
use crate::environment::ExecutionContext;
use crate::errors::{
    invalid_structure, property_of_nullish, range_error, syntax_error, type_error, EvalError,
    EvalResult,
};
use crate::methods;
use crate::value::Value;

/// Writing an index further than this past the end of an array fails.
const MAX_ARRAY_GAP: usize = 1 << 20;

pub(super) fn register(table: &mut DispatchTable) {
    table.register("member", eval_member);
}

/// Property name for a computed key.
pub(crate) fn property_key(value: &Value) -> String {
    match value {
        Value::Number(n) => number_to_string(*n),
        other => to_display_string(other),
    }
}

/// Canonical array index: `"3"` is one, `"03"` and `"-1"` are not.
pub(crate) fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// An assignment target.
pub(super) enum Reference<'a> {
    Binding(&'a str),
    Property { base: Value, key: String },
}

fn eval_member<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let Some((base, key)) = interp.member_parts(node, ctx)? else {
        return Ok(Completion::Normal(Value::Undefined));
    };
    interp.get_property(&base, &key).map(Completion::Normal)
}

impl<'a> Interpreter<'a> {
    /// Evaluate a `member` node's object and key.
    ///
    /// `None` when the node is `optional` and the object is nullish; the key
    /// expression is then never evaluated.
    pub(super) fn member_parts(
        &mut self,
        node: &'a Action,
        ctx: &ExecutionContext,
    ) -> Result<Option<(Value, String)>, EvalError> {
        let object = self.require_slot(node, "object", 0)?;
        let base = self.eval_value(object, ctx)?;
        if base.is_nullish() && node.attr_flag("optional") {
            return Ok(None);
        }
        let key = if node.attr_flag("computed") {
            let key_node = self.require_slot(node, "property", 1)?;
            property_key(&self.eval_value(key_node, ctx)?)
        } else {
            required_str(node, "property")?.to_string()
        };
        Ok(Some((base, key)))
    }

    /// Resolve an `identifier` or `member` node to something assignable.
    pub(super) fn reference(
        &mut self,
        target: ActionId,
        ctx: &ExecutionContext,
    ) -> Result<Reference<'a>, EvalError> {
        let node = self.node(target)?;
        match node.action_type() {
            "identifier" => Ok(Reference::Binding(required_str(node, "name")?)),
            "member" => match self.member_parts(node, ctx)? {
                Some((base, key)) => Ok(Reference::Property { base, key }),
                None => Err(syntax_error(
                    "Invalid left-hand side in assignment: optional chain",
                )),
            },
            other => Err(invalid_structure(format!(
                "`{other}` is not an assignable target"
            ))),
        }
    }

    pub(super) fn get_reference(
        &mut self,
        reference: &Reference<'_>,
        ctx: &ExecutionContext,
    ) -> EvalResult {
        match reference {
            Reference::Binding(name) => Ok(ctx.get(name)?),
            Reference::Property { base, key } => self.get_property(base, key),
        }
    }

    pub(super) fn put_reference(
        &mut self,
        reference: &Reference<'_>,
        value: Value,
        ctx: &ExecutionContext,
    ) -> Result<(), EvalError> {
        match reference {
            Reference::Binding(name) => Ok(ctx.assign(name, value)?),
            Reference::Property { base, key } => self.set_property(base, key, value),
        }
    }

    /// `base[key]`.
    pub fn get_property(&mut self, base: &Value, key: &str) -> EvalResult {
        let value = match base {
            Value::Undefined | Value::Null => return Err(property_of_nullish(key, base)),
            Value::Array(items) => {
                if key == "length" {
                    return Ok(Value::Number(items.borrow().len() as f64));
                }
                if let Some(index) = array_index(key) {
                    return Ok(items.borrow().get(index).cloned().unwrap_or_default());
                }
                None
            }
            Value::Str(s) => {
                if key == "length" {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let Some(index) = array_index(key) {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map_or(Value::Undefined, |c| Value::string(c.to_string())));
                }
                None
            }
            Value::Object(props) => props.borrow().get(key).cloned(),
            Value::Function(closure) => match key {
                "name" => Some(Value::string(closure.name().unwrap_or(""))),
                "length" => Some(Value::Number(closure.arity() as f64)),
                _ => None,
            },
            Value::Native(native) => (key == "name").then(|| Value::string(native.name())),
            Value::Host(host) => return Ok(host.get(key)),
            Value::Bool(_) | Value::Number(_) => None,
        };
        Ok(value
            .or_else(|| methods::lookup(base, key).map(Value::Native))
            .unwrap_or_default())
    }

    /// `base[key] = value`. Writes to other primitives are dropped.
    pub fn set_property(&mut self, base: &Value, key: &str, value: Value) -> Result<(), EvalError> {
        match base {
            Value::Undefined | Value::Null => Err(type_error(format!(
                "Cannot set properties of {} (setting '{key}')",
                to_display_string(base)
            ))),
            Value::Object(props) => {
                props.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                if key == "length" {
                    let n = to_number(&value);
                    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
                        return Err(range_error("Invalid array length"));
                    }
                    let len = n as usize;
                    if len > items.len() + MAX_ARRAY_GAP {
                        return Err(range_error(format!(
                            "Array length {len} is too far past the end"
                        )));
                    }
                    items.resize(len, Value::Undefined);
                } else if let Some(index) = array_index(key) {
                    if index >= items.len() {
                        if index - items.len() > MAX_ARRAY_GAP {
                            return Err(range_error(format!(
                                "Array index {index} is too far past the end"
                            )));
                        }
                        items.resize(index + 1, Value::Undefined);
                    }
                    items[index] = value;
                }
                Ok(())
            }
            Value::Host(host) => host.set(key, value),
            _ => Ok(()),
        }
    }

    /// The `delete` operator.
    pub(super) fn delete(&mut self, operand: ActionId, ctx: &ExecutionContext) -> EvalResult {
        let node = self.node(operand)?;
        match node.action_type() {
            "member" => {
                let Some((base, key)) = self.member_parts(node, ctx)? else {
                    return Ok(Value::Bool(true));
                };
                let removed = match &base {
                    Value::Undefined | Value::Null => {
                        return Err(property_of_nullish(&key, &base));
                    }
                    Value::Object(props) => {
                        props.borrow_mut().remove(&key);
                        true
                    }
                    Value::Array(items) => {
                        let mut items = items.borrow_mut();
                        if let Some(slot) = array_index(&key).and_then(|i| items.get_mut(i)) {
                            *slot = Value::Undefined;
                        }
                        key != "length"
                    }
                    Value::Host(_) => false,
                    _ => true,
                };
                Ok(Value::Bool(removed))
            }
            "identifier" => Ok(Value::Bool(false)),
            _ => {
                self.eval_value(operand, ctx)?;
                Ok(Value::Bool(true))
            }
        }
    }
}
