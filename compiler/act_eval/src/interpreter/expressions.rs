//! Literals, names and operators.

use act_ir::{Action, ActionId};

use super::members::{property_key, Reference};
use super::{required_str, Completion, DispatchTable, ExecResult, Interpreter};
use crate::coerce::{to_display_string, to_number};
use crate::environment::ExecutionContext;
use crate::errors::{invalid_structure, missing_attribute, EvalError, EvalResult};
use crate::operators::{evaluate_binary, AssignOp, BinaryOp, LogicalOp};
use crate::unary_operators::{evaluate_unary, UnaryOp};
use crate::value::{PropertyMap, Value};

pub(super) fn register(table: &mut DispatchTable) {
    table.register("literal", eval_literal);
    table.register("identifier", eval_identifier);
    table.register("this", eval_this);
    table.register("binaryOp", eval_binary);
    table.register("logicalOp", eval_logical);
    table.register("unaryOp", eval_unary);
    table.register("update", eval_update);
    table.register("assign", eval_assign);
    table.register("array", eval_array);
    table.register("object", eval_object);
    table.register("template", eval_template);
    table.register("sequence", eval_sequence);
    table.register("await", eval_await);
}

fn eval_literal<'a>(
    _interp: &mut Interpreter<'a>,
    node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    let value = node
        .get_attribute("value")
        .ok_or_else(|| missing_attribute("literal", "value"))?;
    Ok(Completion::Normal(Value::from_attr(value)))
}

fn eval_identifier<'a>(
    _interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let name = required_str(node, "name")?;
    Ok(Completion::Normal(ctx.get(name)?))
}

fn eval_this<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Normal(ctx.this_value()))
}

/// Left and right operand ids.
fn operands(interp: &Interpreter<'_>, node: &Action) -> Result<(ActionId, ActionId), EvalError> {
    Ok((
        interp.require_slot(node, "left", 0)?,
        interp.require_slot(node, "right", 1)?,
    ))
}

fn eval_binary<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let symbol = required_str(node, "operator")?;
    let (left, right) = operands(interp, node)?;
    if let Some(op) = LogicalOp::from_symbol(symbol) {
        return short_circuit(interp, op, left, right, ctx).map(Completion::Normal);
    }
    let op = BinaryOp::from_symbol(symbol)
        .ok_or_else(|| invalid_structure(format!("unknown binary operator `{symbol}`")))?;
    let lhs = interp.eval_value(left, ctx)?;
    let rhs = interp.eval_value(right, ctx)?;
    evaluate_binary(&lhs, &rhs, op).map(Completion::Normal)
}

fn eval_logical<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let symbol = required_str(node, "operator")?;
    let op = LogicalOp::from_symbol(symbol)
        .ok_or_else(|| invalid_structure(format!("unknown logical operator `{symbol}`")))?;
    let (left, right) = operands(interp, node)?;
    short_circuit(interp, op, left, right, ctx).map(Completion::Normal)
}

/// `&&`, `||`, `??`: the right side runs only when the left does not decide.
fn short_circuit(
    interp: &mut Interpreter<'_>,
    op: LogicalOp,
    left: ActionId,
    right: ActionId,
    ctx: &ExecutionContext,
) -> EvalResult {
    let lhs = interp.eval_value(left, ctx)?;
    if op.short_circuits(&lhs) {
        Ok(lhs)
    } else {
        interp.eval_value(right, ctx)
    }
}

fn eval_unary<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let symbol = required_str(node, "operator")?;
    let op = UnaryOp::from_symbol(symbol)
        .ok_or_else(|| invalid_structure(format!("unknown unary operator `{symbol}`")))?;
    let operand = interp.require_slot(node, "operand", 0)?;
    match op {
        UnaryOp::Delete => return interp.delete(operand, ctx).map(Completion::Normal),
        UnaryOp::TypeOf => {
            // typeof tolerates names that were never declared
            let target = interp.node(operand)?;
            if target.action_type() == "identifier" {
                let name = required_str(target, "name")?;
                if ctx.lookup(name).is_none() {
                    return Ok(Completion::Normal(Value::string("undefined")));
                }
            }
        }
        _ => {}
    }
    let value = interp.eval_value(operand, ctx)?;
    Ok(Completion::Normal(evaluate_unary(&value, op)))
}

fn eval_update<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let delta = match required_str(node, "operator")? {
        "++" => 1.0,
        "--" => -1.0,
        other => return Err(invalid_structure(format!("unknown update operator `{other}`"))),
    };
    let target = interp.require_slot(node, "target", 0)?;
    let reference = interp.reference(target, ctx)?;
    let old = to_number(&interp.get_reference(&reference, ctx)?);
    let new = old + delta;
    interp.put_reference(&reference, Value::Number(new), ctx)?;
    let result = if node.attr_flag("prefix") { new } else { old };
    Ok(Completion::Normal(Value::Number(result)))
}

fn eval_assign<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let symbol = node.attr_str("operator").unwrap_or("=");
    let op = AssignOp::from_symbol(symbol)
        .ok_or_else(|| invalid_structure(format!("unknown assignment operator `{symbol}`")))?;
    let target = interp.require_slot(node, "target", 0)?;
    let source = interp.require_slot(node, "value", 1)?;
    let reference = interp.reference(target, ctx)?;
    let value = match op {
        AssignOp::Plain => assigned_value(interp, &reference, source, ctx)?,
        AssignOp::Compound(op) => {
            let current = interp.get_reference(&reference, ctx)?;
            let rhs = interp.eval_value(source, ctx)?;
            evaluate_binary(&current, &rhs, op)?
        }
        AssignOp::Logical(op) => {
            let current = interp.get_reference(&reference, ctx)?;
            if op.short_circuits(&current) {
                return Ok(Completion::Normal(current));
            }
            assigned_value(interp, &reference, source, ctx)?
        }
    };
    interp.put_reference(&reference, value.clone(), ctx)?;
    Ok(Completion::Normal(value))
}

/// Right-hand side of an assignment; anonymous functions take the
/// variable's name.
fn assigned_value(
    interp: &mut Interpreter<'_>,
    reference: &Reference<'_>,
    source: ActionId,
    ctx: &ExecutionContext,
) -> EvalResult {
    match reference {
        Reference::Binding(name) => interp.eval_named(source, name, ctx),
        Reference::Property { .. } => interp.eval_value(source, ctx),
    }
}

fn eval_array<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let items = interp.eval_args(node.children(), ctx)?;
    Ok(Completion::Normal(Value::array(items.into_vec())))
}

fn eval_object<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let mut props = PropertyMap::new();
    for &child in node.children() {
        let property = interp.node(child)?;
        if property.action_type() != "property" {
            return Err(invalid_structure(format!(
                "object literal entry must be `property`, found `{}`",
                property.action_type()
            ))
            .at_node(child));
        }
        let (key, value) = object_entry(interp, property, ctx).map_err(|err| err.at_node(child))?;
        props.set(&key, value);
    }
    Ok(Completion::Normal(Value::object(props)))
}

/// One `property` node: a `key` attribute or a computed `role=key` child,
/// plus the value child.
fn object_entry(
    interp: &mut Interpreter<'_>,
    property: &Action,
    ctx: &ExecutionContext,
) -> Result<(String, Value), EvalError> {
    if let Some(key) = property.get_attribute("key") {
        let key = property_key(&Value::from_attr(key));
        let source = interp.require_slot(property, "value", 0)?;
        let value = interp.eval_named(source, &key, ctx)?;
        return Ok((key, value));
    }
    let key_node = interp
        .role_child(property, "key")
        .ok_or_else(|| missing_attribute("property", "key"))?;
    let key = property_key(&interp.eval_value(key_node, ctx)?);
    let source = interp.require_role(property, "value")?;
    let value = interp.eval_named(source, &key, ctx)?;
    Ok((key, value))
}

fn eval_template<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let mut out = String::new();
    for &part in node.children() {
        out.push_str(&to_display_string(&interp.eval_value(part, ctx)?));
    }
    Ok(Completion::Normal(Value::string(out)))
}

fn eval_sequence<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let mut last = Value::Undefined;
    for &expr in node.children() {
        last = interp.eval_value(expr, ctx)?;
    }
    Ok(Completion::Normal(last))
}

/// Evaluation is synchronous; `await` yields its operand.
fn eval_await<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let operand = interp.require_slot(node, "operand", 0)?;
    interp.eval_value(operand, ctx).map(Completion::Normal)
}
