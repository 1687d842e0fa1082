//! Programs, blocks, declarations and the statement-level signals.

use act_ir::Action;

use super::{required_str, Completion, DispatchTable, ExecResult, Interpreter};
use crate::environment::{DeclarationKind, ExecutionContext};
use crate::errors::{invalid_structure, syntax_error, EvalError};
use crate::value::Value;

pub(super) fn register(table: &mut DispatchTable) {
    table.register("program", eval_program);
    table.register("block", eval_block);
    table.register("expressionStatement", eval_expression_statement);
    table.register("empty", eval_empty);
    table.register("declareVar", eval_declare_var);
    table.register("return", eval_return);
    table.register("break", eval_break);
    table.register("continue", eval_continue);
    table.register("throw", eval_throw);
}

fn eval_program<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    interp.eval_statements(node.children(), ctx)
}

fn eval_block<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let inner = ctx.create_child_context();
    interp.eval_statements(node.children(), &inner)
}

fn eval_expression_statement<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let expression = interp.require_slot(node, "expression", 0)?;
    interp.eval_value(expression, ctx).map(Completion::Normal)
}

fn eval_empty<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Normal(Value::Undefined))
}

/// Declaration keyword of a `declareVar`/`forIn`/`forOf` node; `None` when
/// the attribute is absent.
pub(super) fn declaration_kind(node: &Action) -> Result<Option<DeclarationKind>, EvalError> {
    match node.attr_str("kind") {
        None => Ok(None),
        Some(keyword) => DeclarationKind::parse(keyword)
            .map(Some)
            .ok_or_else(|| invalid_structure(format!("unknown declaration kind `{keyword}`"))),
    }
}

fn eval_declare_var<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let name = required_str(node, "name")?;
    let kind = declaration_kind(node)?.unwrap_or(DeclarationKind::Let);
    let value = match interp.slot(node, "init", 0) {
        Some(init) => Some(interp.eval_named(init, name, ctx)?),
        None if kind == DeclarationKind::Const => {
            return Err(syntax_error(format!(
                "Missing initializer in const declaration '{name}'"
            )));
        }
        None => None,
    };
    ctx.declare(kind, name, value)?;
    Ok(Completion::Normal(Value::Undefined))
}

fn eval_return<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let value = match interp.slot(node, "value", 0) {
        Some(expr) => interp.eval_value(expr, ctx)?,
        None => Value::Undefined,
    };
    Ok(Completion::Return(value))
}

fn eval_break<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Break)
}

fn eval_continue<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Continue)
}

fn eval_throw<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let expr = interp.require_slot(node, "value", 0)?;
    let value = interp.eval_value(expr, ctx)?;
    tracing::debug!(value = %value, "throw");
    Err(EvalError::thrown(value))
}
