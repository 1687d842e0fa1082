//! Conditionals, loops, `switch` and `try`.
//!
//! Loops consume `Break` and `Continue` from their own body and pass
//! `Return` outward. A loop's value is the value of the last body
//! iteration that completed normally.

use act_ir::{Action, ActionId};
use smallvec::SmallVec;
use tracing::debug;

use super::statements::declaration_kind;
use super::{required_str, Completion, DispatchTable, ExecResult, Interpreter};
use crate::coerce::{strict_equal, to_boolean};
use crate::environment::{DeclarationKind, ExecutionContext};
use crate::errors::{invalid_structure, type_error, unexpected_signal, EvalError};
use crate::value::{ArrayRef, Value};

pub(super) fn register(table: &mut DispatchTable) {
    table.register("if", eval_if);
    table.register("conditional", eval_if);
    table.register("while", eval_while);
    table.register("doWhile", eval_do_while);
    table.register("for", eval_for);
    table.register("forIn", eval_for_in);
    table.register("forOf", eval_for_of);
    table.register("switch", eval_switch);
    table.register("try", eval_try);
}

/// Fold one body completion into the loop state. `Some` ends the loop.
fn loop_exit(completion: Completion, last: &mut Value) -> Option<Completion> {
    match completion {
        Completion::Normal(value) => {
            *last = value;
            None
        }
        Completion::Continue => None,
        Completion::Break => Some(Completion::Normal(std::mem::take(last))),
        ret @ Completion::Return(_) => Some(ret),
    }
}

fn eval_if<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let condition = interp.require_slot(node, "condition", 0)?;
    let then = interp.require_slot(node, "then", 1)?;
    if to_boolean(&interp.eval_value(condition, ctx)?) {
        interp.evaluate(then, ctx)
    } else if let Some(otherwise) = interp.slot(node, "else", 2) {
        interp.evaluate(otherwise, ctx)
    } else {
        Ok(Completion::Normal(Value::Undefined))
    }
}

fn eval_while<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let condition = interp.require_role(node, "condition")?;
    let body = interp.require_role(node, "body")?;
    let loop_ctx = ctx.create_child_context();
    let mut last = Value::Undefined;
    while to_boolean(&interp.eval_value(condition, &loop_ctx)?) {
        if let Some(exit) = loop_exit(interp.evaluate(body, &loop_ctx)?, &mut last) {
            return Ok(exit);
        }
    }
    Ok(Completion::Normal(last))
}

fn eval_do_while<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let body = interp.require_role(node, "body")?;
    let condition = interp.require_role(node, "condition")?;
    let loop_ctx = ctx.create_child_context();
    let mut last = Value::Undefined;
    loop {
        if let Some(exit) = loop_exit(interp.evaluate(body, &loop_ctx)?, &mut last) {
            return Ok(exit);
        }
        if !to_boolean(&interp.eval_value(condition, &loop_ctx)?) {
            return Ok(Completion::Normal(last));
        }
    }
}

/// `let` names declared by a `for` initializer.
fn per_iteration_names<'a>(
    interp: &Interpreter<'a>,
    init: &'a Action,
) -> Result<SmallVec<[&'a str; 2]>, EvalError> {
    let declarations: SmallVec<[&'a Action; 2]> = match init.action_type() {
        "declareVar" => SmallVec::from_elem(init, 1),
        "sequence" => init
            .children()
            .iter()
            .map(|id| interp.node(*id))
            .collect::<Result<_, _>>()?,
        _ => SmallVec::new(),
    };
    let mut names = SmallVec::new();
    for decl in declarations {
        if decl.action_type() == "declareVar"
            && declaration_kind(decl)?.unwrap_or(DeclarationKind::Let) == DeclarationKind::Let
        {
            names.push(required_str(decl, "name")?);
        }
    }
    Ok(names)
}

/// A fresh context holding copies of the per-iteration bindings.
fn next_iteration(
    loop_ctx: &ExecutionContext,
    previous: &ExecutionContext,
    names: &[&str],
) -> ExecutionContext {
    if names.is_empty() {
        return previous.clone();
    }
    let fresh = loop_ctx.create_child_context();
    for name in names {
        fresh.bind(name, previous.lookup(name).unwrap_or_default());
    }
    fresh
}

fn eval_for<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let condition = interp.role_child(node, "condition");
    let update = interp.role_child(node, "update");
    let body = interp.require_role(node, "body")?;
    let loop_ctx = ctx.create_child_context();

    let init = interp.role_child(node, "init");
    let names = match init {
        Some(init) => per_iteration_names(interp, interp.node(init)?)?,
        None => SmallVec::new(),
    };
    if let Some(init) = init {
        if let Some(signal) = interp.evaluate(init, &loop_ctx)?.signal_name() {
            return Err(unexpected_signal(signal).at_node(init));
        }
    }

    let mut last = Value::Undefined;
    let mut iteration = next_iteration(&loop_ctx, &loop_ctx, &names);
    loop {
        if let Some(condition) = condition {
            if !to_boolean(&interp.eval_value(condition, &iteration)?) {
                break;
            }
        }
        if let Some(exit) = loop_exit(interp.evaluate(body, &iteration)?, &mut last) {
            return Ok(exit);
        }
        iteration = next_iteration(&loop_ctx, &iteration, &names);
        if let Some(update) = update {
            interp.eval_value(update, &iteration)?;
        }
    }
    Ok(Completion::Normal(last))
}

/// Values produced by a `forIn`/`forOf` source.
enum Items {
    /// Arrays are read by index each step, so pushes during the loop are seen.
    Live { items: ArrayRef, next: usize },
    Fixed(std::vec::IntoIter<Value>),
}

impl Iterator for Items {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            Items::Live { items, next } => {
                let item = items.borrow().get(*next).cloned();
                *next += 1;
                item
            }
            Items::Fixed(values) => values.next(),
        }
    }
}

fn index_keys(len: usize) -> Items {
    Items::Fixed(
        (0..len)
            .map(|i| Value::string(i.to_string()))
            .collect::<Vec<_>>()
            .into_iter(),
    )
}

/// Enumerable keys for `for...in`.
fn keys_of(collection: &Value) -> Items {
    match collection {
        Value::Object(props) => Items::Fixed(
            props
                .borrow()
                .keys()
                .map(Value::string)
                .collect::<Vec<_>>()
                .into_iter(),
        ),
        Value::Array(items) => index_keys(items.borrow().len()),
        Value::Str(s) => index_keys(s.chars().count()),
        Value::Host(host) => Items::Fixed(
            host.keys()
                .into_iter()
                .map(Value::from)
                .collect::<Vec<_>>()
                .into_iter(),
        ),
        _ => Items::Fixed(Vec::new().into_iter()),
    }
}

/// Iterated values for `for...of`.
fn values_of(collection: &Value) -> Result<Items, EvalError> {
    match collection {
        Value::Array(items) => Ok(Items::Live {
            items: items.clone(),
            next: 0,
        }),
        Value::Str(s) => Ok(Items::Fixed(
            s.chars()
                .map(|c| Value::string(c.to_string()))
                .collect::<Vec<_>>()
                .into_iter(),
        )),
        other => Err(type_error(format!("{} is not iterable", other.type_name()))),
    }
}

fn eval_for_in<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let iterable = interp.require_role(node, "iterable")?;
    let collection = interp.eval_value(iterable, ctx)?;
    run_for_each(interp, node, keys_of(&collection), ctx)
}

fn eval_for_of<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let iterable = interp.require_role(node, "iterable")?;
    let collection = interp.eval_value(iterable, ctx)?;
    run_for_each(interp, node, values_of(&collection)?, ctx)
}

/// Shared body of `forIn`/`forOf`.
///
/// `let`/`const` get a fresh binding per iteration; `var` and a bare name
/// assign one binding in place.
fn run_for_each<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    items: Items,
    ctx: &ExecutionContext,
) -> ExecResult {
    let name = required_str(node, "name")?;
    let kind = declaration_kind(node)?;
    let body = interp.require_role(node, "body")?;
    let loop_ctx = ctx.create_child_context();
    if kind == Some(DeclarationKind::Var) {
        loop_ctx.declare(DeclarationKind::Var, name, None)?;
    }

    let mut last = Value::Undefined;
    for item in items {
        let iteration = match kind {
            Some(kind @ (DeclarationKind::Let | DeclarationKind::Const)) => {
                let fresh = loop_ctx.create_child_context();
                fresh.declare(kind, name, Some(item))?;
                fresh
            }
            Some(DeclarationKind::Var) | None => {
                loop_ctx.assign(name, item)?;
                loop_ctx.clone()
            }
        };
        if let Some(exit) = loop_exit(interp.evaluate(body, &iteration)?, &mut last) {
            return Ok(exit);
        }
    }
    Ok(Completion::Normal(last))
}

fn eval_switch<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let discriminant_id = interp.require_role(node, "discriminant")?;
    let discriminant = interp.eval_value(discriminant_id, ctx)?;
    let switch_ctx = ctx.create_child_context();

    let mut cases: SmallVec<[&'a Action; 8]> = SmallVec::new();
    for &id in node.children() {
        if id == discriminant_id {
            continue;
        }
        let case = interp.node(id)?;
        if case.action_type() != "case" {
            return Err(invalid_structure(format!(
                "switch entry must be `case`, found `{}`",
                case.action_type()
            ))
            .at_node(id));
        }
        cases.push(case);
    }

    let mut matched = None;
    let mut default = None;
    for (index, case) in cases.iter().enumerate() {
        match interp.role_child(case, "test") {
            Some(test) => {
                if strict_equal(&discriminant, &interp.eval_value(test, &switch_ctx)?) {
                    matched = Some(index);
                    break;
                }
            }
            None => {
                default.get_or_insert(index);
            }
        }
    }
    let Some(start) = matched.or(default) else {
        return Ok(Completion::Normal(Value::Undefined));
    };

    // Matching case and everything after it, until a break
    let mut last = Value::Undefined;
    for case in &cases[start..] {
        let consequent = interp.children_without_role(case, "test");
        match interp.eval_statements(&consequent, &switch_ctx)? {
            Completion::Normal(value) => last = value,
            Completion::Break => return Ok(Completion::Normal(last)),
            abrupt => return Ok(abrupt),
        }
    }
    Ok(Completion::Normal(last))
}

fn eval_try<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let block = interp.require_role(node, "block")?;
    let handler = interp.role_child(node, "handler");
    let finalizer = interp.role_child(node, "finalizer");
    if handler.is_none() && finalizer.is_none() {
        return Err(invalid_structure("try needs a handler or a finalizer"));
    }

    let outcome = match (interp.evaluate(block, ctx), handler) {
        (Err(err), Some(handler)) if err.is_catchable() => {
            debug!(error = %err, "caught");
            run_catch(interp, handler, &err, ctx)
        }
        (outcome, _) => outcome,
    };

    let Some(finalizer) = finalizer else {
        return outcome;
    };
    let finished = interp.evaluate(finalizer, ctx);
    match (outcome, finished) {
        // structural failures always win
        (Err(err), _) if err.is_structural() => Err(err),
        (outcome, Ok(Completion::Normal(_))) => outcome,
        (_, abrupt) => abrupt,
    }
}

fn run_catch(
    interp: &mut Interpreter<'_>,
    handler: ActionId,
    err: &EvalError,
    ctx: &ExecutionContext,
) -> ExecResult {
    let clause = interp.node(handler)?;
    if clause.action_type() != "catch" {
        return Err(invalid_structure(format!(
            "try handler must be `catch`, found `{}`",
            clause.action_type()
        ))
        .at_node(handler));
    }
    let catch_ctx = ctx.create_child_context();
    if let Some(param) = clause.attr_str("param") {
        catch_ctx.declare(DeclarationKind::Let, param, Some(err.to_catch_value()))?;
    }
    interp.eval_statements(clause.children(), &catch_ctx)
}
