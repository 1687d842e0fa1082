//! Closures and the call protocol.
//!
//! Every call pushes a [`CallFrame`] on the shared stack and pops it on the
//! way out, including when the callee fails. Exceeding the configured depth
//! raises a catchable `RangeError` instead of exhausting the native stack.

use std::rc::Rc;

use act_ir::{Action, ActionId};
use smallvec::SmallVec;
use tracing::trace;

use super::{required_str, Completion, DispatchTable, ExecResult, Interpreter};
use crate::effects::EffectKind;
use crate::environment::{CallFrame, ExecutionContext, SharedCallStack};
use crate::errors::{
    invalid_structure, missing_child, not_callable, unexpected_signal, EvalError, EvalResult,
};
use crate::host::{HostCallbacks, HostObject};
use crate::value::{Closure, Value};

pub(super) fn register(table: &mut DispatchTable) {
    table.register("function", eval_function);
    table.register("declareFunction", eval_declare_function);
    table.register("call", eval_call);
}

/// Pops the frame it was created for.
struct FrameGuard {
    stack: SharedCallStack,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

/// Build a closure over `ctx` from a `function` or `declareFunction` node.
pub(super) fn make_closure(
    interp: &Interpreter<'_>,
    node: &Action,
    ctx: &ExecutionContext,
    name_hint: Option<&str>,
) -> EvalResult {
    let body = interp.require_role(node, "body")?;
    let tree = interp.tree();
    let params: SmallVec<[ActionId; 4]> = node
        .children()
        .iter()
        .copied()
        .filter(|id| tree.get(*id).is_some_and(|child| child.action_type() == "param"))
        .collect();
    let own_name = node.attr_str("name");
    let is_expression = node.action_type() == "function";

    // A named function expression can see its own name
    let context = match own_name {
        Some(_) if is_expression => ctx.create_child_context(),
        _ => ctx.clone(),
    };
    let closure = Rc::new(Closure {
        name: own_name.or(name_hint).map(Rc::from),
        tree: tree.identity(),
        node: node.id(),
        params,
        body,
        arrow: node.attr_flag("arrow"),
        expression: node.attr_flag("expression"),
        context,
    });
    if let (Some(name), true) = (own_name, is_expression) {
        closure.context.bind(name, Value::Function(Rc::clone(&closure)));
    }
    Ok(Value::Function(closure))
}

/// Bind a hoisted function declaration.
pub(super) fn declare_function(
    interp: &Interpreter<'_>,
    node: &Action,
    ctx: &ExecutionContext,
) -> Result<(), EvalError> {
    let name = required_str(node, "name")?;
    let closure = make_closure(interp, node, ctx, None)?;
    ctx.declare_function(name, closure);
    Ok(())
}

fn eval_function<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    make_closure(interp, node, ctx, None).map(Completion::Normal)
}

/// Already bound when its statement list was entered.
fn eval_declare_function<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Normal(Value::Undefined))
}

/// Source-like text for a callee in "is not a function" messages.
fn describe_callee(interp: &Interpreter<'_>, node: &Action) -> String {
    match node.action_type() {
        "identifier" => node.attr_str("name").unwrap_or("expression").to_string(),
        "member" => {
            let object = interp
                .slot(node, "object", 0)
                .and_then(|id| interp.tree().get(id))
                .map_or_else(|| "expression".to_string(), |obj| describe_callee(interp, obj));
            match node.attr_str("property") {
                Some(property) if !node.attr_flag("computed") => format!("{object}.{property}"),
                _ => format!("{object}[...]"),
            }
        }
        "this" => "this".to_string(),
        _ => "expression".to_string(),
    }
}

fn eval_call<'a>(
    interp: &mut Interpreter<'a>,
    node: &'a Action,
    ctx: &ExecutionContext,
) -> ExecResult {
    let callee_id = interp
        .role_child(node, "callee")
        .or_else(|| node.children().first().copied())
        .ok_or_else(|| missing_child("call", "callee"))?;
    let arg_ids: SmallVec<[ActionId; 8]> = node
        .children()
        .iter()
        .copied()
        .filter(|id| *id != callee_id)
        .collect();
    let callee_node = interp.node(callee_id)?;

    let (callee, this) = if callee_node.action_type() == "member" {
        let Some((base, key)) = interp.member_parts(callee_node, ctx)? else {
            return Ok(Completion::Normal(Value::Undefined));
        };
        if let Value::Host(host) = &base {
            let args = interp.eval_args(&arg_ids, ctx)?;
            return interp
                .call_host_method(host, &key, &args, Some(node.id()))
                .map(Completion::Normal);
        }
        let method = interp.get_property(&base, &key)?;
        (method, base)
    } else {
        (interp.eval_value(callee_id, ctx)?, Value::Undefined)
    };

    if callee.is_nullish() && node.attr_flag("optional") {
        return Ok(Completion::Normal(Value::Undefined));
    }
    if !callee.is_callable() {
        return Err(not_callable(describe_callee(interp, callee_node)));
    }
    let args = interp.eval_args(&arg_ids, ctx)?;
    interp
        .call_function(&callee, this, &args, Some(node.id()))
        .map(Completion::Normal)
}

impl Interpreter<'_> {
    /// Evaluate `id`, naming it `name` if it is an anonymous function.
    pub(super) fn eval_named(&mut self, id: ActionId, name: &str, ctx: &ExecutionContext) -> EvalResult {
        let node = self.node(id)?;
        if node.action_type() == "function" && !node.has_attribute("name") {
            return make_closure(self, node, ctx, Some(name));
        }
        self.eval_value(id, ctx)
    }

    fn enter_frame(
        &self,
        name: &str,
        args: &[Value],
        call_node: Option<ActionId>,
    ) -> Result<FrameGuard, EvalError> {
        self.call_stack
            .borrow_mut()
            .push(CallFrame::new(name, args, call_node))?;
        Ok(FrameGuard {
            stack: self.call_stack.clone(),
        })
    }

    /// Call any callable value.
    pub fn call_function(
        &mut self,
        callee: &Value,
        this: Value,
        args: &[Value],
        call_node: Option<ActionId>,
    ) -> EvalResult {
        match callee {
            Value::Function(closure) => self.call_closure(closure, this, args, call_node),
            Value::Native(native) => {
                let _frame = self.enter_frame(native.name(), args, call_node)?;
                native.call(self, &this, args)
            }
            other => Err(not_callable(other.type_name())),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = closure.display_name()))]
    fn call_closure(
        &mut self,
        closure: &Rc<Closure>,
        this: Value,
        args: &[Value],
        call_node: Option<ActionId>,
    ) -> EvalResult {
        let running = self.tree.identity();
        if closure.tree != running {
            return Err(invalid_structure(format!(
                "function `{}` was created from {} and cannot run against {running}",
                closure.display_name(),
                closure.tree,
            )));
        }
        let frame = self.enter_frame(closure.display_name(), args, call_node)?;
        let result = self.run_closure(closure, this, args).map_err(|err| {
            if err.backtrace.is_some() {
                err
            } else {
                let backtrace = self.call_stack.borrow().capture();
                err.with_backtrace(backtrace)
            }
        });
        drop(frame);
        result
    }

    fn run_closure(&mut self, closure: &Closure, this: Value, args: &[Value]) -> EvalResult {
        let this = if closure.arrow {
            closure.context.this_value()
        } else {
            this
        };
        let scope = closure.context.create_function_context(this);
        if !closure.arrow {
            scope.bind("arguments", Value::array(args.to_vec()));
        }
        self.bind_params(closure, args, &scope)?;

        if closure.expression {
            return self.eval_value(closure.body, &scope);
        }
        let body = self.node(closure.body)?;
        let statements = if body.action_type() == "block" {
            body.children()
        } else {
            std::slice::from_ref(&closure.body)
        };
        match self.eval_statements(statements, &scope)? {
            Completion::Normal(_) => Ok(Value::Undefined),
            Completion::Return(value) => Ok(value),
            other => Err(unexpected_signal(other.signal_name().unwrap_or("signal"))),
        }
    }

    fn bind_params(
        &mut self,
        closure: &Closure,
        args: &[Value],
        scope: &ExecutionContext,
    ) -> Result<(), EvalError> {
        for (index, &param_id) in closure.params.iter().enumerate() {
            let param = self.node(param_id)?;
            let name = required_str(param, "name")?;
            let value = if param.attr_flag("rest") {
                Value::array(args.get(index..).map(<[Value]>::to_vec).unwrap_or_default())
            } else {
                match (args.get(index), self.slot(param, "default", 0)) {
                    (None | Some(Value::Undefined), Some(default)) => {
                        self.eval_value(default, scope)?
                    }
                    (arg, _) => arg.cloned().unwrap_or_default(),
                }
            };
            scope.bind(name, value);
        }
        Ok(())
    }

    /// `host.method(args)`. A callable stored on the host is called with
    /// `this` bound to it; otherwise the host handles the method itself.
    fn call_host_method(
        &mut self,
        host: &Rc<dyn HostObject>,
        method: &str,
        args: &[Value],
        call_node: Option<ActionId>,
    ) -> EvalResult {
        let property = host.get(method);
        if property.is_callable() {
            return self.call_function(&property, Value::Host(Rc::clone(host)), args, call_node);
        }
        trace!(class = host.class_name(), method, "host call");
        let host = Rc::clone(host);
        host.call_method(method, args, self)
    }
}

impl HostCallbacks for Interpreter<'_> {
    fn call(&mut self, callee: &Value, args: &[Value]) -> EvalResult {
        self.call_function(callee, Value::Undefined, args, None)
    }

    fn record(&mut self, target: &str, message: String) {
        self.record_effect(EffectKind::Host, target, message);
    }
}
