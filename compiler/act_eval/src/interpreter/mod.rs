//! Tree-walking evaluator.
//!
//! [`Interpreter::evaluate`] looks the node's tag up in the
//! [`DispatchTable`] and runs the handler. Handlers return a [`Completion`]:
//! either a plain value or one of the control signals `Break`, `Continue`
//! and `Return`. Signals pass through statement lists unchanged until a
//! loop or a call boundary consumes them. Errors travel on the `Err` side
//! and never double as control flow.
//!
//! Handler modules:
//!
//! - `statements` - programs, blocks, declarations, `return`/`break`/`throw`
//! - `expressions` - literals, names, operators, assignment, literals of
//!   arrays/objects/templates
//! - `members` - property reads and writes, assignable references
//! - `control` - conditionals, loops, `switch`, `try`
//! - `calls` - closures, the call protocol, host method calls

mod calls;
mod control;
mod dispatch;
mod expressions;
mod members;
mod statements;

pub use dispatch::{DispatchTable, Handler};
pub(crate) use members::property_key;

use act_ir::{Action, ActionId, ActionTree};
use act_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::effects::{EffectKind, SharedEffectLog};
use crate::environment::{ExecutionContext, SharedCallStack};
use crate::errors::{
    invalid_structure, missing_attribute, missing_child, unexpected_signal, unknown_action_type,
    EvalError, EvalResult,
};
use crate::rng::Rng;
use crate::value::Value;

/// Outcome of evaluating one node.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Normal(Value),
    Break,
    Continue,
    Return(Value),
}

impl Completion {
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }

    /// Source keyword of a control signal.
    pub fn signal_name(&self) -> Option<&'static str> {
        match self {
            Completion::Normal(_) => None,
            Completion::Break => Some("break"),
            Completion::Continue => Some("continue"),
            Completion::Return(_) => Some("return"),
        }
    }
}

/// Result of evaluating a node in statement position.
pub type ExecResult = Result<Completion, EvalError>;

/// Statements whose completion value does not replace the running one.
fn produces_value(tag: &str) -> bool {
    !matches!(tag, "declareVar" | "declareFunction" | "empty")
}

/// Read a required string attribute.
pub(crate) fn required_str<'n>(node: &'n Action, name: &str) -> Result<&'n str, EvalError> {
    node.attr_str(name)
        .ok_or_else(|| missing_attribute(node.action_type(), name))
}

/// Evaluation state for one run over one tree.
///
/// Built by [`Engine`](crate::Engine) for each `execute`/`invoke`. Native
/// functions receive it so they can call back into script code.
pub struct Interpreter<'a> {
    tree: &'a ActionTree,
    dispatch: &'a DispatchTable,
    config: &'a EngineConfig,
    rng: &'a mut Rng,
    effects: SharedEffectLog,
    call_stack: SharedCallStack,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(
        tree: &'a ActionTree,
        dispatch: &'a DispatchTable,
        config: &'a EngineConfig,
        rng: &'a mut Rng,
        effects: SharedEffectLog,
        call_stack: SharedCallStack,
    ) -> Self {
        Interpreter {
            tree,
            dispatch,
            config,
            rng,
            effects,
            call_stack,
        }
    }

    #[inline]
    pub fn tree(&self) -> &'a ActionTree {
        self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    pub fn effects(&self) -> &SharedEffectLog {
        &self.effects
    }

    pub fn call_stack(&self) -> &SharedCallStack {
        &self.call_stack
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.borrow().depth()
    }

    pub(crate) fn random(&mut self) -> f64 {
        self.rng.next_f64()
    }

    /// Append an effect record.
    pub fn record_effect(&self, kind: EffectKind, target: &str, message: impl Into<String>) {
        self.effects.lock().record(kind, target, message);
    }

    /// Resolve a node id against the tree being run.
    pub fn node(&self, id: ActionId) -> Result<&'a Action, EvalError> {
        self.tree
            .get(id)
            .ok_or_else(|| invalid_structure(format!("reference to unknown node {id}")))
    }

    /// Evaluate one node in statement position.
    #[tracing::instrument(level = "trace", skip_all, fields(node = %id))]
    pub fn evaluate(&mut self, id: ActionId, ctx: &ExecutionContext) -> ExecResult {
        let node = self.node(id)?;
        let handler = self
            .dispatch
            .get(node.action_type())
            .ok_or_else(|| unknown_action_type(node.action_type()).at_node(id))?;
        ensure_sufficient_stack(|| handler(self, node, ctx)).map_err(|err| err.at_node(id))
    }

    /// Evaluate one node in expression position.
    ///
    /// A control signal here means the tree put a statement where an
    /// expression belongs.
    pub fn eval_value(&mut self, id: ActionId, ctx: &ExecutionContext) -> EvalResult {
        match self.evaluate(id, ctx)? {
            Completion::Normal(value) => Ok(value),
            other => Err(unexpected_signal(other.signal_name().unwrap_or("signal")).at_node(id)),
        }
    }

    /// Evaluate several expressions left to right.
    pub fn eval_args(
        &mut self,
        ids: &[ActionId],
        ctx: &ExecutionContext,
    ) -> Result<SmallVec<[Value; 4]>, EvalError> {
        ids.iter().map(|id| self.eval_value(*id, ctx)).collect()
    }

    /// Run a statement list in `ctx`.
    ///
    /// Function declarations are bound before the first statement runs.
    /// The result is the value of the last value-producing statement, or
    /// the first control signal raised.
    pub fn eval_statements(&mut self, ids: &[ActionId], ctx: &ExecutionContext) -> ExecResult {
        self.hoist_functions(ids, ctx)?;
        let mut last = Value::Undefined;
        for &id in ids {
            let node = self.node(id)?;
            if node.action_type() == "declareFunction" {
                continue;
            }
            match self.evaluate(id, ctx)? {
                Completion::Normal(value) => {
                    if produces_value(node.action_type()) {
                        last = value;
                    }
                }
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal(last))
    }

    fn hoist_functions(&mut self, ids: &[ActionId], ctx: &ExecutionContext) -> Result<(), EvalError> {
        for &id in ids {
            let node = self.node(id)?;
            if node.action_type() == "declareFunction" {
                calls::declare_function(self, node, ctx).map_err(|err| err.at_node(id))?;
            }
        }
        Ok(())
    }

    /// The child of `node` whose `role` attribute is `role`.
    pub fn role_child(&self, node: &Action, role: &str) -> Option<ActionId> {
        node.children()
            .iter()
            .copied()
            .find(|id| self.tree.get(*id).and_then(Action::role) == Some(role))
    }

    pub fn require_role(&self, node: &Action, role: &str) -> Result<ActionId, EvalError> {
        self.role_child(node, role)
            .ok_or_else(|| missing_child(node.action_type(), role))
    }

    /// The `role` child, falling back to the child at `index` when no child
    /// carries that role.
    pub fn slot(&self, node: &Action, role: &str, index: usize) -> Option<ActionId> {
        self.role_child(node, role)
            .or_else(|| node.children().get(index).copied())
    }

    pub fn require_slot(&self, node: &Action, role: &str, index: usize) -> Result<ActionId, EvalError> {
        self.slot(node, role, index)
            .ok_or_else(|| missing_child(node.action_type(), role))
    }

    /// Children of `node` that do not carry the `role` attribute `excluded`.
    pub fn children_without_role(&self, node: &Action, excluded: &str) -> SmallVec<[ActionId; 8]> {
        node.children()
            .iter()
            .copied()
            .filter(|id| self.tree.get(*id).and_then(Action::role) != Some(excluded))
            .collect()
    }
}

#[cfg(test)]
mod tests;
