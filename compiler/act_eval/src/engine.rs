//! Engine entry point.
//!
//! An [`Engine`] owns the global context (built-ins plus whatever the
//! embedder bound), the shared call stack, the effect log and the random
//! generator. Each [`Engine::execute`] evaluates a tree's root in a fresh
//! function-level child of the globals, so declarations made by one run
//! are not visible to the next while bound globals persist.

use act_ir::{ActionId, ActionTree};
use thiserror::Error;
use tracing::{debug, warn};

use crate::builtins;
use crate::config::EngineConfig;
use crate::effects::{shared_effect_log, EffectRecord, SharedEffectLog};
use crate::environment::{CallStack, ExecutionContext, LocalScope, SharedCallStack};
use crate::errors::{unexpected_signal, EvalError, EvalErrorKind};
use crate::host::EnvironmentBinding;
use crate::interpreter::{Completion, DispatchTable, Handler, Interpreter};
use crate::rng::Rng;
use crate::value::Value;

/// Broad failure category with a stable diagnostic code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The tree violates the node contract.
    Malformed,
    UndefinedReference,
    DuplicateDeclaration,
    ConstAssignment,
    TypeError,
    SyntaxError,
    RangeError,
    StackOverflow,
    /// A script `throw` nobody caught.
    UncaughtThrow,
}

impl FailureKind {
    pub fn of(kind: &EvalErrorKind) -> Self {
        match kind {
            EvalErrorKind::UnknownActionType { .. }
            | EvalErrorKind::MissingAttribute { .. }
            | EvalErrorKind::MissingChild { .. }
            | EvalErrorKind::InvalidStructure { .. } => FailureKind::Malformed,
            EvalErrorKind::UndefinedReference { .. } => FailureKind::UndefinedReference,
            EvalErrorKind::DuplicateDeclaration { .. } => FailureKind::DuplicateDeclaration,
            EvalErrorKind::ConstAssignment { .. } => FailureKind::ConstAssignment,
            EvalErrorKind::NotCallable { .. }
            | EvalErrorKind::PropertyOfNullish { .. }
            | EvalErrorKind::TypeError { .. } => FailureKind::TypeError,
            EvalErrorKind::SyntaxError { .. } => FailureKind::SyntaxError,
            EvalErrorKind::RangeError { .. } => FailureKind::RangeError,
            EvalErrorKind::StackOverflow { .. } => FailureKind::StackOverflow,
            EvalErrorKind::Thrown => FailureKind::UncaughtThrow,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            FailureKind::Malformed => "E7001",
            FailureKind::UndefinedReference => "E7101",
            FailureKind::DuplicateDeclaration => "E7102",
            FailureKind::ConstAssignment => "E7103",
            FailureKind::TypeError => "E7201",
            FailureKind::SyntaxError => "E7202",
            FailureKind::RangeError => "E7203",
            FailureKind::StackOverflow => "E7301",
            FailureKind::UncaughtThrow => "E7401",
        }
    }
}

/// Failure reported by [`Engine::execute`] and [`Engine::invoke`].
#[derive(Clone, Debug, Error)]
#[error("[{}] {message}", .kind.code())]
pub struct EngineFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Innermost node being evaluated.
    pub node: Option<ActionId>,
    /// Call frames at the failure, most recent first.
    pub backtrace: Vec<String>,
    pub thrown: Option<Value>,
    /// Effects recorded before the failure.
    pub effects: Vec<EffectRecord>,
}

impl EngineFailure {
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Tree-walking engine.
pub struct Engine {
    config: EngineConfig,
    dispatch: DispatchTable,
    globals: ExecutionContext,
    call_stack: SharedCallStack,
    effects: SharedEffectLog,
    rng: Rng,
}

impl Engine {
    /// An engine with default configuration and the standard built-ins.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let call_stack = LocalScope::new(CallStack::new(config.max_call_depth));
        let globals = ExecutionContext::new(call_stack.clone());
        builtins::install(&globals);
        Engine {
            rng: Rng::new(config.random_seed),
            config,
            dispatch: DispatchTable::standard(),
            globals,
            call_stack,
            effects: shared_effect_log(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The outermost context: built-ins and bound globals.
    pub fn globals(&self) -> &ExecutionContext {
        &self.globals
    }

    /// Frames currently on the call stack. Zero between runs.
    pub fn call_stack_depth(&self) -> usize {
        self.call_stack.borrow().depth()
    }

    /// Bind (or rebind) a global constant.
    pub fn bind_global(&mut self, name: &str, value: Value) {
        self.globals.bind_constant(name, value);
    }

    /// Bind every global an environment supplies.
    pub fn bind_environment(&mut self, environment: &dyn EnvironmentBinding) {
        for (name, value) in environment.globals() {
            debug!(%name, "binding environment global");
            self.globals.bind_constant(&name, value);
        }
    }

    /// Install a handler for `tag`, replacing any existing one.
    pub fn register(&mut self, tag: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.dispatch.register(tag, handler)
    }

    pub fn dispatch_table(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn effect_log(&self) -> &SharedEffectLog {
        &self.effects
    }

    /// Snapshot of the effect log.
    pub fn effects(&self) -> Vec<EffectRecord> {
        self.effects.lock().records().to_vec()
    }

    pub fn clear_effects(&mut self) {
        self.effects.lock().clear();
    }

    fn interpreter<'a>(&'a mut self, tree: &'a ActionTree) -> Interpreter<'a> {
        Interpreter::new(
            tree,
            &self.dispatch,
            &self.config,
            &mut self.rng,
            self.effects.clone(),
            self.call_stack.clone(),
        )
    }

    /// Run `tree` from its root.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
    pub fn execute(&mut self, tree: &ActionTree) -> Result<Value, EngineFailure> {
        self.call_stack.borrow_mut().clear();
        let scope = self.globals.create_function_context(Value::Undefined);
        let root = tree.root();
        let result = self.interpreter(tree).evaluate(root, &scope);
        match result {
            Ok(Completion::Normal(value)) => Ok(value),
            Ok(signal) => {
                let err = unexpected_signal(signal.signal_name().unwrap_or("signal")).at_node(root);
                Err(self.failure(err))
            }
            Err(err) => Err(self.failure(err)),
        }
    }

    /// Call a callable obtained from an earlier run of `tree`, e.g. a
    /// handler a host object stored for a later tick.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn invoke(
        &mut self,
        tree: &ActionTree,
        callee: &Value,
        args: &[Value],
    ) -> Result<Value, EngineFailure> {
        self.call_stack.borrow_mut().clear();
        let result = self
            .interpreter(tree)
            .call_function(callee, Value::Undefined, args, None);
        result.map_err(|err| self.failure(err))
    }

    fn failure(&self, err: EvalError) -> EngineFailure {
        let kind = FailureKind::of(&err.kind);
        let message = err.message();
        if kind == FailureKind::UncaughtThrow {
            warn!(code = kind.code(), %message, "uncaught throw");
        } else {
            debug!(code = kind.code(), %message, node = ?err.node, "evaluation failed");
        }
        self.call_stack.borrow_mut().clear();
        EngineFailure {
            kind,
            message,
            node: err.node,
            backtrace: err.backtrace.map(|bt| bt.lines()).unwrap_or_default(),
            thrown: err.thrown,
            effects: self.effects(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Step-by-step [`Engine`] setup.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    globals: Vec<(String, Value)>,
    handlers: Vec<(String, Handler)>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.config = self.config.with_max_call_depth(depth);
        self
    }

    #[must_use]
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_random_seed(seed);
        self
    }

    #[must_use]
    pub fn global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: &dyn EnvironmentBinding) -> Self {
        self.globals.extend(environment.globals());
        self
    }

    #[must_use]
    pub fn handler(mut self, tag: impl Into<String>, handler: Handler) -> Self {
        self.handlers.push((tag.into(), handler));
        self
    }

    pub fn build(self) -> Engine {
        let mut engine = Engine::with_config(self.config);
        for (name, value) in self.globals {
            engine.bind_global(&name, value);
        }
        for (tag, handler) in self.handlers {
            engine.register(tag, handler);
        }
        engine
    }
}
