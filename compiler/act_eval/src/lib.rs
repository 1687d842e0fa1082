//! Act Eval - tree-walking execution engine for the Action tree IR.
//!
//! The engine walks an [`act_ir::ActionTree`] with the semantics of a
//! dynamically typed scripting language: closures over lexical contexts,
//! loose coercion, `break`/`continue`/`return` as control signals and
//! `try`/`catch`/`finally`. Observable I/O is captured in an [`EffectLog`]
//! instead of being performed.
//!
//! # Architecture
//!
//! - [`environment`]: chained scopes, the shared call stack and
//!   [`ExecutionContext`]
//! - [`interpreter`]: flat tag-keyed [`DispatchTable`] and the
//!   [`Interpreter`] that runs the handlers
//! - `operators` / `unary_operators` / [`coerce`]: operator semantics
//! - `methods` / `builtins`: intrinsic methods and the pre-bound globals
//! - [`host`]: the contract for binding an external object graph
//! - [`Engine`]: owns the globals, the effect log and the configuration
//! - [`nodes`]: constructors for building trees by hand
//!
//! ```
//! use act_eval::{Engine, Value};
//! use act_ir::{ActionObject, ActionTree};
//!
//! let program = ActionObject::new("program").child(
//!     ActionObject::new("expressionStatement").child(
//!         ActionObject::new("binaryOp")
//!             .attr("operator", "*")
//!             .child(ActionObject::new("literal").attr("value", 6))
//!             .child(ActionObject::new("literal").attr("value", 7)),
//!     ),
//! );
//! let tree = ActionTree::from_root_object(&program);
//! let mut engine = Engine::new();
//! assert_eq!(engine.execute(&tree).ok(), Some(Value::Number(42.0)));
//! ```

mod builtins;
pub mod coerce;
mod config;
mod effects;
mod engine;
pub mod environment;
mod errors;
pub mod host;
pub mod interpreter;
mod methods;
pub mod nodes;
mod operators;
mod rng;
mod unary_operators;
mod value;

pub use config::{EngineConfig, DEFAULT_MAX_CALL_DEPTH, DEFAULT_RANDOM_SEED};
pub use effects::{
    shared_effect_log, ConsoleLevel, EffectKind, EffectLog, EffectRecord, SharedEffectLog,
};
pub use engine::{Engine, EngineBuilder, EngineFailure, FailureKind};
pub use environment::{
    CallFrame, CallStack, DeclarationKind, ExecutionContext, LocalScope, Scope, ScopeError,
    ScopeKind, SharedCallStack,
};
pub use errors::{
    const_assignment, duplicate_declaration, invalid_structure, missing_attribute,
    missing_child, not_callable, property_of_nullish, range_error, stack_overflow,
    syntax_error, type_error, undefined_reference, unknown_action_type, BacktraceFrame,
    EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use host::{EnvironmentBinding, HostCallbacks, HostObject};
pub use interpreter::{Completion, DispatchTable, ExecResult, Handler, Interpreter};
pub use operators::{compare, evaluate_binary, AssignOp, BinaryOp, LogicalOp};
pub use unary_operators::{evaluate_unary, UnaryOp};
pub use value::{ArrayRef, Closure, NativeFn, NativeFunction, ObjectRef, PropertyMap, Value};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once;
/// only the first call has an effect.
///
/// ```bash
/// RUST_LOG=act_eval=debug my-analyzer
/// RUST_LOG=act_eval::interpreter=trace my-analyzer
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A subscriber installed by the embedding application wins.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
