//! `console`: writes become effect records instead of output.

use tracing::trace;

use crate::coerce::{number_to_string, to_display_string};
use crate::effects::{ConsoleLevel, EffectKind};
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, Value};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[
    ("log", log),
    ("info", info),
    ("warn", warn),
    ("error", error),
    ("debug", debug),
];

/// Nesting shown before containers collapse to `[...]` / `{...}`.
const MAX_INSPECT_DEPTH: usize = 4;

/// Render one argument. Top-level strings print raw.
pub(crate) fn format_arg(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => inspect(value, 0),
        other => to_display_string(other),
    }
}

fn inspect(value: &Value, depth: usize) -> String {
    match value {
        Value::Str(s) if depth > 0 => format!("'{s}'"),
        Value::Number(n) => number_to_string(*n),
        Value::Array(items) => {
            if depth >= MAX_INSPECT_DEPTH {
                return "[...]".to_string();
            }
            let Ok(items) = items.try_borrow() else {
                return "[Circular]".to_string();
            };
            let parts: Vec<String> = items.iter().map(|v| inspect(v, depth + 1)).collect();
            if parts.is_empty() {
                "[]".to_string()
            } else {
                format!("[ {} ]", parts.join(", "))
            }
        }
        Value::Object(props) => {
            if depth >= MAX_INSPECT_DEPTH {
                return "{...}".to_string();
            }
            let Ok(props) = props.try_borrow() else {
                return "[Circular]".to_string();
            };
            let parts: Vec<String> = props
                .iter()
                .map(|(k, v)| format!("{k}: {}", inspect(v, depth + 1)))
                .collect();
            if parts.is_empty() {
                "{}".to_string()
            } else {
                format!("{{ {} }}", parts.join(", "))
            }
        }
        Value::Function(closure) => format!("[Function: {}]", closure.display_name()),
        Value::Native(native) => format!("[Function: {}]", native.name()),
        other => to_display_string(other),
    }
}

fn emit(interp: &mut Interpreter<'_>, level: ConsoleLevel, args: &[Value]) -> EvalResult {
    let message = args.iter().map(format_arg).collect::<Vec<_>>().join(" ");
    trace!(level = level.as_str(), %message, "console");
    interp.record_effect(EffectKind::Console(level), "console", message);
    Ok(Value::Undefined)
}

fn log(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    emit(interp, ConsoleLevel::Log, args)
}

fn info(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    emit(interp, ConsoleLevel::Info, args)
}

fn warn(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    emit(interp, ConsoleLevel::Warn, args)
}

fn error(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    emit(interp, ConsoleLevel::Error, args)
}

fn debug(interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    emit(interp, ConsoleLevel::Debug, args)
}
