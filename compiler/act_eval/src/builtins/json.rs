//! `JSON.stringify` / `JSON.parse` over `serde_json`.

use std::rc::Rc;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Number};

use crate::coerce::{to_display_string, to_integer};
use crate::errors::{range_error, syntax_error, type_error, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, PropertyMap, Value};

pub(super) const FUNCTIONS: &[(&str, NativeFn)] = &[("stringify", stringify), ("parse", parse)];

/// Longest indent `stringify` honors.
const MAX_INDENT: usize = 10;

/// Deepest container nesting `stringify` converts.
const MAX_JSON_DEPTH: usize = 512;

/// Largest integer written without a fraction.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert to a JSON tree. `None` for values JSON omits (`undefined`,
/// functions).
fn to_json(value: &Value, seen: &mut Vec<usize>) -> Result<Option<serde_json::Value>, EvalError> {
    act_stack::ensure_sufficient_stack(|| to_json_inner(value, seen))
}

fn to_json_inner(
    value: &Value,
    seen: &mut Vec<usize>,
) -> Result<Option<serde_json::Value>, EvalError> {
    let json = match value {
        Value::Undefined | Value::Function(_) | Value::Native(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => {
            enter(seen, items.addr())?;
            let snapshot = items.borrow().clone();
            let mut out = Vec::with_capacity(snapshot.len());
            for item in &snapshot {
                out.push(to_json(item, seen)?.unwrap_or(serde_json::Value::Null));
            }
            seen.pop();
            serde_json::Value::Array(out)
        }
        Value::Object(props) => {
            enter(seen, props.addr())?;
            let entries: Vec<(String, Value)> = props
                .borrow()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            let map = object_to_json(entries, seen)?;
            seen.pop();
            serde_json::Value::Object(map)
        }
        Value::Host(host) => {
            enter(seen, Rc::as_ptr(host).cast::<()>() as usize)?;
            let entries = host
                .keys()
                .into_iter()
                .map(|key| {
                    let value = host.get(&key);
                    (key, value)
                })
                .collect();
            let map = object_to_json(entries, seen)?;
            seen.pop();
            serde_json::Value::Object(map)
        }
    };
    Ok(Some(json))
}

fn object_to_json(
    entries: Vec<(String, Value)>,
    seen: &mut Vec<usize>,
) -> Result<Map<String, serde_json::Value>, EvalError> {
    let mut map = Map::new();
    for (key, value) in entries {
        if let Some(json) = to_json(&value, seen)? {
            map.insert(key, json);
        }
    }
    Ok(map)
}

fn enter(seen: &mut Vec<usize>, addr: usize) -> Result<(), EvalError> {
    if seen.contains(&addr) {
        return Err(type_error("Converting circular structure to JSON"));
    }
    if seen.len() >= MAX_JSON_DEPTH {
        return Err(range_error("Maximum nesting depth exceeded in JSON.stringify"));
    }
    seen.push(addr);
    Ok(())
}

/// Integral numbers print without a fraction; `NaN` and the infinities
/// become `null`.
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

/// The `space` argument as an indent string.
fn indent_of(space: Option<&Value>) -> String {
    match space {
        Some(Value::Number(n)) => " ".repeat(to_integer(*n).clamp(0.0, MAX_INDENT as f64) as usize),
        Some(Value::Str(s)) => s.chars().take(MAX_INDENT).collect(),
        _ => String::new(),
    }
}

fn write_json(json: &serde_json::Value, indent: &str) -> Result<String, EvalError> {
    let mut buf = Vec::new();
    let written = if indent.is_empty() {
        serde_json::to_writer(&mut buf, json)
    } else {
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut ser)
    };
    written.map_err(|err| type_error(format!("JSON.stringify: {err}")))?;
    String::from_utf8(buf).map_err(|err| type_error(format!("JSON.stringify: {err}")))
}

/// `JSON.stringify(value, replacer, space)`. The replacer is ignored.
pub(crate) fn stringify_value(value: &Value, space: Option<&Value>) -> EvalResult {
    let Some(json) = to_json(value, &mut Vec::new())? else {
        return Ok(Value::Undefined);
    };
    write_json(&json, &indent_of(space)).map(Value::string)
}

fn stringify(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    stringify_value(args.first().unwrap_or(&Value::Undefined), args.get(2))
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::object(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<PropertyMap>(),
        ),
    }
}

/// `JSON.parse(text)`. Malformed input raises a catchable `SyntaxError`.
pub(crate) fn parse_text(text: &str) -> EvalResult {
    serde_json::from_str::<serde_json::Value>(text)
        .map(from_json)
        .map_err(|err| syntax_error(format!("JSON.parse: {err}")))
}

fn parse(_interp: &mut Interpreter<'_>, _this: &Value, args: &[Value]) -> EvalResult {
    let text = args.first().map(to_display_string).unwrap_or_else(|| "undefined".to_string());
    parse_text(&text)
}
