//! Globals bound as constants in the engine's outermost context.

mod console;
mod json;
mod math;
mod number;
mod object;

use crate::environment::ExecutionContext;
use crate::value::{NativeFn, NativeFunction, PropertyMap, Value};

/// A plain object of native functions plus constant properties.
fn namespace(functions: &[(&'static str, NativeFn)], constants: Vec<(&str, Value)>) -> Value {
    let mut props: PropertyMap = functions
        .iter()
        .map(|&(name, func)| (name, Value::Native(NativeFunction::new(name, func))))
        .collect();
    for (name, value) in constants {
        props.set(name, value);
    }
    Value::object(props)
}

/// Bind every built-in into `globals`.
pub(crate) fn install(globals: &ExecutionContext) {
    globals.bind_constant("undefined", Value::Undefined);
    globals.bind_constant("NaN", Value::Number(f64::NAN));
    globals.bind_constant("Infinity", Value::Number(f64::INFINITY));

    globals.bind_constant("console", namespace(console::FUNCTIONS, Vec::new()));
    globals.bind_constant("Math", namespace(math::FUNCTIONS, math::constants()));
    globals.bind_constant("JSON", namespace(json::FUNCTIONS, Vec::new()));
    globals.bind_constant("Object", namespace(object::OBJECT_FUNCTIONS, Vec::new()));
    globals.bind_constant("Array", namespace(object::ARRAY_FUNCTIONS, Vec::new()));
    globals.bind_constant("Number", namespace(number::NUMBER_FUNCTIONS, number::constants()));

    for &(name, func) in number::GLOBAL_FUNCTIONS {
        globals.bind_constant(name, Value::Native(NativeFunction::new(name, func)));
    }
}
