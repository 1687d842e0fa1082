#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use act_ir::{ActionObject, ActionTree};
use pretty_assertions::assert_eq;

use super::*;
use crate::engine::{Engine, FailureKind};
use crate::nodes::*;

fn eval(statements: impl IntoIterator<Item = ActionObject>) -> Value {
    let tree = ActionTree::from_root_object(&program(statements));
    Engine::new().execute(&tree).unwrap()
}

fn numbers(values: &[f64]) -> ActionObject {
    array(values.iter().map(|n| num(*n)))
}

fn as_numbers(value: &Value) -> Vec<f64> {
    value
        .array_items()
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect()
}

#[test]
fn lookup_binds_the_receiver() {
    let arr = Value::array(vec![Value::Number(1.0)]);
    let push = lookup(&arr, "push").unwrap();
    assert_eq!(push.name(), "push");
    assert_eq!(push.receiver(), Some(&arr));
    assert!(lookup(&arr, "nope").is_none());
    assert!(lookup(&Value::Null, "toString").is_none());
}

#[test]
fn push_pop_shift_unshift() {
    let value = eval([
        const_("a", numbers(&[2.0])),
        expr(method_call(ident("a"), "push", [num(3.0), num(4.0)])),
        expr(method_call(ident("a"), "unshift", [num(1.0)])),
        let_("last", method_call(ident("a"), "pop", [])),
        let_("first", method_call(ident("a"), "shift", [])),
        expr(method_call(ident("a"), "concat", [array([ident("first"), ident("last")])])),
    ]);
    assert_eq!(as_numbers(&value), vec![2.0, 3.0, 1.0, 4.0]);
}

#[test]
fn extracted_methods_keep_their_receiver() {
    let value = eval([
        const_("a", numbers(&[])),
        const_("add", member(ident("a"), "push")),
        expr(call(ident("add"), [num(9.0)])),
        expr(ident("a")),
    ]);
    assert_eq!(as_numbers(&value), vec![9.0]);
}

#[test]
fn slice_join_index_of_includes() {
    let value = eval([
        const_("a", numbers(&[1.0, 2.0, 3.0, 4.0])),
        expr(array([
            method_call(method_call(ident("a"), "slice", [num(1.0), num(-1.0)]), "join", [string("+")]),
            method_call(ident("a"), "indexOf", [num(3.0)]),
            method_call(ident("a"), "indexOf", [num(9.0)]),
            method_call(ident("a"), "includes", [num(4.0)]),
            method_call(array([null(), num(1.0)]), "join", []),
        ])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::string("2+3"),
        Value::Number(2.0),
        Value::Number(-1.0),
        Value::Bool(true),
        Value::string(",1"),
    ]);
}

#[test]
fn includes_finds_nan_but_index_of_does_not() {
    let value = eval([
        const_("a", array([ident("NaN")])),
        expr(array([
            method_call(ident("a"), "includes", [ident("NaN")]),
            method_call(ident("a"), "indexOf", [ident("NaN")]),
        ])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![Value::Bool(true), Value::Number(-1.0)]);
}

#[test]
fn callback_methods() {
    let value = eval([
        const_("a", numbers(&[1.0, 2.0, 3.0, 4.0])),
        const_("even", arrow(&["x"], binary("===", binary("%", ident("x"), num(2.0)), num(0.0)))),
        expr(array([
            method_call(ident("a"), "map", [arrow(&["x", "i"], binary("*", ident("x"), ident("i")))]),
            method_call(ident("a"), "filter", [ident("even")]),
            method_call(ident("a"), "reduce", [arrow(&["s", "x"], binary("+", ident("s"), ident("x"))), num(10.0)]),
            method_call(ident("a"), "find", [ident("even")]),
            method_call(ident("a"), "findIndex", [ident("even")]),
            method_call(ident("a"), "some", [ident("even")]),
            method_call(ident("a"), "every", [ident("even")]),
        ])),
    ]);
    let items = value.array_items().unwrap();
    assert_eq!(as_numbers(&items[0]), vec![0.0, 2.0, 6.0, 12.0]);
    assert_eq!(as_numbers(&items[1]), vec![2.0, 4.0]);
    assert_eq!(items[2..].to_vec(), vec![
        Value::Number(20.0),
        Value::Number(2.0),
        Value::Number(1.0),
        Value::Bool(true),
        Value::Bool(false),
    ]);
}

#[test]
fn for_each_sees_every_item() {
    let value = eval([
        let_("sum", num(0.0)),
        expr(method_call(numbers(&[1.0, 2.0, 3.0]), "forEach", [arrow(
            &["x"],
            assign_op("+=", ident("sum"), ident("x")),
        )])),
        expr(ident("sum")),
    ]);
    assert_eq!(value, Value::Number(6.0));
}

#[test]
fn reduce_of_empty_array_without_initial_fails() {
    let tree = ActionTree::from_root_object(&program([expr(method_call(
        numbers(&[]),
        "reduce",
        [arrow(&["a", "b"], ident("a"))],
    ))]));
    let err = Engine::new().execute(&tree).unwrap_err();
    assert_eq!(err.kind, FailureKind::TypeError);
}

#[test]
fn reverse_is_in_place() {
    let value = eval([
        const_("a", numbers(&[1.0, 2.0, 3.0])),
        expr(method_call(ident("a"), "reverse", [])),
        expr(ident("a")),
    ]);
    assert_eq!(as_numbers(&value), vec![3.0, 2.0, 1.0]);
}

#[test]
fn string_methods() {
    let s = || string("  Hello, World  ");
    let value = eval([expr(array([
        method_call(s(), "trim", []),
        method_call(method_call(s(), "trim", []), "toUpperCase", []),
        method_call(s(), "indexOf", [string("World")]),
        method_call(s(), "includes", [string("lo, W")]),
        method_call(method_call(s(), "trim", []), "startsWith", [string("Hell")]),
        method_call(method_call(s(), "trim", []), "endsWith", [string("World")]),
        method_call(method_call(s(), "trim", []), "slice", [num(-5.0)]),
        method_call(method_call(s(), "trim", []), "substring", [num(5.0), num(0.0)]),
        method_call(s(), "charAt", [num(2.0)]),
        method_call(string("a-b-c"), "replace", [string("-"), string("+")]),
        member(string("héllo"), "length"),
    ]))]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::string("Hello, World"),
        Value::string("HELLO, WORLD"),
        Value::Number(9.0),
        Value::Bool(true),
        Value::Bool(true),
        Value::Bool(true),
        Value::string("World"),
        Value::string("Hello"),
        Value::string("H"),
        Value::string("a+b-c"),
        Value::Number(5.0),
    ]);
}

#[test]
fn split_variants() {
    let parts = |value: &Value| -> Vec<String> {
        value
            .array_items()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    };
    let value = eval([expr(array([
        method_call(string("a,b,,c"), "split", [string(",")]),
        method_call(string("abc"), "split", [string("")]),
        method_call(string("abc"), "split", []),
        method_call(string("a b c"), "split", [string(" "), num(2.0)]),
    ]))]);
    let items = value.array_items().unwrap();
    assert_eq!(parts(&items[0]), vec!["a", "b", "", "c"]);
    assert_eq!(parts(&items[1]), vec!["a", "b", "c"]);
    assert_eq!(parts(&items[2]), vec!["abc"]);
    assert_eq!(parts(&items[3]), vec!["a", "b"]);
}

#[test]
fn replace_with_callback() {
    let value = eval([expr(method_call(string("cost: 5"), "replace", [
        string("5"),
        arrow(&["m"], binary("*", ident("m"), num(2.0))),
    ]))]);
    assert_eq!(value, Value::string("cost: 10"));
}

#[test]
fn number_methods() {
    let value = eval([expr(array([
        method_call(num(3.14159), "toFixed", [num(2.0)]),
        method_call(num(255.0), "toString", [num(16.0)]),
        method_call(num(-5.0), "toString", [num(2.0)]),
        method_call(num(0.5), "toString", [num(2.0)]),
        method_call(num(12.0), "toString", []),
    ]))]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::string("3.14"),
        Value::string("ff"),
        Value::string("-101"),
        Value::string("0.1"),
        Value::string("12"),
    ]);
}

#[test]
fn bad_radix_is_a_range_error() {
    let tree = ActionTree::from_root_object(&program([expr(method_call(
        num(1.0),
        "toString",
        [num(1.0)],
    ))]));
    let err = Engine::new().execute(&tree).unwrap_err();
    assert_eq!(err.kind, FailureKind::RangeError);
}

#[test]
fn has_own_property_checks_own_keys() {
    let value = eval([
        const_("o", object([("a", num(1.0))])),
        expr(array([
            method_call(ident("o"), "hasOwnProperty", [string("a")]),
            method_call(ident("o"), "hasOwnProperty", [string("b")]),
        ])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![Value::Bool(true), Value::Bool(false)]);
}
