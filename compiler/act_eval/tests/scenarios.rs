//! End-to-end programs built with `act_eval::nodes`.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use act_eval::nodes::*;
use act_eval::{Engine, EngineFailure, FailureKind, Value};
use act_ir::{ActionObject, ActionTree};
use pretty_assertions::assert_eq;

fn run(statements: impl IntoIterator<Item = ActionObject>) -> Result<Value, EngineFailure> {
    let tree = ActionTree::from_root_object(&program(statements));
    Engine::new().execute(&tree)
}

fn eval(statements: impl IntoIterator<Item = ActionObject>) -> Value {
    run(statements).unwrap()
}

#[test]
fn fibonacci() {
    let fib = function_decl("fib", &["n"], [
        if_(
            binary("<", ident("n"), num(2.0)),
            ret(ident("n")),
            None,
        ),
        ret(binary(
            "+",
            call(ident("fib"), [binary("-", ident("n"), num(1.0))]),
            call(ident("fib"), [binary("-", ident("n"), num(2.0))]),
        )),
    ]);
    assert_eq!(eval([fib, expr(call(ident("fib"), [num(10.0)]))]), Value::Number(55.0));
}

#[test]
fn factorial() {
    let factorial = function_decl("factorial", &["n"], [ret(conditional(
        binary("<=", ident("n"), num(1.0)),
        num(1.0),
        binary(
            "*",
            ident("n"),
            call(ident("factorial"), [binary("-", ident("n"), num(1.0))]),
        ),
    ))]);
    // Called before its declaration: declarations are hoisted.
    let value = eval([expr(call(ident("factorial"), [num(5.0)])), factorial]);
    assert_eq!(value, Value::Number(120.0));
}

#[test]
fn nested_arithmetic() {
    let expression = binary(
        "/",
        binary(
            "-",
            binary("*", binary("+", num(1.0), num(2.0)), num(3.0)),
            num(4.0),
        ),
        num(5.0),
    );
    assert_eq!(eval([expr(expression)]), Value::Number(1.0));
}

#[test]
fn for_loop_with_continue() {
    let value = eval([
        let_("sum", num(0.0)),
        for_(
            Some(let_("i", num(0.0))),
            Some(binary("<", ident("i"), num(5.0))),
            Some(update("++", false, ident("i"))),
            block([
                if_(binary("===", ident("i"), num(2.0)), cont(), None),
                expr(assign_op("+=", ident("sum"), ident("i"))),
            ]),
        ),
        expr(ident("sum")),
    ]);
    assert_eq!(value, Value::Number(8.0));
}

#[test]
fn thrown_string_is_caught() {
    let value = eval([
        let_("result", null()),
        try_(
            [throw(string("x"))],
            Some(catch(Some("e"), [expr(assign(
                ident("result"),
                binary("+", string("caught: "), ident("e")),
            ))])),
            None,
        ),
        expr(ident("result")),
    ]);
    assert_eq!(value, Value::string("caught: x"));
}

#[test]
fn word_frequencies() {
    let value = eval([
        const_("counts", object([])),
        for_of(
            "const",
            "word",
            method_call(string("a b a c b a"), "split", [string(" ")]),
            expr(assign(
                index(ident("counts"), ident("word")),
                binary("+", logical("||", index(ident("counts"), ident("word")), num(0.0)), num(1.0)),
            )),
        ),
        expr(method_call(ident("JSON"), "stringify", [ident("counts")])),
    ]);
    assert_eq!(value, Value::string(r#"{"a":3,"b":2,"c":1}"#));
}

#[test]
fn higher_order_pipeline() {
    let value = eval([
        const_("compose", arrow(&["f", "g"], arrow(&["x"], call(ident("f"), [call(ident("g"), [ident("x")])])))),
        const_("inc", arrow(&["x"], binary("+", ident("x"), num(1.0)))),
        const_("double", arrow(&["x"], binary("*", ident("x"), num(2.0)))),
        expr(method_call(
            method_call(
                array([num(1.0), num(2.0), num(3.0)]),
                "map",
                [call(ident("compose"), [ident("inc"), ident("double")])],
            ),
            "join",
            [string("-")],
        )),
    ]);
    assert_eq!(value, Value::string("3-5-7"));
}

#[test]
fn object_methods_see_this() {
    let value = eval([
        const_("account", object([
            ("balance", num(10.0)),
            ("deposit", function(&["amount"], [
                expr(assign_op("+=", member(this(), "balance"), ident("amount"))),
                ret(this()),
            ])),
        ])),
        expr(member(
            method_call(method_call(ident("account"), "deposit", [num(5.0)]), "deposit", [num(2.5)]),
            "balance",
        )),
    ]);
    assert_eq!(value, Value::Number(17.5));
}

#[test]
fn template_and_switch() {
    let describe = function_decl("describe", &["n"], [switch(
        binary("%", ident("n"), num(3.0)),
        [
            case(Some(num(0.0)), [ret(template([string("fizz "), ident("n")]))]),
            case(None, [ret(template([string("plain "), ident("n")]))]),
        ],
    )]);
    let value = eval([
        describe,
        expr(array([
            call(ident("describe"), [num(9.0)]),
            call(ident("describe"), [num(4.0)]),
        ])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::string("fizz 9"),
        Value::string("plain 4"),
    ]);
}

#[test]
fn uncaught_reference_error_reports_its_code() {
    let err = run([expr(call(ident("missing"), []))]).unwrap_err();
    assert_eq!(err.kind, FailureKind::UndefinedReference);
    assert_eq!(err.to_string(), "[E7101] missing is not defined");
    assert!(err.node.is_some());
}

#[test]
fn deeply_nested_arrays_are_released() {
    let value = eval([
        let_("a", array([])),
        for_(
            Some(let_("i", num(0.0))),
            Some(binary("<", ident("i"), num(20_000.0))),
            Some(update("++", false, ident("i"))),
            expr(assign(ident("a"), array([ident("a")]))),
        ),
        expr(string("done")),
    ]);
    assert_eq!(value, Value::string("done"));
}
