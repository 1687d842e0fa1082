#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::unary_operators::{evaluate_unary, UnaryOp};
use crate::value::PropertyMap;

fn n(value: f64) -> Value {
    Value::Number(value)
}

fn s(text: &str) -> Value {
    Value::string(text)
}

fn eval(left: Value, symbol: &str, right: Value) -> Value {
    evaluate_binary(&left, &right, BinaryOp::from_symbol(symbol).unwrap()).unwrap()
}

#[test]
fn symbols_round_trip() {
    for symbol in [
        "+", "-", "*", "/", "%", "**", "==", "!=", "===", "!==", "<", "<=", ">", ">=", "&",
        "|", "^", "<<", ">>", ">>>", "in",
    ] {
        assert_eq!(BinaryOp::from_symbol(symbol).unwrap().as_symbol(), symbol);
    }
    assert_eq!(BinaryOp::from_symbol("&&"), None);
    assert_eq!(LogicalOp::from_symbol("??"), Some(LogicalOp::Coalesce));
}

#[test]
fn assignment_operators() {
    assert_eq!(AssignOp::from_symbol("="), Some(AssignOp::Plain));
    assert_eq!(AssignOp::from_symbol("+="), Some(AssignOp::Compound(BinaryOp::Add)));
    assert_eq!(AssignOp::from_symbol("**="), Some(AssignOp::Compound(BinaryOp::Pow)));
    assert_eq!(AssignOp::from_symbol(">>>="), Some(AssignOp::Compound(BinaryOp::UShr)));
    assert_eq!(AssignOp::from_symbol("||="), Some(AssignOp::Logical(LogicalOp::Or)));
    assert_eq!(AssignOp::from_symbol("??="), Some(AssignOp::Logical(LogicalOp::Coalesce)));
    assert_eq!(AssignOp::from_symbol("=="), None);
    assert_eq!(AssignOp::from_symbol("<="), None);
    assert_eq!(AssignOp::from_symbol("+"), None);
}

#[test]
fn arithmetic() {
    assert_eq!(eval(n(7.0), "-", n(2.0)), n(5.0));
    assert_eq!(eval(n(7.0), "/", n(2.0)), n(3.5));
    assert_eq!(eval(n(-7.0), "%", n(2.0)), n(-1.0));
    assert_eq!(eval(n(2.0), "**", n(10.0)), n(1024.0));
    assert_eq!(eval(n(1.0), "/", n(0.0)), n(f64::INFINITY));
    assert_eq!(eval(s("6"), "*", s("7")), n(42.0));
    assert!(eval(n(1.0), "**", n(f64::NAN)).as_number().unwrap().is_nan());
    assert!(eval(n(1.0), "-", Value::Undefined).as_number().unwrap().is_nan());
}

#[test]
fn addition_concatenates_strings() {
    assert_eq!(eval(n(1.0), "+", n(2.0)), n(3.0));
    assert_eq!(eval(s("a"), "+", n(1.0)), s("a1"));
    assert_eq!(eval(n(1.0), "+", s("2")), s("12"));
    assert_eq!(eval(Value::Bool(true), "+", n(1.0)), n(2.0));
    assert_eq!(eval(Value::Null, "+", n(1.0)), n(1.0));
    assert_eq!(
        eval(Value::array(vec![n(1.0), n(2.0)]), "+", s("!")),
        s("1,2!")
    );
    assert_eq!(eval(Value::object(PropertyMap::new()), "+", s("")), s("[object Object]"));
}

#[test]
fn comparisons() {
    assert_eq!(eval(n(1.0), "<", n(2.0)), Value::Bool(true));
    assert_eq!(eval(s("10"), "<", s("9")), Value::Bool(true));
    assert_eq!(eval(s("10"), "<", n(9.0)), Value::Bool(false));
    assert_eq!(eval(n(2.0), ">=", n(2.0)), Value::Bool(true));
    assert_eq!(eval(n(f64::NAN), "<=", n(1.0)), Value::Bool(false));
    assert_eq!(compare(&n(f64::NAN), &n(1.0)), None);
    assert_eq!(eval(n(1.0), "==", s("1")), Value::Bool(true));
    assert_eq!(eval(n(1.0), "===", s("1")), Value::Bool(false));
    assert_eq!(eval(Value::Null, "!=", Value::Undefined), Value::Bool(false));
    assert_eq!(eval(Value::Null, "!==", Value::Undefined), Value::Bool(true));
}

#[test]
fn bitwise() {
    assert_eq!(eval(n(6.0), "&", n(3.0)), n(2.0));
    assert_eq!(eval(n(6.0), "|", n(3.0)), n(7.0));
    assert_eq!(eval(n(6.0), "^", n(3.0)), n(5.0));
    assert_eq!(eval(n(1.0), "<<", n(33.0)), n(2.0));
    assert_eq!(eval(n(-8.0), ">>", n(1.0)), n(-4.0));
    assert_eq!(eval(n(-1.0), ">>>", n(28.0)), n(15.0));
    assert_eq!(eval(n(1.0), "<<", n(31.0)), n(-2_147_483_648.0));
}

#[test]
fn in_operator() {
    let obj = Value::object([("a", n(1.0))].into_iter().collect());
    assert_eq!(eval(s("a"), "in", obj.clone()), Value::Bool(true));
    assert_eq!(eval(s("b"), "in", obj), Value::Bool(false));

    let arr = Value::array(vec![n(1.0)]);
    assert_eq!(eval(n(0.0), "in", arr.clone()), Value::Bool(true));
    assert_eq!(eval(n(1.0), "in", arr.clone()), Value::Bool(false));
    assert_eq!(eval(s("length"), "in", arr), Value::Bool(true));

    let err = evaluate_binary(&s("a"), &n(1.0), BinaryOp::In).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeError { .. }));
}

#[test]
fn logical_short_circuit_rules() {
    assert!(LogicalOp::And.short_circuits(&n(0.0)));
    assert!(!LogicalOp::And.short_circuits(&n(1.0)));
    assert!(LogicalOp::Or.short_circuits(&s("x")));
    assert!(!LogicalOp::Or.short_circuits(&s("")));
    assert!(LogicalOp::Coalesce.short_circuits(&n(0.0)));
    assert!(!LogicalOp::Coalesce.short_circuits(&Value::Null));
}

#[test]
fn unary_operators() {
    assert_eq!(UnaryOp::from_symbol("typeof"), Some(UnaryOp::TypeOf));
    assert_eq!(UnaryOp::from_symbol("++"), None);
    assert_eq!(evaluate_unary(&n(0.0), UnaryOp::Not), Value::Bool(true));
    assert_eq!(evaluate_unary(&s("3"), UnaryOp::Neg), n(-3.0));
    assert_eq!(evaluate_unary(&s(" 4 "), UnaryOp::Plus), n(4.0));
    assert_eq!(evaluate_unary(&n(5.0), UnaryOp::BitNot), n(-6.0));
    assert_eq!(evaluate_unary(&Value::Null, UnaryOp::TypeOf), s("object"));
    assert_eq!(evaluate_unary(&n(1.0), UnaryOp::Void), Value::Undefined);
    assert_eq!(evaluate_unary(&n(1.0), UnaryOp::Delete), Value::Bool(true));
}
