//! Constructors for the standard node shapes.
//!
//! Front-ends normally produce trees themselves; these helpers are for
//! embedders and tests that assemble small programs by hand.
//!
//! ```
//! use act_eval::nodes::{binary, expr, num, program};
//! use act_eval::{Engine, Value};
//! use act_ir::ActionTree;
//!
//! let tree = ActionTree::from_root_object(&program([expr(binary("+", num(1.0), num(2.0)))]));
//! assert_eq!(Engine::new().execute(&tree).ok(), Some(Value::Number(3.0)));
//! ```

use act_ir::{ActionObject, AttrValue};

pub fn program(statements: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("program").children(statements)
}

pub fn block(statements: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("block").children(statements)
}

/// `expressionStatement`.
pub fn expr(expression: ActionObject) -> ActionObject {
    ActionObject::new("expressionStatement").child(expression)
}

pub fn empty() -> ActionObject {
    ActionObject::new("empty")
}

pub fn literal(value: impl Into<AttrValue>) -> ActionObject {
    ActionObject::new("literal").attr("value", value)
}

pub fn num(value: f64) -> ActionObject {
    literal(value)
}

pub fn string(value: &str) -> ActionObject {
    literal(value)
}

pub fn boolean(value: bool) -> ActionObject {
    literal(value)
}

pub fn null() -> ActionObject {
    literal(AttrValue::Null)
}

pub fn ident(name: &str) -> ActionObject {
    ActionObject::new("identifier").attr("name", name)
}

pub fn this() -> ActionObject {
    ActionObject::new("this")
}

pub fn binary(operator: &str, left: ActionObject, right: ActionObject) -> ActionObject {
    ActionObject::new("binaryOp")
        .attr("operator", operator)
        .child(left)
        .child(right)
}

pub fn logical(operator: &str, left: ActionObject, right: ActionObject) -> ActionObject {
    ActionObject::new("logicalOp")
        .attr("operator", operator)
        .child(left)
        .child(right)
}

pub fn unary(operator: &str, operand: ActionObject) -> ActionObject {
    ActionObject::new("unaryOp")
        .attr("operator", operator)
        .child(operand)
}

pub fn update(operator: &str, prefix: bool, target: ActionObject) -> ActionObject {
    ActionObject::new("update")
        .attr("operator", operator)
        .attr("prefix", prefix)
        .child(target)
}

/// `target = value`.
pub fn assign(target: ActionObject, value: ActionObject) -> ActionObject {
    assign_op("=", target, value)
}

pub fn assign_op(operator: &str, target: ActionObject, value: ActionObject) -> ActionObject {
    ActionObject::new("assign")
        .attr("operator", operator)
        .child(target)
        .child(value)
}

/// `declareVar` with an optional initializer.
pub fn declare(kind: &str, name: &str, init: Option<ActionObject>) -> ActionObject {
    ActionObject::new("declareVar")
        .attr("name", name)
        .attr("kind", kind)
        .children(init)
}

pub fn let_(name: &str, init: ActionObject) -> ActionObject {
    declare("let", name, Some(init))
}

pub fn const_(name: &str, init: ActionObject) -> ActionObject {
    declare("const", name, Some(init))
}

pub fn var(name: &str, init: ActionObject) -> ActionObject {
    declare("var", name, Some(init))
}

pub fn param(name: &str) -> ActionObject {
    ActionObject::new("param").attr("name", name)
}

pub fn param_default(name: &str, default: ActionObject) -> ActionObject {
    param(name).child(default.role("default"))
}

pub fn rest_param(name: &str) -> ActionObject {
    param(name).attr("rest", true)
}

fn params_of(params: &[&str]) -> Vec<ActionObject> {
    params.iter().map(|p| param(p)).collect()
}

/// `function name(params) { body }` as a hoisted declaration.
pub fn function_decl(
    name: &str,
    params: &[&str],
    body: impl IntoIterator<Item = ActionObject>,
) -> ActionObject {
    ActionObject::new("declareFunction")
        .attr("name", name)
        .children(params_of(params))
        .child(self::block(body).role("body"))
}

/// Anonymous `function (params) { body }` expression.
pub fn function(params: &[&str], body: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    function_with(params_of(params), body)
}

/// Function expression over prebuilt `param` nodes.
pub fn function_with(
    params: impl IntoIterator<Item = ActionObject>,
    body: impl IntoIterator<Item = ActionObject>,
) -> ActionObject {
    ActionObject::new("function")
        .children(params)
        .child(self::block(body).role("body"))
}

/// `(params) => expression`.
pub fn arrow(params: &[&str], body: ActionObject) -> ActionObject {
    ActionObject::new("function")
        .attr("arrow", true)
        .attr("expression", true)
        .children(params_of(params))
        .child(body.role("body"))
}

/// `(params) => { body }`.
pub fn arrow_block(params: &[&str], body: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    function(params, body).attr("arrow", true)
}

pub fn ret(value: ActionObject) -> ActionObject {
    ActionObject::new("return").child(value)
}

pub fn ret_void() -> ActionObject {
    ActionObject::new("return")
}

pub fn if_(
    condition: ActionObject,
    then: ActionObject,
    otherwise: Option<ActionObject>,
) -> ActionObject {
    ActionObject::new("if")
        .child(condition.role("condition"))
        .child(then.role("then"))
        .children(otherwise.map(|e| e.role("else")))
}

/// `condition ? then : otherwise`.
pub fn conditional(condition: ActionObject, then: ActionObject, otherwise: ActionObject) -> ActionObject {
    ActionObject::new("conditional")
        .child(condition.role("condition"))
        .child(then.role("then"))
        .child(otherwise.role("else"))
}

pub fn while_(condition: ActionObject, body: ActionObject) -> ActionObject {
    ActionObject::new("while")
        .child(condition.role("condition"))
        .child(body.role("body"))
}

pub fn do_while(body: ActionObject, condition: ActionObject) -> ActionObject {
    ActionObject::new("doWhile")
        .child(body.role("body"))
        .child(condition.role("condition"))
}

pub fn for_(
    init: Option<ActionObject>,
    condition: Option<ActionObject>,
    update: Option<ActionObject>,
    body: ActionObject,
) -> ActionObject {
    ActionObject::new("for")
        .children(init.map(|n| n.role("init")))
        .children(condition.map(|n| n.role("condition")))
        .children(update.map(|n| n.role("update")))
        .child(body.role("body"))
}

pub fn for_of(kind: &str, name: &str, iterable: ActionObject, body: ActionObject) -> ActionObject {
    for_each("forOf", kind, name, iterable, body)
}

pub fn for_in(kind: &str, name: &str, iterable: ActionObject, body: ActionObject) -> ActionObject {
    for_each("forIn", kind, name, iterable, body)
}

fn for_each(tag: &str, kind: &str, name: &str, iterable: ActionObject, body: ActionObject) -> ActionObject {
    ActionObject::new(tag)
        .attr("name", name)
        .attr("kind", kind)
        .child(iterable.role("iterable"))
        .child(body.role("body"))
}

pub fn brk() -> ActionObject {
    ActionObject::new("break")
}

pub fn cont() -> ActionObject {
    ActionObject::new("continue")
}

pub fn switch(discriminant: ActionObject, cases: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("switch")
        .child(discriminant.role("discriminant"))
        .children(cases)
}

/// A `case`; `None` for `default`.
pub fn case(test: Option<ActionObject>, body: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("case")
        .children(test.map(|t| t.role("test")))
        .children(body)
}

pub fn catch(param: Option<&str>, body: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    let clause = ActionObject::new("catch").children(body);
    match param {
        Some(name) => clause.attr("param", name),
        None => clause,
    }
}

pub fn try_(
    body: impl IntoIterator<Item = ActionObject>,
    handler: Option<ActionObject>,
    finalizer: Option<Vec<ActionObject>>,
) -> ActionObject {
    ActionObject::new("try")
        .child(self::block(body).role("block"))
        .children(handler.map(|h| h.role("handler")))
        .children(finalizer.map(|f| self::block(f).role("finalizer")))
}

pub fn throw(value: ActionObject) -> ActionObject {
    ActionObject::new("throw").child(value)
}

pub fn call(callee: ActionObject, args: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("call")
        .child(callee.role("callee"))
        .children(args)
}

/// `object.method(args)`.
pub fn method_call(
    object: ActionObject,
    method: &str,
    args: impl IntoIterator<Item = ActionObject>,
) -> ActionObject {
    call(member(object, method), args)
}

/// `object.property`.
pub fn member(object: ActionObject, property: &str) -> ActionObject {
    ActionObject::new("member")
        .attr("property", property)
        .child(object)
}

/// `object?.property`.
pub fn optional_member(object: ActionObject, property: &str) -> ActionObject {
    member(object, property).attr("optional", true)
}

/// `object[key]`.
pub fn index(object: ActionObject, key: ActionObject) -> ActionObject {
    ActionObject::new("member")
        .attr("computed", true)
        .child(object)
        .child(key)
}

pub fn array(items: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("array").children(items)
}

/// Object literal from `(key, value)` pairs.
pub fn object<'k>(entries: impl IntoIterator<Item = (&'k str, ActionObject)>) -> ActionObject {
    ActionObject::new("object").children(entries.into_iter().map(|(key, value)| {
        ActionObject::new("property").attr("key", key).child(value)
    }))
}

pub fn template(parts: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("template").children(parts)
}

pub fn sequence(expressions: impl IntoIterator<Item = ActionObject>) -> ActionObject {
    ActionObject::new("sequence").children(expressions)
}
