#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use act_ir::{Action, ActionObject, ActionTree};
use pretty_assertions::assert_eq;

use super::*;
use crate::engine::{Engine, EngineFailure, FailureKind};
use crate::nodes::*;

fn run(statements: impl IntoIterator<Item = ActionObject>) -> Result<Value, EngineFailure> {
    let tree = ActionTree::from_root_object(&program(statements));
    Engine::new().execute(&tree)
}

fn value_of(statements: impl IntoIterator<Item = ActionObject>) -> Value {
    run(statements).unwrap()
}

fn failure_of(statements: impl IntoIterator<Item = ActionObject>) -> EngineFailure {
    run(statements).unwrap_err()
}

#[test]
fn standard_table_covers_every_tag() {
    let table = DispatchTable::standard();
    for tag in [
        "program", "block", "expressionStatement", "empty", "literal", "identifier", "this",
        "binaryOp", "logicalOp", "unaryOp", "update", "assign", "declareVar", "declareFunction",
        "function", "return", "if", "conditional", "while", "doWhile", "for", "forIn", "forOf",
        "break", "continue", "switch", "try", "throw", "call", "member", "array", "object",
        "template", "sequence", "await",
    ] {
        assert!(table.contains(tag), "missing handler for {tag}");
    }
    assert!(!table.contains("case"));
    assert!(!table.contains("catch"));
}

#[test]
fn unknown_tag_is_malformed() {
    let err = failure_of([ActionObject::new("frobnicate")]);
    assert_eq!(err.kind, FailureKind::Malformed);
    assert_eq!(err.code(), "E7001");
    assert!(err.node.is_some());
}

#[test]
fn missing_attribute_is_malformed() {
    let err = failure_of([expr(ActionObject::new("identifier"))]);
    assert_eq!(err.kind, FailureKind::Malformed);
    assert!(err.message.contains("name"), "{}", err.message);
}

fn always_seven<'a>(
    _interp: &mut Interpreter<'a>,
    _node: &'a Action,
    _ctx: &ExecutionContext,
) -> ExecResult {
    Ok(Completion::Normal(Value::Number(7.0)))
}

#[test]
fn registered_handlers_extend_the_tag_set() {
    let mut engine = Engine::new();
    assert!(engine.register("seven", always_seven).is_none());
    let tree = ActionTree::from_root_object(&program([expr(binary(
        "*",
        ActionObject::new("seven"),
        num(6.0),
    ))]));
    assert_eq!(engine.execute(&tree).unwrap(), Value::Number(42.0));
}

#[test]
fn statement_list_value_skips_declarations() {
    let value = value_of([expr(num(1.0)), let_("x", num(2.0)), empty()]);
    assert_eq!(value, Value::Number(1.0));
}

#[test]
fn function_declarations_are_hoisted() {
    let value = value_of([
        expr(call(ident("double"), [num(21.0)])),
        function_decl("double", &["n"], [ret(binary("*", ident("n"), num(2.0)))]),
    ]);
    assert_eq!(value, Value::Number(42.0));
}

#[test]
fn block_scoped_let_shadows_outer() {
    let value = value_of([
        let_("x", num(1.0)),
        block([let_("x", num(2.0)), expr(ident("x"))]),
        expr(ident("x")),
    ]);
    assert_eq!(value, Value::Number(1.0));
}

#[test]
fn duplicate_let_in_same_scope_fails() {
    let err = failure_of([let_("x", num(1.0)), let_("x", num(2.0))]);
    assert_eq!(err.kind, FailureKind::DuplicateDeclaration);
}

#[test]
fn const_without_initializer_is_a_syntax_error() {
    let err = failure_of([declare("const", "x", None)]);
    assert_eq!(err.kind, FailureKind::SyntaxError);
}

#[test]
fn var_is_function_scoped() {
    let value = value_of([
        function_decl(
            "f",
            &[],
            [
                block([var("inner", num(5.0))]),
                ret(ident("inner")),
            ],
        ),
        expr(call(ident("f"), [])),
    ]);
    assert_eq!(value, Value::Number(5.0));
}

#[test]
fn typeof_tolerates_undeclared_names() {
    let value = value_of([expr(unary("typeof", ident("nowhere")))]);
    assert_eq!(value, Value::string("undefined"));
}

#[test]
fn reading_undeclared_name_fails() {
    let err = failure_of([expr(ident("nowhere"))]);
    assert_eq!(err.kind, FailureKind::UndefinedReference);
    assert_eq!(err.message, "nowhere is not defined");
}

#[test]
fn assigning_undeclared_name_fails() {
    let err = failure_of([expr(assign(ident("nowhere"), num(1.0)))]);
    assert_eq!(err.kind, FailureKind::UndefinedReference);
}

#[test]
fn update_prefix_and_postfix() {
    let value = value_of([
        let_("i", num(1.0)),
        let_("a", update("++", false, ident("i"))),
        let_("b", update("++", true, ident("i"))),
        expr(array([ident("a"), ident("b"), ident("i")])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::Number(1.0),
        Value::Number(3.0),
        Value::Number(3.0),
    ]);
}

#[test]
fn compound_and_logical_assignment() {
    let value = value_of([
        let_("x", num(10.0)),
        expr(assign_op("-=", ident("x"), num(4.0))),
        expr(assign_op("**=", ident("x"), num(2.0))),
        let_("y", null()),
        expr(assign_op("??=", ident("y"), string("set"))),
        let_("z", num(1.0)),
        // right side must not run
        expr(assign_op("||=", ident("z"), call(ident("nowhere"), []))),
        expr(array([ident("x"), ident("y"), ident("z")])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::Number(36.0),
        Value::string("set"),
        Value::Number(1.0),
    ]);
}

#[test]
fn const_reassignment_fails() {
    let err = failure_of([
        const_("c", num(1.0)),
        expr(assign(ident("c"), num(2.0))),
    ]);
    assert_eq!(err.kind, FailureKind::ConstAssignment);
    assert_eq!(err.code(), "E7103");
}

#[test]
fn object_literal_and_member_access() {
    let value = value_of([
        const_("o", object([("a", num(1.0)), ("b", string("two"))])),
        expr(assign(member(ident("o"), "c"), num(3.0))),
        expr(assign(index(ident("o"), string("a")), num(10.0))),
        expr(template([
            member(ident("o"), "a"),
            string("-"),
            member(ident("o"), "b"),
            string("-"),
            index(ident("o"), string("c")),
        ])),
    ]);
    assert_eq!(value, Value::string("10-two-3"));
}

#[test]
fn optional_member_on_nullish_is_undefined() {
    let value = value_of([
        let_("n", null()),
        expr(optional_member(ident("n"), "x")),
    ]);
    assert_eq!(value, Value::Undefined);
}

#[test]
fn member_of_nullish_is_a_type_error() {
    let err = failure_of([let_("n", null()), expr(member(ident("n"), "x"))]);
    assert_eq!(err.kind, FailureKind::TypeError);
}

#[test]
fn delete_removes_object_property() {
    let value = value_of([
        const_("o", object([("a", num(1.0)), ("b", num(2.0))])),
        expr(unary("delete", member(ident("o"), "a"))),
        expr(call(member(ident("Object"), "keys"), [ident("o")])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![Value::string("b")]);
}

#[test]
fn array_writes_extend_and_length_truncates() {
    let value = value_of([
        const_("a", array([num(1.0)])),
        expr(assign(index(ident("a"), num(3.0)), num(4.0))),
        let_("grown", member(ident("a"), "length")),
        expr(assign(member(ident("a"), "length"), num(2.0))),
        expr(array([ident("grown"), member(ident("a"), "length"), index(ident("a"), num(1.0))])),
    ]);
    assert_eq!(value.array_items().unwrap(), vec![
        Value::Number(4.0),
        Value::Number(2.0),
        Value::Undefined,
    ]);
}

#[test]
fn huge_array_growth_is_a_range_error() {
    let failure = failure_of([
        const_("a", array([])),
        expr(assign(member(ident("a"), "length"), num(4_294_967_295.0))),
    ]);
    assert_eq!(failure.kind, FailureKind::RangeError);

    let failure = failure_of([
        const_("a", array([])),
        expr(assign(index(ident("a"), num(4_294_967_294.0)), num(1.0))),
    ]);
    assert_eq!(failure.kind, FailureKind::RangeError);

    let value = value_of([
        const_("a", array([])),
        try_(
            [expr(assign(member(ident("a"), "length"), num(1e9)))],
            Some(catch(Some("e"), [])),
            None,
        ),
        expr(assign(member(ident("a"), "length"), num(1000.0))),
        expr(member(ident("a"), "length")),
    ]);
    assert_eq!(value, Value::Number(1000.0));
}

#[test]
fn named_function_expression_sees_itself() {
    let fact = ActionObject::new("function")
        .attr("name", "fact")
        .child(param("n"))
        .child(
            block([ret(conditional(
                binary("<=", ident("n"), num(1.0)),
                num(1.0),
                binary("*", ident("n"), call(ident("fact"), [binary("-", ident("n"), num(1.0))])),
            ))])
            .role("body"),
        );
    let value = value_of([const_("f", fact), expr(call(ident("f"), [num(5.0)]))]);
    assert_eq!(value, Value::Number(120.0));
}

#[test]
fn anonymous_functions_take_the_binding_name() {
    let value = value_of([
        const_("greet", function(&[], [])),
        expr(member(ident("greet"), "name")),
    ]);
    assert_eq!(value, Value::string("greet"));
}

#[test]
fn default_and_rest_parameters() {
    let f = function_with(
        [param_default("a", num(10.0)), rest_param("others")],
        [ret(array([ident("a"), member(ident("others"), "length")]))],
    );
    let value = value_of([
        const_("f", f),
        expr(array([
            call(ident("f"), []),
            call(ident("f"), [num(1.0), num(2.0), num(3.0)]),
        ])),
    ]);
    let results: Vec<Vec<Value>> = value
        .array_items()
        .unwrap()
        .iter()
        .map(|v| v.array_items().unwrap())
        .collect();
    assert_eq!(results, vec![
        vec![Value::Number(10.0), Value::Number(0.0)],
        vec![Value::Number(1.0), Value::Number(2.0)],
    ]);
}

#[test]
fn arguments_holds_every_argument() {
    let value = value_of([
        function_decl("count", &[], [ret(member(ident("arguments"), "length"))]),
        expr(call(ident("count"), [num(1.0), num(2.0), num(3.0)])),
    ]);
    assert_eq!(value, Value::Number(3.0));
}

#[test]
fn method_calls_bind_this() {
    let value = value_of([
        const_(
            "counter",
            object([
                ("count", num(0.0)),
                (
                    "bump",
                    function(&[], [
                        expr(update("++", true, member(this(), "count"))),
                        ret(this()),
                    ]),
                ),
            ]),
        ),
        expr(method_call(method_call(ident("counter"), "bump", []), "bump", [])),
        expr(member(ident("counter"), "count")),
    ]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn arrows_take_this_from_their_definition() {
    let value = value_of([
        const_(
            "holder",
            object([
                ("tag", string("outer")),
                (
                    "read",
                    function(&[], [ret(call(arrow(&[], member(this(), "tag")), []))]),
                ),
            ]),
        ),
        expr(method_call(ident("holder"), "read", [])),
    ]);
    assert_eq!(value, Value::string("outer"));
}

#[test]
fn calling_a_non_function_names_the_callee() {
    let err = failure_of([
        const_("o", object([("x", num(1.0))])),
        expr(method_call(ident("o"), "x", [])),
    ]);
    assert_eq!(err.kind, FailureKind::TypeError);
    assert!(err.message.contains("o.x"), "{}", err.message);
}

#[test]
fn optional_call_on_missing_method_is_undefined() {
    let value = value_of([
        const_("o", object([])),
        expr(call(member(ident("o"), "missing"), []).attr("optional", true)),
    ]);
    assert_eq!(value, Value::Undefined);
}

#[test]
fn sequence_and_await_yield_values() {
    let value = value_of([expr(sequence([
        num(1.0),
        ActionObject::new("await").child(num(2.0)),
    ]))]);
    assert_eq!(value, Value::Number(2.0));
}

#[test]
fn top_level_break_is_malformed() {
    let err = failure_of([brk()]);
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[test]
fn role_and_positional_slots() {
    let tree = ActionTree::from_root_object(&if_(boolean(true), num(1.0), Some(num(2.0))));
    let dispatch = DispatchTable::standard();
    let config = EngineConfig::default();
    let mut rng = Rng::new(1);
    let stack = crate::environment::LocalScope::new(crate::environment::CallStack::new(8));
    let interp = Interpreter::new(&tree, &dispatch, &config, &mut rng, crate::effects::shared_effect_log(), stack);
    let root = tree.root_node();
    let then = interp.role_child(root, "then").unwrap();
    assert_eq!(interp.slot(root, "else", 0), interp.role_child(root, "else"));
    assert_eq!(interp.node(then).unwrap().attr_number("value"), Some(1.0));
    assert!(interp.role_child(root, "missing").is_none());
    assert_eq!(interp.slot(root, "missing", 0), Some(root.children()[0]));
    assert_eq!(interp.children_without_role(root, "condition").len(), 2);
}
