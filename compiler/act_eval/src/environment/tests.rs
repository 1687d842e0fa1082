#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::value::Value;

fn n(value: f64) -> Value {
    Value::Number(value)
}

fn root() -> ExecutionContext {
    ExecutionContext::with_max_depth(16)
}

#[test]
fn scope_push_rejects_duplicates_except_for_functions() {
    let mut vars = Scope::new(ScopeKind::Variable);
    vars.push("x", n(1.0)).unwrap();
    assert_eq!(
        vars.push("x", n(2.0)),
        Err(ScopeError::DuplicateDeclaration("x".to_string()))
    );

    let mut functions = Scope::new(ScopeKind::Function);
    functions.push("f", n(1.0)).unwrap();
    functions.push("f", n(2.0)).unwrap();
    assert_eq!(functions.get("f").unwrap(), n(2.0));
}

#[test]
fn scope_chain_resolution_and_update() {
    let parent = LocalScope::new(Scope::new(ScopeKind::Variable));
    parent.borrow_mut().push("x", n(1.0)).unwrap();
    let child = parent.create_child_scope();
    assert_eq!(child.borrow().kind(), ScopeKind::Variable);
    assert!(child.borrow().has("x"));
    assert!(!child.borrow().has_local("x"));

    assert_eq!(child.borrow_mut().update("x", n(5.0)), Ok(true));
    assert_eq!(parent.borrow().get_local("x"), Some(n(5.0)));
    assert_eq!(child.borrow_mut().update("y", n(1.0)), Ok(false));
    assert_eq!(
        child.borrow().get("y"),
        Err(ScopeError::UndefinedReference("y".to_string()))
    );
}

#[test]
fn constant_scope_refuses_updates() {
    let mut consts = Scope::new(ScopeKind::Constant);
    consts.push("k", n(1.0)).unwrap();
    assert_eq!(
        consts.update("k", n(2.0)),
        Err(ScopeError::ConstAssignment("k".to_string()))
    );
    assert!(consts.delete("k"));
    assert!(consts.is_empty());
}

#[test]
fn let_and_const_reject_redeclaration_in_one_context() {
    let ctx = root();
    ctx.declare(DeclarationKind::Let, "a", Some(n(1.0))).unwrap();
    assert!(ctx.declare(DeclarationKind::Const, "a", Some(n(2.0))).is_err());
    ctx.declare_function("f", n(0.0));
    assert_eq!(
        ctx.declare(DeclarationKind::Let, "f", None),
        Err(ScopeError::DuplicateDeclaration("f".to_string()))
    );
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    let outer = root();
    outer.declare(DeclarationKind::Const, "x", Some(n(1.0))).unwrap();
    let inner = outer.create_child_context();
    inner.declare(DeclarationKind::Let, "x", Some(n(2.0))).unwrap();

    assert_eq!(inner.get("x").unwrap(), n(2.0));
    inner.assign("x", n(3.0)).unwrap();
    assert_eq!(inner.get("x").unwrap(), n(3.0));
    assert_eq!(outer.get("x").unwrap(), n(1.0));
    assert_eq!(
        outer.assign("x", n(4.0)),
        Err(ScopeError::ConstAssignment("x".to_string()))
    );
}

#[test]
fn assign_requires_a_binding() {
    let ctx = root().create_child_context();
    assert_eq!(
        ctx.assign("ghost", n(1.0)),
        Err(ScopeError::UndefinedReference("ghost".to_string()))
    );
    assert!(!ctx.has("ghost"));
}

#[test]
fn var_lands_in_the_function_frame() {
    let program = root();
    let function = program.create_function_context(Value::Undefined);
    let block = function.create_child_context();

    block.declare(DeclarationKind::Var, "v", Some(n(1.0))).unwrap();
    assert!(!block.has_local("v"));
    assert!(function.has_local("v"));
    assert!(!program.has("v"));

    // Redeclaring without an initializer keeps the value.
    block.declare(DeclarationKind::Var, "v", None).unwrap();
    assert_eq!(function.get("v").unwrap(), n(1.0));
}

#[test]
fn this_is_rebound_only_by_function_contexts() {
    let ctx = root().create_function_context(n(7.0));
    assert_eq!(ctx.create_child_context().this_value(), n(7.0));
    assert_eq!(ctx.create_function_context(n(8.0)).this_value(), n(8.0));
}

#[test]
fn contexts_share_one_call_stack() {
    let ctx = root();
    let child = ctx.create_child_context().create_function_context(Value::Undefined);
    child
        .call_stack()
        .borrow_mut()
        .push(CallFrame::new("f", &[n(1.0)], None))
        .unwrap();
    assert_eq!(ctx.call_depth(), 1);
    assert_eq!(ctx.call_stack().borrow().current_frame().unwrap().name, "f");
}

#[test]
fn call_stack_enforces_its_limit() {
    let mut stack = CallStack::new(2);
    stack.push(CallFrame::new("a", &[], None)).unwrap();
    stack.push(CallFrame::new("b", &[], None)).unwrap();
    let err = stack.push(CallFrame::new("c", &[], None)).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 2 });
    assert_eq!(stack.depth(), 2);

    let names: Vec<String> = stack
        .capture()
        .frames()
        .iter()
        .map(|frame| frame.name.clone())
        .collect();
    assert_eq!(names, vec!["b", "a"]);

    stack.clear();
    assert!(stack.is_empty());
}

#[test]
fn declaration_keywords() {
    assert_eq!(DeclarationKind::parse("let"), Some(DeclarationKind::Let));
    assert_eq!(DeclarationKind::parse("var"), Some(DeclarationKind::Var));
    assert_eq!(DeclarationKind::parse("static"), None);
    assert_eq!(DeclarationKind::Const.as_str(), "const");
}

#[test]
fn local_scope_identity() {
    let a = LocalScope::new(1);
    let b = a.clone();
    *b.borrow_mut() += 1;
    assert_eq!(*a.borrow(), 2);
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&LocalScope::new(2)));
    assert_eq!(a.addr(), b.addr());
}
