//! Property tests for scope resolution and arithmetic.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use act_eval::nodes::*;
use act_eval::{DeclarationKind, Engine, ExecutionContext, Value};
use act_ir::ActionTree;
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    #[test]
    fn shadowing_never_leaks_into_the_parent(name in name(), outer in any::<i32>(), inner in any::<i32>()) {
        let parent = ExecutionContext::with_max_depth(8);
        parent.declare(DeclarationKind::Let, &name, Some(Value::from(outer))).unwrap();
        let child = parent.create_child_context();
        child.declare(DeclarationKind::Let, &name, Some(Value::from(inner))).unwrap();

        prop_assert_eq!(child.get(&name).unwrap(), Value::from(inner));
        prop_assert_eq!(parent.get(&name).unwrap(), Value::from(outer));
    }

    #[test]
    fn updates_reach_the_nearest_frame(name in name(), first in any::<i32>(), second in any::<i32>()) {
        let parent = ExecutionContext::with_max_depth(8);
        parent.declare(DeclarationKind::Let, &name, Some(Value::from(first))).unwrap();
        let child = parent.create_child_context().create_child_context();
        child.assign(&name, Value::from(second)).unwrap();
        prop_assert_eq!(parent.get(&name).unwrap(), Value::from(second));
    }

    #[test]
    fn redeclaring_in_one_frame_always_fails(name in name()) {
        let ctx = ExecutionContext::with_max_depth(8);
        ctx.declare(DeclarationKind::Let, &name, None).unwrap();
        prop_assert!(ctx.declare(DeclarationKind::Let, &name, None).is_err());
        prop_assert!(ctx.declare(DeclarationKind::Const, &name, None).is_err());
    }

    #[test]
    fn integer_arithmetic_matches_f64(a in -10_000i32..10_000, b in -10_000i32..10_000) {
        let (x, y) = (f64::from(a), f64::from(b));
        let tree = ActionTree::from_root_object(&program([expr(array([
            binary("+", num(x), num(y)),
            binary("-", num(x), num(y)),
            binary("*", num(x), num(y)),
        ]))]));
        let value = Engine::new().execute(&tree).unwrap();
        prop_assert_eq!(
            value.array_items().unwrap(),
            vec![Value::Number(x + y), Value::Number(x - y), Value::Number(x * y)]
        );
    }

    #[test]
    fn loop_sum_matches_closed_form(n in 0u32..200) {
        let tree = ActionTree::from_root_object(&program([
            let_("sum", num(0.0)),
            for_(
                Some(let_("i", num(0.0))),
                Some(binary("<", ident("i"), num(f64::from(n)))),
                Some(update("++", false, ident("i"))),
                expr(assign_op("+=", ident("sum"), ident("i"))),
            ),
            expr(ident("sum")),
        ]));
        let expected = f64::from(n) * (f64::from(n) - 1.0) / 2.0;
        prop_assert_eq!(Engine::new().execute(&tree).unwrap(), Value::Number(expected));
    }
}
