//! Binding an external object graph and driving deferred callbacks.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::cell::RefCell;
use std::rc::Rc;

use act_eval::nodes::*;
use act_eval::{
    type_error, EffectKind, Engine, EvalError, EvalResult, FailureKind, HostCallbacks, HostObject,
    Value,
};
use act_ir::ActionTree;
use pretty_assertions::assert_eq;

/// Timers registered by script code; they fire only when the test ticks.
#[derive(Default)]
struct Window {
    pending: RefCell<Vec<(f64, Value)>>,
}

impl Window {
    fn take_due(&self) -> Vec<Value> {
        let mut due = self.pending.take();
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, callback)| callback).collect()
    }
}

impl HostObject for Window {
    fn class_name(&self) -> &str {
        "Window"
    }

    fn call_method(&self, method: &str, args: &[Value], host: &mut dyn HostCallbacks) -> EvalResult {
        match method {
            "setTimeout" => {
                let callback = args.first().cloned().unwrap_or_default();
                if !callback.is_callable() {
                    return Err(type_error("setTimeout callback is not a function"));
                }
                let delay = args.get(1).and_then(Value::as_number).unwrap_or(0.0);
                let mut pending = self.pending.borrow_mut();
                pending.push((delay, callback));
                host.record("window", format!("setTimeout {delay}"));
                Ok(Value::Number(pending.len() as f64))
            }
            "run" => {
                // Synchronous re-entry into the engine.
                let callback = args.first().cloned().unwrap_or_default();
                host.call(&callback, &args[1..])
            }
            _ => Err(type_error(format!("window.{method} is not a function"))),
        }
    }
}

#[derive(Default)]
struct Document {
    title: RefCell<String>,
}

impl HostObject for Document {
    fn class_name(&self) -> &str {
        "Document"
    }

    fn get(&self, property: &str) -> Value {
        match property {
            "title" => Value::string(self.title.borrow().as_str()),
            _ => Value::Undefined,
        }
    }

    fn set(&self, property: &str, value: Value) -> Result<(), EvalError> {
        match property {
            "title" => {
                *self.title.borrow_mut() = value.to_string();
                Ok(())
            }
            _ => Err(type_error(format!("Cannot set property '{property}' of Document"))),
        }
    }

    fn keys(&self) -> Vec<String> {
        vec!["title".to_string()]
    }
}

fn bound_engine(window: &Rc<Window>, document: &Rc<Document>) -> Engine {
    let window: Rc<dyn HostObject> = window.clone();
    let document: Rc<dyn HostObject> = document.clone();
    Engine::builder()
        .environment(&vec![
            ("window".to_string(), Value::host(window)),
            ("document".to_string(), Value::host(document)),
        ])
        .build()
}

#[test]
fn timers_fire_only_when_ticked() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);

    let tree = ActionTree::from_root_object(&program([
        let_("ticks", array([])),
        expr(method_call(ident("window"), "setTimeout", [
            arrow(&[], method_call(ident("ticks"), "push", [string("late")])),
            num(50.0),
        ])),
        expr(method_call(ident("window"), "setTimeout", [
            arrow(&[], method_call(ident("ticks"), "push", [string("early")])),
            num(10.0),
        ])),
        expr(arrow(&[], method_call(ident("ticks"), "join", [string(",")]))),
    ]));
    let read_ticks = engine.execute(&tree).unwrap();
    assert_eq!(engine.invoke(&tree, &read_ticks, &[]).unwrap(), Value::string(""));

    for callback in window.take_due() {
        engine.invoke(&tree, &callback, &[]).unwrap();
    }
    assert_eq!(
        engine.invoke(&tree, &read_ticks, &[]).unwrap(),
        Value::string("early,late")
    );

    let host_records: Vec<String> = engine
        .effects()
        .into_iter()
        .filter(|r| r.kind == EffectKind::Host)
        .map(|r| format!("{}: {}", r.target, r.message))
        .collect();
    assert_eq!(host_records, vec!["window: setTimeout 50", "window: setTimeout 10"]);
}

#[test]
fn host_errors_are_catchable() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);
    let tree = ActionTree::from_root_object(&program([try_(
        [expr(method_call(ident("window"), "setTimeout", [num(1.0)]))],
        Some(catch(Some("e"), [expr(member(ident("e"), "name"))])),
        None,
    )]));
    assert_eq!(engine.execute(&tree).unwrap(), Value::string("TypeError"));
    assert!(window.pending.borrow().is_empty());
}

#[test]
fn host_methods_can_call_back_into_scripts() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);
    let tree = ActionTree::from_root_object(&program([expr(method_call(ident("window"), "run", [
        arrow(&["a", "b"], binary("*", ident("a"), ident("b"))),
        num(6.0),
        num(7.0),
    ]))]));
    assert_eq!(engine.execute(&tree).unwrap(), Value::Number(42.0));
}

#[test]
fn host_properties_read_and_write() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);
    let tree = ActionTree::from_root_object(&program([
        expr(assign(member(ident("document"), "title"), string("Hello"))),
        let_("keys", string("")),
        for_in("const", "k", ident("document"), expr(assign_op("+=", ident("keys"), ident("k")))),
        expr(array([
            binary("+", member(ident("document"), "title"), string("!")),
            member(ident("document"), "missing"),
            ident("keys"),
            binary("in", string("title"), ident("document")),
            unary("typeof", ident("document")),
        ])),
    ]));
    let value = engine.execute(&tree).unwrap();
    assert_eq!(value.array_items().unwrap(), vec![
        Value::string("Hello!"),
        Value::Undefined,
        Value::string("title"),
        Value::Bool(true),
        Value::string("object"),
    ]);
    assert_eq!(document.title.borrow().as_str(), "Hello");
}

#[test]
fn writing_an_unknown_host_property_fails() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);
    let tree = ActionTree::from_root_object(&program([expr(assign(
        member(ident("document"), "body"),
        num(1.0),
    ))]));
    let err = engine.execute(&tree).unwrap_err();
    assert_eq!(err.kind, FailureKind::TypeError);
}

#[test]
fn environment_globals_are_constants() {
    let window = Rc::new(Window::default());
    let document = Rc::new(Document::default());
    let mut engine = bound_engine(&window, &document);
    let tree = ActionTree::from_root_object(&program([expr(assign(ident("window"), null()))]));
    assert_eq!(engine.execute(&tree).unwrap_err().kind, FailureKind::ConstAssignment);
}
