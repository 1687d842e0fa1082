use super::*;
use pretty_assertions::assert_eq;

fn node() -> Action {
    Action::new(ActionId::new(1), "binaryOp")
}

#[test]
fn missing_attribute_reads_as_none() {
    let action = node();
    assert_eq!(action.get_attribute("operator"), None);
    assert!(!action.has_attribute("operator"));
    assert!(!action.attr_flag("prefix"));
}

#[test]
fn bool_accessor_ignores_other_types() {
    let mut action = node();
    action.set_attribute("prefix", true);
    action.set_attribute("operator", "++");
    assert_eq!(action.attr_bool("prefix"), Some(true));
    assert_eq!(action.attr_bool("operator"), None);
    assert!(action.attr_flag("prefix"));
}

#[test]
fn overwrite_keeps_position() {
    let mut action = node();
    action.set_attribute("operator", "+");
    action.set_attribute("role", "init");
    action.set_attribute("operator", "-");

    let names: Vec<_> = action.attributes().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["operator", "role"]);
    assert_eq!(action.attr_str("operator"), Some("-"));
    assert_eq!(action.role(), Some("init"));
}

#[test]
fn remove_attribute_returns_value() {
    let mut action = node();
    action.set_attribute("value", 3);
    assert_eq!(action.remove_attribute("value"), Some(AttrValue::Number(3.0)));
    assert_eq!(action.remove_attribute("value"), None);
    assert_eq!(action.attribute_count(), 0);
}

#[test]
fn fresh_node_is_detached_leaf() {
    let action = node();
    assert!(action.is_leaf());
    assert_eq!(action.parent(), None);
    assert_eq!(action.action_type(), "binaryOp");
}
