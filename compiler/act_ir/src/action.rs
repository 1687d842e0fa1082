//! The `Action` node.

use crate::{ActionId, AttrValue};

/// Default spacing between sibling sequence numbers.
///
/// Leaves room to insert a sibling between two existing ones without
/// renumbering.
pub const SEQUENCE_STEP: i64 = 10;

/// One IR node: a tag, ordered attributes and ordered children.
///
/// Structure (children, parent, sequence number) is only changed through
/// [`ActionTree`](crate::ActionTree) so its invariants hold: at most one
/// parent per node and no node is its own ancestor.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    id: ActionId,
    action_type: String,
    attributes: Vec<(String, AttrValue)>,
    pub(crate) children: Vec<ActionId>,
    pub(crate) parent: Option<ActionId>,
    pub(crate) sequence_number: i64,
}

impl Action {
    pub(crate) fn new(id: ActionId, action_type: impl Into<String>) -> Self {
        Action {
            id,
            action_type: action_type.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
            sequence_number: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// The tag selecting this node's semantics (`"if"`, `"binaryOp"`, ...).
    #[inline]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    #[inline]
    pub fn children(&self) -> &[ActionId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<ActionId> {
        self.parent
    }

    #[inline]
    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Read an attribute. Absent attributes read as `None`.
    pub fn get_attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Write an attribute. Overwriting keeps the attribute's original position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == name)
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// String attribute shorthand.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.get_attribute(name).and_then(AttrValue::as_str)
    }

    /// Number attribute shorthand.
    pub fn attr_number(&self, name: &str) -> Option<f64> {
        self.get_attribute(name).and_then(AttrValue::as_number)
    }

    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.get_attribute(name).and_then(AttrValue::as_bool)
    }

    /// Boolean attribute shorthand; absent flags read as `false`.
    pub fn attr_flag(&self, name: &str) -> bool {
        self.attr_bool(name).unwrap_or(false)
    }

    /// The `role` attribute distinguishing this node among its siblings.
    pub fn role(&self) -> Option<&str> {
        self.attr_str("role")
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests;
