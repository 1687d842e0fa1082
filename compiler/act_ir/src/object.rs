//! Structural object form of a tree.
//!
//! This is the contract a serializer is built against: it round-trips
//! action types, attributes, child order, sequence numbers and the type
//! registries, and says nothing about any particular wire format. With the
//! `serde` feature it also has a pretty-printed JSON text form, which is
//! line-oriented and diffs well.
//!
//! Ids are not part of the object form; rebuilding always draws fresh ids.

use crate::tree::TreeMetadata;
use crate::{Action, ActionId, ActionTree, AttrValue, TreeError, SCHEMA_VERSION};

/// Detached description of one node and its subtree.
///
/// Also serves as a builder for front-ends and tests:
///
/// ```
/// use act_ir::{ActionObject, ActionTree};
///
/// let sum = ActionObject::new("binaryOp")
///     .attr("operator", "+")
///     .child(ActionObject::new("literal").attr("value", 1))
///     .child(ActionObject::new("literal").attr("value", 2));
/// let mut tree = ActionTree::new("program");
/// let id = tree.insert_object(&sum);
/// assert_eq!(tree.get(id).map(|n| n.children().len()), Some(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionObject {
    pub action_type: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub attributes: Vec<(String, AttrValue)>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sequence_number: Option<i64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<ActionObject>,
}

impl ActionObject {
    pub fn new(action_type: impl Into<String>) -> Self {
        ActionObject {
            action_type: action_type.into(),
            attributes: Vec::new(),
            sequence_number: None,
            children: Vec::new(),
        }
    }

    /// Set an attribute (overwriting keeps position).
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
        self
    }

    /// Shorthand for `attr("role", role)`.
    #[must_use]
    pub fn role(self, role: &str) -> Self {
        self.attr("role", role)
    }

    #[must_use]
    pub fn sequence(mut self, sequence: i64) -> Self {
        self.sequence_number = Some(sequence);
        self
    }

    #[must_use]
    pub fn child(mut self, child: ActionObject) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ActionObject>) -> Self {
        self.children.extend(children);
        self
    }

    /// Total node count of this subtree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(object) = pending.pop() {
            count += 1;
            pending.extend(&object.children);
        }
        count
    }
}

/// Deep subtrees are torn down with a work list rather than nested drops.
impl Drop for ActionObject {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut object) = pending.pop() {
            pending.append(&mut object.children);
        }
    }
}

fn shallow_object(node: &Action) -> ActionObject {
    ActionObject {
        action_type: node.action_type().to_string(),
        attributes: node
            .attributes()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        sequence_number: Some(node.sequence_number()),
        children: Vec::new(),
    }
}

/// Object form of a whole tree: root subtree, registries and metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeObject {
    pub schema_version: u32,
    pub created_at_ms: u64,
    pub modified_at_ms: u64,
    pub data_types: Vec<String>,
    pub action_types: Vec<String>,
    pub attribute_types: Vec<(String, String)>,
    pub root: ActionObject,
}

impl ActionTree {
    /// Object form of the subtree at `id`, or `None` for an unknown id.
    pub fn subtree_object(&self, id: ActionId) -> Option<ActionObject> {
        let root = self.get(id)?;
        // Each frame is a node, the index of its next child, and its object
        // with the children finished so far.
        let mut frames = vec![(root, 0, shallow_object(root))];
        loop {
            let next_child = {
                let (node, next, _) = frames.last_mut()?;
                let child = node.children().get(*next).copied();
                *next += 1;
                child
            };
            if let Some(child) = next_child {
                if let Some(node) = self.get(child) {
                    frames.push((node, 0, shallow_object(node)));
                }
                continue;
            }
            let (_, _, finished) = frames.pop()?;
            match frames.last_mut() {
                Some((_, _, parent)) => parent.children.push(finished),
                None => return Some(finished),
            }
        }
    }

    /// Build a detached subtree from its object form, returning its root id.
    ///
    /// Tags and attribute types encountered are added to the registries.
    pub fn insert_object(&mut self, object: &ActionObject) -> ActionId {
        let id = self.create_with(
            &object.action_type,
            object.attributes.iter().map(|(k, v)| (k.clone(), v.clone())),
        );
        self.insert_children(id, object);
        id
    }

    /// Create and attach `object`'s descendants under `parent`, in pre-order.
    pub(crate) fn insert_children(&mut self, parent: ActionId, object: &ActionObject) {
        let mut pending: Vec<(ActionId, &ActionObject)> =
            object.children.iter().rev().map(|child| (parent, child)).collect();
        while let Some((parent, object)) = pending.pop() {
            let id = self.create_with(
                &object.action_type,
                object.attributes.iter().map(|(k, v)| (k.clone(), v.clone())),
            );
            // The node was just created detached, so it cannot be an ancestor.
            let _ = self.add_child(parent, id, object.sequence_number);
            pending.extend(object.children.iter().rev().map(|child| (id, child)));
        }
    }

    /// Object form of the whole tree.
    pub fn to_object(&self) -> TreeObject {
        let metadata = self.metadata();
        TreeObject {
            schema_version: metadata.schema_version,
            created_at_ms: metadata.created_at_ms,
            modified_at_ms: metadata.modified_at_ms,
            data_types: self.data_types().iter().cloned().collect(),
            action_types: self.action_types().iter().cloned().collect(),
            attribute_types: self
                .attribute_types()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            root: self
                .subtree_object(self.root())
                .unwrap_or_else(|| ActionObject::new(self.root_node().action_type())),
        }
    }

    /// Rebuild a tree from its object form with fresh ids.
    pub fn from_object(object: &TreeObject) -> Result<ActionTree, TreeError> {
        if object.schema_version > SCHEMA_VERSION {
            return Err(TreeError::UnsupportedSchema {
                found: object.schema_version,
            });
        }
        let mut tree = ActionTree::new(&object.root.action_type);
        for data_type in &object.data_types {
            tree.declare_data_type(data_type.clone());
        }
        for tag in &object.action_types {
            tree.declare_action_type(tag.clone());
        }
        for (name, data_type) in &object.attribute_types {
            tree.declare_attribute(name.clone(), data_type.clone());
        }
        tree.fill_root(&object.root);
        tree.restore_metadata(TreeMetadata {
            schema_version: object.schema_version,
            created_at_ms: object.created_at_ms,
            modified_at_ms: object.modified_at_ms,
        });
        Ok(tree)
    }

    /// Build a tree whose root is `root` (the root's own tag is kept).
    pub fn from_root_object(root: &ActionObject) -> ActionTree {
        let mut tree = ActionTree::new(&root.action_type);
        tree.fill_root(root);
        tree
    }
}

#[cfg(feature = "serde")]
impl ActionTree {
    /// Pretty-printed JSON text form.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_object())
    }

    /// Parse the text form produced by [`to_text`](Self::to_text).
    pub fn from_text(text: &str) -> Result<ActionTree, TextError> {
        let object: TreeObject = serde_json::from_str(text)?;
        Ok(ActionTree::from_object(&object)?)
    }
}

/// Failure reading the text form.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("malformed tree text: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error(transparent)]
    Tree(#[from] TreeError),
}
