//! The owning container for one Action tree.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use rustc_hash::FxHashMap;

use crate::action::SEQUENCE_STEP;
use crate::{Action, ActionId, AttrValue, IdGenerator, TreeId};

/// Version of the tree layout written into [`TreeMetadata`].
pub const SCHEMA_VERSION: u32 = 1;

/// Structural failure while editing a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("unknown node {0}")]
    UnknownNode(ActionId),
    #[error("node {child} is already attached to {parent}")]
    AlreadyAttached { child: ActionId, parent: ActionId },
    #[error("the root node {0} cannot become a child")]
    CannotAttachRoot(ActionId),
    #[error("attaching {child} under {parent} would make a node its own ancestor")]
    WouldCreateCycle { parent: ActionId, child: ActionId },
    #[error("unsupported schema version {found} (newest known is {SCHEMA_VERSION})")]
    UnsupportedSchema { found: u32 },
}

/// Bookkeeping carried alongside the nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeMetadata {
    pub schema_version: u32,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Milliseconds since the Unix epoch; bumped on every structural edit.
    pub modified_at_ms: u64,
}

impl TreeMetadata {
    fn now() -> Self {
        let now = now_ms();
        TreeMetadata {
            schema_version: SCHEMA_VERSION,
            created_at_ms: now,
            modified_at_ms: now,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Owns one root [`Action`] and, transitively, every descendant.
///
/// Nodes created with [`create`](Self::create) start detached; they become
/// part of the tree proper once attached under the root. Detached nodes are
/// dropped together with the tree.
#[derive(Debug)]
pub struct ActionTree {
    identity: TreeId,
    root: ActionId,
    nodes: FxHashMap<ActionId, Action>,
    ids: IdGenerator,
    data_types: BTreeSet<String>,
    action_types: BTreeSet<String>,
    attribute_types: BTreeMap<String, String>,
    metadata: TreeMetadata,
}

/// Same nodes and ids under a new [`TreeId`].
impl Clone for ActionTree {
    fn clone(&self) -> Self {
        ActionTree {
            identity: TreeId::fresh(),
            root: self.root,
            nodes: self.nodes.clone(),
            ids: self.ids.clone(),
            data_types: self.data_types.clone(),
            action_types: self.action_types.clone(),
            attribute_types: self.attribute_types.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl ActionTree {
    /// Create a tree whose root has the given tag (conventionally `"program"`).
    pub fn new(root_type: &str) -> Self {
        Self::with_generator(root_type, IdGenerator::new())
    }

    /// Create a tree drawing ids from `ids`.
    pub fn with_generator(root_type: &str, mut ids: IdGenerator) -> Self {
        let root = ids.next_id();
        let mut nodes = FxHashMap::default();
        nodes.insert(root, Action::new(root, root_type));
        let mut action_types = BTreeSet::new();
        action_types.insert(root_type.to_string());
        ActionTree {
            identity: TreeId::fresh(),
            root,
            nodes,
            ids,
            data_types: BTreeSet::new(),
            action_types,
            attribute_types: BTreeMap::new(),
            metadata: TreeMetadata::now(),
        }
    }

    /// This tree's identity. Clones get a new one.
    #[inline]
    pub fn identity(&self) -> TreeId {
        self.identity
    }

    #[inline]
    pub fn root(&self) -> ActionId {
        self.root
    }

    /// The root node. Always present.
    pub fn root_node(&self) -> &Action {
        &self.nodes[&self.root]
    }

    #[inline]
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes owned, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn metadata(&self) -> &TreeMetadata {
        &self.metadata
    }

    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn data_types(&self) -> &BTreeSet<String> {
        &self.data_types
    }

    pub fn action_types(&self) -> &BTreeSet<String> {
        &self.action_types
    }

    pub fn attribute_types(&self) -> &BTreeMap<String, String> {
        &self.attribute_types
    }

    pub fn declare_data_type(&mut self, name: impl Into<String>) {
        self.data_types.insert(name.into());
    }

    pub fn declare_action_type(&mut self, tag: impl Into<String>) {
        self.action_types.insert(tag.into());
    }

    /// Declare the data type of an attribute name (also registers the type).
    pub fn declare_attribute(&mut self, name: impl Into<String>, data_type: impl Into<String>) {
        let data_type = data_type.into();
        self.data_types.insert(data_type.clone());
        self.attribute_types.insert(name.into(), data_type);
    }

    pub(crate) fn restore_metadata(&mut self, metadata: TreeMetadata) {
        self.metadata = metadata;
    }

    fn touch(&mut self) {
        self.metadata.modified_at_ms = now_ms().max(self.metadata.modified_at_ms);
    }

    fn note_attribute(&mut self, name: &str, value: &AttrValue) {
        if !self.attribute_types.contains_key(name) {
            self.declare_attribute(name, value.data_type());
        }
    }

    /// Create a detached node.
    pub fn create(&mut self, action_type: &str) -> ActionId {
        let id = self.ids.next_id();
        self.nodes.insert(id, Action::new(id, action_type));
        if !self.action_types.contains(action_type) {
            self.action_types.insert(action_type.to_string());
        }
        self.touch();
        id
    }

    /// Create a detached node with attributes.
    pub fn create_with<I, K, V>(&mut self, action_type: &str, attributes: I) -> ActionId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let id = self.create(action_type);
        for (name, value) in attributes {
            let name = name.into();
            let value = value.into();
            self.note_attribute(&name, &value);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.set_attribute(name, value);
            }
        }
        id
    }

    /// Write an attribute on a node, registering its data type on first sight.
    pub fn set_attribute(
        &mut self,
        id: ActionId,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<(), TreeError> {
        let value = value.into();
        if !self.nodes.contains_key(&id) {
            return Err(TreeError::UnknownNode(id));
        }
        self.note_attribute(name, &value);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_attribute(name, value);
        }
        self.touch();
        Ok(())
    }

    /// Remove an attribute from a node.
    pub fn remove_attribute(&mut self, id: ActionId, name: &str) -> Option<AttrValue> {
        let removed = self.nodes.get_mut(&id)?.remove_attribute(name);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Whether `ancestor` is `node` or lies on `node`'s parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: ActionId, node: ActionId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(Action::parent);
        }
        false
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: ActionId) -> bool {
        self.nodes.contains_key(&id) && self.is_ancestor_or_self(self.root, id)
    }

    /// Attach `child` under `parent`.
    ///
    /// Without an explicit `sequence` the child is appended with the last
    /// sibling's sequence plus [`SEQUENCE_STEP`]. With one, it is inserted
    /// before the first sibling carrying a larger sequence number.
    pub fn add_child(
        &mut self,
        parent: ActionId,
        child: ActionId,
        sequence: Option<i64>,
    ) -> Result<(), TreeError> {
        let parent_node = self.nodes.get(&parent).ok_or(TreeError::UnknownNode(parent))?;
        let child_node = self.nodes.get(&child).ok_or(TreeError::UnknownNode(child))?;
        if child == self.root {
            return Err(TreeError::CannotAttachRoot(child));
        }
        if let Some(existing) = child_node.parent() {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::WouldCreateCycle { parent, child });
        }

        let siblings = parent_node.children();
        let (seq, position) = match sequence {
            Some(seq) => {
                let position = siblings
                    .iter()
                    .position(|id| self.nodes.get(id).is_some_and(|n| n.sequence_number > seq))
                    .unwrap_or(siblings.len());
                (seq, position)
            }
            None => {
                let last = siblings
                    .last()
                    .and_then(|id| self.nodes.get(id))
                    .map_or(0, Action::sequence_number);
                (last.saturating_add(SEQUENCE_STEP), siblings.len())
            }
        };

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.sequence_number = seq;
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.insert(position, child);
        }
        self.touch();
        Ok(())
    }

    /// Create a node and append it under `parent` in one step.
    pub fn append(&mut self, parent: ActionId, action_type: &str) -> Result<ActionId, TreeError> {
        if !self.nodes.contains_key(&parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = self.create(action_type);
        self.add_child(parent, id, None)?;
        Ok(id)
    }

    /// Detach `child` from `parent`. Returns whether it was a child of `parent`.
    pub fn remove_child(&mut self, parent: ActionId, child: ActionId) -> bool {
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return false;
        };
        let Some(pos) = parent_node.children.iter().position(|c| *c == child) else {
            return false;
        };
        parent_node.children.remove(pos);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
        self.touch();
        true
    }

    /// Detach `child` from whatever parent holds it.
    pub fn detach(&mut self, child: ActionId) -> bool {
        match self.nodes.get(&child).and_then(Action::parent) {
            Some(parent) => self.remove_child(parent, child),
            None => false,
        }
    }

    /// Exact-id lookup among nodes attached under the root.
    pub fn find_by_id(&self, id: ActionId) -> Option<&Action> {
        if self.is_attached(id) {
            self.nodes.get(&id)
        } else {
            None
        }
    }

    /// Every attached node carrying `action_type`, in pre-order.
    pub fn find_by_type(&self, action_type: &str) -> Vec<&Action> {
        self.iter_pre_order(self.root)
            .filter(|(node, _)| node.action_type() == action_type)
            .map(|(node, _)| node)
            .collect()
    }

    /// Children of `id`, in order.
    pub fn children_of(&self, id: ActionId) -> impl Iterator<Item = &Action> {
        self.nodes
            .get(&id)
            .map(Action::children)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| self.nodes.get(c))
    }

    /// First child of `id` whose `role` attribute equals `role`.
    pub fn child_by_role(&self, id: ActionId, role: &str) -> Option<&Action> {
        self.children_of(id).find(|c| c.role() == Some(role))
    }

    /// Deep-copy the subtree at `id` as a new detached subtree with fresh ids.
    pub fn clone_subtree(&mut self, id: ActionId) -> Result<ActionId, TreeError> {
        let plan = self.copy_plan(id).ok_or(TreeError::UnknownNode(id))?;
        self.apply_plan(plan, None).ok_or(TreeError::UnknownNode(id))
    }

    /// Deep-copy the whole tree.
    ///
    /// The copy draws ids from where this tree's generator stands, so no id
    /// in the copy collides with an id in `self`.
    pub fn clone_tree(&self) -> ActionTree {
        let mut copy = ActionTree::with_generator(
            self.root_node().action_type(),
            IdGenerator::starting_at(self.ids.peek().raw()),
        );
        copy.data_types = self.data_types.clone();
        copy.action_types = self.action_types.clone();
        copy.attribute_types = self.attribute_types.clone();
        copy.metadata.schema_version = self.metadata.schema_version;
        if let Some(plan) = self.copy_plan(self.root) {
            let root = copy.root;
            copy.apply_plan(plan, Some(root));
        }
        copy
    }

    /// The subtree at `id` flattened in pre-order, each entry pointing at
    /// its parent's position.
    fn copy_plan(&self, id: ActionId) -> Option<Vec<PlannedNode>> {
        self.get(id)?;
        let mut plan = Vec::new();
        let mut pending = vec![(id, None)];
        while let Some((source, parent)) = pending.pop() {
            let Some(node) = self.get(source) else {
                continue;
            };
            let index = plan.len();
            plan.push(PlannedNode {
                parent,
                action_type: node.action_type().to_string(),
                attributes: node
                    .attributes()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                sequence: node.sequence_number(),
            });
            pending.extend(node.children().iter().rev().map(|child| (*child, Some(index))));
        }
        Some(plan)
    }

    /// Recreate `plan` under fresh ids and return the copy's root. The
    /// first entry is written onto `root` when one is given.
    fn apply_plan(&mut self, plan: Vec<PlannedNode>, root: Option<ActionId>) -> Option<ActionId> {
        let mut created: Vec<ActionId> = Vec::with_capacity(plan.len());
        for node in plan {
            let id = match (created.is_empty(), root) {
                (true, Some(root)) => {
                    self.set_root_attributes(node.attributes);
                    root
                }
                _ => self.create_with(&node.action_type, node.attributes),
            };
            if let Some(parent) = node.parent.and_then(|p| created.get(p).copied()) {
                // Pre-order: the parent exists and the new node is detached.
                let _ = self.add_child(parent, id, Some(node.sequence));
            }
            created.push(id);
        }
        created.first().copied()
    }

    fn set_root_attributes(&mut self, attributes: impl IntoIterator<Item = (String, AttrValue)>) {
        let root = self.root;
        for (name, value) in attributes {
            self.note_attribute(&name, &value);
            if let Some(node) = self.nodes.get_mut(&root) {
                node.set_attribute(name, value);
            }
        }
    }

    pub(crate) fn fill_root(&mut self, object: &crate::ActionObject) {
        self.set_root_attributes(object.attributes.iter().cloned());
        let root = self.root;
        self.insert_children(root, object);
    }
}

/// One node of a subtree being copied.
struct PlannedNode {
    parent: Option<usize>,
    action_type: String,
    attributes: Vec<(String, AttrValue)>,
    sequence: i64,
}
