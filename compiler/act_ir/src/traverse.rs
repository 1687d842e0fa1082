//! Lazy pre-order and breadth-first traversal.
//!
//! Both iterators are finite (the tree is acyclic by construction) and
//! single-pass: once exhausted they stay exhausted.

use std::collections::VecDeque;

use crate::{Action, ActionId, ActionTree};

/// Depth-first, parent-before-children traversal yielding `(node, depth)`.
pub struct PreOrder<'a> {
    tree: &'a ActionTree,
    stack: Vec<(ActionId, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (&'a Action, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            self.stack
                .extend(node.children().iter().rev().map(|c| (*c, depth + 1)));
            return Some((node, depth));
        }
        None
    }
}

/// Level-by-level traversal yielding `(node, depth)`.
pub struct BreadthFirst<'a> {
    tree: &'a ActionTree,
    queue: VecDeque<(ActionId, usize)>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (&'a Action, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.queue.pop_front() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            self.queue
                .extend(node.children().iter().map(|c| (*c, depth + 1)));
            return Some((node, depth));
        }
        None
    }
}

impl ActionTree {
    /// Pre-order iterator over the subtree at `start` (depth 0 at `start`).
    pub fn iter_pre_order(&self, start: ActionId) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![(start, 0)],
        }
    }

    /// Breadth-first iterator over the subtree at `start`.
    pub fn iter_breadth_first(&self, start: ActionId) -> BreadthFirst<'_> {
        BreadthFirst {
            tree: self,
            queue: VecDeque::from([(start, 0)]),
        }
    }

    /// Visit the subtree at `start` in pre-order.
    pub fn traverse<F>(&self, start: ActionId, mut visitor: F)
    where
        F: FnMut(&Action, usize),
    {
        for (node, depth) in self.iter_pre_order(start) {
            visitor(node, depth);
        }
    }

    /// Visit the subtree at `start` level by level.
    pub fn traverse_breadth_first<F>(&self, start: ActionId, mut visitor: F)
    where
        F: FnMut(&Action, usize),
    {
        for (node, depth) in self.iter_breadth_first(start) {
            visitor(node, depth);
        }
    }
}
