//! Node identifiers and the generator that hands them out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of one [`Action`](crate::Action) node.
///
/// Ids are handed out by the owning tree's [`IdGenerator`] and are unique
/// for that tree's lifetime. They carry no positional meaning.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ActionId(u64);

impl ActionId {
    /// Create from a raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({})", self.0)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one [`ActionTree`](crate::ActionTree) value.
///
/// Every tree gets its own identity when it is built or cloned, so a node id
/// recorded against one tree can be checked before it is resolved against
/// another.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TreeId(u64);

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

impl TreeId {
    pub fn fresh() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree {}", self.0)
    }
}

/// Monotonic id source.
///
/// Each [`ActionTree`](crate::ActionTree) owns one. Tests that need stable
/// ids call [`IdGenerator::reset`] (or build trees with a fresh generator)
/// instead of relying on process-wide state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// First id handed out by a fresh generator.
    pub const FIRST: u64 = 1;

    /// Create a generator starting at [`IdGenerator::FIRST`].
    pub fn new() -> Self {
        Self::starting_at(Self::FIRST)
    }

    /// Create a generator whose first id is `next`.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Hand out the next id.
    #[inline]
    pub fn next_id(&mut self) -> ActionId {
        let id = ActionId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[inline]
    pub fn peek(&self) -> ActionId {
        ActionId(self.next)
    }

    /// Restart numbering from [`IdGenerator::FIRST`].
    pub fn reset(&mut self) {
        self.next = Self::FIRST;
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
