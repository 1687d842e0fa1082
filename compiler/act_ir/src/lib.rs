//! Act IR - the Action tree intermediate representation.
//!
//! Framework front-ends normalize component markup and script into a single
//! generic, attributed, ordered tree. Analyzers pattern-match over it and the
//! `act_eval` engine executes it.
//!
//! - [`Action`]: one node (tag + ordered attributes + ordered children)
//! - [`ActionTree`]: owns every node, the type registries and metadata
//! - [`IdGenerator`]: explicit, resettable id source owned by each tree
//! - [`ActionObject`] / [`TreeObject`]: structural (de)serialization form
//!
//! # Ownership
//!
//! Nodes live in the tree's storage keyed by [`ActionId`]. Children are
//! ordered id lists and `parent` is a plain id, so attaching or detaching
//! can never create an ownership cycle.

mod action;
mod attr;
mod id;
mod object;
mod traverse;
mod tree;

pub use action::{Action, SEQUENCE_STEP};
pub use attr::AttrValue;
pub use id::{ActionId, IdGenerator, TreeId};
#[cfg(feature = "serde")]
pub use object::TextError;
pub use object::{ActionObject, TreeObject};
pub use traverse::{BreadthFirst, PreOrder};
pub use tree::{ActionTree, TreeError, TreeMetadata, SCHEMA_VERSION};
