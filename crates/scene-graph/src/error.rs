//! Error taxonomy for tree mutations

use thiserror::Error;

/// Why a tree mutation was refused
///
/// Every mutating operation either applies completely or fails with one of
/// these and leaves the tree untouched. Lookups signal absence with `Option`
/// or an empty result instead; [`TreeError::NotFound`] is reserved for
/// mutating operations handed an id that is not in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The parent's child-acceptance policy refused the node
    #[error("rejected by the parent's child policy: {0}")]
    PolicyRejected(String),
    /// A requested insertion or reorder index is out of range
    #[error("position {position} is out of range for {len} children")]
    InvalidPosition { position: usize, len: usize },
    /// The move target is the node itself or one of its descendants
    #[error("cannot move a node into itself or its own subtree")]
    CyclicMove,
    /// The node's id is already present in the target tree
    #[error("node is already present in the tree")]
    AlreadyPresent,
    /// A mutating operation was handed an id that is not in the tree
    #[error("no node with the given id")]
    NotFound,
}
