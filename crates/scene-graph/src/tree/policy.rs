//! Pluggable child-acceptance and domain-sync hooks

use crate::tree::Node;
use crate::TreeError;

/// Constraint and synchronization hooks a tree consults during mutations
///
/// The fallible checks run before any mutation, so a rejection leaves the
/// tree untouched. The notification hooks run after the child list has been
/// updated and before any events are emitted; they are where a typed layer
/// keeps a backing domain collection (a molecule's field map, a
/// trajectory's frame sequence) in lockstep with the tree.
pub trait TreePolicy<P> {
    /// May `child` become a child of `parent`?
    ///
    /// `siblings` are the parent's current children, in order.
    fn can_adopt(
        &self,
        _parent: &Node<P>,
        _child: &Node<P>,
        _siblings: &[&Node<P>],
    ) -> Result<(), TreeError> {
        Ok(())
    }

    /// May `node` take the name `new_name` under `parent`?
    fn check_rename(
        &self,
        _parent: &Node<P>,
        _node: &Node<P>,
        _new_name: &str,
        _siblings: &[&Node<P>],
    ) -> Result<(), TreeError> {
        Ok(())
    }

    /// `child` was inserted into `parent`'s children at `index`
    fn child_attached(&self, _parent: &Node<P>, _child: &Node<P>, _index: usize) {}

    /// `child` was removed from `parent`'s children; `index` is its old position
    fn child_detached(&self, _parent: &Node<P>, _child: &Node<P>, _index: usize) {}

    /// `child` was relocated within `parent`'s children from `from` to `to`
    fn child_reordered(&self, _parent: &Node<P>, _child: &Node<P>, _from: usize, _to: usize) {}

    /// `child` was renamed; its new name is `child.name()`
    fn child_renamed(&self, _parent: &Node<P>, _child: &Node<P>, _old_name: &str) {}
}

/// The default policy: accept anything, synchronize nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<P> TreePolicy<P> for AcceptAll {}
