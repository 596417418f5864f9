//! Tree traversal iterators

use crate::tree::{Node, NodeId, NodePath, Tree};

/// Pre-order traversal yielding every node in a subtree with its path
///
/// Visits a node before its children, children in display order. Created by
/// [`Tree::walk`] and [`Tree::walk_from`].
pub struct TreeWalker<'a, P> {
    tree: &'a Tree<P>,
    stack: Vec<NodeId>,
}

impl<'a, P> TreeWalker<'a, P> {
    pub(crate) fn new(tree: &'a Tree<P>, start: NodeId) -> Self {
        let stack = if tree.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl<'a, P> Iterator for TreeWalker<'a, P> {
    type Item = (NodePath, &'a Node<P>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        for &child in node.children().iter().rev() {
            self.stack.push(child);
        }
        let path = self.tree.path(id)?;
        Some((path, node))
    }
}

/// Pre-order traversal of visible nodes only
///
/// An invisible node prunes its entire subtree: its descendants are never
/// yielded, whatever their own visibility flags say. The descendants' flags
/// are left untouched and flip independently, so a hidden molecule still
/// remembers which of its fields were shown. Created by
/// [`Tree::walk_visible`] and [`Tree::walk_visible_from`].
pub struct VisibleWalker<'a, P> {
    tree: &'a Tree<P>,
    stack: Vec<NodeId>,
}

impl<'a, P> VisibleWalker<'a, P> {
    pub(crate) fn new(tree: &'a Tree<P>, start: NodeId) -> Self {
        let stack = if tree.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl<'a, P> Iterator for VisibleWalker<'a, P> {
    type Item = &'a Node<P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if !node.is_visible() {
                continue;
            }
            for &child in node.children().iter().rev() {
                self.stack.push(child);
            }
            return Some(node);
        }
    }
}
