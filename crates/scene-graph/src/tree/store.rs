//! The tree itself: node storage and structural mutations

use std::collections::HashMap;

use log::debug;

use crate::signals::{TreeEvent, TreeSignals};
use crate::tree::{AcceptAll, Node, NodeId, NodeKind, NodePath, TreePolicy, TreeWalker, VisibleWalker};
use crate::TreeError;

/// A detached tree fragment, owned by the caller
///
/// Returned by [`Tree::remove_child`]; re-attaching it with
/// [`Tree::add_child`] is the exact inverse of removal: ids, order and
/// payload relationships all survive the round trip. Dropping a
/// subtree destroys its nodes.
#[derive(Debug)]
pub struct Subtree<P> {
    pub(crate) root: NodeId,
    /// Pre-order; the subtree root is always first.
    pub(crate) nodes: Vec<Node<P>>,
}

impl<P> Subtree<P> {
    /// Id of the fragment's root node
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The fragment's root node
    pub fn root(&self) -> &Node<P> {
        &self.nodes[0]
    }

    /// Number of nodes in the fragment
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a fragment has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The fragment's nodes in pre-order
    pub fn nodes(&self) -> &[Node<P>] {
        &self.nodes
    }
}

impl<P> From<Node<P>> for Subtree<P> {
    fn from(node: Node<P>) -> Self {
        Self {
            root: node.id(),
            nodes: vec![node],
        }
    }
}

/// An arena-backed tree of [`Node`]s
///
/// The arena owns every node; parents refer to children by id and children
/// point back with a non-owning id, so there are no reference cycles and
/// whole-tree id lookup is O(1). All mutating operations are all-or-nothing:
/// constraints are checked before anything is touched, domain-sync hooks run
/// after the structures are updated, and events are emitted last.
pub struct Tree<P> {
    nodes: HashMap<NodeId, Node<P>>,
    root: NodeId,
    policy: Box<dyn TreePolicy<P>>,
    signals: TreeSignals,
}

impl<P> Tree<P> {
    /// Create a tree whose root accepts any child
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_policy(root_name, AcceptAll)
    }

    /// Create a tree with a custom child policy
    pub fn with_policy(root_name: impl Into<String>, policy: impl TreePolicy<P> + 'static) -> Self {
        let root_node: Node<P> = Node::container(root_name);
        let root = root_node.id();
        let mut nodes = HashMap::new();
        nodes.insert(root, root_node);
        Self {
            nodes,
            root,
            policy: Box::new(policy),
            signals: TreeSignals::new(),
        }
    }

    /// Replace the notification channel, e.g. to share one across trees
    pub fn with_signals(mut self, signals: TreeSignals) -> Self {
        self.signals = signals;
        self
    }

    /// The notification channel this tree reports through
    pub fn signals(&self) -> &TreeSignals {
        &self.signals
    }

    /// Id of the root node
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node
    pub fn root(&self) -> &Node<P> {
        &self.nodes[&self.root]
    }

    /// Look up a node by id, O(1)
    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<P>> {
        self.nodes.get_mut(&id)
    }

    /// Returns true if the id belongs to this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Total number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is always present
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a node (or a detached fragment) under `parent`
    ///
    /// With `position` the child is inserted at that index and later
    /// siblings shift; without it the child is appended. Emits
    /// [`TreeEvent::NodeAdded`] then [`TreeEvent::StructureChanged`].
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] for an unknown parent,
    /// [`TreeError::AlreadyPresent`] if any id in the fragment is already in
    /// the tree, [`TreeError::InvalidPosition`] for an out-of-range index,
    /// and the policy's [`TreeError::PolicyRejected`] otherwise. On failure
    /// nothing is mutated.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        child: impl Into<Subtree<P>>,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        let subtree = child.into();
        let child_id = subtree.root_id();

        let parent_node = self.nodes.get(&parent).ok_or(TreeError::NotFound)?;
        if subtree.nodes().iter().any(|n| self.nodes.contains_key(&n.id())) {
            return Err(TreeError::AlreadyPresent);
        }
        self.policy
            .can_adopt(parent_node, subtree.root(), &self.children_refs(parent))?;
        let len = parent_node.child_count();
        let index = position.unwrap_or(len);
        if index > len {
            return Err(TreeError::InvalidPosition {
                position: index,
                len,
            });
        }

        debug!(
            "adding '{}' under '{}' at index {}",
            subtree.root().name(),
            parent_node.name(),
            index
        );

        let Subtree { root, nodes } = subtree;
        for node in nodes {
            self.nodes.insert(node.id(), node);
        }
        if let Some(child_node) = self.nodes.get_mut(&root) {
            child_node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(index, root);
        }
        self.invalidate_paths(root);
        if let (Some(parent_node), Some(child_node)) =
            (self.nodes.get(&parent), self.nodes.get(&root))
        {
            self.policy.child_attached(parent_node, child_node, index);
        }

        self.signals.emit(TreeEvent::NodeAdded(child_id));
        self.signals.emit(TreeEvent::StructureChanged);
        Ok(child_id)
    }

    /// Detach a direct child of `parent`, returning the fragment
    ///
    /// Looks among direct children only; `None` means nothing was removed
    /// and nothing was emitted. On success emits [`TreeEvent::NodeRemoved`]
    /// then [`TreeEvent::StructureChanged`].
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<Subtree<P>> {
        let index = self.unlink(parent, child)?;

        let ids = self.subtree_ids(child);
        let mut nodes = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(node) = self.nodes.remove(&id) {
                nodes.push(node);
            }
        }
        let subtree = Subtree { root: child, nodes };

        debug!("removed '{}' from the tree", subtree.root().name());

        if let Some(parent_node) = self.nodes.get(&parent) {
            self.policy.child_detached(parent_node, subtree.root(), index);
        }
        self.signals.emit(TreeEvent::NodeRemoved(child));
        self.signals.emit(TreeEvent::StructureChanged);
        Some(subtree)
    }

    /// Move a node under a new parent, or reorder it under its current one
    ///
    /// When `new_parent` is the node's current parent this degrades to
    /// [`Tree::reorder_child`] (with `position` defaulting to the end).
    /// Otherwise the node is detached and re-attached inside a suppression
    /// scope, so subscribers observe exactly one
    /// [`TreeEvent::StructureChanged`] for the whole move and never see an
    /// intermediate state.
    ///
    /// # Errors
    ///
    /// [`TreeError::CyclicMove`] when the target is the node itself or one
    /// of its descendants; otherwise as [`Tree::add_child`]. On failure the
    /// tree is left exactly as it was.
    pub fn move_node(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        position: Option<usize>,
    ) -> Result<(), TreeError> {
        let node_ref = self.nodes.get(&node).ok_or(TreeError::NotFound)?;
        let old_parent = node_ref
            .parent()
            .ok_or_else(|| TreeError::PolicyRejected("the root cannot be moved".into()))?;
        let new_parent_node = self.nodes.get(&new_parent).ok_or(TreeError::NotFound)?;

        if new_parent == old_parent {
            let last = new_parent_node.child_count().saturating_sub(1);
            return self.reorder_child(old_parent, node, position.unwrap_or(last));
        }

        if new_parent == node || self.is_descendant(new_parent, node) {
            return Err(TreeError::CyclicMove);
        }
        if let Some(node_ref) = self.nodes.get(&node) {
            self.policy
                .can_adopt(new_parent_node, node_ref, &self.children_refs(new_parent))?;
        }
        let len = new_parent_node.child_count();
        let index = position.unwrap_or(len);
        if index > len {
            return Err(TreeError::InvalidPosition {
                position: index,
                len,
            });
        }

        debug!("moving node {} under {}", node, new_parent);

        // Detach-then-attach as one observable step.
        let batch = self.signals.batch();
        let old_index = self.unlink(old_parent, node).ok_or(TreeError::NotFound)?;
        if let (Some(parent_node), Some(child_node)) =
            (self.nodes.get(&old_parent), self.nodes.get(&node))
        {
            self.policy.child_detached(parent_node, child_node, old_index);
        }
        self.signals.emit(TreeEvent::NodeRemoved(node));

        if let Some(child_node) = self.nodes.get_mut(&node) {
            child_node.parent = Some(new_parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&new_parent) {
            parent_node.children.insert(index, node);
        }
        self.invalidate_paths(node);
        if let (Some(parent_node), Some(child_node)) =
            (self.nodes.get(&new_parent), self.nodes.get(&node))
        {
            self.policy.child_attached(parent_node, child_node, index);
        }
        self.signals.emit(TreeEvent::NodeAdded(node));
        drop(batch);
        Ok(())
    }

    /// Relocate a direct child of `parent` to a new index
    ///
    /// `new_position` is the child's final index. A no-op reorder succeeds
    /// without emitting anything; otherwise a single
    /// [`TreeEvent::StructureChanged`] is emitted.
    pub fn reorder_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        new_position: usize,
    ) -> Result<(), TreeError> {
        let parent_node = self.nodes.get(&parent).ok_or(TreeError::NotFound)?;
        let index = parent_node
            .children()
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotFound)?;
        let len = parent_node.child_count();
        if new_position >= len {
            return Err(TreeError::InvalidPosition {
                position: new_position,
                len,
            });
        }
        if new_position == index {
            return Ok(());
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.remove(index);
            parent_node.children.insert(new_position, child);
        }
        if let (Some(parent_node), Some(child_node)) =
            (self.nodes.get(&parent), self.nodes.get(&child))
        {
            self.policy
                .child_reordered(parent_node, child_node, index, new_position);
        }
        self.signals.emit(TreeEvent::StructureChanged);
        Ok(())
    }

    /// Rename a node, keeping any name-keyed domain collection in step
    ///
    /// A same-name rename is a silent no-op. Emits
    /// [`TreeEvent::NodeChanged`] and invalidates cached paths for the
    /// node's whole subtree.
    pub fn rename(&mut self, id: NodeId, new_name: impl Into<String>) -> Result<(), TreeError> {
        let new_name = new_name.into();
        let node = self.nodes.get(&id).ok_or(TreeError::NotFound)?;
        if node.name() == new_name {
            return Ok(());
        }
        let parent = node.parent();
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get(&parent_id) {
                self.policy
                    .check_rename(parent_node, node, &new_name, &self.children_refs(parent_id))?;
            }
        }

        let old_name = match self.nodes.get_mut(&id) {
            Some(node) => node.set_name(new_name),
            None => return Err(TreeError::NotFound),
        };
        self.invalidate_paths(id);
        if let Some(parent_id) = parent {
            if let (Some(parent_node), Some(node)) =
                (self.nodes.get(&parent_id), self.nodes.get(&id))
            {
                self.policy.child_renamed(parent_node, node, &old_name);
            }
        }
        self.signals.emit(TreeEvent::NodeChanged(id));
        Ok(())
    }

    /// Flip a node's visibility flag
    ///
    /// Returns false with no event when the id is unknown or the value is
    /// unchanged. Otherwise emits [`TreeEvent::VisibilityChanged`] and, for
    /// payload-bearing nodes, [`TreeEvent::NodeChanged`] so render settings
    /// consumers refresh too.
    pub fn set_visibility(&mut self, id: NodeId, visible: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.is_visible() == visible {
            return false;
        }
        node.set_visible(visible);
        let has_payload = node.payload().is_some();
        self.signals.emit(TreeEvent::VisibilityChanged(id, visible));
        if has_payload {
            self.signals.emit(TreeEvent::NodeChanged(id));
        }
        true
    }

    /// The node's path from the root, lazily cached
    ///
    /// Caches are invalidated whenever the node or an ancestor is renamed or
    /// reparented.
    pub fn path(&self, id: NodeId) -> Option<NodePath> {
        let node = self.nodes.get(&id)?;
        {
            let cached = node.path_cache.borrow();
            if let Some(path) = cached.as_ref() {
                return Some(path.clone());
            }
        }
        let path = match node.parent() {
            Some(parent) => self.path(parent)?.child(node.name()),
            None => NodePath::new().child(node.name()),
        };
        *node.path_cache.borrow_mut() = Some(path.clone());
        Some(path)
    }

    /// Pre-order traversal of the whole tree, with paths
    pub fn walk(&self) -> TreeWalker<'_, P> {
        TreeWalker::new(self, self.root)
    }

    /// Pre-order traversal of the subtree rooted at `start`, with paths
    pub fn walk_from(&self, start: NodeId) -> TreeWalker<'_, P> {
        TreeWalker::new(self, start)
    }

    /// Pre-order traversal of visible nodes only
    ///
    /// An invisible node prunes its entire subtree: descendants are skipped
    /// regardless of their own visibility flags. A hidden molecule hides its
    /// fields even when the fields are individually marked visible. This
    /// asymmetry is deliberate.
    pub fn walk_visible(&self) -> VisibleWalker<'_, P> {
        VisibleWalker::new(self, self.root)
    }

    /// Visible-only traversal of the subtree rooted at `start`
    pub fn walk_visible_from(&self, start: NodeId) -> VisibleWalker<'_, P> {
        VisibleWalker::new(self, start)
    }

    /// First node with the given name, in pre-order
    pub fn find_by_name(&self, name: &str) -> Option<&Node<P>> {
        self.walk().map(|(_, node)| node).find(|node| node.name() == name)
    }

    /// All nodes of the given kind, in pre-order
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<&Node<P>> {
        self.walk()
            .map(|(_, node)| node)
            .filter(|node| node.kind() == kind)
            .collect()
    }

    /// Resolve a path, starting at the root
    ///
    /// The first segment must be the root's name; the empty path resolves to
    /// the root itself.
    pub fn find_by_path(&self, path: &NodePath) -> Option<&Node<P>> {
        let mut parts = path.parts().iter();
        match parts.next() {
            None => return self.nodes.get(&self.root),
            Some(first) if first != self.root().name() => return None,
            Some(_) => {}
        }
        let mut current = self.root;
        for part in parts {
            current = self
                .nodes
                .get(&current)?
                .children()
                .iter()
                .copied()
                .find(|&c| self.nodes.get(&c).is_some_and(|n| n.name() == part))?;
        }
        self.nodes.get(&current)
    }

    /// Multi-line box-drawing dump of the tree, for logs and debugging
    pub fn format_tree(&self, include_ids: bool) -> String {
        let mut lines = vec!["Tree Structure:".to_string()];
        self.format_node(self.root, "", true, include_ids, &mut lines);
        lines.join("\n")
    }

    fn format_node(
        &self,
        id: NodeId,
        prefix: &str,
        is_last: bool,
        include_ids: bool,
        lines: &mut Vec<String>,
    ) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let marker = if node.is_visible() { "[+]" } else { "[-]" };
        let mut text = format!("{} {} {}", node.name(), marker, node.kind());
        let detail = match node.kind() {
            NodeKind::Root => Some(format!("[{} items]", node.child_count())),
            NodeKind::Trajectory => Some(format!("[{} frames]", node.child_count())),
            NodeKind::Molecule if node.has_children() => {
                Some(format!("[{} fields]", node.child_count()))
            }
            _ => None,
        };
        if let Some(detail) = detail {
            text.push(' ');
            text.push_str(&detail);
        }
        if include_ids {
            text.push_str(&format!(" (id:{}...)", node.id().short()));
        }
        let branch = if is_last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{branch}{text}"));

        let children = node.children();
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        for (i, &child) in children.iter().enumerate() {
            self.format_node(
                child,
                &child_prefix,
                i == children.len() - 1,
                include_ids,
                lines,
            );
        }
    }

    /// Returns true if `node` lies strictly inside the subtree of `ancestor`
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(Node::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(Node::parent);
        }
        false
    }

    /// Unlink `child` from `parent`'s child list; no hooks, no events.
    fn unlink(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let index = self
            .nodes
            .get(&parent)?
            .children()
            .iter()
            .position(|&c| c == child)?;
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.remove(index);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parent = None;
        }
        self.invalidate_paths(child);
        Some(index)
    }

    /// Ids of the subtree rooted at `id`, in pre-order (`id` first).
    fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(&id) {
                for &child in node.children().iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    fn invalidate_paths(&self, id: NodeId) {
        for id in self.subtree_ids(id) {
            if let Some(node) = self.nodes.get(&id) {
                node.invalidate_path();
            }
        }
    }

    fn children_refs(&self, parent: NodeId) -> Vec<&Node<P>> {
        self.nodes
            .get(&parent)
            .map(|p| {
                p.children()
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .collect()
            })
            .unwrap_or_default()
    }
}
