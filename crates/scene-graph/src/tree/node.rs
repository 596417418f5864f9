//! Node identity and per-node state

use std::cell::RefCell;
use std::fmt;

use derive_more::Display;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::tree::NodePath;

/// Unique identifier for a node
///
/// Assigned at construction and immutable for the node's lifetime; ids stay
/// stable across moves, reorders and detach/re-attach cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    pub fn uuid(self) -> Uuid {
        self.0
    }

    /// Abbreviated hex form for display
    pub fn short(self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of a scene tree node
///
/// A closed set: the acceptance rules between kinds are a fixed table (see
/// [`crate::scene::allowed_child`]), not open-ended subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// The payload-less container at the top of a tree
    #[display(fmt = "root")]
    Root,
    /// A single molecular structure
    #[display(fmt = "molecule")]
    Molecule,
    /// A volumetric scalar field attached to a molecule
    #[display(fmt = "scalar_field")]
    ScalarField,
    /// An animation container holding molecule frames
    #[display(fmt = "trajectory")]
    Trajectory,
}

impl NodeKind {
    /// Returns true for kinds that exist to hold children
    pub const fn is_container(self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Trajectory)
    }

    /// Returns true for kinds that never accept children
    pub const fn is_leaf(self) -> bool {
        matches!(self, NodeKind::ScalarField)
    }
}

/// A single node in the tree
///
/// Generic over the payload type `P`; the root carries no payload. The
/// parent link is a non-owning back-reference; nodes are owned by the
/// tree's arena, and the `children` list is the authoritative display and
/// render order.
#[derive(Debug)]
pub struct Node<P> {
    id: NodeId,
    name: String,
    kind: NodeKind,
    payload: Option<P>,
    visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 8]>,
    pub(crate) path_cache: RefCell<Option<NodePath>>,
}

impl<P> Node<P> {
    /// Create a payload-bearing node
    pub fn new(name: impl Into<String>, kind: NodeKind, payload: P) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            payload: Some(payload),
            visible: true,
            parent: None,
            children: SmallVec::new(),
            path_cache: RefCell::new(None),
        }
    }

    /// Create a payload-less container node of the root kind
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind: NodeKind::Root,
            payload: None,
            visible: true,
            parent: None,
            children: SmallVec::new(),
            path_cache: RefCell::new(None),
        }
    }

    /// Set the initial visibility without going through the tree
    ///
    /// Only meaningful before the node is attached; afterwards use
    /// [`crate::tree::Tree::set_visibility`] so subscribers are notified.
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// The node's id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's kind tag
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's payload, absent for container nodes
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub(crate) fn payload_mut(&mut self) -> Option<&mut P> {
        self.payload.as_mut()
    }

    /// Whether this node is marked visible
    ///
    /// An invisible ancestor hides the whole subtree from rendering even
    /// when this flag is set; see [`crate::tree::Tree::walk_visible`].
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// The parent's id, `None` for a root or detached node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in display order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the node has at least one child
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn set_name(&mut self, name: String) -> String {
        std::mem::replace(&mut self.name, name)
    }

    pub(crate) fn invalidate_path(&self) {
        *self.path_cache.borrow_mut() = None;
    }
}
