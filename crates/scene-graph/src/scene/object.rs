//! Scene payloads: the domain data a node represents

use std::rc::Rc;

use chem::{Molecule, ScalarField, Trajectory};

use crate::settings::RenderSettings;
use crate::tree::{Node, NodeKind, Tree};

/// The domain object behind a scene node
///
/// Payloads are shared handles: the same `Rc<ScalarField>` sits in a field
/// node and in its molecule's field map, and the same `Rc<Molecule>` sits in
/// a frame node and in its trajectory's frame list.
#[derive(Debug, Clone)]
pub enum SceneData {
    Molecule(Rc<Molecule>),
    ScalarField(Rc<ScalarField>),
    Trajectory(Rc<Trajectory>),
}

impl SceneData {
    /// The node kind this payload implies
    pub fn kind(&self) -> NodeKind {
        match self {
            SceneData::Molecule(_) => NodeKind::Molecule,
            SceneData::ScalarField(_) => NodeKind::ScalarField,
            SceneData::Trajectory(_) => NodeKind::Trajectory,
        }
    }

    /// The molecule handle, if this is one
    pub fn as_molecule(&self) -> Option<&Rc<Molecule>> {
        match self {
            SceneData::Molecule(m) => Some(m),
            _ => None,
        }
    }

    /// The scalar-field handle, if this is one
    pub fn as_scalar_field(&self) -> Option<&Rc<ScalarField>> {
        match self {
            SceneData::ScalarField(f) => Some(f),
            _ => None,
        }
    }

    /// The trajectory handle, if this is one
    pub fn as_trajectory(&self) -> Option<&Rc<Trajectory>> {
        match self {
            SceneData::Trajectory(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Rc<Molecule>> for SceneData {
    fn from(m: Rc<Molecule>) -> Self {
        SceneData::Molecule(m)
    }
}

impl From<Rc<ScalarField>> for SceneData {
    fn from(f: Rc<ScalarField>) -> Self {
        SceneData::ScalarField(f)
    }
}

impl From<Rc<Trajectory>> for SceneData {
    fn from(t: Rc<Trajectory>) -> Self {
        SceneData::Trajectory(t)
    }
}

/// A node payload: domain data plus the node's render settings
#[derive(Debug)]
pub struct SceneObject {
    pub data: SceneData,
    pub settings: RenderSettings,
}

impl SceneObject {
    /// Pair a payload with a settings record
    pub fn new(data: SceneData, settings: RenderSettings) -> Self {
        debug_assert_eq!(data.kind(), settings.kind());
        Self { data, settings }
    }

    /// The node kind this payload implies
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// A node of the molecular scene tree
pub type SceneNode = Node<SceneObject>;

/// The molecular scene tree
pub type SceneTree = Tree<SceneObject>;
