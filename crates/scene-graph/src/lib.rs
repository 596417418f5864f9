//! Hierarchical scene graph for molecular structure viewing
//!
//! This crate is the core of molscope: a typed tree of scene nodes
//! (molecules, scalar fields, trajectories) whose structural mutations keep
//! the tree shape and the underlying domain collections consistent as single
//! atomic operations, and report every change through a shared notification
//! channel.
//!
//! # Core concepts
//!
//! - **Tree**: generic arena-backed tree with ordered children, a pluggable
//!   child-acceptance policy, and cached hierarchical paths
//! - **TreeSignals**: the multi-subscriber change-notification channel
//! - **SceneManager**: owner of the tree, entry point for all scene
//!   operations, and the renderer's only interface
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use scene_graph::prelude::*;
//!
//! let mut scene = SceneManager::new();
//! let water = Rc::new(chem::Molecule::new(
//!     vec!["O".into(), "H".into(), "H".into()],
//!     vec![[0.0, 0.0, 0.0], [0.757, 0.586, 0.0], [-0.757, 0.586, 0.0]],
//! ).unwrap());
//!
//! let id = scene.add_molecule(water, "water", None).unwrap();
//! assert_eq!(scene.get(id).unwrap().kind(), NodeKind::Molecule);
//! assert_eq!(scene.visible_render_sequence().count(), 1);
//! ```

pub mod scene;
pub mod settings;
pub mod signals;
pub mod tree;

mod error;

pub use error::TreeError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::scene::{
        RenderItem, Renderer, SceneData, SceneManager, SceneNode, SceneObject, ScenePolicy,
        SceneTree,
    };
    pub use crate::settings::{
        MoleculeRenderSettings, RenderSettings, ScalarFieldRenderSettings, SettingsFactory,
        TrajectoryRenderSettings,
    };
    pub use crate::signals::{Subscription, TreeEvent, TreeSignals};
    pub use crate::tree::{Node, NodeId, NodeKind, NodePath, Subtree, Tree, TreePolicy};
    pub use crate::TreeError;
}
