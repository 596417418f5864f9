//! The typed molecular scene layer
//!
//! Instantiates the generic tree with molecular payloads: a policy enforcing
//! which kinds nest under which (and keeping the domain collections in
//! lockstep with the tree), plus the [`SceneManager`] coordinator that owns
//! the whole arrangement.

mod manager;
mod object;
mod policy;
mod render;

pub use manager::SceneManager;
pub use object::{SceneData, SceneNode, SceneObject, SceneTree};
pub use policy::{allowed_child, ScenePolicy};
pub use render::{RenderItem, Renderer};
