//! The renderer-facing view of the scene

use crate::scene::SceneData;
use crate::settings::RenderSettings;
use crate::tree::{NodeId, NodeKind};

/// One entry of the visible render sequence
///
/// Everything a renderer needs for a node: the kind tag to pick a rendering
/// strategy, the payload to draw, and the settings record to draw it with.
/// Renderers get no write access to the tree.
#[derive(Debug)]
pub struct RenderItem<'a> {
    pub id: NodeId,
    pub kind: NodeKind,
    pub data: &'a SceneData,
    pub settings: &'a RenderSettings,
}

/// A renderer collaborator
///
/// Implementations draw one item at a time, in the order the scene hands
/// them out: the visible, pruned pre-order of the tree.
pub trait Renderer {
    fn render(&mut self, item: &RenderItem<'_>);
}
