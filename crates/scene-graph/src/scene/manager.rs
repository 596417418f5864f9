//! The scene coordinator

use std::rc::Rc;

use chem::{Molecule, ScalarField, Trajectory};
use log::{info, warn};

use crate::scene::{RenderItem, SceneData, SceneNode, SceneObject, ScenePolicy, SceneTree};
use crate::settings::{RenderSettings, SettingsFactory};
use crate::signals::{TreeEvent, TreeSignals};
use crate::tree::{Node, NodeId, NodeKind, NodePath, Subtree, Tree};
use crate::TreeError;

/// Owner of the scene tree and single entry point for scene operations
///
/// File loaders hand ready payload objects to [`SceneManager::add`], the UI
/// subscribes to [`SceneManager::signals`] and drives moves and reorders,
/// and the renderer consumes [`SceneManager::visible_render_sequence`].
/// Callers never need a direct reference to the root node.
pub struct SceneManager {
    tree: SceneTree,
    defaults: SettingsFactory,
}

impl SceneManager {
    /// A scene with default render settings for new objects
    pub fn new() -> Self {
        Self::with_defaults(SettingsFactory::default())
    }

    /// A scene with explicit default settings for new objects
    pub fn with_defaults(defaults: SettingsFactory) -> Self {
        Self {
            tree: Tree::with_policy("Scene", ScenePolicy),
            defaults,
        }
    }

    /// The notification channel all scene changes are reported through
    pub fn signals(&self) -> &TreeSignals {
        self.tree.signals()
    }

    /// Read access to the underlying tree, e.g. for a UI tree view
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Id of the scene root
    pub fn root_id(&self) -> NodeId {
        self.tree.root_id()
    }

    /// Top-level object nodes, in display order
    pub fn root_objects(&self) -> Vec<&SceneNode> {
        self.tree
            .root()
            .children()
            .iter()
            .filter_map(|&id| self.tree.get(id))
            .collect()
    }

    /// Number of objects in the scene (the root does not count)
    pub fn object_count(&self) -> usize {
        self.tree.len() - 1
    }

    /// Add a payload to the scene, under `parent` or the root
    ///
    /// The node kind follows from the payload type and the new node gets
    /// factory-default settings. A molecule arriving with populated scalar
    /// fields has them re-attached as child nodes; a trajectory's frames
    /// become molecule child nodes named `Frame_0`, `Frame_1`, and so on.
    /// Either way the domain collections end up mirroring the children
    /// exactly.
    ///
    /// # Errors
    ///
    /// Whatever [`Tree::add_child`] reports, most prominently
    /// [`TreeError::PolicyRejected`] when the parent does not accept the
    /// payload's kind.
    pub fn add(
        &mut self,
        data: impl Into<SceneData>,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let data = data.into();
        let name = name.into();
        let parent = parent.unwrap_or_else(|| self.tree.root_id());

        match data {
            SceneData::Molecule(molecule) => self.add_molecule(molecule, name, Some(parent)),
            SceneData::ScalarField(field) => self.add_scalar_field(field, name, Some(parent)),
            SceneData::Trajectory(trajectory) => {
                self.add_trajectory(trajectory, name, Some(parent))
            }
        }
    }

    /// Add a molecule; attached scalar fields become child nodes
    pub fn add_molecule(
        &mut self,
        molecule: Rc<Molecule>,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        let parent = parent.unwrap_or_else(|| self.tree.root_id());
        let node = self.new_node(SceneData::Molecule(Rc::clone(&molecule)), &name);
        let id = self.tree.add_child(parent, node, None)?;
        info!("added molecule '{}' ({} atoms)", name, molecule.atom_count());

        // Re-attach pre-existing fields as children; the attach hooks rebuild
        // the map in the same order.
        for (field_name, field) in molecule.take_scalar_fields() {
            let child = self.new_node(SceneData::ScalarField(field), &field_name);
            self.tree.add_child(id, child, None)?;
        }
        Ok(id)
    }

    /// Add a scalar field under a molecule node
    ///
    /// Without a parent this targets the scene root, which rejects bare
    /// fields; pass the owning molecule's id.
    pub fn add_scalar_field(
        &mut self,
        field: Rc<ScalarField>,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        let parent = parent.unwrap_or_else(|| self.tree.root_id());
        let node = self.new_node(SceneData::ScalarField(field), &name);
        let id = self.tree.add_child(parent, node, None)?;
        info!("added scalar field '{}'", name);
        Ok(id)
    }

    /// Add a trajectory; its frames become molecule child nodes
    pub fn add_trajectory(
        &mut self,
        trajectory: Rc<Trajectory>,
        name: impl Into<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        let parent = parent.unwrap_or_else(|| self.tree.root_id());
        let node = self.new_node(SceneData::Trajectory(Rc::clone(&trajectory)), &name);
        let id = self.tree.add_child(parent, node, None)?;

        let frames = trajectory.take_frames();
        info!("added trajectory '{}' with {} frames", name, frames.len());
        for (index, frame) in frames.into_iter().enumerate() {
            // Through add_molecule, so a frame arriving with attached fields
            // gets them expanded into child nodes as well.
            self.add_molecule(frame, format!("Frame_{index}"), Some(id))?;
        }
        Ok(id)
    }

    /// Look up a node by id, O(1)
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.tree.get(id)
    }

    /// First node with the given name, in pre-order
    pub fn get_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.tree.find_by_name(name)
    }

    /// Resolve a `/Scene/...` path
    pub fn get_by_path(&self, path: &NodePath) -> Option<&SceneNode> {
        self.tree.find_by_path(path)
    }

    /// All nodes of the given kind, in pre-order
    pub fn find_by_kind(&self, kind: NodeKind) -> Vec<&SceneNode> {
        self.tree.find_by_kind(kind)
    }

    /// Flip a node's visibility; returns true if the value changed
    pub fn set_visibility(&mut self, id: NodeId, visible: bool) -> bool {
        self.tree.set_visibility(id, visible)
    }

    /// Move a node under a new parent, or reorder within its current one
    pub fn move_object(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        position: Option<usize>,
    ) -> Result<(), TreeError> {
        self.tree.move_node(id, new_parent, position)
    }

    /// Remove a node (anywhere in the tree), returning the detached fragment
    pub fn remove(&mut self, id: NodeId) -> Option<Subtree<SceneObject>> {
        let parent = self.tree.get(id)?.parent()?;
        info!("removing object {}", id);
        self.tree.remove_child(parent, id)
    }

    /// Re-attach a fragment returned by [`SceneManager::remove`]
    ///
    /// With the original parent and position this is the exact inverse of
    /// the removal: ids, child order and domain-collection entries are all
    /// restored. This is the undo path for a delete or a drag gesture.
    pub fn attach(
        &mut self,
        parent: NodeId,
        fragment: Subtree<SceneObject>,
        position: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        self.tree.add_child(parent, fragment, position)
    }

    /// Rename a node, keeping name-keyed domain collections in step
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        self.tree.rename(id, name)
    }

    /// Replace a node's settings record
    ///
    /// Emits [`TreeEvent::NodeChanged`] only when the new value differs from
    /// the old one, so redundant dialog applies cause no redraw.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] for an unknown id and
    /// [`TreeError::PolicyRejected`] when the record's kind does not match
    /// the node (or the node is the settings-less root).
    pub fn update_settings(
        &mut self,
        id: NodeId,
        settings: impl Into<RenderSettings>,
    ) -> Result<(), TreeError> {
        let settings = settings.into();
        let node = self.tree.get(id).ok_or(TreeError::NotFound)?;
        let Some(object) = node.payload() else {
            return Err(TreeError::PolicyRejected(
                "the scene root has no render settings".into(),
            ));
        };
        if settings.kind() != node.kind() {
            warn!(
                "settings kind {} does not match node kind {}",
                settings.kind(),
                node.kind()
            );
            return Err(TreeError::PolicyRejected(format!(
                "{} settings cannot be applied to a {} node",
                settings.kind(),
                node.kind()
            )));
        }
        if object.settings == settings {
            return Ok(());
        }
        if let Some(object) = self.tree.get_mut(id).and_then(Node::payload_mut) {
            object.settings = settings;
        }
        self.tree.signals().emit(TreeEvent::NodeChanged(id));
        Ok(())
    }

    /// The ordered, visibility-pruned sequence the renderer draws
    ///
    /// Skips the payload-less root; an invisible node hides its whole
    /// subtree.
    pub fn visible_render_sequence(&self) -> impl Iterator<Item = RenderItem<'_>> {
        self.tree.walk_visible().filter_map(|node| {
            let object = node.payload()?;
            Some(RenderItem {
                id: node.id(),
                kind: node.kind(),
                data: &object.data,
                settings: &object.settings,
            })
        })
    }

    /// Multi-line dump of the scene tree
    pub fn format_tree(&self, include_ids: bool) -> String {
        self.tree.format_tree(include_ids)
    }

    /// Log the scene tree at info level, with an optional message
    pub fn log_tree(&self, message: &str) {
        if !message.is_empty() {
            info!("Tree change: {message}");
        }
        info!("\n{}", self.format_tree(false));
    }

    fn new_node(&self, data: SceneData, name: impl Into<String>) -> Node<SceneObject> {
        let settings = match &data {
            SceneData::Molecule(_) => RenderSettings::Molecule(self.defaults.molecule.clone()),
            SceneData::ScalarField(_) => {
                RenderSettings::ScalarField(self.defaults.scalar_field.clone())
            }
            SceneData::Trajectory(_) => {
                RenderSettings::Trajectory(self.defaults.trajectory.clone())
            }
        };
        Node::new(name, data.kind(), SceneObject::new(data, settings))
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn water() -> Rc<Molecule> {
        Rc::new(
            Molecule::new(
                vec!["O".into(), "H".into(), "H".into()],
                vec![
                    [0.0, 0.0, 0.0],
                    [0.757, 0.586, 0.0],
                    [-0.757, 0.586, 0.0],
                ],
            )
            .unwrap(),
        )
    }

    fn density() -> Rc<ScalarField> {
        Rc::new(ScalarField::uniform([0.0; 3], 0.5, [2, 2, 2], vec![0.1; 8]).unwrap())
    }

    #[test]
    fn test_scene_starts_empty() {
        let scene = SceneManager::new();
        assert_eq!(scene.object_count(), 0);
        assert!(scene.root_objects().is_empty());
        assert_eq!(scene.get(scene.root_id()).unwrap().kind(), NodeKind::Root);
        assert_eq!(scene.get(scene.root_id()).unwrap().name(), "Scene");
    }

    #[test]
    fn test_add_molecule() {
        let mut scene = SceneManager::new();
        let id = scene.add(water(), "water", None).unwrap();

        let node = scene.get(id).unwrap();
        assert_eq!(node.kind(), NodeKind::Molecule);
        assert_eq!(node.name(), "water");
        assert_eq!(scene.root_objects().len(), 1);
        assert_eq!(
            scene.tree().path(id).unwrap().to_string(),
            "/Scene/water"
        );
    }

    #[test]
    fn test_add_molecule_with_fields_expands_children() {
        let mut scene = SceneManager::new();
        let molecule = water();
        molecule.push_scalar_field("density", density());
        molecule.push_scalar_field("homo", density());

        let id = scene.add(Rc::clone(&molecule), "water", None).unwrap();
        let node = scene.get(id).unwrap();
        assert_eq!(node.child_count(), 2);

        // The map was rebuilt through the scene and mirrors the children.
        assert_eq!(molecule.scalar_field_names(), vec!["density", "homo"]);
        let field_names: Vec<&str> = node
            .children()
            .iter()
            .map(|&c| scene.get(c).unwrap().name())
            .collect();
        assert_eq!(field_names, vec!["density", "homo"]);
    }

    #[test]
    fn test_add_trajectory_expands_frames() {
        let mut scene = SceneManager::new();
        let trajectory = Rc::new(Trajectory::from_frames(vec![water(), water(), water()]));
        let id = scene.add(Rc::clone(&trajectory), "path", None).unwrap();

        let node = scene.get(id).unwrap();
        assert_eq!(node.kind(), NodeKind::Trajectory);
        assert_eq!(node.child_count(), 3);
        assert_eq!(trajectory.frame_count(), 3);
        let frame0 = scene.get(node.children()[0]).unwrap();
        assert_eq!(frame0.name(), "Frame_0");
        assert_eq!(frame0.kind(), NodeKind::Molecule);
    }

    #[test]
    fn test_bare_field_rejected_at_root() {
        let mut scene = SceneManager::new();
        let err = scene.add(density(), "stray", None).unwrap_err();
        assert!(matches!(err, TreeError::PolicyRejected(_)));
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_lookup_by_name_kind_and_path() {
        let mut scene = SceneManager::new();
        let mol = scene.add(water(), "water", None).unwrap();
        scene.add_scalar_field(density(), "density", Some(mol)).unwrap();

        assert_eq!(scene.get_by_name("density").unwrap().kind(), NodeKind::ScalarField);
        assert!(scene.get_by_name("missing").is_none());
        assert_eq!(scene.find_by_kind(NodeKind::Molecule).len(), 1);
        assert_eq!(
            scene
                .get_by_path(&NodePath::from("/Scene/water/density"))
                .unwrap()
                .kind(),
            NodeKind::ScalarField
        );
    }

    #[test]
    fn test_remove_works_anywhere() {
        let mut scene = SceneManager::new();
        let mol = scene.add(water(), "water", None).unwrap();
        let field = scene.add_scalar_field(density(), "density", Some(mol)).unwrap();

        // Not a direct root child, still removable through the coordinator.
        let detached = scene.remove(field).unwrap();
        assert_eq!(detached.root_id(), field);
        assert!(scene.get(field).is_none());
        assert!(scene.remove(field).is_none());
    }

    #[test]
    fn test_update_settings_change_detection() {
        let mut scene = SceneManager::new();
        let id = scene.add(water(), "water", None).unwrap();

        let changes = Rc::new(RefCell::new(0));
        let count = Rc::clone(&changes);
        scene.signals().subscribe(move |event| {
            if matches!(event, TreeEvent::NodeChanged(_)) {
                *count.borrow_mut() += 1;
            }
        });

        // Same value: no event.
        let current = crate::settings::MoleculeRenderSettings::default();
        scene.update_settings(id, current.clone()).unwrap();
        assert_eq!(*changes.borrow(), 0);

        let mut updated = current;
        updated.alpha = 0.5;
        scene.update_settings(id, updated).unwrap();
        assert_eq!(*changes.borrow(), 1);

        let node = scene.get(id).unwrap();
        let settings = node.payload().unwrap().settings.as_molecule().unwrap();
        assert_eq!(settings.alpha, 0.5);
    }

    #[test]
    fn test_update_settings_kind_mismatch() {
        let mut scene = SceneManager::new();
        let id = scene.add(water(), "water", None).unwrap();
        let err = scene
            .update_settings(id, crate::settings::ScalarFieldRenderSettings::default())
            .unwrap_err();
        assert!(matches!(err, TreeError::PolicyRejected(_)));

        let err = scene
            .update_settings(
                scene.root_id(),
                crate::settings::MoleculeRenderSettings::default(),
            )
            .unwrap_err();
        assert!(matches!(err, TreeError::PolicyRejected(_)));
    }

    #[test]
    fn test_render_sequence_skips_root_and_hidden() {
        let mut scene = SceneManager::new();
        let mol = scene.add(water(), "water", None).unwrap();
        scene.add_scalar_field(density(), "density", Some(mol)).unwrap();
        let other = scene.add(water(), "other", None).unwrap();

        let kinds: Vec<NodeKind> = scene.visible_render_sequence().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Molecule, NodeKind::ScalarField, NodeKind::Molecule]
        );

        scene.set_visibility(other, false);
        assert_eq!(scene.visible_render_sequence().count(), 2);
    }

    #[test]
    fn test_custom_defaults_factory() {
        let mut defaults = SettingsFactory::default();
        defaults.molecule.show_hydrogens = false;
        let mut scene = SceneManager::with_defaults(defaults);

        let id = scene.add(water(), "water", None).unwrap();
        let node = scene.get(id).unwrap();
        let settings = node.payload().unwrap().settings.as_molecule().unwrap();
        assert!(!settings.show_hydrogens);
    }
}
