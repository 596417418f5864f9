//! Child-acceptance rules and domain-collection synchronization

use std::rc::Rc;

use crate::scene::{SceneData, SceneObject};
use crate::tree::{Node, NodeKind, TreePolicy};
use crate::TreeError;

/// The fixed parent/child kind table for scene trees
///
/// - the root holds molecules and trajectories (never bare scalar fields)
/// - a molecule holds scalar fields
/// - a trajectory holds molecules (its frames)
/// - a scalar field holds nothing
pub fn allowed_child(parent: NodeKind, child: NodeKind) -> Result<(), TreeError> {
    let allowed = match parent {
        NodeKind::Root => matches!(child, NodeKind::Molecule | NodeKind::Trajectory),
        NodeKind::Molecule => matches!(child, NodeKind::ScalarField),
        NodeKind::Trajectory => matches!(child, NodeKind::Molecule),
        NodeKind::ScalarField => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(TreeError::PolicyRejected(reject_reason(parent, child)))
    }
}

fn reject_reason(parent: NodeKind, child: NodeKind) -> String {
    match parent {
        NodeKind::ScalarField => "scalar fields cannot have children".into(),
        NodeKind::Molecule => format!("molecules can only have scalar fields, not {child}"),
        NodeKind::Trajectory => format!("trajectories can only have molecules, not {child}"),
        NodeKind::Root => {
            format!("the scene root can only hold molecules and trajectories, not {child}")
        }
    }
}

/// Scene policy: the kind table, name uniqueness, and lockstep sync
///
/// The sync hooks are what make a structural mutation atomic with respect to
/// the domain collections: by the time any event is emitted, a molecule's
/// field map matches its children and a trajectory's frame list matches its
/// frame nodes, in membership and in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenePolicy;

impl TreePolicy<SceneObject> for ScenePolicy {
    fn can_adopt(
        &self,
        parent: &Node<SceneObject>,
        child: &Node<SceneObject>,
        siblings: &[&Node<SceneObject>],
    ) -> Result<(), TreeError> {
        allowed_child(parent.kind(), child.kind())?;
        if parent.kind() == NodeKind::Molecule
            && siblings.iter().any(|s| s.name() == child.name())
        {
            return Err(TreeError::PolicyRejected(format!(
                "a scalar field named '{}' already exists",
                child.name()
            )));
        }
        Ok(())
    }

    fn check_rename(
        &self,
        parent: &Node<SceneObject>,
        node: &Node<SceneObject>,
        new_name: &str,
        siblings: &[&Node<SceneObject>],
    ) -> Result<(), TreeError> {
        if parent.kind() == NodeKind::Molecule
            && siblings
                .iter()
                .any(|s| s.id() != node.id() && s.name() == new_name)
        {
            return Err(TreeError::PolicyRejected(format!(
                "a scalar field named '{new_name}' already exists"
            )));
        }
        Ok(())
    }

    fn child_attached(&self, parent: &Node<SceneObject>, child: &Node<SceneObject>, index: usize) {
        let (Some(parent_obj), Some(child_obj)) = (parent.payload(), child.payload()) else {
            return;
        };
        match (&parent_obj.data, &child_obj.data) {
            (SceneData::Molecule(molecule), SceneData::ScalarField(field)) => {
                molecule.insert_scalar_field(index, child.name(), Rc::clone(field));
            }
            (SceneData::Trajectory(trajectory), SceneData::Molecule(frame)) => {
                trajectory.insert_frame(index, Rc::clone(frame));
            }
            _ => {}
        }
    }

    fn child_detached(&self, parent: &Node<SceneObject>, child: &Node<SceneObject>, index: usize) {
        let (Some(parent_obj), Some(child_obj)) = (parent.payload(), child.payload()) else {
            return;
        };
        match (&parent_obj.data, &child_obj.data) {
            (SceneData::Molecule(molecule), SceneData::ScalarField(_)) => {
                let _ = molecule.remove_scalar_field(child.name());
            }
            (SceneData::Trajectory(trajectory), SceneData::Molecule(_)) => {
                let _ = trajectory.remove_frame(index);
            }
            _ => {}
        }
    }

    fn child_reordered(
        &self,
        parent: &Node<SceneObject>,
        child: &Node<SceneObject>,
        from: usize,
        to: usize,
    ) {
        let (Some(parent_obj), Some(child_obj)) = (parent.payload(), child.payload()) else {
            return;
        };
        match (&parent_obj.data, &child_obj.data) {
            (SceneData::Molecule(molecule), SceneData::ScalarField(_)) => {
                molecule.move_scalar_field(from, to);
            }
            (SceneData::Trajectory(trajectory), SceneData::Molecule(_)) => {
                trajectory.move_frame(from, to);
            }
            _ => {}
        }
    }

    fn child_renamed(&self, parent: &Node<SceneObject>, child: &Node<SceneObject>, old_name: &str) {
        let (Some(parent_obj), Some(child_obj)) = (parent.payload(), child.payload()) else {
            return;
        };
        if let (SceneData::Molecule(molecule), SceneData::ScalarField(_)) =
            (&parent_obj.data, &child_obj.data)
        {
            molecule.rename_scalar_field(old_name, child.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table_is_exhaustive() {
        use NodeKind::*;
        let kinds = [Root, Molecule, ScalarField, Trajectory];
        let allowed: Vec<(NodeKind, NodeKind)> = kinds
            .iter()
            .flat_map(|&p| kinds.iter().map(move |&c| (p, c)))
            .filter(|&(p, c)| allowed_child(p, c).is_ok())
            .collect();

        assert_eq!(
            allowed,
            vec![
                (Root, Molecule),
                (Root, Trajectory),
                (Molecule, ScalarField),
                (Trajectory, Molecule),
            ]
        );
    }

    #[test]
    fn test_rejection_reasons() {
        let err = allowed_child(NodeKind::ScalarField, NodeKind::Molecule).unwrap_err();
        let TreeError::PolicyRejected(reason) = err else {
            panic!("expected a policy rejection");
        };
        assert!(reason.contains("cannot have children"));

        let err = allowed_child(NodeKind::Root, NodeKind::ScalarField).unwrap_err();
        let TreeError::PolicyRejected(reason) = err else {
            panic!("expected a policy rejection");
        };
        assert!(reason.contains("molecules and trajectories"));
    }
}
