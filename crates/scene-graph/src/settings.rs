//! Render settings records attached to scene nodes
//!
//! Each payload-bearing node carries one settings record matching its kind.
//! Records are plain values compared by `==`; the coordinator only emits a
//! change event when an update actually differs, so a settings dialog that
//! re-applies the current values causes no redraw.

use std::collections::HashMap;

use crate::tree::NodeKind;

/// How a molecule is drawn
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoleculeRenderSettings {
    pub show_hydrogens: bool,
    pub show_numbers: bool,
    pub alpha: f64,
    /// Sphere/tube tessellation resolution
    pub resolution: u32,
    /// Per-element RGB overrides, keyed by element symbol
    pub custom_colors: HashMap<String, [f32; 3]>,
}

impl Default for MoleculeRenderSettings {
    fn default() -> Self {
        Self {
            show_hydrogens: true,
            show_numbers: false,
            alpha: 1.0,
            resolution: 20,
            custom_colors: HashMap::new(),
        }
    }
}

/// How a scalar field is drawn
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarFieldRenderSettings {
    /// Negative and positive isosurface levels
    pub isosurface_values: (f64, f64),
    pub opacity: f64,
    /// Colors for the negative and positive lobes
    pub colors: (String, String),
    pub show_grid_surface: bool,
    pub show_grid_points: bool,
    pub grid_surface_color: String,
    pub grid_points_color: String,
    pub grid_points_size: u32,
    pub smooth_surface: bool,
    pub show_filtered_points: bool,
    pub point_value_range: (f64, f64),
}

impl Default for ScalarFieldRenderSettings {
    fn default() -> Self {
        Self {
            isosurface_values: (-0.1, 0.1),
            opacity: 0.3,
            colors: ("blue".into(), "red".into()),
            show_grid_surface: false,
            show_grid_points: false,
            grid_surface_color: "blue".into(),
            grid_points_color: "red".into(),
            grid_points_size: 5,
            smooth_surface: true,
            show_filtered_points: false,
            point_value_range: (0.0, 1.0),
        }
    }
}

/// How a trajectory container is drawn
///
/// Frames render through their own molecule settings; nothing is configurable
/// at the container level yet.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryRenderSettings {}

/// A node's settings record, tagged by the kind it belongs to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderSettings {
    Molecule(MoleculeRenderSettings),
    ScalarField(ScalarFieldRenderSettings),
    Trajectory(TrajectoryRenderSettings),
}

impl RenderSettings {
    /// The node kind this record belongs to
    pub fn kind(&self) -> NodeKind {
        match self {
            RenderSettings::Molecule(_) => NodeKind::Molecule,
            RenderSettings::ScalarField(_) => NodeKind::ScalarField,
            RenderSettings::Trajectory(_) => NodeKind::Trajectory,
        }
    }

    /// The molecule record, if this is one
    pub fn as_molecule(&self) -> Option<&MoleculeRenderSettings> {
        match self {
            RenderSettings::Molecule(s) => Some(s),
            _ => None,
        }
    }

    /// The scalar-field record, if this is one
    pub fn as_scalar_field(&self) -> Option<&ScalarFieldRenderSettings> {
        match self {
            RenderSettings::ScalarField(s) => Some(s),
            _ => None,
        }
    }
}

impl From<MoleculeRenderSettings> for RenderSettings {
    fn from(s: MoleculeRenderSettings) -> Self {
        RenderSettings::Molecule(s)
    }
}

impl From<ScalarFieldRenderSettings> for RenderSettings {
    fn from(s: ScalarFieldRenderSettings) -> Self {
        RenderSettings::ScalarField(s)
    }
}

impl From<TrajectoryRenderSettings> for RenderSettings {
    fn from(s: TrajectoryRenderSettings) -> Self {
        RenderSettings::Trajectory(s)
    }
}

/// Default settings handed to new nodes
///
/// An explicit value owned by the scene coordinator; there is no global
/// settings singleton. Edit the fields to change what newly added objects
/// look like; existing nodes keep their own records.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettingsFactory {
    pub molecule: MoleculeRenderSettings,
    pub scalar_field: ScalarFieldRenderSettings,
    pub trajectory: TrajectoryRenderSettings,
}

impl SettingsFactory {
    /// A fresh settings record for a node of the given kind
    ///
    /// Returns `None` for [`NodeKind::Root`], which carries no settings.
    pub fn defaults_for(&self, kind: NodeKind) -> Option<RenderSettings> {
        match kind {
            NodeKind::Root => None,
            NodeKind::Molecule => Some(RenderSettings::Molecule(self.molecule.clone())),
            NodeKind::ScalarField => Some(RenderSettings::ScalarField(self.scalar_field.clone())),
            NodeKind::Trajectory => Some(RenderSettings::Trajectory(self.trajectory.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = MoleculeRenderSettings::default();
        assert!(settings.show_hydrogens);
        assert_eq!(settings.alpha, 1.0);

        let field = ScalarFieldRenderSettings::default();
        assert_eq!(field.isosurface_values, (-0.1, 0.1));
        assert_eq!(field.colors.0, "blue");
    }

    #[test]
    fn test_value_comparison() {
        let a = MoleculeRenderSettings::default();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.alpha = 0.5;
        assert_ne!(a, b);
    }

    #[test]
    fn test_factory_by_kind() {
        let factory = SettingsFactory {
            molecule: MoleculeRenderSettings {
                show_hydrogens: false,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(factory.defaults_for(NodeKind::Root).is_none());
        let settings = factory.defaults_for(NodeKind::Molecule).unwrap();
        assert_eq!(settings.kind(), NodeKind::Molecule);
        assert!(!settings.as_molecule().unwrap().show_hydrogens);
        assert_eq!(
            factory.defaults_for(NodeKind::ScalarField).unwrap().kind(),
            NodeKind::ScalarField
        );
    }
}
