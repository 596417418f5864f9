//! Walkthrough of the scene graph: load objects, listen to changes,
//! toggle visibility, move things around, and hand the visible sequence
//! to a (text-only) renderer.
//!
//! Usage:
//!   cargo run --example scene_tour

use std::rc::Rc;

use chem::{Molecule, ScalarField, Trajectory};
use scene_graph::prelude::*;

/// A renderer that prints instead of drawing
struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, item: &RenderItem<'_>) {
        match item.data {
            SceneData::Molecule(mol) => {
                println!("  draw {} {} ({} atoms)", item.kind, mol.formula(), mol.atom_count());
            }
            SceneData::ScalarField(field) => {
                let levels = item
                    .settings
                    .as_scalar_field()
                    .map(|s| s.isosurface_values)
                    .unwrap_or_default();
                println!(
                    "  draw {} with {} points, isosurfaces at {:?}",
                    item.kind,
                    field.len(),
                    levels
                );
            }
            SceneData::Trajectory(traj) => {
                println!("  draw {} with {} frames", item.kind, traj.frame_count());
            }
        }
    }
}

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
        .expect("valid molecule"),
    )
}

fn density() -> Rc<ScalarField> {
    let values: Vec<f64> = (0..27).map(|i| (i as f64 / 26.0) - 0.5).collect();
    Rc::new(ScalarField::uniform([-1.0; 3], 0.75, [3, 3, 3], values).expect("valid grid"))
}

fn main() {
    env_logger::init();

    let mut scene = SceneManager::new();

    // Print every change the scene reports.
    scene.signals().subscribe(|event| println!("  [event] {event:?}"));

    println!("Loading objects...");
    let mol = scene.add(water(), "water", None).expect("molecule accepted");
    scene
        .add_scalar_field(density(), "density", Some(mol))
        .expect("field accepted");
    let traj = scene
        .add(
            Rc::new(Trajectory::from_frames(vec![water(), water(), water()])),
            "relaxation",
            None,
        )
        .expect("trajectory accepted");

    println!();
    println!("{}", scene.format_tree(false));
    println!();

    // A bare field cannot sit at the root.
    match scene.add_scalar_field(density(), "stray", None) {
        Err(err) => println!("Rejected as expected: {err}"),
        Ok(_) => unreachable!("the root does not accept bare fields"),
    }

    // Reorder the last frame to the front; one StructureChanged, and the
    // backing frame list follows.
    println!();
    println!("Moving the last frame to the front...");
    let last_frame = *scene
        .get(traj)
        .and_then(|node| node.children().last())
        .expect("trajectory has frames");
    scene
        .move_object(last_frame, traj, Some(0))
        .expect("reorder accepted");

    // Hide the water molecule: its field disappears from the render
    // sequence too, even though the field itself is still marked visible.
    println!();
    println!("Hiding 'water'...");
    scene.set_visibility(mol, false);

    println!();
    println!("Rendering visible objects:");
    let mut renderer = TextRenderer;
    for item in scene.visible_render_sequence() {
        renderer.render(&item);
    }

    println!();
    println!("Final tree:");
    println!("{}", scene.format_tree(true));
}
