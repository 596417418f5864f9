//! Chemistry domain objects for molscope
//!
//! This crate holds the payload types the scene graph hangs off its nodes:
//! molecular structures, volumetric scalar fields, and trajectories (ordered
//! frame sequences). It knows nothing about rendering or the scene tree.
//!
//! # Sharing model
//!
//! Payloads are handed around as `Rc` handles so that two owners can point at
//! the *same* object: a molecule's field map and the scene node representing
//! that field both hold the same `Rc<ScalarField>`, and a trajectory's frame
//! list shares its `Rc<Molecule>` handles with the per-frame scene nodes.
//! The collections the scene graph keeps in lockstep with its child lists
//! (a molecule's scalar-field map, a trajectory's frames) therefore live
//! behind `RefCell` and are mutated through `&self` methods. Everything is
//! single-threaded; borrows are never held across calls.

mod molecule;
mod scalar_field;
mod trajectory;

pub use molecule::Molecule;
pub use scalar_field::ScalarField;
pub use trajectory::Trajectory;
