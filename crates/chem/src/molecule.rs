//! Molecular structures and their attached scalar fields

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{ensure, Result};

use crate::ScalarField;

/// A molecular structure: element symbols plus Cartesian positions
///
/// A molecule also owns a name-keyed, insertion-ordered map of scalar fields
/// attached to it (electron density, orbitals, ...). The scene graph keeps
/// this map in lockstep with the molecule node's children; mutate it through
/// the scene rather than directly when the molecule is part of a scene.
#[derive(Debug)]
pub struct Molecule {
    symbols: Vec<String>,
    positions: Vec<[f64; 3]>,
    scalar_fields: RefCell<Vec<(String, Rc<ScalarField>)>>,
}

impl Molecule {
    /// Create a molecule from element symbols and positions
    ///
    /// # Errors
    ///
    /// Fails if the symbol and position counts differ.
    pub fn new(symbols: Vec<String>, positions: Vec<[f64; 3]>) -> Result<Self> {
        ensure!(
            symbols.len() == positions.len(),
            "got {} symbols but {} positions",
            symbols.len(),
            positions.len()
        );
        Ok(Self {
            symbols,
            positions,
            scalar_fields: RefCell::new(Vec::new()),
        })
    }

    /// Number of atoms
    pub fn atom_count(&self) -> usize {
        self.symbols.len()
    }

    /// Element symbols, one per atom
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Cartesian positions, one per atom
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// Chemical formula with element counts in alphabetical order
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for symbol in &self.symbols {
            *counts.entry(symbol.as_str()).or_insert(0) += 1;
        }
        let mut out = String::new();
        for (symbol, count) in counts {
            out.push_str(symbol);
            if count > 1 {
                out.push_str(&count.to_string());
            }
        }
        out
    }

    /// Number of attached scalar fields
    pub fn scalar_field_count(&self) -> usize {
        self.scalar_fields.borrow().len()
    }

    /// Field names in map order
    pub fn scalar_field_names(&self) -> Vec<String> {
        self.scalar_fields
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Look up an attached field by name
    pub fn scalar_field(&self, name: &str) -> Option<Rc<ScalarField>> {
        self.scalar_fields
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| Rc::clone(field))
    }

    /// Returns true if a field with the given name is attached
    pub fn has_scalar_field(&self, name: &str) -> bool {
        self.scalar_fields.borrow().iter().any(|(n, _)| n == name)
    }

    /// Snapshot of the field map in order
    pub fn scalar_fields(&self) -> Vec<(String, Rc<ScalarField>)> {
        self.scalar_fields.borrow().clone()
    }

    /// Attach a field at the end of the map
    pub fn push_scalar_field(&self, name: impl Into<String>, field: Rc<ScalarField>) {
        self.scalar_fields.borrow_mut().push((name.into(), field));
    }

    /// Attach a field at a specific position in the map
    ///
    /// The caller is responsible for name uniqueness and a valid index.
    pub fn insert_scalar_field(&self, index: usize, name: impl Into<String>, field: Rc<ScalarField>) {
        let mut fields = self.scalar_fields.borrow_mut();
        let name = name.into();
        debug_assert!(!fields.iter().any(|(n, _)| *n == name));
        debug_assert!(index <= fields.len());
        let pos = index.min(fields.len());
        fields.insert(pos, (name, field));
    }

    /// Detach a field by name, returning it if present
    pub fn remove_scalar_field(&self, name: &str) -> Option<Rc<ScalarField>> {
        let mut fields = self.scalar_fields.borrow_mut();
        let index = fields.iter().position(|(n, _)| n == name)?;
        Some(fields.remove(index).1)
    }

    /// Relocate a field within the map
    pub fn move_scalar_field(&self, from: usize, to: usize) {
        let mut fields = self.scalar_fields.borrow_mut();
        if from < fields.len() && to < fields.len() {
            let entry = fields.remove(from);
            fields.insert(to, entry);
        }
    }

    /// Change a field's key in place, keeping its position
    ///
    /// Returns false if no field with the old name exists.
    pub fn rename_scalar_field(&self, old: &str, new: impl Into<String>) -> bool {
        let mut fields = self.scalar_fields.borrow_mut();
        match fields.iter_mut().find(|(n, _)| n == old) {
            Some(entry) => {
                entry.0 = new.into();
                true
            }
            None => false,
        }
    }

    /// Drain the field map, returning the entries in order
    ///
    /// Used when a molecule enters a scene: its fields are re-attached as
    /// child nodes, which rebuilds the map through the scene's own
    /// bookkeeping.
    pub fn take_scalar_fields(&self) -> Vec<(String, Rc<ScalarField>)> {
        std::mem::take(&mut *self.scalar_fields.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn water() -> Molecule {
        Molecule::new(
            vec!["O".into(), "H".into(), "H".into()],
            vec![
                [0.0, 0.0, 0.0],
                [0.757, 0.586, 0.0],
                [-0.757, 0.586, 0.0],
            ],
        )
        .unwrap()
    }

    fn field() -> Rc<ScalarField> {
        Rc::new(ScalarField::uniform([0.0; 3], 1.0, [2, 2, 2], vec![0.0; 8]).unwrap())
    }

    #[test]
    fn test_molecule_creation() {
        let mol = water();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.formula(), "H2O");
        assert_eq!(mol.scalar_field_count(), 0);

        let bad = Molecule::new(vec!["H".into()], vec![]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_scalar_field_map_order() {
        let mol = water();
        mol.push_scalar_field("density", field());
        mol.push_scalar_field("homo", field());
        mol.insert_scalar_field(1, "lumo", field());

        assert_eq!(mol.scalar_field_names(), vec!["density", "lumo", "homo"]);
        assert!(mol.has_scalar_field("lumo"));
        assert!(mol.scalar_field("density").is_some());
        assert!(mol.scalar_field("missing").is_none());
    }

    #[test]
    fn test_scalar_field_removal_and_rename() {
        let mol = water();
        let f = field();
        mol.push_scalar_field("density", Rc::clone(&f));
        mol.push_scalar_field("homo", field());

        let removed = mol.remove_scalar_field("density").unwrap();
        assert!(Rc::ptr_eq(&removed, &f));
        assert_eq!(mol.scalar_field_names(), vec!["homo"]);

        assert!(mol.rename_scalar_field("homo", "homo-1"));
        assert!(!mol.rename_scalar_field("homo", "x"));
        assert_eq!(mol.scalar_field_names(), vec!["homo-1"]);
    }

    #[test]
    fn test_take_scalar_fields() {
        let mol = water();
        mol.push_scalar_field("density", field());
        let drained = mol.take_scalar_fields();
        assert_eq!(drained.len(), 1);
        assert_eq!(mol.scalar_field_count(), 0);
    }
}
