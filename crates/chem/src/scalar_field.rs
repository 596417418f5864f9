//! Volumetric scalar fields sampled on a regular grid

use anyhow::{ensure, Result};

/// A scalar field sampled on a regular three-dimensional grid
///
/// The grid is described by an origin and three basis vectors (one per grid
/// axis, cube-file style); `values` holds one sample per grid point in
/// row-major order (the last axis varies fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    origin: [f64; 3],
    basis: [[f64; 3]; 3],
    shape: [usize; 3],
    values: Vec<f64>,
}

impl ScalarField {
    /// Create a scalar field from raw grid data
    ///
    /// # Errors
    ///
    /// Fails if the number of values does not match the grid shape.
    pub fn new(
        origin: [f64; 3],
        basis: [[f64; 3]; 3],
        shape: [usize; 3],
        values: Vec<f64>,
    ) -> Result<Self> {
        let expected = shape[0] * shape[1] * shape[2];
        ensure!(
            values.len() == expected,
            "grid shape {:?} needs {} values, got {}",
            shape,
            expected,
            values.len()
        );
        Ok(Self {
            origin,
            basis,
            shape,
            values,
        })
    }

    /// Create a field on an axis-aligned grid with uniform spacing
    pub fn uniform(origin: [f64; 3], spacing: f64, shape: [usize; 3], values: Vec<f64>) -> Result<Self> {
        let basis = [
            [spacing, 0.0, 0.0],
            [0.0, spacing, 0.0],
            [0.0, 0.0, spacing],
        ];
        Self::new(origin, basis, shape, values)
    }

    /// Grid origin in Cartesian coordinates
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Grid basis vectors, one per axis
    pub fn basis(&self) -> [[f64; 3]; 3] {
        self.basis
    }

    /// Number of grid points along each axis
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Sampled values in row-major order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Total number of grid points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the grid has no points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Minimum and maximum sampled values, useful for isosurface pickers
    ///
    /// Returns `None` for an empty field.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for v in iter {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shape_validation() {
        let field = ScalarField::uniform([0.0; 3], 0.5, [2, 2, 2], vec![0.0; 8]);
        assert!(field.is_ok());

        let bad = ScalarField::uniform([0.0; 3], 0.5, [2, 2, 2], vec![0.0; 7]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_value_range() {
        let field =
            ScalarField::uniform([0.0; 3], 1.0, [1, 2, 2], vec![0.3, -1.5, 2.0, 0.0]).unwrap();
        assert_eq!(field.value_range(), Some((-1.5, 2.0)));
        assert_eq!(field.len(), 4);

        let empty = ScalarField::uniform([0.0; 3], 1.0, [0, 0, 0], vec![]).unwrap();
        assert_eq!(empty.value_range(), None);
        assert!(empty.is_empty());
    }
}
