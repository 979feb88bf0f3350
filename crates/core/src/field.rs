//! Square grid of flow directions.
//!
//! A [`VectorField`] stores `width * width` angles (radians) in row-major
//! order. Continuous coordinates are truncated to the containing cell, and
//! every lookup is bounds-checked: coordinates on or outside the border
//! have no angle.

use crate::error::FlowError;
use crate::field_source::AngleSource;

/// Immutable square grid of direction angles in radians.
#[derive(Debug, Clone)]
pub struct VectorField {
    width: usize,
    angles: Vec<f64>,
}

/// Validates a square side length and returns the cell count.
fn square_len(width: usize) -> Result<usize, FlowError> {
    if width == 0 {
        return Err(FlowError::InvalidDimensions);
    }
    width
        .checked_mul(width)
        .ok_or(FlowError::InvalidDimensions)
}

impl VectorField {
    /// Creates a field from a row-major angle buffer.
    ///
    /// Returns `FlowError::InvalidDimensions` for a zero width and
    /// `FlowError::DimensionMismatch` if `angles.len() != width * width`.
    pub fn from_data(width: usize, angles: Vec<f64>) -> Result<Self, FlowError> {
        let expected = square_len(width)?;
        if angles.len() != expected {
            return Err(FlowError::DimensionMismatch {
                expected,
                got: angles.len(),
            });
        }
        Ok(Self { width, angles })
    }

    /// Creates a field by evaluating `f(col, row)` for every cell.
    pub fn from_fn(width: usize, mut f: impl FnMut(usize, usize) -> f64) -> Result<Self, FlowError> {
        let len = square_len(width)?;
        let angles = (0..len).map(|i| f(i % width, i / width)).collect();
        Ok(Self { width, angles })
    }

    /// Creates a field where every cell points the same way.
    pub fn uniform(width: usize, angle: f64) -> Result<Self, FlowError> {
        let len = square_len(width)?;
        Ok(Self {
            width,
            angles: vec![angle; len],
        })
    }

    /// Samples an [`AngleSource`] at every integer cell coordinate.
    pub fn from_source(width: usize, source: &dyn AngleSource) -> Result<Self, FlowError> {
        Self::from_fn(width, |col, row| source.angle(col as f64, row as f64))
    }

    /// Side length of the square field.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Read-only access to the row-major angle buffer.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// True when `(x, y)` lies strictly inside the field on all four sides.
    ///
    /// Written in the positive form so that NaN coordinates are rejected.
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        let w = self.width as f64;
        x > 0.0 && y > 0.0 && x < w && y < w
    }

    /// Angle of the cell containing `(x, y)`, or `None` outside the field.
    pub fn angle_at(&self, x: f64, y: f64) -> Option<f64> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let col = x as usize;
        let row = y as usize;
        self.angles.get(row * self.width + col).copied()
    }
}
