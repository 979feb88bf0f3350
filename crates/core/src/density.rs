//! Separation index: a density grid answering "is this point far enough from
//! every accepted point?".
//!
//! The grid covers the field with square cells of side `d_sep`, so any point
//! closer than `d_sep` to a query must live in the query's cell or one of its
//! eight neighbours. Each query therefore scans at most a 3×3 block.
//!
//! Two tolerances are fixed:
//! - one full cell at every grid edge is out of bounds, so the 3×3 scan never
//!   runs off the grid;
//! - the separation test uses `d_sep * 0.99`, absorbing rounding error for
//!   points placed at exactly `d_sep` (seed offsets are exactly that far).

use glam::DVec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::error::FlowError;
use crate::field::VectorField;

/// Fraction of `d_sep` below which two points are considered too close.
pub const SEPARATION_TOLERANCE: f64 = 0.99;

/// What a cell does when it fills up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Stores at most `cell_capacity - 1` points per cell and drops the rest.
    /// Dropped points are invisible to later queries, so an undersized
    /// capacity silently weakens the separation guarantee. Drops are counted.
    #[default]
    Bounded,
    /// Cells grow without limit; nothing is ever dropped.
    Unbounded,
}

impl CapacityPolicy {
    /// Parses `"bounded"` or `"unbounded"`.
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        match name {
            "bounded" => Ok(CapacityPolicy::Bounded),
            "unbounded" => Ok(CapacityPolicy::Unbounded),
            other => Err(FlowError::invalid(
                "capacity_policy",
                format!("expected 'bounded' or 'unbounded', got '{other}'"),
            )),
        }
    }
}

/// Spatial hash of accepted curve points, used for proximity queries.
///
/// Points are only ever added. The index is owned by the placer and lent to
/// the tracer by shared reference.
#[derive(Debug, Clone)]
pub struct SeparationIndex {
    d_sep: f64,
    d_test: f64,
    grid_width: usize,
    grid_height: usize,
    cell_capacity: usize,
    policy: CapacityPolicy,
    cells: Vec<Vec<DVec2>>,
    dropped: usize,
}

impl SeparationIndex {
    /// Creates an empty index over a `field_width × field_height` area.
    ///
    /// The grid is `⌊field_width / d_sep⌋ × ⌊field_height / d_sep⌋` cells.
    /// Returns `FlowError::InvalidParameter` if `d_sep` is not a positive
    /// finite number and `FlowError::InvalidDimensions` if the grid would have
    /// no cells.
    pub fn new(
        field_width: usize,
        field_height: usize,
        d_sep: f64,
        cell_capacity: usize,
        policy: CapacityPolicy,
    ) -> Result<Self, FlowError> {
        if !(d_sep.is_finite() && d_sep > 0.0) {
            return Err(FlowError::invalid("d_sep", "must be a positive finite number"));
        }
        let grid_width = (field_width as f64 / d_sep).floor() as usize;
        let grid_height = (field_height as f64 / d_sep).floor() as usize;
        if grid_width == 0 || grid_height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        let len = grid_width
            .checked_mul(grid_height)
            .ok_or(FlowError::InvalidDimensions)?;
        Ok(Self {
            d_sep,
            d_test: d_sep * SEPARATION_TOLERANCE,
            grid_width,
            grid_height,
            cell_capacity,
            policy,
            cells: vec![Vec::new(); len],
            dropped: 0,
        })
    }

    /// Creates an empty index covering the square `field`.
    pub fn for_field(
        field: &VectorField,
        d_sep: f64,
        cell_capacity: usize,
        policy: CapacityPolicy,
    ) -> Result<Self, FlowError> {
        Self::new(field.width(), field.width(), d_sep, cell_capacity, policy)
    }

    /// Grid width in cells.
    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Grid height in cells.
    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn d_sep(&self) -> f64 {
        self.d_sep
    }

    /// Distance at or below which a stored point invalidates a query.
    pub fn separation_threshold(&self) -> f64 {
        self.d_test
    }

    pub fn cell_capacity(&self) -> usize {
        self.cell_capacity
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// Number of in-bounds points discarded because their cell was full.
    pub fn dropped_points(&self) -> usize {
        self.dropped
    }

    /// Total number of points currently stored.
    pub fn stored_points(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Iterates over every stored point, cell by cell.
    pub fn iter_points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// `(col, row)` of the cell containing `(x, y)`, or `None` when the cell
    /// falls in the reserved margin or outside the grid.
    fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = (x / self.d_sep).floor();
        let row = (y / self.d_sep).floor();
        let inside = col >= 1.0
            && row >= 1.0
            && col < (self.grid_width - 1) as f64
            && row < (self.grid_height - 1) as f64;
        inside.then_some((col as usize, row as usize))
    }

    fn linear(&self, col: usize, row: usize) -> usize {
        col + row * self.grid_width
    }

    /// True when `(x, y)` maps to a cell strictly inside the one-cell margin.
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        self.cell_of(x, y).is_some()
    }

    /// Number of points stored in the cell containing `(x, y)`.
    pub fn cell_occupancy(&self, x: f64, y: f64) -> Option<usize> {
        let (col, row) = self.cell_of(x, y)?;
        self.cells.get(self.linear(col, row)).map(Vec::len)
    }

    /// True when the next point inserted into this cell would be dropped.
    ///
    /// Always false under [`CapacityPolicy::Unbounded`] and for out-of-bounds
    /// coordinates.
    pub fn is_near_capacity(&self, x: f64, y: f64) -> bool {
        match (self.policy, self.cell_occupancy(x, y)) {
            (CapacityPolicy::Bounded, Some(used)) => used + 1 >= self.cell_capacity,
            _ => false,
        }
    }

    /// Records a point. Returns whether it was stored.
    ///
    /// Out-of-bounds points are ignored. Under the bounded policy one slot
    /// below the declared capacity is always left free, so a cell stores at
    /// most `cell_capacity - 1` points.
    pub fn insert(&mut self, x: f64, y: f64) -> bool {
        let Some((col, row)) = self.cell_of(x, y) else {
            return false;
        };
        let idx = self.linear(col, row);
        let (policy, capacity) = (self.policy, self.cell_capacity);
        let Some(cell) = self.cells.get_mut(idx) else {
            return false;
        };
        if policy == CapacityPolicy::Bounded && cell.len() + 1 >= capacity {
            if self.dropped == 0 {
                warn!(
                    "density cell ({col}, {row}) reached capacity {capacity}; \
                     further points in full cells are dropped"
                );
            }
            self.dropped += 1;
            return false;
        }
        cell.push(DVec2::new(x, y));
        true
    }

    /// Records every step of `curve` in step order. Returns how many were stored.
    pub fn insert_curve(&mut self, curve: &Curve) -> usize {
        curve
            .steps()
            .iter()
            .filter(|step| self.insert(step.x, step.y))
            .count()
    }

    /// True when `(x, y)` is in bounds and farther than `d_sep * 0.99` from
    /// every stored point.
    ///
    /// Must be asked immediately before accepting any new curve step or seed.
    pub fn is_valid(&self, x: f64, y: f64) -> bool {
        let Some((col, row)) = self.cell_of(x, y) else {
            return false;
        };
        let query = DVec2::new(x, y);
        let cols = col.saturating_sub(1)..=(col + 1).min(self.grid_width - 1);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.grid_height - 1);
        rows.flat_map(|r| cols.clone().map(move |c| (c, r)))
            .filter_map(|(c, r)| self.cells.get(self.linear(c, r)))
            .flatten()
            .all(|p| p.distance(query) > self.d_test)
    }
}
