//! Curve records produced by the tracer.
//!
//! A [`Curve`] is an append-only list of [`Step`]s with a fixed step budget.
//! Once a curve is accepted by the placer it is never mutated again, which is
//! why the only mutating operation is crate-private.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Which integration phase produced a step.
///
/// The seed point itself is tagged `Backward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// Numeric tag used by the row output format: 0 backward, 1 forward.
    pub fn as_flag(self) -> u8 {
        match self {
            Direction::Backward => 0,
            Direction::Forward => 1,
        }
    }
}

/// One recorded point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub x: f64,
    pub y: f64,
    pub direction: Direction,
    /// Position in recording order, starting at 0 for the seed.
    pub index: usize,
}

impl Step {
    pub fn point(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// Upper bound on steps reserved up front; budgets can be arbitrarily large.
const PREALLOC_LIMIT: usize = 1024;

/// A traced streamline.
///
/// Only the tracer builds curves, so they serialize but never deserialize:
/// `steps_taken() <= capacity()` and sequential step indices always hold.
///
/// Steps are stored in recording order: the seed, then the backward phase
/// walking away from it, then the forward phase. They are not sorted along
/// the curve's geometric extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    id: usize,
    capacity: usize,
    steps: Vec<Step>,
}

impl Curve {
    /// Creates an empty curve that can hold at most `capacity` steps.
    pub fn new(id: usize, capacity: usize) -> Self {
        Self {
            id,
            capacity,
            steps: Vec::with_capacity(capacity.min(PREALLOC_LIMIT)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum number of steps this curve may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of steps recorded so far.
    pub fn steps_taken(&self) -> usize {
        self.steps.len()
    }

    pub fn is_full(&self) -> bool {
        self.steps.len() >= self.capacity
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterates over step positions in recording order.
    pub fn points(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.steps.iter().map(Step::point)
    }

    /// Appends a step. Returns `false` and records nothing once the curve is full.
    pub(crate) fn push(&mut self, x: f64, y: f64, direction: Direction) -> bool {
        if self.is_full() {
            return false;
        }
        let index = self.steps.len();
        self.steps.push(Step {
            x,
            y,
            direction,
            index,
        });
        true
    }
}
