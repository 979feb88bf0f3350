//! Bidirectional streamline integration.
//!
//! A curve is grown from its seed first against the flow, then along it,
//! using fixed-length Euler steps. Each phase stops at the field border or
//! at the first step that would come too close to an already accepted point.
//! The tracer only reads the [`SeparationIndex`]; inserting accepted curves
//! is the placer's job.

use glam::DVec2;

use crate::curve::{Curve, Direction};
use crate::density::SeparationIndex;
use crate::field::VectorField;

/// Integrates curves through a [`VectorField`] with a fixed step budget.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    field: &'a VectorField,
    n_steps: usize,
    step_length: f64,
}

impl<'a> Tracer<'a> {
    /// Creates a tracer taking Euler steps of `step_length` through `field`.
    pub fn new(field: &'a VectorField, n_steps: usize, step_length: f64) -> Self {
        Self {
            field,
            n_steps,
            step_length,
        }
    }

    pub fn field(&self) -> &'a VectorField {
        self.field
    }

    /// Traces a curve from `start`.
    ///
    /// The seed is recorded unconditionally as step 0 (tagged backward). The
    /// backward phase may grow the curve to `⌊n_steps / 2⌋` steps in total;
    /// the forward phase then restarts from the seed and fills the remaining
    /// budget. The result may be shorter than `n_steps`.
    pub fn trace(&self, id: usize, start: DVec2, index: &SeparationIndex) -> Curve {
        let mut curve = Curve::new(id, self.n_steps);
        if !curve.push(start.x, start.y, Direction::Backward) {
            return curve;
        }
        self.walk(&mut curve, start, Direction::Backward, self.n_steps / 2, index);
        self.walk(&mut curve, start, Direction::Forward, self.n_steps, index);
        curve
    }

    /// Extends `curve` from `start` until it holds `limit` steps or a stop
    /// condition is hit.
    fn walk(
        &self,
        curve: &mut Curve,
        start: DVec2,
        direction: Direction,
        limit: usize,
        index: &SeparationIndex,
    ) {
        let signed_length = match direction {
            Direction::Backward => -self.step_length,
            Direction::Forward => self.step_length,
        };
        let mut p = start;
        while curve.steps_taken() < limit {
            let Some(theta) = self.field.angle_at(p.x, p.y) else {
                break;
            };
            let next = p + DVec2::from_angle(theta) * signed_length;
            if !(self.field.in_bounds(next.x, next.y) && index.is_valid(next.x, next.y)) {
                break;
            }
            curve.push(next.x, next.y, direction);
            p = next;
        }
    }
}

/// Traces a single curve; see [`Tracer::trace`].
pub fn trace_curve(
    id: usize,
    x0: f64,
    y0: f64,
    n_steps: usize,
    step_length: f64,
    field: &VectorField,
    index: &SeparationIndex,
) -> Curve {
    Tracer::new(field, n_steps, step_length).trace(id, DVec2::new(x0, y0), index)
}
