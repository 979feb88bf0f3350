//! Evenly spaced placement: the orchestrator tying tracer, seeds and density
//! grid together.
//!
//! Every candidate goes through the same state machine:
//! `proposed -> validated -> traced -> accepted | discarded`. A candidate that
//! fails validation is never traced. An accepted curve's points are inserted
//! into the density grid before the next candidate is looked at, so later
//! candidates always see every earlier curve.

use glam::DVec2;
use log::{debug, trace, warn};
use serde::Serialize;

use crate::config::PlacementConfig;
use crate::curve::Curve;
use crate::density::SeparationIndex;
use crate::error::FlowError;
use crate::field::VectorField;
use crate::seeds::{ExpansionSeeds, ListSeeds, SeedSource};
use crate::tracer::Tracer;

/// What happened to a single proposed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    /// Outside the field or the density grid, or too close to an accepted
    /// point; not traced.
    Invalid,
    /// Traced, but shorter than `min_steps_allowed`; not inserted.
    TooShort { steps: usize },
    /// Traced, kept and inserted into the density grid.
    Accepted { id: usize },
}

/// Counters describing a placement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlacementStats {
    /// Seeds pulled from a seed source (the initial seed is not counted).
    pub proposed: usize,
    pub rejected_invalid: usize,
    /// Seeds that passed validation and were traced.
    pub traced: usize,
    pub discarded_short: usize,
    /// Curves accepted, the initial curve included.
    pub accepted: usize,
    /// Points lost to full density cells.
    pub dropped_points: usize,
}

/// Result of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub curves: Vec<Curve>,
    pub stats: PlacementStats,
}

/// Streamline placer. Owns the density grid and the accepted curves.
pub struct Placer<'a> {
    tracer: Tracer<'a>,
    index: SeparationIndex,
    min_steps_allowed: usize,
    curves: Vec<Curve>,
    stats: PlacementStats,
}

impl<'a> Placer<'a> {
    /// Creates a placer over `field` that takes ownership of an empty `index`.
    pub fn new(
        field: &'a VectorField,
        index: SeparationIndex,
        n_steps: usize,
        min_steps_allowed: usize,
        step_length: f64,
    ) -> Self {
        Self {
            tracer: Tracer::new(field, n_steps, step_length),
            index,
            min_steps_allowed,
            curves: Vec::new(),
            stats: PlacementStats::default(),
        }
    }

    /// Validates `config` and builds a placer with a fresh density grid.
    pub fn from_config(field: &'a VectorField, config: &PlacementConfig) -> Result<Self, FlowError> {
        config.validate()?;
        let index = config.build_index(field)?;
        Ok(Self::new(
            field,
            index,
            config.n_steps,
            config.min_steps_allowed,
            config.step_length,
        ))
    }

    /// Curves accepted so far, in acceptance order (`curves[i].id() == i`).
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn index(&self) -> &SeparationIndex {
        &self.index
    }

    pub fn stats(&self) -> PlacementStats {
        PlacementStats {
            dropped_points: self.index.dropped_points(),
            ..self.stats
        }
    }

    fn accept(&mut self, curve: Curve) -> usize {
        let indexed = self.index.insert_curve(&curve);
        let id = curve.id();
        debug!(
            "accepted curve {id}: {} steps, {indexed} indexed",
            curve.steps_taken()
        );
        self.curves.push(curve);
        self.stats.accepted += 1;
        id
    }

    /// Traces from `start` and accepts the result whatever its length.
    ///
    /// The start point itself is not validated. Returns the new curve's id.
    pub fn seed_initial(&mut self, start: DVec2) -> usize {
        let curve = self.tracer.trace(self.curves.len(), start, &self.index);
        self.accept(curve)
    }

    /// Runs one candidate through validation, tracing and the length rule.
    ///
    /// A seed must lie inside the field before the density grid is asked,
    /// since the grid may cover more than the field.
    pub fn propose(&mut self, seed: DVec2) -> Proposal {
        self.stats.proposed += 1;
        let in_field = self.tracer.field().in_bounds(seed.x, seed.y);
        if !(in_field && self.index.is_valid(seed.x, seed.y)) {
            self.stats.rejected_invalid += 1;
            trace!("rejected seed ({}, {})", seed.x, seed.y);
            return Proposal::Invalid;
        }
        self.stats.traced += 1;
        let curve = self.tracer.trace(self.curves.len(), seed, &self.index);
        let steps = curve.steps_taken();
        if steps < self.min_steps_allowed {
            self.stats.discarded_short += 1;
            trace!("discarded {steps}-step curve from ({}, {})", seed.x, seed.y);
            return Proposal::TooShort { steps };
        }
        Proposal::Accepted {
            id: self.accept(curve),
        }
    }

    /// Pulls candidates from `source` until `target` curves are accepted or
    /// the source runs dry.
    pub fn fill<S: SeedSource + ?Sized>(&mut self, source: &mut S, target: usize) {
        while self.curves.len() < target {
            let Some(seed) = source.next_seed(&self.curves) else {
                break;
            };
            self.propose(seed);
        }
    }

    pub fn finish(self) -> Placement {
        let stats = self.stats();
        if stats.dropped_points > 0 {
            warn!(
                "{} points were dropped by full density cells (capacity {}); \
                 separation is not guaranteed near them",
                stats.dropped_points,
                self.index.cell_capacity()
            );
        }
        debug!(
            "placement finished: {} accepted, {} invalid, {} too short, of {} proposed",
            stats.accepted, stats.rejected_invalid, stats.discarded_short, stats.proposed
        );
        Placement {
            curves: self.curves,
            stats,
        }
    }
}

/// Expansion placement from a single start point.
///
/// The first curve is accepted unconditionally; further curves grow from
/// the `d_sep` offsets of accepted curves, breadth-first, until `n_curves`
/// are accepted or no accepted curve is left to expand.
#[allow(clippy::too_many_arguments)]
pub fn place_curves(
    x0: f64,
    y0: f64,
    n_curves: usize,
    n_steps: usize,
    min_steps_allowed: usize,
    step_length: f64,
    d_sep: f64,
    field: &VectorField,
    index: SeparationIndex,
) -> Vec<Curve> {
    let mut placer = Placer::new(field, index, n_steps, min_steps_allowed, step_length);
    placer.seed_initial(DVec2::new(x0, y0));
    placer.fill(&mut ExpansionSeeds::new(d_sep), n_curves);
    placer.finish().curves
}

/// Direct placement from an externally supplied seed list, without expansion.
pub fn non_overlapping_curves(
    seeds: impl IntoIterator<Item = DVec2>,
    n_steps: usize,
    min_steps_allowed: usize,
    step_length: f64,
    field: &VectorField,
    index: SeparationIndex,
) -> Vec<Curve> {
    let mut placer = Placer::new(field, index, n_steps, min_steps_allowed, step_length);
    placer.fill(&mut ListSeeds::new(seeds), usize::MAX);
    placer.finish().curves
}

/// [`place_curves`] driven by a validated [`PlacementConfig`].
pub fn run_expansion(
    field: &VectorField,
    start: DVec2,
    config: &PlacementConfig,
) -> Result<Placement, FlowError> {
    let mut placer = Placer::from_config(field, config)?;
    placer.seed_initial(start);
    placer.fill(&mut ExpansionSeeds::new(config.d_sep), config.n_curves);
    Ok(placer.finish())
}

/// [`non_overlapping_curves`] driven by a validated [`PlacementConfig`].
///
/// `config.n_curves` caps the number of accepted curves.
pub fn run_direct(
    field: &VectorField,
    seeds: impl IntoIterator<Item = DVec2>,
    config: &PlacementConfig,
) -> Result<Placement, FlowError> {
    let mut placer = Placer::from_config(field, config)?;
    placer.fill(&mut ListSeeds::new(seeds), config.n_curves);
    Ok(placer.finish())
}
