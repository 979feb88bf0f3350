#![deny(unsafe_code)]
//! Evenly spaced streamline placement in 2D direction fields.
//!
//! Provides the `VectorField` grid and its noise-based `AngleSource`s, the
//! `SeparationIndex` density grid, the bidirectional `Tracer`, seed sources,
//! the `Placer` orchestrator, `PlacementConfig`, the `Xorshift64` PRNG and
//! reproducible `Recipe`s.

pub mod config;
pub mod curve;
pub mod density;
pub mod error;
pub mod field;
pub mod field_source;
pub mod params;
pub mod placement;
pub mod prng;
pub mod recipe;
pub mod seeds;
pub mod tracer;

pub use config::PlacementConfig;
pub use curve::{Curve, Direction, Step};
pub use density::{CapacityPolicy, SeparationIndex};
pub use error::FlowError;
pub use field::VectorField;
pub use field_source::{AngleSource, FieldKind};
pub use placement::{
    non_overlapping_curves, place_curves, run_direct, run_expansion, Placement, PlacementStats,
    Placer, Proposal,
};
pub use prng::Xorshift64;
pub use recipe::{Mode, Recipe};
pub use seeds::{collect_seeds, scatter_points, ExpansionSeeds, ListSeeds, SeedSource};
pub use tracer::{trace_curve, Tracer};
