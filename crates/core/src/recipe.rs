//! Reproducible description of a placement run.
//!
//! A [`Recipe`] captures everything needed to recreate a set of curves:
//! field kind and parameters, field size, noise seed, placement parameters
//! and seeding mode. Running the same recipe twice yields bit-identical
//! curves.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PlacementConfig;
use crate::error::FlowError;
use crate::field::VectorField;
use crate::field_source::FieldKind;
use crate::placement::{run_direct, run_expansion, Placement};
use crate::seeds::scatter_points;

/// How seed points are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mode {
    /// Expansion from one start point.
    Expand { x0: f64, y0: f64 },
    /// Direct placement from `seeds` points scattered by a seeded PRNG.
    Scatter { seeds: usize, seed: u64 },
}

/// A complete, replayable placement run, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Field kind name, see [`FieldKind::list_names`].
    pub field: String,
    pub width: usize,
    pub noise_seed: u32,
    #[serde(default = "empty_params")]
    pub field_params: Value,
    pub placement: PlacementConfig,
    pub mode: Mode,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Recipe {
    /// Creates an expansion recipe with empty field params.
    pub fn expand(
        field: &str,
        width: usize,
        noise_seed: u32,
        placement: PlacementConfig,
        start: DVec2,
    ) -> Self {
        Self {
            field: field.to_string(),
            width,
            noise_seed,
            field_params: empty_params(),
            placement,
            mode: Mode::Expand {
                x0: start.x,
                y0: start.y,
            },
        }
    }

    /// Checks the field name, the field size and the placement parameters.
    pub fn validate(&self) -> Result<(), FlowError> {
        FieldKind::from_name(&self.field)?;
        if self.width == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.width)
            .ok_or(FlowError::InvalidDimensions)?;
        self.placement.validate()
    }

    /// Samples the recipe's field source into a grid.
    pub fn build_field(&self) -> Result<VectorField, FlowError> {
        let source =
            FieldKind::from_name(&self.field)?.build(self.width, self.noise_seed, &self.field_params);
        VectorField::from_source(self.width, source.as_ref())
    }

    /// Validates, builds the field and runs the placement the mode selects.
    pub fn run(&self) -> Result<Placement, FlowError> {
        self.validate()?;
        let field = self.build_field()?;
        match self.mode {
            Mode::Expand { x0, y0 } => run_expansion(&field, DVec2::new(x0, y0), &self.placement),
            Mode::Scatter { seeds, seed } => {
                let points = scatter_points(seeds, self.width, seed);
                run_direct(&field, points, &self.placement)
            }
        }
    }
}
