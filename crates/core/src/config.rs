//! Placement parameters.
//!
//! The core applies no defaults: every run states its parameters explicitly,
//! either in code, on the command line, or in a saved recipe.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::density::{CapacityPolicy, SeparationIndex};
use crate::error::FlowError;
use crate::field::VectorField;
use crate::params::{param_f64, param_str, param_usize};

/// Numeric parameters of a placement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Target number of accepted curves.
    pub n_curves: usize,
    /// Step budget per curve, seed included.
    pub n_steps: usize,
    /// Curves with fewer steps are discarded.
    pub min_steps_allowed: usize,
    /// Euler step length, in field cells.
    pub step_length: f64,
    /// Minimum distance between curves; also the density cell size.
    pub d_sep: f64,
    /// Per-cell point bound of the density grid.
    pub cell_capacity: usize,
    #[serde(default)]
    pub capacity_policy: CapacityPolicy,
}

impl PlacementConfig {
    /// Rejects parameters that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.n_steps == 0 {
            return Err(FlowError::invalid("n_steps", "must be at least 1"));
        }
        if self.min_steps_allowed > self.n_steps {
            return Err(FlowError::invalid(
                "min_steps_allowed",
                format!("{} exceeds n_steps ({})", self.min_steps_allowed, self.n_steps),
            ));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(FlowError::invalid(
                "step_length",
                "must be a positive finite number",
            ));
        }
        if !(self.d_sep.is_finite() && self.d_sep > 0.0) {
            return Err(FlowError::invalid("d_sep", "must be a positive finite number"));
        }
        if self.capacity_policy == CapacityPolicy::Bounded && self.cell_capacity < 2 {
            return Err(FlowError::invalid(
                "cell_capacity",
                "a bounded cell stores cell_capacity - 1 points, so it must be at least 2",
            ));
        }
        Ok(())
    }

    /// Returns a copy with any keys present in `params` replaced.
    ///
    /// Keys match the field names. Values of the wrong type are ignored,
    /// except an unrecognised `capacity_policy` string, which is an error.
    pub fn with_overrides(&self, params: &Value) -> Result<Self, FlowError> {
        let capacity_policy = match param_str(params, "capacity_policy") {
            Some(name) => CapacityPolicy::from_name(name)?,
            None => self.capacity_policy,
        };
        Ok(Self {
            n_curves: param_usize(params, "n_curves", self.n_curves),
            n_steps: param_usize(params, "n_steps", self.n_steps),
            min_steps_allowed: param_usize(params, "min_steps_allowed", self.min_steps_allowed),
            step_length: param_f64(params, "step_length", self.step_length),
            d_sep: param_f64(params, "d_sep", self.d_sep),
            cell_capacity: param_usize(params, "cell_capacity", self.cell_capacity),
            capacity_policy,
        })
    }

    /// Builds an empty density grid covering `field`.
    pub fn build_index(&self, field: &VectorField) -> Result<SeparationIndex, FlowError> {
        SeparationIndex::for_field(field, self.d_sep, self.cell_capacity, self.capacity_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PlacementConfig {
        PlacementConfig {
            n_curves: 1500,
            n_steps: 30,
            min_steps_allowed: 5,
            step_length: 1.2,
            d_sep: 0.8,
            cell_capacity: 2000,
            capacity_policy: CapacityPolicy::Bounded,
        }
    }

    #[test]
    fn sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_zero_steps() {
        let cfg = PlacementConfig {
            n_steps: 0,
            min_steps_allowed: 0,
            ..sample()
        };
        assert!(matches!(
            cfg.validate(),
            Err(FlowError::InvalidParameter { name, .. }) if name == "n_steps"
        ));
    }

    #[test]
    fn rejects_min_steps_above_budget() {
        let cfg = PlacementConfig {
            min_steps_allowed: 31,
            ..sample()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_lengths() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let step = PlacementConfig {
                step_length: bad,
                ..sample()
            };
            assert!(step.validate().is_err(), "step_length {bad} accepted");
            let sep = PlacementConfig {
                d_sep: bad,
                ..sample()
            };
            assert!(sep.validate().is_err(), "d_sep {bad} accepted");
        }
    }

    #[test]
    fn tiny_capacity_only_allowed_when_unbounded() {
        let bounded = PlacementConfig {
            cell_capacity: 1,
            ..sample()
        };
        assert!(bounded.validate().is_err());
        let unbounded = PlacementConfig {
            cell_capacity: 0,
            capacity_policy: CapacityPolicy::Unbounded,
            ..sample()
        };
        assert!(unbounded.validate().is_ok());
    }

    #[test]
    fn overrides_replace_only_present_keys() {
        let cfg = sample()
            .with_overrides(&json!({"n_curves": 10, "d_sep": 2, "step_length": "long"}))
            .unwrap();
        assert_eq!(cfg.n_curves, 10);
        assert_eq!(cfg.d_sep, 2.0);
        assert_eq!(cfg.step_length, 1.2);
        assert_eq!(cfg.n_steps, 30);
    }

    #[test]
    fn overrides_parse_capacity_policy() {
        let cfg = sample()
            .with_overrides(&json!({"capacity_policy": "unbounded"}))
            .unwrap();
        assert_eq!(cfg.capacity_policy, CapacityPolicy::Unbounded);
        assert!(sample()
            .with_overrides(&json!({"capacity_policy": "ring"}))
            .is_err());
    }

    #[test]
    fn missing_policy_defaults_to_bounded() {
        let cfg: PlacementConfig = serde_json::from_value(json!({
            "n_curves": 3,
            "n_steps": 10,
            "min_steps_allowed": 2,
            "step_length": 1.0,
            "d_sep": 1.5,
            "cell_capacity": 50
        }))
        .unwrap();
        assert_eq!(cfg.capacity_policy, CapacityPolicy::Bounded);
    }

    #[test]
    fn build_index_uses_square_field_width() {
        let field = VectorField::uniform(120, 0.0).unwrap();
        let idx = sample().build_index(&field).unwrap();
        assert_eq!(idx.grid_width(), 150);
        assert_eq!(idx.grid_height(), 150);
        assert_eq!(idx.cell_capacity(), 2000);
    }
}
