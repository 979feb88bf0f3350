//! Error types for the flowlines core.
//!
//! Placement itself never fails: boundary exits, separation violations and
//! short curves are all handled by stopping or discarding. Errors only arise
//! while building the inputs (fields, indexes, configuration).

use thiserror::Error;

/// Errors produced while constructing fields, indexes and configuration.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A grid dimension was zero or its cell count overflowed `usize`.
    #[error("invalid dimensions: grid must have at least one cell")]
    InvalidDimensions,

    /// A data buffer did not match the declared grid size.
    #[error("dimension mismatch: expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A numeric parameter was outside its admissible range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A field kind name was not recognised.
    #[error("unknown field kind: {0}")]
    UnknownField(String),
}

impl FlowError {
    /// Shorthand for [`FlowError::InvalidParameter`].
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        FlowError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
