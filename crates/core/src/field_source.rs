//! Angle sources: producers of direction values for a [`VectorField`].
//!
//! An [`AngleSource`] maps a position to a direction in radians. Sources
//! include a constant direction, noise generators (Perlin, Simplex, Curl)
//! and a vortex around a centre point. [`FieldKind`] builds a source by name
//! from JSON parameters, which is how the CLI and recipes select one.
//!
//! All implementations are deterministic: same inputs produce the same output.
//!
//! [`VectorField`]: crate::field::VectorField

use std::f64::consts::{FRAC_PI_2, TAU};

use noise::{NoiseFn, OpenSimplex, Perlin};
use serde_json::Value;

use crate::error::FlowError;
use crate::params::param_f64;

/// A source of flow directions.
pub trait AngleSource: Send + Sync {
    /// Direction in radians at position `(x, y)`.
    fn angle(&self, x: f64, y: f64) -> f64;
}

/// Default noise frequency. Integer lattice points of Perlin noise are all
/// zero, so a scale of 1.0 would produce a flat field.
const DEFAULT_SCALE: f64 = 0.02;

/// Offset step used by the curl finite difference, in noise space.
const CURL_EPS: f64 = 0.001;

/// Below this, a scale or radius is treated as zero.
const SINGULARITY_EPS: f64 = 1e-10;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The same direction everywhere.
pub struct UniformAngle(pub f64);

/// Perlin noise mapped onto a full turn: `noise(x, y) * 2π`.
pub struct PerlinAngles {
    noise: Perlin,
    scale: f64,
}

/// OpenSimplex noise mapped onto a full turn, same pattern as [`PerlinAngles`].
pub struct SimplexAngles {
    noise: OpenSimplex,
    scale: f64,
}

/// Direction of the curl of scalar Perlin noise, giving divergence-free flow.
pub struct CurlAngles {
    noise: Perlin,
    scale: f64,
}

/// Counter-clockwise rotation around a centre point.
pub struct VortexAngles {
    pub cx: f64,
    pub cy: f64,
}

impl PerlinAngles {
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
        }
    }
}

impl SimplexAngles {
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            scale,
        }
    }
}

impl CurlAngles {
    pub fn new(scale: f64, seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale,
        }
    }
}

impl AngleSource for UniformAngle {
    fn angle(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

impl AngleSource for PerlinAngles {
    fn angle(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x * self.scale, y * self.scale]) * TAU
    }
}

impl AngleSource for SimplexAngles {
    fn angle(&self, x: f64, y: f64) -> f64 {
        self.noise.get([x * self.scale, y * self.scale]) * TAU
    }
}

impl AngleSource for CurlAngles {
    fn angle(&self, x: f64, y: f64) -> f64 {
        if self.scale.abs() < SINGULARITY_EPS {
            return 0.0;
        }
        let sx = x * self.scale;
        let sy = y * self.scale;
        // curl of F in 2D: (dF/dy, -dF/dx)
        let df_dy = self.noise.get([sx, sy + CURL_EPS]) - self.noise.get([sx, sy - CURL_EPS]);
        let df_dx = self.noise.get([sx + CURL_EPS, sy]) - self.noise.get([sx - CURL_EPS, sy]);
        (-df_dx).atan2(df_dy)
    }
}

impl AngleSource for VortexAngles {
    fn angle(&self, x: f64, y: f64) -> f64 {
        let rx = x - self.cx;
        let ry = y - self.cy;
        if rx.abs() < SINGULARITY_EPS && ry.abs() < SINGULARITY_EPS {
            return 0.0;
        }
        ry.atan2(rx) + FRAC_PI_2
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// All recognised field kind names.
const FIELD_NAMES: &[&str] = &["uniform", "perlin", "simplex", "curl", "vortex"];

/// Named angle source families, constructible from JSON parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Uniform,
    Perlin,
    Simplex,
    Curl,
    Vortex,
}

impl FieldKind {
    /// Looks up a kind by name.
    ///
    /// Returns `FlowError::UnknownField` if the name is not recognised.
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        match name {
            "uniform" => Ok(FieldKind::Uniform),
            "perlin" => Ok(FieldKind::Perlin),
            "simplex" => Ok(FieldKind::Simplex),
            "curl" => Ok(FieldKind::Curl),
            "vortex" => Ok(FieldKind::Vortex),
            _ => Err(FlowError::UnknownField(name.to_owned())),
        }
    }

    /// Returns a slice of all recognised field kind names.
    pub fn list_names() -> &'static [&'static str] {
        FIELD_NAMES
    }

    /// Builds the source for a field of side `width`.
    ///
    /// Recognised params: `scale` (noise kinds), `angle` (uniform),
    /// `cx` / `cy` (vortex, default to the field centre).
    pub fn build(self, width: usize, seed: u32, params: &Value) -> Box<dyn AngleSource> {
        let scale = param_f64(params, "scale", DEFAULT_SCALE);
        match self {
            FieldKind::Uniform => Box::new(UniformAngle(param_f64(params, "angle", 0.0))),
            FieldKind::Perlin => Box::new(PerlinAngles::new(scale, seed)),
            FieldKind::Simplex => Box::new(SimplexAngles::new(scale, seed)),
            FieldKind::Curl => Box::new(CurlAngles::new(scale, seed)),
            FieldKind::Vortex => {
                let centre = width as f64 / 2.0;
                Box::new(VortexAngles {
                    cx: param_f64(params, "cx", centre),
                    cy: param_f64(params, "cy", centre),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOL: f64 = 1e-9;

    #[test]
    fn uniform_ignores_position() {
        let src = UniformAngle(1.25);
        assert_eq!(src.angle(0.0, 0.0), 1.25);
        assert_eq!(src.angle(99.5, -3.0), 1.25);
    }

    #[test]
    fn perlin_is_zero_on_integer_lattice_with_unit_scale() {
        let src = PerlinAngles::new(1.0, 7);
        assert!(src.angle(3.0, 4.0).abs() < TOL);
    }

    #[test]
    fn perlin_angles_stay_within_a_full_turn() {
        let src = PerlinAngles::new(0.05, 50);
        for i in 0..200 {
            let a = src.angle(i as f64 * 0.7, i as f64 * 1.3);
            assert!(a.is_finite());
            assert!(a.abs() <= 2.0 * TAU, "angle {a} out of range");
        }
    }

    #[test]
    fn simplex_is_deterministic() {
        let a = SimplexAngles::new(0.03, 11);
        let b = SimplexAngles::new(0.03, 11);
        for i in 0..50 {
            let (x, y) = (i as f64 * 2.1, i as f64 * 0.4);
            assert_eq!(a.angle(x, y).to_bits(), b.angle(x, y).to_bits());
        }
    }

    #[test]
    fn curl_direction_matches_finite_difference() {
        let src = CurlAngles::new(0.05, 3);
        let noise = Perlin::new(3);
        let (x, y) = (12.3, 45.6);
        let (sx, sy) = (x * 0.05, y * 0.05);
        let df_dy = noise.get([sx, sy + CURL_EPS]) - noise.get([sx, sy - CURL_EPS]);
        let df_dx = noise.get([sx + CURL_EPS, sy]) - noise.get([sx - CURL_EPS, sy]);
        let a = src.angle(x, y);
        let (c, s) = (a.cos(), a.sin());
        let len = (df_dy * df_dy + df_dx * df_dx).sqrt();
        assert!((c - df_dy / len).abs() < 1e-6, "cos {c}");
        assert!((s + df_dx / len).abs() < 1e-6, "sin {s}");
    }

    #[test]
    fn curl_with_zero_scale_is_flat() {
        assert_eq!(CurlAngles::new(0.0, 1).angle(5.0, 5.0), 0.0);
    }

    #[test]
    fn vortex_is_tangential() {
        let src = VortexAngles { cx: 10.0, cy: 10.0 };
        // directly right of centre the flow points up (+y)
        assert!((src.angle(15.0, 10.0) - FRAC_PI_2).abs() < TOL);
        // directly above the flow points left (-x)
        let a = src.angle(10.0, 15.0);
        assert!((a.cos() + 1.0).abs() < TOL);
    }

    #[test]
    fn vortex_at_centre_returns_zero() {
        let src = VortexAngles { cx: 4.0, cy: 4.0 };
        assert_eq!(src.angle(4.0, 4.0), 0.0);
    }

    #[test]
    fn from_name_round_trips_every_listed_name() {
        for name in FieldKind::list_names() {
            assert!(FieldKind::from_name(name).is_ok(), "{name} not constructible");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        assert!(matches!(
            FieldKind::from_name("plaid"),
            Err(FlowError::UnknownField(_))
        ));
    }

    #[test]
    fn build_reads_params() {
        let src = FieldKind::Uniform.build(10, 0, &json!({"angle": 0.5}));
        assert_eq!(src.angle(1.0, 1.0), 0.5);

        let vortex = FieldKind::Vortex.build(20, 0, &json!({}));
        // default centre is (10, 10)
        assert!((vortex.angle(15.0, 10.0) - FRAC_PI_2).abs() < TOL);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_coord() -> impl Strategy<Value = f64> {
            -1000.0_f64..1000.0
        }

        proptest! {
            #[test]
            fn all_sources_return_finite_angles(x in any_coord(), y in any_coord(), seed: u32) {
                let params = json!({"scale": 0.03});
                for name in FieldKind::list_names() {
                    let src = FieldKind::from_name(name).unwrap().build(64, seed, &params);
                    let a = src.angle(x, y);
                    prop_assert!(a.is_finite(), "{name} returned {a} at ({x}, {y})");
                }
            }
        }
    }
}
