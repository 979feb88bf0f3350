//! Deterministic Xorshift64 generator for scattering seed points.
//!
//! Pure integer state transitions, so a given seed yields the same point
//! sequence on every platform and a saved recipe replays bit-identically.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A seed of 0 would lock the generator at 0 forever, so it is replaced by a
/// fixed non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform value in `[0, 1)` built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[min, max)`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform point in `[0, extent)²`; x is drawn before y.
    pub fn next_point(&mut self, extent: f64) -> DVec2 {
        let x = self.next_range(0.0, extent);
        let y = self.next_range(0.0, extent);
        DVec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_value_for_seed_42() {
        // Changing this breaks replay of every saved scatter recipe.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_uses_fallback() {
        let mut zero = Xorshift64::new(0);
        let mut fallback = Xorshift64::new(Xorshift64::FALLBACK_SEED);
        assert_ne!(zero.next_u64(), 0);
        assert_eq!(zero.next_u64(), {
            fallback.next_u64();
            fallback.next_u64()
        });
    }

    #[test]
    fn next_point_stays_in_square() {
        let mut rng = Xorshift64::new(2024);
        for _ in 0..5_000 {
            let p = rng.next_point(120.0);
            assert!((0.0..120.0).contains(&p.x), "x = {}", p.x);
            assert!((0.0..120.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn state_survives_serialization() {
        let mut rng = Xorshift64::new(99);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..20 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_range_in_bounds(seed: u64, min in -1e3_f64..1e3, span in 1e-3_f64..1e3) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..50 {
                    let v = rng.next_range(min, min + span);
                    prop_assert!(v >= min && v < min + span, "{v} outside [{min}, {})", min + span);
                }
            }
        }
    }
}
