//! Seed points: where new curves may start.
//!
//! [`collect_seeds`] offsets every step of an accepted curve by `d_sep` to
//! each side. The placer pulls candidates through the [`SeedSource`] trait,
//! which has two implementations: [`ExpansionSeeds`] (offsets of accepted
//! curves, breadth-first) and [`ListSeeds`] (an externally supplied list).
//! No source filters its candidates; validation is the placer's job.

use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;

use glam::DVec2;

use crate::curve::Curve;
use crate::prng::Xorshift64;

/// Candidate seeds offset `d_sep` to the left and right of each step.
///
/// For every consecutive pair of steps `(i, i + 1)` the tangent at step `i`
/// is the direction towards step `i + 1`; the left point (tangent + 90°) is
/// emitted before the right point (tangent - 90°). Pairs are taken in
/// recording order, so a curve of `n` steps yields `2 * (n - 1)` candidates.
pub fn collect_seeds(curve: &Curve, d_sep: f64) -> Vec<DVec2> {
    curve
        .steps()
        .windows(2)
        .flat_map(|pair| {
            let here = pair[0].point();
            let next = pair[1].point();
            let tangent = (next.y - here.y).atan2(next.x - here.x);
            [
                here + DVec2::from_angle(tangent + FRAC_PI_2) * d_sep,
                here + DVec2::from_angle(tangent - FRAC_PI_2) * d_sep,
            ]
        })
        .collect()
}

/// Supplies candidate seed points to the placer one at a time.
pub trait SeedSource {
    /// Next candidate, given every curve accepted so far (in acceptance
    /// order). `None` means the source is exhausted.
    fn next_seed(&mut self, accepted: &[Curve]) -> Option<DVec2>;
}

/// Breadth-first expansion over accepted curves.
///
/// Keeps a cursor into the accepted list. When the current batch of
/// candidates runs out, the curve under the cursor is expanded with
/// [`collect_seeds`] and the cursor advances. Curves accepted while a batch
/// is being consumed are expanded later, in acceptance order.
#[derive(Debug, Clone)]
pub struct ExpansionSeeds {
    d_sep: f64,
    cursor: usize,
    pending: VecDeque<DVec2>,
}

impl ExpansionSeeds {
    pub fn new(d_sep: f64) -> Self {
        Self {
            d_sep,
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    /// Number of accepted curves expanded so far.
    pub fn expanded(&self) -> usize {
        self.cursor
    }
}

impl SeedSource for ExpansionSeeds {
    fn next_seed(&mut self, accepted: &[Curve]) -> Option<DVec2> {
        loop {
            if let Some(p) = self.pending.pop_front() {
                return Some(p);
            }
            let curve = accepted.get(self.cursor)?;
            self.pending.extend(collect_seeds(curve, self.d_sep));
            self.cursor += 1;
        }
    }
}

/// A fixed sequence of externally supplied seeds, consumed in order.
#[derive(Debug, Clone)]
pub struct ListSeeds<I> {
    points: I,
}

impl<I: Iterator<Item = DVec2>> ListSeeds<I> {
    pub fn new(points: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            points: points.into_iter(),
        }
    }
}

impl<I: Iterator<Item = DVec2>> SeedSource for ListSeeds<I> {
    fn next_seed(&mut self, _accepted: &[Curve]) -> Option<DVec2> {
        self.points.next()
    }
}

/// `count` deterministic pseudo-random points in `[0, width)²`.
pub fn scatter_points(count: usize, width: usize, seed: u64) -> Vec<DVec2> {
    let mut rng = Xorshift64::new(seed);
    (0..count).map(|_| rng.next_point(width as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Direction;

    const TOL: f64 = 1e-12;

    fn straight(id: usize, xs: &[f64], y: f64) -> Curve {
        let mut curve = Curve::new(id, xs.len());
        for &x in xs {
            curve.push(x, y, Direction::Forward);
        }
        curve
    }

    fn close(a: DVec2, b: DVec2) -> bool {
        a.distance(b) < TOL
    }

    #[test]
    fn rightward_curve_offsets_up_then_down() {
        let curve = straight(0, &[5.0, 6.0, 7.0], 5.0);
        let seeds = collect_seeds(&curve, 2.0);
        assert_eq!(seeds.len(), 4);
        assert!(close(seeds[0], DVec2::new(5.0, 7.0)));
        assert!(close(seeds[1], DVec2::new(5.0, 3.0)));
        assert!(close(seeds[2], DVec2::new(6.0, 7.0)));
        assert!(close(seeds[3], DVec2::new(6.0, 3.0)));
    }

    #[test]
    fn tangent_crosses_phase_boundary_in_recording_order() {
        // seed at 5, one backward step at 4, then forward at 6
        let mut curve = Curve::new(0, 3);
        curve.push(5.0, 5.0, Direction::Backward);
        curve.push(4.0, 5.0, Direction::Backward);
        curve.push(6.0, 5.0, Direction::Forward);
        let seeds = collect_seeds(&curve, 1.0);
        // step 0 -> 1 points left: "left" of a leftward tangent is down
        assert!(close(seeds[0], DVec2::new(5.0, 4.0)));
        // step 1 -> 2 points right
        assert!(close(seeds[2], DVec2::new(4.0, 6.0)));
    }

    #[test]
    fn short_curves_yield_no_seeds() {
        assert!(collect_seeds(&straight(0, &[], 5.0), 1.0).is_empty());
        assert!(collect_seeds(&straight(0, &[3.0], 5.0), 1.0).is_empty());
    }

    #[test]
    fn expansion_walks_curves_in_acceptance_order() {
        let curves = vec![straight(0, &[5.0, 6.0], 5.0), straight(1, &[5.0, 6.0], 9.0)];
        let mut source = ExpansionSeeds::new(1.0);
        let got: Vec<DVec2> = std::iter::from_fn(|| source.next_seed(&curves)).collect();
        assert_eq!(got.len(), 4);
        assert!(close(got[0], DVec2::new(5.0, 6.0)));
        assert!(close(got[2], DVec2::new(5.0, 10.0)));
        assert_eq!(source.expanded(), 2);
    }

    #[test]
    fn expansion_picks_up_curves_accepted_later() {
        let mut curves = vec![straight(0, &[5.0, 6.0], 5.0)];
        let mut source = ExpansionSeeds::new(1.0);
        assert!(source.next_seed(&curves).is_some());
        curves.push(straight(1, &[5.0, 6.0], 9.0));
        assert!(source.next_seed(&curves).is_some());
        // batch from curve 1 starts here
        let p = source.next_seed(&curves).unwrap();
        assert!(close(p, DVec2::new(5.0, 10.0)));
    }

    #[test]
    fn expansion_skips_curves_without_seeds() {
        let curves = vec![straight(0, &[5.0], 5.0), straight(1, &[5.0, 6.0], 9.0)];
        let mut source = ExpansionSeeds::new(1.0);
        assert!(source.next_seed(&curves).is_some());
        assert_eq!(source.expanded(), 2);
    }

    #[test]
    fn expansion_with_no_curves_is_exhausted() {
        let mut source = ExpansionSeeds::new(1.0);
        assert!(source.next_seed(&[]).is_none());
    }

    #[test]
    fn list_seeds_are_yielded_in_order() {
        let points = vec![DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0)];
        let mut source = ListSeeds::new(points.clone());
        assert_eq!(source.next_seed(&[]), Some(points[0]));
        assert_eq!(source.next_seed(&[]), Some(points[1]));
        assert_eq!(source.next_seed(&[]), None);
    }

    #[test]
    fn scatter_is_deterministic_and_in_range() {
        let a = scatter_points(100, 50, 7);
        let b = scatter_points(100, 50, 7);
        assert_eq!(a, b);
        assert!(a
            .iter()
            .all(|p| (0.0..50.0).contains(&p.x) && (0.0..50.0).contains(&p.y)));
        assert_ne!(a, scatter_points(100, 50, 8));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn seeds_lie_d_sep_from_their_step(
                pts in prop::collection::vec((0.0_f64..100.0, 0.0_f64..100.0), 2..30),
                d_sep in 0.1_f64..5.0,
            ) {
                let mut curve = Curve::new(0, pts.len());
                for &(x, y) in &pts {
                    curve.push(x, y, Direction::Forward);
                }
                let seeds = collect_seeds(&curve, d_sep);
                prop_assert_eq!(seeds.len(), 2 * (pts.len() - 1));
                for (i, pair) in seeds.chunks(2).enumerate() {
                    let origin = curve.steps()[i].point();
                    prop_assert!((pair[0].distance(origin) - d_sep).abs() < 1e-9);
                    prop_assert!((pair[1].distance(origin) - d_sep).abs() < 1e-9);
                    // left and right are mirror images through the step
                    prop_assert!(((pair[0] + pair[1]) * 0.5).distance(origin) < 1e-9);
                }
            }
        }
    }
}
