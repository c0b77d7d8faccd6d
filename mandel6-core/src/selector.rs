//! Nearest-center selection for multi-center orbits.
//!
//! Each step, every surviving orbit candidate is tested against every
//! center. Centers that lie within the draw range (in their own normalized
//! frame) advance the candidate, and the results are kept in a fixed-size
//! set ranked by ascending normalized squared distance.

use std::f64::consts::SQRT_2;

use crate::center::CenterTable;
use crate::complex::Complex;
use crate::params::{ESCAPE_RADIUS_SQ, MAX_CANDIDATES};
use crate::step::step;

/// Headroom on the box and diamond limits so rounding in the norms and in
/// `range * √2` can never reject a point the exact test accepts.
const REJECTION_SLACK: f64 = 1.0 + 8.0 * f64::EPSILON;

/// An orbit value together with the rank it was admitted at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCandidate {
    /// The orbit value after the step.
    pub value: Complex,
    /// Normalized squared distance from the source center to the value
    /// that was stepped. Lower ranks better.
    pub distance_sq: f64,
    /// Index into the [`CenterTable`] of the center that produced `value`.
    /// `None` for a seed that no center has touched yet.
    pub source: Option<usize>,
}

impl OrbitCandidate {
    const EMPTY: Self = Self {
        value: Complex::ZERO,
        distance_sq: 0.0,
        source: None,
    };

    pub fn seed(value: Complex) -> Self {
        Self {
            value,
            ..Self::EMPTY
        }
    }
}

/// Fixed-capacity ranked candidate set. Lives on the stack; inserting never
/// allocates.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSet {
    slots: [OrbitCandidate; MAX_CANDIDATES],
    len: usize,
    capacity: usize,
}

impl CandidateSet {
    /// An empty set keeping at most `capacity` entries (clamped to
    /// `1..=MAX_CANDIDATES`).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: [OrbitCandidate::EMPTY; MAX_CANDIDATES],
            len: 0,
            capacity: capacity.clamp(1, MAX_CANDIDATES),
        }
    }

    /// A set holding a single unranked value.
    pub fn seeded(value: Complex, capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        set.slots[0] = OrbitCandidate::seed(value);
        set.len = 1;
        set
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best-ranked candidate.
    pub fn best(&self) -> Option<&OrbitCandidate> {
        self.as_slice().first()
    }

    pub fn as_slice(&self) -> &[OrbitCandidate] {
        &self.slots[..self.len]
    }

    /// Whether a candidate at `distance_sq` would make it into the set.
    #[inline]
    pub fn would_accept(&self, distance_sq: f64) -> bool {
        self.len < self.capacity || distance_sq < self.slots[self.len - 1].distance_sq
    }

    /// Bounded insertion sort. A full set drops its worst entry when the new
    /// one ranks strictly better; equal distances keep existing order.
    pub fn insert(&mut self, candidate: OrbitCandidate) -> bool {
        if !self.would_accept(candidate.distance_sq) {
            return false;
        }
        let pos = self.slots[..self.len]
            .iter()
            .position(|c| c.distance_sq > candidate.distance_sq)
            .unwrap_or(self.len);
        let end = if self.len < self.capacity {
            self.len += 1;
            self.len - 1
        } else {
            self.len - 1
        };
        self.slots.copy_within(pos..end, pos + 1);
        self.slots[pos] = candidate;
        true
    }
}

/// Axis-aligned rejection: every component of an in-range offset is within
/// the range.
#[inline]
pub fn within_box(offset: Complex, range: f64) -> bool {
    offset.max_axis() <= range * REJECTION_SLACK
}

/// Diamond rejection: an in-range offset has L1 norm at most `√2 · range`.
#[inline]
pub fn within_diamond(offset: Complex, range: f64) -> bool {
    offset.l1_norm() <= range * SQRT_2 * REJECTION_SLACK
}

/// Normalized squared distance from `center` to `z` if it lies within
/// `range` (boundary included), running the two cheap rejections first.
#[inline]
pub fn claim_distance_sq(
    z: Complex,
    center: &crate::center::Center,
    range: f64,
    range_sq: f64,
) -> Option<f64> {
    let offset = center.normalize(z);
    if !within_box(offset, range) || !within_diamond(offset, range) {
        return None;
    }
    let d = offset.norm_sq();
    (d <= range_sq).then_some(d)
}

/// The candidate value lying closest to any center, measured in that
/// center's frame, provided it is still inside the escape radius there.
///
/// `None` means every candidate has escaped every frame.
pub fn closest_claimed(current: &CandidateSet, centers: &CenterTable) -> Option<Complex> {
    let mut best: Option<(Complex, f64)> = None;
    for candidate in current.as_slice() {
        for center in centers.iter() {
            let d = center.normalized_distance_sq(candidate.value);
            if d < ESCAPE_RADIUS_SQ && best.map_or(true, |(_, b)| d < b) {
                best = Some((candidate.value, d));
            }
        }
    }
    best.map(|(value, _)| value)
}

/// Advance every candidate through every center whose draw range reaches it
/// and keep the best `capacity` results.
pub fn select_next(
    current: &CandidateSet,
    c: Complex,
    centers: &CenterTable,
    range: f64,
    range_sq: f64,
    capacity: usize,
) -> CandidateSet {
    let mut next = CandidateSet::new(capacity);
    for candidate in current.as_slice() {
        for (index, center) in centers.iter().enumerate() {
            let Some(d) = claim_distance_sq(candidate.value, center, range, range_sq) else {
                continue;
            };
            if next.would_accept(d) {
                next.insert(OrbitCandidate {
                    value: step(candidate.value, c, center),
                    distance_sq: d,
                    source: Some(index),
                });
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::center::Center;
    use proptest::prelude::*;

    fn cand(d: f64, tag: f64) -> OrbitCandidate {
        OrbitCandidate {
            value: Complex::new(tag, 0.0),
            distance_sq: d,
            source: Some(0),
        }
    }

    fn tags(set: &CandidateSet) -> Vec<f64> {
        set.as_slice().iter().map(|c| c.value.re).collect()
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut set = CandidateSet::new(4);
        for (d, tag) in [(3.0, 3.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)] {
            assert!(set.insert(cand(d, tag)));
        }
        assert_eq!(tags(&set), vec![0.5, 1.0, 2.0, 3.0]);
        assert_eq!(set.best().unwrap().distance_sq, 0.5);
    }

    #[test]
    fn full_set_displaces_worst() {
        let mut set = CandidateSet::new(2);
        set.insert(cand(1.0, 1.0));
        set.insert(cand(2.0, 2.0));
        assert!(!set.insert(cand(5.0, 5.0)));
        assert!(set.insert(cand(1.5, 1.5)));
        assert_eq!(tags(&set), vec![1.0, 1.5]);
    }

    #[test]
    fn ties_keep_existing_order() {
        let mut set = CandidateSet::new(3);
        set.insert(cand(1.0, 10.0));
        set.insert(cand(1.0, 20.0));
        set.insert(cand(1.0, 30.0));
        assert_eq!(tags(&set), vec![10.0, 20.0, 30.0]);
        // A tie with the worst entry of a full set does not displace it.
        assert!(!set.insert(cand(1.0, 40.0)));
        assert_eq!(tags(&set), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(CandidateSet::new(0).capacity(), 1);
        assert_eq!(CandidateSet::new(1000).capacity(), MAX_CANDIDATES);
    }

    #[test]
    fn select_next_drops_out_of_range_candidates() {
        let centers = CenterTable::new(vec![
            Center::UNIT,
            Center::new(Complex::new(50.0, 0.0), 1.0).unwrap(),
        ])
        .unwrap();
        let far = CandidateSet::seeded(Complex::new(25.0, 25.0), 4);
        let next = select_next(&far, Complex::ZERO, &centers, 10.0, 100.0, 4);
        assert!(next.is_empty());

        let near = CandidateSet::seeded(Complex::new(48.0, 0.0), 4);
        let next = select_next(&near, Complex::new(49.0, 0.0), &centers, 10.0, 100.0, 4);
        assert_eq!(next.len(), 1);
        assert_eq!(next.best().unwrap().source, Some(1));
    }

    #[test]
    fn select_next_ranks_by_normalized_distance() {
        // Both centers claim the seed; the larger one is nearer in its frame.
        let centers = CenterTable::new(vec![
            Center::new(Complex::new(0.0, 0.0), 0.5).unwrap(),
            Center::new(Complex::new(2.0, 0.0), 4.0).unwrap(),
        ])
        .unwrap();
        let seed = CandidateSet::seeded(Complex::new(1.0, 0.0), 4);
        let next = select_next(&seed, Complex::new(1.0, 0.0), &centers, 10.0, 100.0, 4);
        assert_eq!(next.len(), 2);
        assert_eq!(next.as_slice()[0].source, Some(1));
        assert_eq!(next.as_slice()[1].source, Some(0));
    }

    #[test]
    fn select_next_respects_capacity() {
        let centers = CenterTable::new(vec![Center::UNIT; 6]).unwrap();
        let seed = CandidateSet::seeded(Complex::new(0.5, 0.5), 3);
        let next = select_next(&seed, Complex::ZERO, &centers, 10.0, 100.0, 3);
        assert_eq!(next.len(), 3);
        // Identical distances: the first three centers win, in table order.
        let sources: Vec<_> = next.as_slice().iter().map(|c| c.source).collect();
        assert_eq!(sources, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn draw_range_boundary_is_inclusive() {
        let center = Center::UNIT;
        assert_eq!(
            claim_distance_sq(Complex::new(10.0, 0.0), &center, 10.0, 100.0),
            Some(100.0)
        );
        assert_eq!(
            claim_distance_sq(Complex::new(0.0, -10.0), &center, 10.0, 100.0),
            Some(100.0)
        );
        assert_eq!(
            claim_distance_sq(Complex::new(10.000001, 0.0), &center, 10.0, 100.0),
            None
        );
    }

    #[test]
    fn closest_claimed_uses_escape_radius() {
        let centers = CenterTable::new(vec![
            Center::UNIT,
            Center::new(Complex::new(10.0, 0.0), 2.0).unwrap(),
        ])
        .unwrap();
        let mut set = CandidateSet::new(4);
        // Outside radius 2 everywhere, although inside the draw range.
        set.insert(cand(0.0, 5.0));
        assert_eq!(closest_claimed(&set, &centers), None);

        // Normalized distances: 1.5² to the unit center, 0.5² to the second.
        set.insert(cand(1.0, 1.5));
        set.insert(cand(2.0, 9.0));
        assert_eq!(closest_claimed(&set, &centers), Some(Complex::new(9.0, 0.0)));

        // Exactly on the escape radius is not claimed.
        let edge = CandidateSet::seeded(Complex::new(2.0, 0.0), 1);
        assert_eq!(closest_claimed(&edge, &CenterTable::classic()), None);
    }

    proptest! {
        #[test]
        fn cheap_rejections_have_no_false_negatives(
            pre in -100.0f64..100.0,
            pim in -100.0f64..100.0,
            scale in 0.01f64..20.0,
            zre in -150.0f64..150.0,
            zim in -150.0f64..150.0,
            range in 0.5f64..12.0,
        ) {
            let center = Center::new(Complex::new(pre, pim), scale).unwrap();
            let z = Complex::new(zre, zim);
            let range_sq = range * range;
            let offset = center.normalize(z);
            if offset.norm_sq() <= range_sq {
                prop_assert!(within_box(offset, range));
                prop_assert!(within_diamond(offset, range));
                prop_assert!(claim_distance_sq(z, &center, range, range_sq).is_some());
            }
        }

        #[test]
        fn near_boundary_points_are_never_falsely_rejected(
            angle in 0.0f64..std::f64::consts::TAU,
            shrink in 0.0f64..1e-9,
            range in 0.5f64..12.0,
        ) {
            let radius = range * (1.0 - shrink);
            let offset = Complex::new(radius * angle.cos(), radius * angle.sin());
            if offset.norm_sq() <= range * range {
                prop_assert!(within_box(offset, range));
                prop_assert!(within_diamond(offset, range));
            }
        }

        #[test]
        fn inserted_sets_stay_sorted(distances in proptest::collection::vec(0.0f64..100.0, 0..40), k in 1usize..=MAX_CANDIDATES) {
            let mut set = CandidateSet::new(k);
            for (i, d) in distances.iter().enumerate() {
                set.insert(cand(*d, i as f64));
            }
            prop_assert!(set.len() <= k);
            prop_assert_eq!(set.len(), distances.len().min(k));
            for pair in set.as_slice().windows(2) {
                prop_assert!(pair[0].distance_sq <= pair[1].distance_sq);
            }
            // The kept entries are the k smallest.
            let mut sorted = distances.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let kept: Vec<f64> = set.as_slice().iter().map(|c| c.distance_sq).collect();
            prop_assert_eq!(kept, sorted[..set.len()].to_vec());
        }
    }
}
