//! Per-point orbit advance: the shared loop behind both progressive ticks
//! and full recompute.
//!
//! A stored live state `(z_n, n)` always holds an orbit value that lies
//! inside the escape radius of some center's frame. Advancing checks the
//! current value, steps it, and stops on escape, on saturation at
//! `max_iterations`, or when the budget runs out.
//! A fresh point is seeded at its own coordinate (`z₁ = c`) without
//! spending budget.

use crate::center::{Center, CenterTable};
use crate::complex::Complex;
use crate::params::{EvalParams, ESCAPE_RADIUS_SQ};
use crate::selector::{closest_claimed, select_next, CandidateSet};
use crate::state::PointState;
use crate::step::step;

/// Advance `state` for sample point `c` by up to `budget` steps.
///
/// Terminal states are returned unchanged. A lone center runs the
/// single-center path; two or more go through the nearest-center selector.
#[inline]
pub fn advance(
    state: PointState,
    c: Complex,
    centers: &CenterTable,
    params: &EvalParams,
    budget: u32,
) -> PointState {
    if centers.is_multi() {
        advance_multi(state, c, centers, params, budget)
    } else {
        advance_single(state, c, &centers.as_slice()[0], params.max_iterations, budget)
    }
}

/// Run a point from fresh all the way to escape or saturation.
pub fn evaluate_to_completion(c: Complex, centers: &CenterTable, params: &EvalParams) -> PointState {
    advance(PointState::FRESH, c, centers, params, u32::MAX)
}

#[inline]
fn resume(state: PointState, c: Complex) -> (Complex, u32) {
    if state.is_fresh() {
        (c, 1)
    } else {
        (state.value(), state.iteration())
    }
}

/// One center: escape when `|zn|² >= 4` in the center's frame.
pub fn advance_single(
    state: PointState,
    c: Complex,
    center: &Center,
    max_iterations: u32,
    budget: u32,
) -> PointState {
    if state.is_terminal(max_iterations) {
        return state;
    }
    let (mut z, mut n) = resume(state, c);
    let mut remaining = budget;
    loop {
        if !center.claims(z, ESCAPE_RADIUS_SQ) {
            return PointState::escaped(z, n);
        }
        if n >= max_iterations || remaining == 0 {
            return PointState::encode(z, n);
        }
        z = step(z, c, center);
        n += 1;
        remaining -= 1;
    }
}

/// Several centers: the orbit survives while any candidate lies inside the
/// escape radius of some center's frame.
///
/// Every center whose draw range reaches a candidate advances it, and the
/// results are ranked by the top-K selector. The candidate set only lives
/// for the length of this call, so the value stored for a live point is the
/// candidate closest to a center; resuming from it alone never escapes on
/// the spot.
pub fn advance_multi(
    state: PointState,
    c: Complex,
    centers: &CenterTable,
    params: &EvalParams,
    budget: u32,
) -> PointState {
    let max_iterations = params.max_iterations;
    if state.is_terminal(max_iterations) {
        return state;
    }
    let range = params.draw_range;
    let range_sq = params.draw_range_sq();
    let k = params.candidate_count;

    let (z, mut n) = resume(state, c);
    let mut current = CandidateSet::seeded(z, k);
    let mut remaining = budget;
    loop {
        let Some(anchor) = closest_claimed(&current, centers) else {
            let last = current.best().map_or(z, |cand| cand.value);
            return PointState::escaped(last, n);
        };
        if n >= max_iterations || remaining == 0 {
            return PointState::encode(anchor, n);
        }
        current = select_next(&current, c, centers, range, range_sq, k);
        n += 1;
        remaining -= 1;
    }
}
