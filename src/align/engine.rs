// Two-cursor stepping engine (bd-41m)
//
// Walks both series from a known first correspondence, confirming a pair
// whenever the elapsed time since the last confirmed match agrees on both
// sides within tolerance, and otherwise advancing the side that lags.

use super::cursor::Cursor;
use super::outcome::{Pairing, Stall, StallWindow};
use super::tolerance::Tolerance;

/// Align `left` and `right` starting from the confirmed pair `seed`.
///
/// Each loop iteration either confirms one pair on both sides or advances a
/// single cursor, so the walk is linear in the combined series length.
/// Returns [`Stall`] as soon as either cursor moves more than
/// `max_missing + 1` positions past its last confirmed match.
///
/// # Panics
///
/// Panics if `seed` indexes past the end of either series.
pub fn align_from(
    left: &[f64],
    right: &[f64],
    tolerance: &Tolerance,
    max_missing: usize,
    seed: (usize, usize),
) -> Result<Pairing, Stall> {
    assert!(
        seed.0 < left.len() && seed.1 < right.len(),
        "seed ({}, {}) out of range for series of {} and {} events",
        seed.0,
        seed.1,
        left.len(),
        right.len()
    );

    let mut lc = Cursor::seeded(left, seed.0);
    let mut rc = Cursor::seeded(right, seed.1);

    while lc.in_bounds(0) && rc.in_bounds(0) {
        if tolerance.within(lc.gap(0), rc.gap(0)) {
            lc.confirm();
            rc.confirm();
        } else if rc.gap(0) < lc.gap(0) {
            // Advance the lagging side only. The right cursor moves iff its
            // gap is strictly smaller; the left moves on an exact tie. Tuned
            // behavior, downstream tolerance tables depend on it.
            rc.skip();
        } else {
            lc.skip();
        }

        // One-step lookahead, left side first against the right's live gap:
        // skip one extra sample when the own gap stays flat (within twice the
        // absolute tolerance) and the move strictly closes in on the other
        // side's gap.
        lookahead(&mut lc, &rc, tolerance.abs_tol());
        lookahead(&mut rc, &lc, tolerance.abs_tol());

        if lc.over_budget(max_missing) || rc.over_budget(max_missing) {
            return Err(stall(&lc, &rc, seed));
        }
    }

    Ok(Pairing {
        left: lc.into_matches(),
        right: rc.into_matches(),
    })
}

fn lookahead(seq: &mut Cursor<'_>, other: &Cursor<'_>, abs_tol: f64) {
    if !seq.in_bounds(1) || !other.in_bounds(0) {
        return;
    }
    let here = seq.gap(0);
    let next = seq.gap(1);
    let target = other.gap(0);
    if (next - here).abs() <= 2.0 * abs_tol && (next - target).abs() < (here - target).abs() {
        seq.skip();
    }
}

fn stall(lc: &Cursor<'_>, rc: &Cursor<'_>, seed: (usize, usize)) -> Stall {
    Stall {
        left_matches: lc.matches().to_vec(),
        right_matches: rc.matches().to_vec(),
        left_window: StallWindow::around(lc.series(), lc.last_match()),
        right_window: StallWindow::around(rc.series(), rc.last_match()),
        seed,
    }
}
