// Brute-force first-correspondence search (bd-9kw)

use super::engine::align_from;
use super::outcome::{Pairing, Stall};
use super::tolerance::Tolerance;

/// Find the best alignment when the first correspondence is unknown.
///
/// Trials every seed `(oi, oj)` with `oi, oj in 0..=max_missing` (clamped to
/// the series bounds) in lexicographic order — at most
/// `(max_missing + 1)^2` engine runs, independent of sequence length, since
/// `max_missing` is a small integer by construction. The longest pairing
/// wins; ties keep the earliest trial. If every trial stalls, the stall
/// whose last confirmed left index progressed furthest is returned.
///
/// # Panics
///
/// Panics if either series is empty.
pub fn seed_search(
    left: &[f64],
    right: &[f64],
    tolerance: &Tolerance,
    max_missing: usize,
) -> Result<Pairing, Stall> {
    assert!(
        !left.is_empty() && !right.is_empty(),
        "cannot align an empty series"
    );

    let mut best: Option<Pairing> = None;
    let mut worst_stall: Option<Stall> = None;

    for oi in 0..=max_missing.min(left.len() - 1) {
        for oj in 0..=max_missing.min(right.len() - 1) {
            match align_from(left, right, tolerance, max_missing, (oi, oj)) {
                Ok(pairing) => {
                    let longer = best
                        .as_ref()
                        .map(|kept| pairing.len() > kept.len())
                        .unwrap_or(true);
                    if longer {
                        best = Some(pairing);
                    }
                }
                Err(stall) => {
                    let further = worst_stall
                        .as_ref()
                        .map(|kept| kept.last_left() < stall.last_left())
                        .unwrap_or(true);
                    if further {
                        worst_stall = Some(stall);
                    }
                }
            }
        }
    }

    match best {
        Some(pairing) => Ok(pairing),
        // At least one trial always runs, so a missing pairing implies a
        // recorded stall.
        None => Err(worst_stall.expect("no trial ran")),
    }
}

#[cfg(test)]
mod tests {
    use super::seed_search;
    use crate::align::engine::align_from;
    use crate::align::tolerance::Tolerance;

    #[test]
    fn finds_an_offset_start_on_the_right() {
        // Right has two spurious leading triggers before the streams line up.
        let left = [0.0, 500.0, 1000.0, 1500.0];
        let right = [12.0, 70.0, 100.0, 600.0, 1100.0, 1600.0];
        let tol = Tolerance::new(5.0, 0.0);
        let pairing = seed_search(&left, &right, &tol, 3).expect("offset seed found");
        assert_eq!(pairing.left, vec![0, 1, 2, 3]);
        assert_eq!(pairing.right, vec![2, 3, 4, 5]);
    }

    #[test]
    fn never_shorter_than_any_fixed_seed() {
        let left = [100.0, 400.0, 900.0, 1600.0, 2500.0];
        let right = [0.0, 110.0, 410.0, 905.0, 1610.0, 2505.0];
        let tol = Tolerance::new(12.0, 0.003);
        let searched = seed_search(&left, &right, &tol, 2).expect("search succeeds");
        for oi in 0..=2usize {
            for oj in 0..=2usize {
                if let Ok(fixed) = align_from(&left, &right, &tol, 2, (oi, oj)) {
                    assert!(
                        searched.len() >= fixed.len(),
                        "seed ({oi}, {oj}) out-paired the search"
                    );
                }
            }
        }
    }

    #[test]
    fn all_trials_stalling_returns_the_furthest_stall() {
        // Incompatible gap structure everywhere: every trial stalls, and the
        // escalated stall carries a non-empty partial correspondence.
        let left = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
        let right = [0.0, 1000.0, 2500.0, 4700.0, 7900.0, 12000.0, 17000.0];
        let stall = seed_search(&left, &right, &Tolerance::new(1.0, 0.0), 2)
            .expect_err("nothing aligns");
        assert!(!stall.left_matches.is_empty());
        assert_eq!(stall.left_matches.len(), stall.right_matches.len());
    }

    #[test]
    fn trial_seeds_clamp_to_short_series() {
        // max_missing exceeds the right series length; the search must not
        // probe out-of-range seeds.
        let left = [0.0, 100.0, 200.0];
        let right = [0.0, 100.0, 200.0];
        let pairing = seed_search(&left, &right, &Tolerance::new(1.0, 0.0), 10)
            .expect("identity aligns");
        assert_eq!(pairing.len(), 3);
    }
}
