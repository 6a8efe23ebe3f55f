use lockstep::align::{MatchParams, Tolerance, match_samples};

fn drifting_pair() -> (Vec<f64>, Vec<f64>) {
    // Right clock runs 0.2% fast with a fixed 50-unit head start; one event
    // is missing on each side.
    let onsets: Vec<f64> = (0..40).map(|i| 500.0 * i as f64).collect();
    let left: Vec<f64> = onsets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 17)
        .map(|(_, t)| *t)
        .collect();
    let right: Vec<f64> = onsets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 29)
        .map(|(_, t)| t * 1.002 + 50.0)
        .collect();
    (left, right)
}

#[test]
fn identity_with_zero_abs_tol_is_a_full_correspondence() {
    let series: Vec<f64> = (0..50).map(|i| 17.0 * i as f64 * i as f64).collect();
    let params = MatchParams {
        first_match: Some((0, 0)),
        ..MatchParams::new(0.0)
    };
    let pairing = match_samples(&series, &series, &params).expect("identity aligns");
    let full: Vec<usize> = (0..series.len()).collect();
    assert_eq!(pairing.left, full);
    assert_eq!(pairing.right, full);
}

#[test]
fn matched_indices_strictly_increase_with_equal_lengths() {
    let (left, right) = drifting_pair();
    let pairing = match_samples(&left, &right, &MatchParams::new(10.0)).expect("aligns");
    assert_eq!(pairing.left.len(), pairing.right.len());
    assert!(pairing.left.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(pairing.right.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(pairing.len() > 30, "expected most events to pair up");
}

#[test]
fn consecutive_matched_gaps_satisfy_the_tolerance() {
    let (left, right) = drifting_pair();
    let params = MatchParams::new(10.0);
    let pairing = match_samples(&left, &right, &params).expect("aligns");
    let tolerance = Tolerance::new(params.abs_tol, params.rel_tol);
    for (prev, next) in pairing.pairs().zip(pairing.pairs().skip(1)) {
        let gap_left = left[next.0] - left[prev.0];
        let gap_right = right[next.1] - right[prev.1];
        assert!(
            tolerance.within(gap_left, gap_right),
            "gap pair ({gap_left}, {gap_right}) violates the tolerance"
        );
    }
}

#[test]
fn rematching_the_matched_subsequences_is_idempotent() {
    let (left, right) = drifting_pair();
    let params = MatchParams::new(10.0);
    let pairing = match_samples(&left, &right, &params).expect("aligns");

    let sub_left: Vec<f64> = pairing.left.iter().map(|&i| left[i]).collect();
    let sub_right: Vec<f64> = pairing.right.iter().map(|&j| right[j]).collect();
    let reseeded = MatchParams {
        first_match: Some((0, 0)),
        ..params
    };
    let again = match_samples(&sub_left, &sub_right, &reseeded).expect("subsequences align");
    let full: Vec<usize> = (0..sub_left.len()).collect();
    assert_eq!(again.left, full);
    assert_eq!(again.right, full);
}

#[test]
fn seed_search_is_never_beaten_by_a_fixed_seed() {
    let (left, right) = drifting_pair();
    let params = MatchParams::new(10.0);
    let searched = match_samples(&left, &right, &params).expect("search aligns");
    for oi in 0..=params.max_missing {
        for oj in 0..=params.max_missing {
            let fixed = MatchParams {
                first_match: Some((oi, oj)),
                ..params
            };
            if let Ok(pairing) = match_samples(&left, &right, &fixed) {
                assert!(
                    searched.len() >= pairing.len(),
                    "fixed seed ({oi}, {oj}) out-paired the search"
                );
            }
        }
    }
}

#[test]
fn stimulus_log_matches_trigger_channel() {
    let log = [1100.0, 2300.0, 3600.0];
    let triggers = [0.0, 1110.0, 3620.0, 6500.0];
    let pairing = match_samples(&log, &triggers, &MatchParams::new(10.0)).expect("aligns");
    // 1100 ~ 1110 and 3600 ~ 3620; the stray 0 and 6500 stay unmatched.
    assert_eq!(pairing.left, vec![0, 2]);
    assert_eq!(pairing.right, vec![1, 2]);
}

#[test]
fn excessive_drift_terminates_with_a_partial_match() {
    // Gap structures agree once at the seed, then diverge beyond abs_tol for
    // far more than max_missing + 1 events: the run must stop, not scan on.
    let left: Vec<f64> = (0..20).map(|i| 100.0 * i as f64).collect();
    let right: Vec<f64> = (0..20)
        .map(|i| if i == 0 { 0.0 } else { 900.0 * i as f64 + 37.0 })
        .collect();
    let stall = match_samples(&left, &right, &MatchParams::new(10.0))
        .expect_err("must stall, not loop");
    assert!(!stall.left_matches.is_empty());
    assert_eq!(stall.left_matches.len(), stall.right_matches.len());
    assert!(!stall.left_window.values.is_empty());
    assert!(!stall.right_window.values.is_empty());
}
