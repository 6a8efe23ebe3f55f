//! Approximate alignment of two event-timestamp series (bd-x2f).
//!
//! Matches two ordered series of real-valued event timestamps recorded by
//! independent, drifting clocks — a stimulus log against a hardware trigger
//! channel, say — tolerating jitter, clock drift, and missing events on
//! either side. Events pair up when the elapsed time since the previous
//! confirmed pair agrees on both sides within tolerance, so a constant
//! clock offset between the series costs nothing.
//!
//! ```
//! use lockstep::align::{MatchParams, match_samples};
//!
//! let log = [1100.0, 2300.0, 3600.0];
//! let triggers = [0.0, 1110.0, 3620.0, 6500.0];
//! let pairing = match_samples(&log, &triggers, &MatchParams::new(10.0)).unwrap();
//! assert_eq!(pairing.left, vec![0, 2]);
//! assert_eq!(pairing.right, vec![1, 2]);
//! ```

pub mod cursor;
pub mod engine;
pub mod outcome;
pub mod seed;
pub mod tolerance;

pub use outcome::{Pairing, STALL_WINDOW, Stall, StallWindow};
pub use tolerance::Tolerance;

/// Relative tolerance applied by default: 0.3% of the smaller gap.
pub const DEFAULT_REL_TOL: f64 = 0.003;
/// Consecutive unmatched advances allowed per side by default.
pub const DEFAULT_MAX_MISSING: usize = 3;

/// Parameters for one alignment invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Absolute gap tolerance, in the units of the input series.
    pub abs_tol: f64,
    /// Relative gap tolerance, as a fraction of the smaller gap.
    pub rel_tol: f64,
    /// Missing-event budget per side.
    pub max_missing: usize,
    /// Known first correspondence; `None` runs the seed search.
    pub first_match: Option<(usize, usize)>,
}

impl MatchParams {
    pub fn new(abs_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol: DEFAULT_REL_TOL,
            max_missing: DEFAULT_MAX_MISSING,
            first_match: None,
        }
    }
}

/// Align two timestamp series, searching for the first correspondence when
/// `params.first_match` is `None`.
///
/// # Panics
///
/// Panics if either series is empty, or if an explicit `first_match` indexes
/// past the end of either series.
pub fn match_samples(left: &[f64], right: &[f64], params: &MatchParams) -> Result<Pairing, Stall> {
    let tolerance = Tolerance::new(params.abs_tol, params.rel_tol);
    match params.first_match {
        Some(seed) => engine::align_from(left, right, &tolerance, params.max_missing, seed),
        None => seed::seed_search(left, right, &tolerance, params.max_missing),
    }
}
