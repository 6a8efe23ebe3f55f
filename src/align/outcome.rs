// Alignment outcomes: pairing on success, stall on abort (bd-7xn)

use std::fmt;

/// Half-width of the diagnostic window captured around a stall point.
pub const STALL_WINDOW: usize = 10;

/// One-to-one correspondence between confirmed events of the two series.
///
/// `left` and `right` have equal length and are strictly increasing; entry
/// `k` pairs `left[k]` with `right[k]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl Pairing {
    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.left.len(), self.right.len());
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Matched index pairs in match order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.left.iter().copied().zip(self.right.iter().copied())
    }
}

/// Raw values surrounding one side's last confirmed match.
///
/// Covers indices `[anchor - STALL_WINDOW, anchor + STALL_WINDOW)` clamped to
/// the series bounds; `start` is the index of the first captured value.
#[derive(Debug, Clone, PartialEq)]
pub struct StallWindow {
    pub anchor: usize,
    pub start: usize,
    pub values: Vec<f64>,
}

impl StallWindow {
    pub fn around(series: &[f64], anchor: usize) -> Self {
        let start = anchor.saturating_sub(STALL_WINDOW);
        let end = (anchor + STALL_WINDOW).min(series.len());
        Self {
            anchor,
            start,
            values: series[start..end].to_vec(),
        }
    }
}

/// Stalled alignment: the missing-event budget was exceeded on one side.
///
/// Not exceptional control flow — a first-class alternative result carrying
/// the partial correspondence and a bounded diagnostic window per side.
/// Implements [`std::error::Error`] so shells may still `?` it upward.
#[derive(Debug, Clone, PartialEq)]
pub struct Stall {
    pub left_matches: Vec<usize>,
    pub right_matches: Vec<usize>,
    pub left_window: StallWindow,
    pub right_window: StallWindow,
    pub seed: (usize, usize),
}

impl Stall {
    /// Number of pairs confirmed before the stall.
    pub fn matched(&self) -> usize {
        debug_assert_eq!(self.left_matches.len(), self.right_matches.len());
        self.left_matches.len()
    }

    /// Last confirmed index on the left series.
    pub fn last_left(&self) -> usize {
        self.left_window.anchor
    }
}

impl fmt::Display for Stall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alignment stalled after {} pairs at indices ({}, {}), seed ({}, {})",
            self.matched(),
            self.left_window.anchor,
            self.right_window.anchor,
            self.seed.0,
            self.seed.1
        )
    }
}

impl std::error::Error for Stall {}
