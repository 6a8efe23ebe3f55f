// JSON output schema assembly (bd-v6j)

use serde::Serialize;
use serde_json::Value;

use crate::align::{Pairing, Stall};
use crate::refusal::codes::RefusalCode;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Aligned,
    Stalled,
    Refusal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Files {
    pub left: String,
    pub right: String,
}

/// Column each series was read from, when loading got that far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Columns {
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub max_missing: usize,
    /// Explicit first correspondence; `None` means the seed search ran.
    pub seed: Option<[usize; 2]>,
    pub scale_left: f64,
    pub scale_right: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Counts {
    pub events_left: Option<u64>,
    pub events_right: Option<u64>,
    pub matched: Option<u64>,
    pub unmatched_left: Option<u64>,
    pub unmatched_right: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Metrics {
    /// Matched fraction of each side's events.
    pub coverage_left: Option<f64>,
    pub coverage_right: Option<f64>,
    /// Largest disagreement between consecutive matched gaps.
    pub max_gap_error: Option<f64>,
    /// Clock offset (right - left) at the first and last matched pair.
    pub offset_first: Option<f64>,
    pub offset_last: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pair {
    pub left: usize,
    pub right: usize,
    pub left_value: f64,
    pub right_value: f64,
    /// `right_value - left_value`.
    pub offset: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Window {
    pub anchor: usize,
    pub start: usize,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StallReport {
    pub matched: u64,
    pub seed: [usize; 2],
    pub left_matches: Vec<usize>,
    pub right_matches: Vec<usize>,
    pub left_window: Window,
    pub right_window: Window,
}

impl StallReport {
    pub fn from_stall(stall: &Stall) -> Self {
        Self {
            matched: stall.matched() as u64,
            seed: [stall.seed.0, stall.seed.1],
            left_matches: stall.left_matches.clone(),
            right_matches: stall.right_matches.clone(),
            left_window: Window {
                anchor: stall.left_window.anchor,
                start: stall.left_window.start,
                values: stall.left_window.values.clone(),
            },
            right_window: Window {
                anchor: stall.right_window.anchor,
                start: stall.right_window.start,
                values: stall.right_window.values.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Refusal {
    pub code: String,
    pub message: String,
    pub detail: Value,
}

impl Refusal {
    pub fn new(code: RefusalCode, message: impl Into<String>, detail: Value) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            detail,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonContext {
    pub files: Files,
    pub columns: Columns,
    pub settings: Settings,
    pub counts: Counts,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub version: &'static str,
    pub outcome: Outcome,
    pub files: Files,
    pub columns: Columns,
    pub settings: Settings,
    pub counts: Counts,
    pub metrics: Metrics,
    pub pairs: Vec<Pair>,
    pub stall: Option<StallReport>,
    pub refusal: Option<Refusal>,
}

impl JsonOutput {
    pub fn aligned(ctx: JsonContext, pairs: Vec<Pair>) -> Self {
        Self::assemble(Outcome::Aligned, ctx, pairs, None, None)
    }

    pub fn stalled(ctx: JsonContext, stall: StallReport) -> Self {
        Self::assemble(Outcome::Stalled, ctx, Vec::new(), Some(stall), None)
    }

    pub fn refusal(ctx: JsonContext, refusal: Refusal) -> Self {
        Self::assemble(Outcome::Refusal, ctx, Vec::new(), None, Some(refusal))
    }

    fn assemble(
        outcome: Outcome,
        ctx: JsonContext,
        pairs: Vec<Pair>,
        stall: Option<StallReport>,
        refusal: Option<Refusal>,
    ) -> Self {
        Self {
            version: "lockstep.v0",
            outcome,
            files: ctx.files,
            columns: ctx.columns,
            settings: ctx.settings,
            counts: ctx.counts,
            metrics: ctx.metrics,
            pairs,
            stall,
            refusal,
        }
    }

    pub fn to_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build the `pairs` array from a pairing and its source series.
pub fn pairs_from(pairing: &Pairing, left: &[f64], right: &[f64]) -> Vec<Pair> {
    pairing
        .pairs()
        .map(|(l, r)| Pair {
            left: l,
            right: r,
            left_value: left[l],
            right_value: right[r],
            offset: right[r] - left[l],
        })
        .collect()
}
