// Human body for a successful alignment (bd-k1n)

use crate::format::numbers::{format_count, format_float, format_percent, format_signed};

/// Matched pairs shown before the summary ellipsis.
pub const PAIR_PREVIEW: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct AlignedPair {
    pub left: usize,
    pub right: usize,
    pub left_value: f64,
    pub right_value: f64,
}

pub struct AlignedBody<'a> {
    pub pairs: &'a [AlignedPair],
    pub events_left: u64,
    pub events_right: u64,
    /// Largest disagreement between consecutive matched gaps.
    pub max_gap_error: f64,
}

pub fn render_aligned_body(body: &AlignedBody<'_>) -> Vec<String> {
    let matched = body.pairs.len() as u64;
    let mut lines = Vec::new();
    lines.push(format!(
        "Matched: {} pairs (left {}, right {})",
        format_count(matched),
        coverage(matched, body.events_left),
        coverage(matched, body.events_right)
    ));
    if let (Some(first), Some(last)) = (body.pairs.first(), body.pairs.last()) {
        lines.push(format!(
            "Offset (right - left): first={} last={}",
            format_signed(first.right_value - first.left_value),
            format_signed(last.right_value - last.left_value)
        ));
    }
    lines.push(format!(
        "Max gap error: {}",
        format_float(body.max_gap_error)
    ));
    lines.push(String::new());
    for pair in body.pairs.iter().take(PAIR_PREVIEW) {
        lines.push(format!(
            "  [{}] {} ~ [{}] {} ({})",
            pair.left,
            format_float(pair.left_value),
            pair.right,
            format_float(pair.right_value),
            format_signed(pair.right_value - pair.left_value)
        ));
    }
    if body.pairs.len() > PAIR_PREVIEW {
        lines.push(format!(
            "  ... and {} more pairs",
            format_count((body.pairs.len() - PAIR_PREVIEW) as u64)
        ));
    }
    lines
}

fn coverage(matched: u64, events: u64) -> String {
    if events == 0 {
        return "0.0%".to_string();
    }
    format!(
        "{} of {}",
        format_percent(matched as f64 / events as f64),
        format_count(events)
    )
}
