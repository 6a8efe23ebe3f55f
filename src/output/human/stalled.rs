// Human body for a stalled alignment (bd-t7q)

use crate::align::Stall;
use crate::format::numbers::{format_count, format_float};

pub struct StalledBody<'a> {
    pub stall: &'a Stall,
}

pub fn render_stalled_body(body: &StalledBody<'_>) -> Vec<String> {
    let stall = body.stall;
    let mut lines = Vec::new();
    lines.push(format!(
        "Stalled after {} pairs (seed ({},{}))",
        format_count(stall.matched() as u64),
        stall.seed.0,
        stall.seed.1
    ));
    lines.push(format!(
        "Last confirmed: left index {} / right index {}",
        stall.left_window.anchor, stall.right_window.anchor
    ));
    lines.push(render_window("Left", &stall.left_window.values, stall.left_window.start));
    lines.push(render_window(
        "Right",
        &stall.right_window.values,
        stall.right_window.start,
    ));
    lines.push(String::new());
    lines.push(
        "Next: raise --abs-tol or --max-missing, or add an overrides row for this recording"
            .to_string(),
    );
    lines
}

fn render_window(side: &str, values: &[f64], start: usize) -> String {
    let rendered: Vec<String> = values.iter().map(|value| format_float(*value)).collect();
    format!("{side} window [{}..{}): {}", start, start + values.len(), rendered.join(" "))
}
