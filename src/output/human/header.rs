// Human output headers (bd-2z8)

use crate::format::numbers::{format_count, format_float};

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub max_missing: usize,
    pub seed: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy)]
pub struct EventCounts {
    pub left: u64,
    pub right: u64,
}

pub struct HumanHeader<'a> {
    pub left_name: &'a str,
    pub right_name: &'a str,
    /// Column each side was read from, once loading got that far.
    pub column_left: Option<&'a str>,
    pub column_right: Option<&'a str>,
    pub events: Option<EventCounts>,
    pub settings: Settings,
}

pub fn render_header(ctx: &HumanHeader<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("Inputs: {} ~ {}", ctx.left_name, ctx.right_name));
    if let (Some(left), Some(right)) = (ctx.column_left, ctx.column_right) {
        lines.push(format!("Columns: left={left} right={right}"));
    }
    if let Some(events) = ctx.events {
        lines.push(format!(
            "Events: left={} right={}",
            format_count(events.left),
            format_count(events.right)
        ));
    }
    lines.push(format!(
        "Settings: abs_tol={} rel_tol={} max_missing={} seed={}",
        format_float(ctx.settings.abs_tol),
        format_float(ctx.settings.rel_tol),
        ctx.settings.max_missing,
        render_seed(ctx.settings.seed)
    ));
    lines
}

fn render_seed(seed: Option<(usize, usize)>) -> String {
    match seed {
        Some((left, right)) => format!("({left},{right})"),
        None => "auto".to_string(),
    }
}
