//! Pipeline orchestration: load -> resolve -> align -> render (bd-66d)

use std::error::Error;
use std::path::Path;

use serde_json::{Value, json};

use crate::align::{MatchParams, Pairing, Stall, match_samples};
use crate::cli::args::Args;
use crate::cli::exit::Outcome;
use crate::config::{DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING, Overrides};
use crate::output::human::aligned::{AlignedBody, AlignedPair, render_aligned_body};
use crate::output::human::header::{
    EventCounts, HumanHeader, Settings as HumanSettings, render_header,
};
use crate::output::human::refusal::{RefusalBody, render_refusal_body};
use crate::output::human::stalled::{StalledBody, render_stalled_body};
use crate::output::json::{
    Columns, Counts, Files, JsonContext, JsonOutput, Metrics, Pair,
    Refusal as JsonRefusal, Settings as JsonSettings, StallReport, pairs_from,
};
use crate::refusal::codes::RefusalCode;
use crate::refusal::details::{FileSide, RefusalDetail, RefusalKind, RerunPaths};
use crate::series::load::{EncodingIssue, LoadError, Series, load_series};

pub struct PipelineResult {
    pub outcome: Outcome,
    pub output: String,
}

struct RefusalPayload {
    code: RefusalCode,
    detail: RefusalDetail,
}

impl RefusalPayload {
    fn with_default_next(code: RefusalCode, kind: RefusalKind, paths: RerunPaths<'_>) -> Self {
        Self {
            code,
            detail: RefusalDetail::with_default_next(kind, paths),
        }
    }
}

/// Alignment parameters after applying flag > override-table > default.
#[derive(Debug, Clone, Copy)]
struct ResolvedParams {
    abs_tol: f64,
    rel_tol: f64,
    max_missing: usize,
    seed: Option<(usize, usize)>,
}

pub fn run(args: &Args) -> Result<PipelineResult, Box<dyn Error>> {
    let left_path = args.left.to_string_lossy().to_string();
    let right_path = args.right.to_string_lossy().to_string();
    let rerun_paths = RerunPaths {
        left: &left_path,
        right: &right_path,
    };

    let params = match resolve_params(args, rerun_paths) {
        Ok(params) => params,
        Err(refusal) => {
            let params = fallback_params(args);
            return Ok(render_refusal(refusal, args, &params, None, None));
        }
    };

    let left = match load_series(
        &args.left,
        args.column.as_deref(),
        args.scale_left,
        resolve_delimiter(args.delimiter, &args.left),
    ) {
        Ok(series) => series,
        Err(err) => {
            let refusal = map_load_error(err, FileSide::Left, rerun_paths);
            return Ok(render_refusal(refusal, args, &params, None, None));
        }
    };

    let right_column = args.column_right.as_deref().or(args.column.as_deref());
    let right = match load_series(
        &args.right,
        right_column,
        args.scale_right,
        resolve_delimiter(args.delimiter, &args.right),
    ) {
        Ok(series) => series,
        Err(err) => {
            let refusal = map_load_error(err, FileSide::Right, rerun_paths);
            return Ok(render_refusal(refusal, args, &params, Some(&left), None));
        }
    };

    if let Some(seed) = params.seed
        && (seed.0 >= left.values.len() || seed.1 >= right.values.len())
    {
        let refusal = RefusalPayload::with_default_next(
            RefusalCode::Seed,
            RefusalKind::Seed {
                seed,
                events_left: left.values.len(),
                events_right: right.values.len(),
            },
            rerun_paths,
        );
        return Ok(render_refusal(
            refusal,
            args,
            &params,
            Some(&left),
            Some(&right),
        ));
    }

    let match_params = MatchParams {
        abs_tol: params.abs_tol,
        rel_tol: params.rel_tol,
        max_missing: params.max_missing,
        first_match: params.seed,
    };

    match match_samples(&left.values, &right.values, &match_params) {
        Ok(pairing) => Ok(render_aligned(args, &params, &left, &right, &pairing)),
        Err(stall) => Ok(render_stalled(args, &params, &left, &right, &stall)),
    }
}

fn resolve_params(
    args: &Args,
    rerun_paths: RerunPaths<'_>,
) -> Result<ResolvedParams, RefusalPayload> {
    let table = match &args.overrides {
        Some(path) => Overrides::load(path).map_err(|err| {
            RefusalPayload::with_default_next(
                RefusalCode::Overrides,
                RefusalKind::Overrides {
                    error: err.to_string(),
                },
                rerun_paths,
            )
        })?,
        None => Overrides::default(),
    };

    let (table_abs_tol, table_max_missing) = match (args.subject, args.run) {
        (Some(subject), Some(run)) => table.lookup(subject, run),
        _ => (DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING),
    };

    Ok(ResolvedParams {
        abs_tol: args.abs_tol.unwrap_or(table_abs_tol),
        rel_tol: args.rel_tol,
        max_missing: args.max_missing.unwrap_or(table_max_missing),
        seed: args.seed.map(|seed| (seed.left, seed.right)),
    })
}

/// Display parameters when resolution itself refused.
fn fallback_params(args: &Args) -> ResolvedParams {
    ResolvedParams {
        abs_tol: args.abs_tol.unwrap_or(DEFAULT_ABS_TOL),
        rel_tol: args.rel_tol,
        max_missing: args.max_missing.unwrap_or(DEFAULT_MAX_MISSING),
        seed: args.seed.map(|seed| (seed.left, seed.right)),
    }
}

fn resolve_delimiter(forced: Option<u8>, path: &Path) -> u8 {
    if let Some(delimiter) = forced {
        return delimiter;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}

fn map_load_error(err: LoadError, file: FileSide, paths: RerunPaths<'_>) -> RefusalPayload {
    match err {
        LoadError::Io { error } => RefusalPayload::with_default_next(
            RefusalCode::Io,
            RefusalKind::Io { file, error },
            paths,
        ),
        LoadError::Encoding { issue } => RefusalPayload::with_default_next(
            RefusalCode::Encoding,
            RefusalKind::Encoding { file, issue },
            paths,
        ),
        LoadError::CsvParse { line } => RefusalPayload::with_default_next(
            RefusalCode::CsvParse,
            RefusalKind::CsvParse { file, line },
            paths,
        ),
        LoadError::NoColumn { column, available } => RefusalPayload::with_default_next(
            RefusalCode::NoColumn,
            RefusalKind::NoColumn {
                file,
                column: Some(column),
                available,
            },
            paths,
        ),
        LoadError::AmbiguousColumn { available } => RefusalPayload::with_default_next(
            RefusalCode::NoColumn,
            RefusalKind::NoColumn {
                file,
                column: None,
                available,
            },
            paths,
        ),
        LoadError::BadValue { record, value } => RefusalPayload::with_default_next(
            RefusalCode::BadValue,
            RefusalKind::BadValue {
                file,
                record,
                value: String::from_utf8_lossy(&value).into_owned(),
            },
            paths,
        ),
        LoadError::NotMonotonic {
            record,
            prev,
            value,
        } => RefusalPayload::with_default_next(
            RefusalCode::NotMonotonic,
            RefusalKind::NotMonotonic {
                file,
                record,
                prev,
                value,
            },
            paths,
        ),
        LoadError::Empty => RefusalPayload::with_default_next(
            RefusalCode::Empty,
            RefusalKind::Empty { file },
            paths,
        ),
    }
}

fn render_aligned(
    args: &Args,
    params: &ResolvedParams,
    left: &Series,
    right: &Series,
    pairing: &Pairing,
) -> PipelineResult {
    let pairs = pairs_from(pairing, &left.values, &right.values);
    let counts = pair_counts(pairs.len() as u64, left, right);
    let metrics = pair_metrics(&pairs, left.values.len() as u64, right.values.len() as u64);

    if args.json {
        let ctx = json_context(args, params, Some(left), Some(right), counts, metrics);
        let output = JsonOutput::aligned(ctx, pairs)
            .to_string()
            .unwrap_or_else(|_| "{}".to_string());
        return PipelineResult {
            outcome: Outcome::Aligned,
            output,
        };
    }

    let mut lines = vec!["LOCKSTEP".to_string(), String::new(), "ALIGNED".to_string()];
    lines.push(String::new());
    lines.extend(human_header_lines(args, params, Some(left), Some(right)));
    lines.push(String::new());
    let aligned_pairs: Vec<AlignedPair> = pairs
        .iter()
        .map(|pair| AlignedPair {
            left: pair.left,
            right: pair.right,
            left_value: pair.left_value,
            right_value: pair.right_value,
        })
        .collect();
    let body = AlignedBody {
        pairs: &aligned_pairs,
        events_left: left.values.len() as u64,
        events_right: right.values.len() as u64,
        max_gap_error: metrics.max_gap_error.unwrap_or(0.0),
    };
    lines.extend(render_aligned_body(&body));
    PipelineResult {
        outcome: Outcome::Aligned,
        output: lines.join("\n"),
    }
}

fn render_stalled(
    args: &Args,
    params: &ResolvedParams,
    left: &Series,
    right: &Series,
    stall: &Stall,
) -> PipelineResult {
    let partial = Pairing {
        left: stall.left_matches.clone(),
        right: stall.right_matches.clone(),
    };
    let pairs = pairs_from(&partial, &left.values, &right.values);
    let counts = pair_counts(pairs.len() as u64, left, right);
    let metrics = pair_metrics(&pairs, left.values.len() as u64, right.values.len() as u64);

    if args.json {
        let ctx = json_context(args, params, Some(left), Some(right), counts, metrics);
        let output = JsonOutput::stalled(ctx, StallReport::from_stall(stall))
            .to_string()
            .unwrap_or_else(|_| "{}".to_string());
        return PipelineResult {
            outcome: Outcome::Stalled,
            output,
        };
    }

    let mut lines = vec!["LOCKSTEP".to_string(), String::new(), "STALLED".to_string()];
    lines.push(String::new());
    lines.extend(human_header_lines(args, params, Some(left), Some(right)));
    lines.push(String::new());
    lines.extend(render_stalled_body(&StalledBody { stall }));
    PipelineResult {
        outcome: Outcome::Stalled,
        output: lines.join("\n"),
    }
}

fn render_refusal(
    refusal: RefusalPayload,
    args: &Args,
    params: &ResolvedParams,
    left: Option<&Series>,
    right: Option<&Series>,
) -> PipelineResult {
    if args.json {
        let counts = Counts {
            events_left: left.map(|series| series.values.len() as u64),
            events_right: right.map(|series| series.values.len() as u64),
            ..Counts::default()
        };
        let ctx = json_context(args, params, left, right, counts, Metrics::default());
        let detail = refusal_detail_json(&refusal.detail);
        let refusal_json = JsonRefusal::new(refusal.code, refusal.code.reason(), detail);
        let output = JsonOutput::refusal(ctx, refusal_json)
            .to_string()
            .unwrap_or_else(|_| "{}".to_string());
        return PipelineResult {
            outcome: Outcome::Refusal,
            output,
        };
    }

    let mut lines = vec![format!("LOCKSTEP ERROR ({})", refusal.code), String::new()];
    lines.extend(human_header_lines(args, params, left, right));
    lines.push(String::new());
    let left_display = display_name(&args.left);
    let right_display = display_name(&args.right);
    let body = RefusalBody {
        code: refusal.code,
        detail: &refusal.detail,
        left_name: &left_display,
        right_name: &right_display,
    };
    lines.extend(render_refusal_body(&body));
    PipelineResult {
        outcome: Outcome::Refusal,
        output: lines.join("\n"),
    }
}

fn human_header_lines(
    args: &Args,
    params: &ResolvedParams,
    left: Option<&Series>,
    right: Option<&Series>,
) -> Vec<String> {
    let left_display = display_name(&args.left);
    let right_display = display_name(&args.right);
    let events = match (left, right) {
        (Some(left), Some(right)) => Some(EventCounts {
            left: left.values.len() as u64,
            right: right.values.len() as u64,
        }),
        _ => None,
    };
    let header = HumanHeader {
        left_name: &left_display,
        right_name: &right_display,
        column_left: left.map(|series| series.column.as_str()),
        column_right: right.map(|series| series.column.as_str()),
        events,
        settings: HumanSettings {
            abs_tol: params.abs_tol,
            rel_tol: params.rel_tol,
            max_missing: params.max_missing,
            seed: params.seed,
        },
    };
    render_header(&header)
}

fn json_context(
    args: &Args,
    params: &ResolvedParams,
    left: Option<&Series>,
    right: Option<&Series>,
    counts: Counts,
    metrics: Metrics,
) -> JsonContext {
    JsonContext {
        files: Files {
            left: args.left.to_string_lossy().to_string(),
            right: args.right.to_string_lossy().to_string(),
        },
        columns: Columns {
            left: left.map(|series| series.column.clone()),
            right: right.map(|series| series.column.clone()),
        },
        settings: JsonSettings {
            abs_tol: params.abs_tol,
            rel_tol: params.rel_tol,
            max_missing: params.max_missing,
            seed: params.seed.map(|seed| [seed.0, seed.1]),
            scale_left: args.scale_left,
            scale_right: args.scale_right,
        },
        counts,
        metrics,
    }
}

fn pair_counts(matched: u64, left: &Series, right: &Series) -> Counts {
    let events_left = left.values.len() as u64;
    let events_right = right.values.len() as u64;
    Counts {
        events_left: Some(events_left),
        events_right: Some(events_right),
        matched: Some(matched),
        unmatched_left: Some(events_left - matched),
        unmatched_right: Some(events_right - matched),
    }
}

fn pair_metrics(pairs: &[Pair], events_left: u64, events_right: u64) -> Metrics {
    let matched = pairs.len() as f64;
    let coverage = |events: u64| {
        if events == 0 {
            None
        } else {
            Some(matched / events as f64)
        }
    };
    let max_gap_error = pairs.windows(2).fold(None, |worst: Option<f64>, window| {
        let gap_left = window[1].left_value - window[0].left_value;
        let gap_right = window[1].right_value - window[0].right_value;
        let error = (gap_left - gap_right).abs();
        Some(worst.map_or(error, |value| value.max(error)))
    });
    Metrics {
        coverage_left: coverage(events_left),
        coverage_right: coverage(events_right),
        max_gap_error,
        offset_first: pairs.first().map(|pair| pair.offset),
        offset_last: pairs.last().map(|pair| pair.offset),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn refusal_detail_json(detail: &RefusalDetail) -> Value {
    let mut payload = match &detail.kind {
        RefusalKind::Io { file, error } => json!({
            "file": file.as_str(),
            "error": error,
        }),
        RefusalKind::Encoding { file, issue } => json!({
            "file": file.as_str(),
            "issue": match issue {
                EncodingIssue::WideBom => "wide_bom",
                EncodingIssue::NulByte => "nul_byte",
            },
        }),
        RefusalKind::CsvParse { file, line } => json!({
            "file": file.as_str(),
            "line": line,
        }),
        RefusalKind::NoColumn {
            file,
            column,
            available,
        } => json!({
            "file": file.as_str(),
            "column": column,
            "available": available,
        }),
        RefusalKind::BadValue {
            file,
            record,
            value,
        } => json!({
            "file": file.as_str(),
            "record": record,
            "value": value,
        }),
        RefusalKind::NotMonotonic {
            file,
            record,
            prev,
            value,
        } => json!({
            "file": file.as_str(),
            "record": record,
            "prev": prev,
            "value": value,
        }),
        RefusalKind::Empty { file } => json!({
            "file": file.as_str(),
        }),
        RefusalKind::Seed {
            seed,
            events_left,
            events_right,
        } => json!({
            "seed": [seed.0, seed.1],
            "events_left": events_left,
            "events_right": events_right,
        }),
        RefusalKind::Overrides { error } => json!({
            "error": error,
        }),
    };
    payload["next"] = json!(detail.next);
    payload
}
