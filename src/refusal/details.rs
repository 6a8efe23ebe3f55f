//! Refusal detail payloads & Next steps (bd-2hp).
//!
//! Detail payloads carry the concrete evidence for each refusal code, plus a
//! deterministic "next" remediation or rerun command rendered at output time.

use crate::series::load::EncodingIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSide {
    Left,
    Right,
}

impl FileSide {
    pub fn as_str(self) -> &'static str {
        match self {
            FileSide::Left => "left",
            FileSide::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RerunPaths<'a> {
    pub left: &'a str,
    pub right: &'a str,
}

#[derive(Debug, Clone)]
pub struct RefusalDetail {
    pub kind: RefusalKind,
    /// Next-step remediation or rerun guidance (without "Next:" prefix).
    pub next: String,
}

impl RefusalDetail {
    pub fn new(kind: RefusalKind, next: String) -> Self {
        Self { kind, next }
    }

    pub fn with_default_next(kind: RefusalKind, paths: RerunPaths<'_>) -> Self {
        let next = kind.default_next(paths);
        Self { kind, next }
    }
}

#[derive(Debug, Clone)]
pub enum RefusalKind {
    Io {
        file: FileSide,
        error: String,
    },
    Encoding {
        file: FileSide,
        issue: EncodingIssue,
    },
    CsvParse {
        file: FileSide,
        line: Option<u64>,
    },
    /// Requested column absent, or several columns and none requested.
    NoColumn {
        file: FileSide,
        column: Option<String>,
        available: Vec<String>,
    },
    BadValue {
        file: FileSide,
        record: u64,
        value: String,
    },
    NotMonotonic {
        file: FileSide,
        record: u64,
        prev: f64,
        value: f64,
    },
    Empty {
        file: FileSide,
    },
    Seed {
        seed: (usize, usize),
        events_left: usize,
        events_right: usize,
    },
    Overrides {
        error: String,
    },
}

impl RefusalKind {
    pub fn default_next(&self, paths: RerunPaths<'_>) -> String {
        match self {
            RefusalKind::Io { .. } => "check file paths/permissions and rerun".to_string(),
            RefusalKind::Encoding { .. } => {
                "re-export both event logs as UTF-8 text and rerun".to_string()
            }
            RefusalKind::CsvParse { .. } => {
                "re-export as standard CSV/TSV (RFC4180 quoting) and rerun".to_string()
            }
            RefusalKind::NoColumn { available, .. } => {
                if let Some(name) = available.first() {
                    format!(
                        "lockstep {} {} --column {}",
                        paths.left, paths.right, name
                    )
                } else {
                    "rerun with --column <name>".to_string()
                }
            }
            RefusalKind::BadValue { .. } => {
                "clean the timestamp column (or pick another with --column), then rerun"
                    .to_string()
            }
            RefusalKind::NotMonotonic { .. } => {
                "sort the events by onset (or fix the export), then rerun".to_string()
            }
            RefusalKind::Empty { .. } => {
                "export a log with at least one event row, then rerun".to_string()
            }
            RefusalKind::Seed { .. } => {
                "pass --seed indices inside both series, or drop --seed for the automatic search"
                    .to_string()
            }
            RefusalKind::Overrides { .. } => {
                "fix the overrides JSON (array of {subject, run, abs_tol, max_missing}) or drop --overrides"
                    .to_string()
            }
        }
    }
}
