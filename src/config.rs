//! Per-recording alignment overrides (bd-84t).
//!
//! Trigger channels differ in quality per subject and run, so the pipeline
//! keeps a small table of `(subject, run) -> (abs_tol, max_missing)`
//! overrides. The table is explicit configuration handed to the entry point
//! — never ambient state — and falls back to the documented process-wide
//! default pair.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Default absolute tolerance when no override matches.
pub const DEFAULT_ABS_TOL: f64 = 10.0;
/// Default missing-event budget when no override matches.
pub const DEFAULT_MAX_MISSING: usize = 5;

/// One table row as it appears in the overrides file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OverrideEntry {
    pub subject: u32,
    pub run: u32,
    pub abs_tol: f64,
    pub max_missing: usize,
}

/// Lookup table from `(subject, run)` to `(abs_tol, max_missing)`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: HashMap<(u32, u32), (f64, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverridesError {
    Io { error: String },
    Parse { error: String },
    /// A row carries a non-finite or negative tolerance.
    Invalid { subject: u32, run: u32 },
}

impl fmt::Display for OverridesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverridesError::Io { error } => write!(f, "cannot read overrides file: {error}"),
            OverridesError::Parse { error } => write!(f, "cannot parse overrides file: {error}"),
            OverridesError::Invalid { subject, run } => write!(
                f,
                "invalid tolerance for subject {subject} run {run} (must be finite and >= 0)"
            ),
        }
    }
}

impl std::error::Error for OverridesError {}

impl Overrides {
    /// Load a JSON array of [`OverrideEntry`] rows. A later row for the same
    /// `(subject, run)` replaces an earlier one.
    pub fn load(path: &Path) -> Result<Self, OverridesError> {
        let bytes = fs::read(path).map_err(|err| OverridesError::Io {
            error: err.to_string(),
        })?;
        let rows: Vec<OverrideEntry> =
            serde_json::from_slice(&bytes).map_err(|err| OverridesError::Parse {
                error: err.to_string(),
            })?;
        Self::from_entries(rows)
    }

    pub fn from_entries(
        rows: impl IntoIterator<Item = OverrideEntry>,
    ) -> Result<Self, OverridesError> {
        let mut entries = HashMap::new();
        for row in rows {
            if !row.abs_tol.is_finite() || row.abs_tol < 0.0 {
                return Err(OverridesError::Invalid {
                    subject: row.subject,
                    run: row.run,
                });
            }
            entries.insert((row.subject, row.run), (row.abs_tol, row.max_missing));
        }
        Ok(Self { entries })
    }

    /// Resolve `(abs_tol, max_missing)` for a recording, falling back to
    /// `(DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING)`.
    pub fn lookup(&self, subject: u32, run: u32) -> (f64, usize) {
        self.entries
            .get(&(subject, run))
            .copied()
            .unwrap_or((DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING, OverrideEntry, Overrides, OverridesError};

    fn entry(subject: u32, run: u32, abs_tol: f64, max_missing: usize) -> OverrideEntry {
        OverrideEntry {
            subject,
            run,
            abs_tol,
            max_missing,
        }
    }

    #[test]
    fn lookup_prefers_the_table_row() {
        let table = Overrides::from_entries([entry(3, 1, 25.0, 12)]).expect("valid table");
        assert_eq!(table.lookup(3, 1), (25.0, 12));
    }

    #[test]
    fn lookup_falls_back_to_the_default_pair() {
        let table = Overrides::from_entries([entry(3, 1, 25.0, 12)]).expect("valid table");
        assert_eq!(table.lookup(4, 1), (DEFAULT_ABS_TOL, DEFAULT_MAX_MISSING));
        assert_eq!(Overrides::default().lookup(1, 1), (10.0, 5));
    }

    #[test]
    fn later_rows_replace_earlier_ones() {
        let table = Overrides::from_entries([entry(7, 2, 15.0, 6), entry(7, 2, 30.0, 9)])
            .expect("valid table");
        assert_eq!(table.lookup(7, 2), (30.0, 9));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn negative_or_non_finite_tolerances_are_invalid() {
        let err = Overrides::from_entries([entry(1, 1, -2.0, 3)]).expect_err("negative");
        assert_eq!(err, OverridesError::Invalid { subject: 1, run: 1 });
        let err = Overrides::from_entries([entry(1, 2, f64::NAN, 3)]).expect_err("nan");
        assert_eq!(err, OverridesError::Invalid { subject: 1, run: 2 });
    }

    #[test]
    fn parses_a_json_table() {
        let rows: Vec<OverrideEntry> = serde_json::from_str(
            r#"[{"subject": 3, "run": 1, "abs_tol": 20.0, "max_missing": 10}]"#,
        )
        .expect("parses");
        let table = Overrides::from_entries(rows).expect("valid table");
        assert_eq!(table.lookup(3, 1), (20.0, 10));
    }
}
