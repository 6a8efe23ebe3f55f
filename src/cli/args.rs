use std::path::PathBuf;

use clap::Parser;

use super::delimiter::parse_delimiter_arg;
use crate::align::DEFAULT_REL_TOL;

/// Known first correspondence passed as `I,J`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedArg {
    pub left: usize,
    pub right: usize,
}

/// CLI argument parsing & validation (bd-l2w).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lockstep",
    about = "Match two event-timestamp logs recorded by independent drifting clocks.",
    override_usage = "lockstep <left.csv> <right.csv> [--column <name>] [--abs-tol <float>] [--max-missing <int>] [--seed <i,j>] [--json]"
)]
pub struct Args {
    /// Left event log (e.g. the stimulus/software side).
    #[arg(value_name = "LEFT_CSV")]
    pub left: PathBuf,

    /// Right event log (e.g. the hardware trigger side).
    #[arg(value_name = "RIGHT_CSV")]
    pub right: PathBuf,

    /// Timestamp column in both files (otherwise each file must have one column).
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Timestamp column for the right file when it differs from --column.
    #[arg(long, value_name = "NAME")]
    pub column_right: Option<String>,

    /// Multiply left timestamps, e.g. 1000 to convert seconds to milliseconds.
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = 1.0,
        value_parser = parse_scale
    )]
    pub scale_left: f64,

    /// Multiply right timestamps.
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = 1.0,
        value_parser = parse_scale
    )]
    pub scale_right: f64,

    /// Absolute gap tolerance: x >= 0 (default: 10, or the overrides table).
    #[arg(long, value_name = "FLOAT", value_parser = parse_tolerance)]
    pub abs_tol: Option<f64>,

    /// Relative gap tolerance: x >= 0 (default: 0.003).
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = DEFAULT_REL_TOL,
        value_parser = parse_tolerance
    )]
    pub rel_tol: f64,

    /// Missing-event budget per side (default: 5, or the overrides table).
    #[arg(long, value_name = "INT")]
    pub max_missing: Option<usize>,

    /// Known first correspondence as left,right indices (skips the seed search).
    #[arg(long, value_name = "I,J", value_parser = parse_seed)]
    pub seed: Option<SeedArg>,

    /// JSON table of per-(subject, run) {abs_tol, max_missing} overrides.
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Subject id for the overrides lookup.
    #[arg(long, value_name = "INT", requires = "run")]
    pub subject: Option<u32>,

    /// Run id for the overrides lookup.
    #[arg(long, value_name = "INT", requires = "subject")]
    pub run: Option<u32>,

    /// Force a delimiter (comma/tab/semicolon/pipe/caret, 0xNN, or single ASCII byte).
    #[arg(long, value_name = "DELIM", value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Emit JSON output (single object).
    #[arg(long)]
    pub json: bool,
}

impl Args {
    pub fn parse() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

fn parse_tolerance(raw: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| "tolerance must be a valid number".to_string())?;
    if !value.is_finite() {
        return Err("tolerance must be a finite number".to_string());
    }
    if value < 0.0 {
        return Err("tolerance must be >= 0".to_string());
    }
    Ok(value)
}

fn parse_scale(raw: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| "scale must be a valid number".to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err("scale must be a finite number > 0".to_string());
    }
    Ok(value)
}

fn parse_seed(raw: &str) -> Result<SeedArg, String> {
    let (left, right) = raw
        .split_once(',')
        .ok_or_else(|| "seed must be two indices as I,J".to_string())?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("seed index {:?} is not a non-negative integer", part.trim()))
    };
    Ok(SeedArg {
        left: parse(left)?,
        right: parse(right)?,
    })
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    parse_delimiter_arg(raw).map_err(|err| err.to_string())
}
