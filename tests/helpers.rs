use std::path::{Path, PathBuf};

use lockstep::align::DEFAULT_REL_TOL;
use lockstep::cli::args::Args;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("fixture should be readable")
}

/// Args for a fixture pair with every flag at its default.
pub fn base_args(left: &str, right: &str) -> Args {
    Args {
        left: fixture_path(left),
        right: fixture_path(right),
        column: None,
        column_right: None,
        scale_left: 1.0,
        scale_right: 1.0,
        abs_tol: None,
        rel_tol: DEFAULT_REL_TOL,
        max_missing: None,
        seed: None,
        overrides: None,
        subject: None,
        run: None,
        delimiter: None,
        json: false,
    }
}
