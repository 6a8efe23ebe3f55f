mod helpers;

use lockstep::cli::args::SeedArg;
use lockstep::cli::exit::Outcome;
use lockstep::orchestrator;

#[test]
fn stimulus_and_trigger_fixtures_align() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;

    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Aligned);
    assert!(result.output.starts_with("LOCKSTEP\n\nALIGNED"));
    assert!(result.output.contains("Matched: 2 pairs"));
    assert!(result.output.contains("Columns: left=onset right=trigger"));
    assert!(result.output.contains("[0] 1100 ~ [1] 1110 (+10)"));
}

#[test]
fn aligned_json_has_the_versioned_shape() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Aligned);
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["version"], "lockstep.v0");
    assert_eq!(value["outcome"], "ALIGNED");
    assert_eq!(value["settings"]["abs_tol"], 10.0);
    assert_eq!(value["settings"]["max_missing"], 5);
    assert_eq!(value["counts"]["events_left"], 3);
    assert_eq!(value["counts"]["events_right"], 4);
    assert_eq!(value["counts"]["matched"], 2);
    assert_eq!(value["counts"]["unmatched_right"], 2);
    assert_eq!(value["pairs"][0]["left"], 0);
    assert_eq!(value["pairs"][0]["right"], 1);
    assert_eq!(value["pairs"][1]["offset"], 20.0);
    assert_eq!(value["metrics"]["max_gap_error"], 10.0);
}

#[test]
fn incompatible_gap_structure_stalls_with_windows() {
    let mut args = helpers::base_args("steady.csv", "sparse.csv");
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Stalled);
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["outcome"], "STALLED");
    assert_eq!(value["stall"]["matched"], 1);
    assert!(
        !value["stall"]["left_window"]["values"]
            .as_array()
            .expect("window array")
            .is_empty()
    );
    assert!(value["refusal"].is_null());
}

#[test]
fn stalled_human_report_names_the_stall_point() {
    let args = helpers::base_args("steady.csv", "sparse.csv");
    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Stalled);
    assert!(result.output.starts_with("LOCKSTEP\n\nSTALLED"));
    assert!(result.output.contains("Stalled after 1 pairs"));
    assert!(result.output.contains("Next: raise --abs-tol or --max-missing"));
}

#[test]
fn non_numeric_timestamp_is_refused() {
    let args = helpers::base_args("bad_value.csv", "triggers.csv");
    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Refusal);
    assert!(result.output.starts_with("LOCKSTEP ERROR (E_BAD_VALUE)"));
    assert!(result.output.contains("Record 2: \"oops\""));
}

#[test]
fn ambiguous_column_refusal_suggests_a_rerun_command() {
    let args = helpers::base_args("events.csv", "triggers.csv");
    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Refusal);
    assert!(result.output.starts_with("LOCKSTEP ERROR (E_NO_COLUMN)"));
    assert!(result.output.contains("--column onset"));
}

#[test]
fn overrides_table_sets_the_tolerance_pair() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;
    args.overrides = Some(helpers::fixture_path("overrides.json"));
    args.subject = Some(3);
    args.run = Some(1);
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["settings"]["abs_tol"], 30.0);
    assert_eq!(value["settings"]["max_missing"], 8);
}

#[test]
fn explicit_flags_beat_the_overrides_table() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;
    args.overrides = Some(helpers::fixture_path("overrides.json"));
    args.subject = Some(3);
    args.run = Some(1);
    args.abs_tol = Some(50.0);
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["settings"]["abs_tol"], 50.0);
    assert_eq!(value["settings"]["max_missing"], 8);
}

#[test]
fn unknown_recording_uses_the_default_pair() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;
    args.overrides = Some(helpers::fixture_path("overrides.json"));
    args.subject = Some(99);
    args.run = Some(1);
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["settings"]["abs_tol"], 10.0);
    assert_eq!(value["settings"]["max_missing"], 5);
}

#[test]
fn out_of_range_seed_is_refused_before_the_core_runs() {
    let mut args = helpers::base_args("events.csv", "triggers.csv");
    args.column = Some("onset".to_string());
    args.column_right = Some("trigger".to_string());
    args.scale_left = 1000.0;
    args.seed = Some(SeedArg { left: 99, right: 0 });
    args.json = true;

    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Refusal);
    let value: serde_json::Value = serde_json::from_str(&result.output).expect("json output");
    assert_eq!(value["refusal"]["code"], "E_SEED");
    assert_eq!(value["refusal"]["detail"]["events_left"], 3);
}

#[test]
fn missing_file_is_an_io_refusal() {
    let args = helpers::base_args("no_such_file.csv", "triggers.csv");
    let result = orchestrator::run(&args).expect("pipeline runs");
    assert_eq!(result.outcome, Outcome::Refusal);
    assert!(result.output.starts_with("LOCKSTEP ERROR (E_IO)"));
}
