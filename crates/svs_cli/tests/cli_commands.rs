use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};

const HISTORY_CSV: &str = "\
SvS history,,,,
State,SvS 03/22,Result,SvS 03/15,Result
1001,2002,Supreme Win,2003,Prep Win
1002,abc,Battle Win,,
,2002,Lost Both,2003,Lost Both
";

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svs-history"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run svs-history CLI")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("output should be readable");
    serde_json::from_str(&text).expect("output should be valid JSON")
}

#[test]
fn convert_writes_document_and_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("history.csv");
    let output = dir.path().join("history.json");
    fs::write(&input, HISTORY_CSV).expect("write csv");

    let out = run_cli(&["convert", "-i", &path_arg(&input), "-o", &path_arg(&output)]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        format!("Conversion completed! JSON data saved to {}", output.display())
    );

    let value = read_json(&output);
    assert_eq!(value["1002"], json!({}));
    assert_eq!(value["1001"]["2024-03-15"]["won-castle"], false);
    assert_eq!(value.as_object().map(|o| o.len()), Some(2));

    let text = fs::read_to_string(&output).expect("output should be readable");
    assert!(text.starts_with("{\n    \"1001\": {\n        \"2024-03-22\""));
}

#[test]
fn convert_with_envelope_wraps_states() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("history.csv");
    let output = dir.path().join("wrapped.json");
    fs::write(&input, HISTORY_CSV).expect("write csv");

    let out = run_cli(&[
        "convert",
        "--envelope",
        "--input",
        &path_arg(&input),
        "--output",
        &path_arg(&output),
    ]);
    assert!(out.status.success());
    assert_eq!(
        read_json(&output)["svs-data-per-state"]["1001"]["2024-03-22"]["opposition-state"],
        2002
    );
}

#[test]
fn convert_fails_for_missing_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("never.json");

    let out = run_cli(&[
        "convert",
        "-i",
        &path_arg(&dir.path().join("missing.csv")),
        "-o",
        &path_arg(&output),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.csv"));
    assert!(!output.exists());
}

#[test]
fn sort_orders_dates_and_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("history.csv");
    let converted = dir.path().join("converted.json");
    let sorted = dir.path().join("sorted.json");
    let resorted = dir.path().join("resorted.json");
    fs::write(&input, HISTORY_CSV).expect("write csv");

    assert!(
        run_cli(&[
            "convert",
            "--envelope",
            "-i",
            &path_arg(&input),
            "-o",
            &path_arg(&converted),
        ])
        .status
        .success()
    );

    let out = run_cli(&[
        "sort",
        "--input-json",
        &path_arg(&converted),
        "--output-json",
        &path_arg(&sorted),
    ]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Sorted data saved to"));

    let value = read_json(&sorted);
    let history = value["svs-data-per-state"]["1001"]
        .as_object()
        .expect("history should be an object");
    let dates: Vec<&str> = history.keys().map(String::as_str).collect();
    assert_eq!(dates, vec!["2024-03-15", "2024-03-22"]);
    let fields: Vec<&str> = history["2024-03-15"]
        .as_object()
        .expect("outcome should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        fields,
        vec!["won-prep", "won-castle", "had-svs-match", "opposition-state"]
    );

    assert!(
        run_cli(&[
            "sort",
            "--input-json",
            &path_arg(&sorted),
            "--output-json",
            &path_arg(&resorted),
        ])
        .status
        .success()
    );
    assert_eq!(
        fs::read_to_string(&sorted).expect("sorted"),
        fs::read_to_string(&resorted).expect("resorted")
    );
}

#[test]
fn sort_rejects_non_object_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("bad.json");
    fs::write(&input, "[1, 2, 3]").expect("write json");

    let out = run_cli(&[
        "sort",
        "--input-json",
        &path_arg(&input),
        "--output-json",
        &path_arg(&dir.path().join("out.json")),
    ]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn troop_stats_fails_for_missing_workbook() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = run_cli(&[
        "troop-stats",
        "-i",
        &path_arg(&dir.path().join("troops.ods")),
        "-o",
        &path_arg(&dir.path().join("troops.json")),
    ]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let out = run_cli(&["frobnicate"]);
    assert_eq!(out.status.code(), Some(2));
}
