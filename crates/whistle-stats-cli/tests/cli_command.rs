use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_whistle_stats_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("whistle-stats")
}

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn command() -> Command {
    let mut cmd = Command::new(get_whistle_stats_bin());
    cmd.env_remove("WHISTLE_STATS_FORMAT")
        .env_remove("WHISTLE_STATS_TOP")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_stats_pretty_output() {
    let mut cmd = command();
    cmd.arg("stats").arg("--file").arg(fixture_path("sample-capture.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Whistle Traffic Statistics"))
        .stdout(predicate::str::contains("Basic Statistics"))
        .stdout(predicate::str::contains("api.example.com"))
        .stdout(predicate::str::contains("Response Size Distribution"));
}

#[test]
fn test_stats_json_output_is_valid() {
    let mut cmd = command();
    cmd.arg("--format")
        .arg("json")
        .arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["basic"]["total_requests"], 3);
    assert_eq!(report["domains"][0]["domain"], "api.example.com");
    assert_eq!(report["status_codes"]["404"], 1);
    assert_eq!(report["size_distribution"]["res_size_ranges"][">= 1MB"], 1);
}

#[test]
fn test_stats_format_from_environment() {
    let mut cmd = command();
    cmd.env("WHISTLE_STATS_FORMAT", "table")
        .arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Metric,Value"));
}

#[test]
fn test_stats_reads_stdin() {
    let input = std::fs::read_to_string(fixture_path("sample-capture.json")).unwrap();

    let mut cmd = command();
    cmd.arg("--format").arg("json").arg("stats").write_stdin(input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_requests\": 3"));
}

#[test]
fn test_stats_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("report.json");

    let mut cmd = command();
    cmd.arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"))
        .arg("-o")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Results saved to"));

    let written = std::fs::read_to_string(&output).unwrap();
    let report: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(report["basic"]["total_requests"], 3);
    assert_eq!(report["methods"]["GET"], 2);
}

#[test]
fn test_stats_detailed_breakdown() {
    let mut cmd = command();
    cmd.arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"))
        .arg("--detailed");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Status Codes:       200: 1, 404: 1"));
}

#[test]
fn test_stats_host_filter() {
    let mut cmd = command();
    cmd.arg("--format")
        .arg("json")
        .arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"))
        .arg("--host")
        .arg("cdn.example.com");

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["basic"]["total_requests"], 1);
}

#[test]
fn test_stats_invalid_status_pattern_fails() {
    let mut cmd = command();
    cmd.arg("stats")
        .arg("-f")
        .arg(fixture_path("sample-capture.json"))
        .arg("--status")
        .arg("abc");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status code"));
}

#[test]
fn test_stats_empty_capture() {
    let mut cmd = command();
    cmd.arg("stats").arg("-f").arg(fixture_path("empty-capture.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No traffic data available"));
}

#[test]
fn test_stats_invalid_json_fails() {
    let mut cmd = command();
    cmd.arg("stats").arg("-f").arg(fixture_path("invalid.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse capture"));
}

#[test]
fn test_stats_top_level_array_fails() {
    let mut cmd = command();
    cmd.arg("stats").write_stdin("[]");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid capture structure"))
        .stdout(predicate::str::contains("No traffic data available").not());
}

#[test]
fn test_stats_missing_file_fails() {
    let mut cmd = command();
    cmd.arg("stats").arg("-f").arg("/nonexistent/capture.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read capture file"));
}
