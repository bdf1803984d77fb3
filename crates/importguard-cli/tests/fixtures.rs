//! End-to-end CLI tests against `tests/fixtures/`.
//!
//! Each fixture holds a small JS/TS tree, its policy (`importguard.toml` or a
//! tsconfig plugin entry) and `expected.report.json`. The CLI must exit with
//! the expected code and produce the expected report, timestamps aside.

use assert_cmd::Command;
use importguard_test_util::{assert_reports_match, fixtures_dir, load_expected_report};
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

#[allow(deprecated)]
fn importguard_cmd() -> Command {
    Command::cargo_bin("importguard").expect("importguard binary not found - run `cargo build` first")
}

/// Run `check` on a fixture; returns the exit code, the report and stdout.
fn run_check_on_fixture(fixture: &str, extra_args: &[&str]) -> (i32, Value, String) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = importguard_cmd()
        .arg("--repo-root")
        .arg(fixtures_dir().join(fixture))
        .args(extra_args)
        .arg("check")
        .arg("--report-out")
        .arg(&report_path)
        .output()
        .expect("run importguard");

    let report_text = std::fs::read_to_string(&report_path).expect("read report");
    let report: Value = serde_json::from_str(&report_text).expect("parse report json");
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    (output.status.code().unwrap_or(-1), report, stdout)
}

fn assert_fixture(fixture: &str, extra_args: &[&str], expected_exit: i32) -> String {
    let (exit_code, report, stdout) = run_check_on_fixture(fixture, extra_args);
    assert_eq!(exit_code, expected_exit, "exit code for fixture '{fixture}'");
    assert_reports_match(report, load_expected_report(fixture), fixture);
    stdout
}

#[test]
fn fixture_clean_passes() {
    let stdout = assert_fixture("clean", &[], 0);
    assert!(stdout.contains("No import violations in 3 file(s)."));
}

#[test]
fn fixture_disallowed_fails() {
    let stdout = assert_fixture("disallowed", &[], 2);
    assert!(stdout.contains(
        "src/ui/Button.tsx:2:15 - error IG2: Import not allowed. Only imports below allowed from this file:"
    ));
    assert!(stdout.contains("Found 2 errors"));
}

#[test]
fn fixture_unconfigured_fails() {
    let stdout = assert_fixture("unconfigured", &[], 2);
    assert!(stdout.contains("src/lib/util.ts:1:16 - error IG1: No imports specified"));
}

#[test]
fn fixture_overlapping_rules_union() {
    assert_fixture("overlapping_rules", &[], 2);
}

#[test]
fn fixture_invalid_glob_fails_closed() {
    assert_fixture("invalid_glob", &[], 2);
}

#[test]
fn fixture_no_config_reports_everything() {
    assert_fixture("no_config", &[], 2);
}

#[test]
fn fixture_tsconfig_plugin() {
    assert_fixture("tsconfig_plugin", &["--tsconfig", "tsconfig.json"], 2);
}

#[test]
fn max_findings_truncates_report() {
    let (exit_code, report, _) = run_check_on_fixture("disallowed", &["--max-findings", "1"]);
    assert_eq!(exit_code, 2);
    assert_eq!(report["findings"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["data"]["findings_total"], 2);
    assert_eq!(report["data"]["findings_emitted"], 1);
    assert_eq!(
        report["data"]["truncated_reason"],
        "findings truncated to max_findings=1 (2 total)"
    );
}

#[test]
fn exclude_override_removes_files() {
    let (exit_code, report, _) =
        run_check_on_fixture("unconfigured", &["--exclude", "src/lib/**"]);
    assert_eq!(exit_code, 0);
    assert_eq!(report["data"]["files_scanned"], 1);
}

#[test]
fn quiet_format_prints_nothing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    importguard_cmd()
        .arg("--repo-root")
        .arg(fixtures_dir().join("disallowed"))
        .args(["check", "--format", "quiet", "--report-out"])
        .arg(temp_dir.path().join("report.json"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn write_markdown_alongside_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let md_path = temp_dir.path().join("comment.md");
    importguard_cmd()
        .arg("--repo-root")
        .arg(fixtures_dir().join("disallowed"))
        .args(["check", "--format", "quiet", "--write-markdown", "--report-out"])
        .arg(temp_dir.path().join("report.json"))
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .code(2);

    let md = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.contains("Verdict: **FAIL**"));
    assert!(md.contains("`src/ui/Button.tsx:2:15`"));
}

#[test]
fn missing_repo_root_writes_runtime_error_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");
    importguard_cmd()
        .arg("--repo-root")
        .arg(temp_dir.path().join("does-not-exist"))
        .args(["check", "--report-out"])
        .arg(&report_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("importguard error: repo root does not exist"));

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(report["verdict"]["status"], "fail");
    assert_eq!(report["findings"][0]["check_id"], "tool.runtime");
    assert_eq!(report["findings"][0]["code"], "runtime_error");
}

#[test]
fn missing_tsconfig_is_a_tool_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    importguard_cmd()
        .arg("--repo-root")
        .arg(fixtures_dir().join("clean"))
        .args(["--tsconfig", "nope.json", "check", "--report-out"])
        .arg(temp_dir.path().join("report.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read tsconfig"));
}

#[test]
fn md_and_annotations_render_existing_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");
    importguard_cmd()
        .arg("--repo-root")
        .arg(fixtures_dir().join("disallowed"))
        .args(["check", "--format", "quiet", "--report-out"])
        .arg(&report_path)
        .assert()
        .code(2);

    importguard_cmd()
        .args(["md", "--report"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Importguard report"))
        .stdout(predicate::str::contains("(IG2)"));

    importguard_cmd()
        .args(["annotations", "--max", "1", "--report"])
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "::error file=src/ui/Button.tsx,line=2,col=15::[imports.allowed:disallowed]",
        ))
        .stdout(predicate::str::contains("../api/client").not());
}
