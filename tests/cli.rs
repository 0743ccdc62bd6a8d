mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn xcccr(workdir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xcccr").unwrap();
    cmd.current_dir(workdir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn regression_fails_with_error_line() {
    let dir = tempfile::tempdir().unwrap();
    xcccr(&dir)
        .arg("--cur")
        .arg(common::fixture_path("current.json"))
        .arg("--lst")
        .arg(common::fixture_path("last.json"))
        .args(["--proj", "/proj"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "::warning file=App/Legacy/Old.swift::File is not covered.",
        ))
        .stdout(predicate::str::ends_with(
            "::error::Code coverage is decreased: currently covered 62%25, last coverage was 85%25.\n",
        ));
}

#[test]
fn tolerance_flag_passes() {
    let dir = tempfile::tempdir().unwrap();
    xcccr(&dir)
        .arg("--current")
        .arg(common::fixture_path("current.json"))
        .arg("--last")
        .arg(common::fixture_path("last.json"))
        .args(["--tol", "25"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "Code coverage is decreased: currently covered 62%, last coverage was 85%.\n",
        ));
}

#[test]
fn current_report_from_stdin_without_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let report = std::fs::read_to_string(common::fixture_path("current.json")).unwrap();
    xcccr(&dir)
        .arg("--lst")
        .arg(dir.path().join("missing.json"))
        .write_stdin(report)
        .assert()
        .success()
        .stdout(predicate::str::contains("last coverage is unavailable"))
        .stderr(predicate::str::contains("previous report not found"));
}

#[test]
fn config_file_is_layered_under_flags() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".xcccr.toml"),
        "project_path = \"/proj\"\nfilter_warn_paths = [\"Legacy/\"]\ntolerance = 25\n",
    )
    .unwrap();
    xcccr(&dir)
        .arg("--cur")
        .arg(common::fixture_path("current.json"))
        .arg("--lst")
        .arg(common::fixture_path("last.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("::warning file=App/Model.swift::"))
        .stdout(predicate::str::contains("Old.swift").not());

    xcccr(&dir)
        .arg("--cur")
        .arg(common::fixture_path("current.json"))
        .arg("--lst")
        .arg(common::fixture_path("last.json"))
        .args(["--tol", "0"])
        .assert()
        .code(1);
}

#[test]
fn zero_coverage_can_be_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let zero = r#"{"coveredLines": 0, "executableLines": 50, "targets": [
        {"name": "App.app", "files": [
            {"name": "A.swift", "path": "/proj/A.swift", "coveredLines": 0, "executableLines": 50}
        ]}
    ]}"#;
    let path = dir.path().join("zero.json");
    std::fs::write(&path, zero).unwrap();

    xcccr(&dir).arg("--cur").arg(&path).assert().code(1);

    xcccr(&dir)
        .arg("--cur")
        .arg(&path)
        .arg("-z")
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "::warning::Code coverage is not changed: currently covered 0%25, last coverage is unavailable.\n",
        ));
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    xcccr(&dir)
        .arg("--cur")
        .arg(common::fixture_path("current.json"))
        .args(["--rg", "(unclosed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn tolerance_out_of_range_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    xcccr(&dir)
        .arg("--cur")
        .arg(common::fixture_path("current.json"))
        .args(["--tol", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("101"));
}
