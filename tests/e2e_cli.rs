use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

/// Isolated HOME/XDG_CONFIG_HOME so no user config leaks in
fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("scorecard"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn replay_prints_table_without_color_when_asked() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--no-color")
        .arg("replay")
        .arg("tests/fixtures/replay_basic.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score history (2 records)"))
        .stdout(predicate::str::contains("+6.149%"))
        .stdout(predicate::str::contains("+33.333%"))
        .stdout(predicate::str::contains("-20%"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn replay_json_output() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--json")
        .arg("replay")
        .arg("tests/fixtures/replay_basic.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cumulative_return_pct\": \"6.149\""))
        .stdout(predicate::str::contains("\"timestamp\": 500"));
}

#[test]
fn replay_stops_on_missing_quote() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--no-color")
        .arg("replay")
        .arg("tests/fixtures/replay_missing_quote.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("replay stopped after 1 scored snapshots"))
        .stderr(predicate::str::contains("missing quote for held asset 'kiwi'"));
}

#[test]
fn replay_skip_invalid_keeps_going() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--no-color")
        .arg("replay")
        .arg("tests/fixtures/replay_missing_quote.json")
        .arg("--skip-invalid")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score history (2 records)"))
        .stdout(predicate::str::contains("1 snapshot(s) rejected"))
        .stderr(predicate::str::contains("Skipping snapshot"));
}

#[test]
fn score_two_files_uses_config_precision() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--json")
        .arg("score")
        .arg("tests/fixtures/baseline.json")
        .arg("tests/fixtures/current.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cumulative_return_pct\": \"-65.248\""));

    let config_path = home.path().join("scorecard.toml");
    std::fs::write(&config_path, "[precision]\ndecimals = 1\n").expect("failed to write config");

    base_cmd(&home)
        .arg("--json")
        .arg("--config")
        .arg(&config_path)
        .arg("score")
        .arg("tests/fixtures/baseline.json")
        .arg("tests/fixtures/current.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cumulative_return_pct\": \"-65.2\""));
}

#[test]
fn score_reports_overflow_as_error() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("score")
        .arg("tests/fixtures/baseline.json")
        .arg("tests/fixtures/current_overflow.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("arithmetic overflow computing value of 'tok'"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn missing_snapshot_file_reports_path() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("replay")
        .arg("tests/fixtures/does_not_exist.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist.json"));
}
