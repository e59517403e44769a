use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causelist"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("cause list"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causelist"));
    cmd.arg("--version").assert().success();
}

#[test]
fn test_fetch_requires_a_date() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causelist"));
    cmd.arg("fetch")
        .assert()
        .failure()
        .stderr(contains("--date"));
}

#[test]
fn test_fetch_rejects_unknown_case_type() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causelist"));
    cmd.args(["fetch", "--date", "14-10-2025", "--case-type", "traffic"])
        .assert()
        .failure()
        .stderr(contains("case type"));
}

#[test]
fn test_config_command_prints_resolved_values() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("causelist"));
    cmd.arg("config")
        .assert()
        .success()
        .stdout(contains("WebDriver:"));
}
