use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_both_commands() {
    Command::cargo_bin("rotor")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("done").and(predicate::str::contains("create")));
}

#[test]
fn done_with_missing_config_file_fails() {
    Command::cargo_bin("rotor")
        .unwrap()
        .args(["done", "--config", "no-such-file.json"])
        .env_remove("ROTOR_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-file.json"));
}

#[test]
fn done_reports_empty_token_without_submitting() {
    let config = write_config(
        r#"{"plugin":"fixed","reviews":["alice"],"owners":{"name":"octo","repos":["app"]}}"#,
    );

    Command::cargo_bin("rotor")
        .unwrap()
        .args(["done", "--config", config.path().to_str().unwrap()])
        .env_remove("ROTOR_TOKEN")
        .assert()
        .failure()
        .stdout(predicate::str::contains("token not allowed empty"));
}

#[test]
fn create_rejects_missing_interval() {
    let config = write_config(
        r#"{"plugin":"fixed","token":"tok","reviews":["alice"],"owners":{"name":"octo","repos":["app"]},"dispatch":"now"}"#,
    );

    Command::cargo_bin("rotor")
        .unwrap()
        .args(["create", "--config", config.path().to_str().unwrap()])
        .env_remove("ROTOR_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dispatch"));
}

#[test]
fn unknown_policy_is_rejected_before_any_work() {
    Command::cargo_bin("rotor")
        .unwrap()
        .args([
            "done",
            "--token",
            "tok",
            "--policy",
            "coin-flip",
            "--reviewers",
            "alice",
            "--owner",
            "octo",
            "--repos",
            "app",
        ])
        .env_remove("ROTOR_TOKEN")
        .assert()
        .failure()
        .stdout(predicate::str::contains("coin-flip"));
}
