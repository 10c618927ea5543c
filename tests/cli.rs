// ABOUTME: Integration tests for the pullman CLI commands.
// ABOUTME: Validates help, init, assess, and pull against a fake engine.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use support::fake_engine::FakeEngine;

fn pullman_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pullman"))
}

#[test]
fn help_shows_commands() {
    pullman_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("pull"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("pullman.yml");

    pullman_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(config_path.exists(), "pullman.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("image:"), "Config should have image field");
    assert!(content.contains("policy:"), "Config should have policy field");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("pullman.yml");

    fs::write(&config_path, "existing: config").unwrap();

    pullman_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn assess_reports_pull_required() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman");

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["assess", "missing-image:v1", "--pull-policy", "missing"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull required: yes"));
}

#[test]
fn assess_quiet_prints_just_the_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman").with_images(&["ee:v1"]);

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["assess", "ee:v1", "--pull-policy", "missing", "--output", "quiet"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn assess_json_emits_an_event() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman");

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["assess", "ee:v1", "--pull-policy", "always", "--output", "json"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"assessment""#))
        .stdout(predicate::str::contains(r#""pull_required":true"#));
}

#[test]
fn pull_streams_engine_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman");

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["pull", "quay.io/org/ee:v1", "--pull-policy", "missing"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .success()
        .stdout(predicate::str::contains("Trying to pull"))
        .stdout(predicate::str::contains("Pull complete"));

    assert!(engine.images().contains(&"quay.io/org/ee:v1".to_string()));
}

#[test]
fn pull_skips_when_nothing_is_required() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman").with_images(&["ee:v1"]);

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["pull", "ee:v1", "--pull-policy", "missing"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to pull"));

    let invocations = engine.invocations();
    assert_eq!(invocations.len(), 1, "only the listing should have run");
    assert!(invocations[0].starts_with("images"));
}

#[test]
fn pull_failure_exits_nonzero() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman");
    engine.fail_pulls();

    pullman_cmd()
        .current_dir(temp_dir.path())
        .args(["pull", "quay.io/org/absent:v9", "--pull-policy", "missing"])
        .arg("--engine")
        .arg(engine.binary())
        .assert()
        .failure()
        .stderr(predicate::str::contains("exit status 125"));
}

#[test]
fn missing_image_argument_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    pullman_cmd()
        .current_dir(temp_dir.path())
        .arg("assess")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no image given"));
}

#[test]
fn config_file_supplies_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new("podman").with_images(&["quay.io/org/ee:latest"]);

    let yaml = format!(
        "engine: {}\nimage: quay.io/org/ee\npull:\n  policy: tag\n",
        engine.binary().display()
    );
    fs::write(temp_dir.path().join("pullman.yml"), yaml).unwrap();

    // `tag` policy re-pulls a `latest` tag even when present locally
    pullman_cmd()
        .current_dir(temp_dir.path())
        .arg("assess")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull required: yes"));
}
