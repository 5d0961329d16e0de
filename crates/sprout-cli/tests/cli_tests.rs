//! End-to-end CLI tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sprout() -> Command {
    Command::cargo_bin("sprout").unwrap()
}

fn write_snippet(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_run_prints_output_lines() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "hi.spr", "print('hello')\nprint('world')\n");

    sprout()
        .args(["run", &file])
        .assert()
        .success()
        .stdout("hello\nworld\n");
}

#[test]
fn test_run_failure_shows_single_message() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "bad.spr", "x = = 1\n");

    sprout()
        .args(["run", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not interpret this snippet"));
}

#[test]
fn test_run_json_report() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "hi.spr", "print('hello')\n");

    sprout()
        .args(["run", &file, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": true"))
        .stdout(predicate::str::contains("prints-output"));
}

#[test]
fn test_run_tier_gating() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "cond.spr", "if 1 == 1:\n    print('x')\n");

    sprout()
        .args(["run", &file, "--tier", "0"])
        .assert()
        .failure();
    sprout()
        .args(["run", &file, "--tier", "2"])
        .assert()
        .success();
}

#[test]
fn test_check_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "bad.spr", "if x:\n    print(x)\n");

    sprout()
        .args(["check", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SP2000"));
}

#[test]
fn test_concepts_lists_flags() {
    let dir = TempDir::new().unwrap();
    let file = write_snippet(&dir, "f.spr", "def f(x):\n    return x\n");

    sprout()
        .args(["concepts", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("defines-function"))
        .stdout(predicate::str::contains("returns-value"));
}

#[test]
fn test_lessons_and_play() {
    let dir = TempDir::new().unwrap();
    let content = r#"
id = 1
title = "Hello Functions"
tier = 0
starter = "def hello():\n    print('hi')\n\nhello()\n"

[[challenges]]
text = "Define a function"
concept = "defines-function"

[[quiz]]
prompt = "Which keyword defines a function?"
choices = ["def", "fun"]
correct = 0

[reward]
xp = 30
coins = 5
"#;
    fs::write(dir.path().join("hello.toml"), content).unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    sprout()
        .args(["lessons", dir_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Functions"));

    sprout()
        .args(["play", dir_arg, "--lesson", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hi"))
        .stdout(predicate::str::contains("30 xp"));
}

#[test]
fn test_missing_file_fails_cleanly() {
    sprout()
        .args(["run", "/no/such/file.spr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
