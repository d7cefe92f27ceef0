//! End-to-end CLI behavior, exercising the binary as a subprocess.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn s1_single_literal_hit_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello\nworld\n").unwrap();

    Command::cargo_bin("srcgrep")
        .unwrap()
        .args(["world", "--path"])
        .arg(dir.path())
        .arg("--pipe")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt:2:world"));
}

#[test]
fn no_matches_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"nothing here\n").unwrap();

    Command::cargo_bin("srcgrep")
        .unwrap()
        .args(["needle", "--path"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn s7_nonexistent_path_exits_two() {
    Command::cargo_bin("srcgrep")
        .unwrap()
        .args(["needle", "--path", "/does/not/exist/at/all"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn s8_conflicting_output_flags_exits_two() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("srcgrep")
        .unwrap()
        .args(["needle", "--path"])
        .arg(dir.path())
        .arg("--html")
        .arg("--pipe")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--html and --pipe"));
}

#[test]
fn zero_threads_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("srcgrep")
        .unwrap()
        .args(["needle", "--path"])
        .arg(dir.path())
        .arg("--threads")
        .arg("0")
        .assert()
        .code(2);
}
