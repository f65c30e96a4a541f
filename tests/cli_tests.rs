//! End-to-end tests for the pomodoro-bar binary.
//!
//! Every test points `--config` at a temporary directory so the user's real
//! settings are never touched.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn settings_path(dir: &TempDir) -> PathBuf {
    dir.path().join("settings.json")
}

fn pomodoro(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pomodoro-bar").unwrap();
    cmd.arg("--config").arg(settings_path(dir));
    cmd
}

fn read_record(dir: &TempDir) -> serde_json::Value {
    let contents = fs::read_to_string(settings_path(dir)).unwrap();
    serde_json::from_str(&contents).unwrap()
}

// ============================================================================
// General
// ============================================================================

#[test]
fn test_no_command_prints_help() {
    Command::cargo_bin("pomodoro-bar")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version() {
    Command::cargo_bin("pomodoro-bar")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    Command::cargo_bin("pomodoro-bar")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomodoro-bar"));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_path() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));
}

#[test]
fn test_settings_show_creates_default_record() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work:  25:00"))
        .stdout(predicate::str::contains("Rest:  05:00"))
        .stdout(predicate::str::contains("built-in alarm"));

    let record = read_record(&dir);
    assert_eq!(record["work_time"], 1500);
    assert_eq!(record["rest_time"], 300);
    assert_eq!(record["sound_file"], "builtin:alarm");
}

#[test]
fn test_settings_show_heals_corrupt_record() {
    let dir = TempDir::new().unwrap();
    fs::write(settings_path(&dir), "{ not json").unwrap();

    pomodoro(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work:  25:00"));

    assert_eq!(read_record(&dir)["work_time"], 1500);
}

#[test]
fn test_settings_set_durations() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "set", "--work", "50:00", "--rest", "0:10:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    let record = read_record(&dir);
    assert_eq!(record["work_time"], 3000);
    assert_eq!(record["rest_time"], 600);
}

#[test]
fn test_settings_set_sound_file() {
    let dir = TempDir::new().unwrap();
    let sound = dir.path().join("bell.wav");
    fs::write(&sound, b"RIFF").unwrap();

    pomodoro(&dir)
        .args(["settings", "set", "--sound"])
        .arg(&sound)
        .assert()
        .success();

    assert_eq!(
        read_record(&dir)["sound_file"],
        sound.display().to_string()
    );
}

#[test]
fn test_settings_set_rejects_missing_sound_file() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "set", "--work", "30:00", "--sound", "/nonexistent/bell.wav"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/bell.wav"));

    // The record is left at its previous values.
    assert_eq!(read_record(&dir)["work_time"], 1500);
}

#[test]
fn test_settings_set_rejects_malformed_time() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "set", "--work", "ab:cd"])
        .assert()
        .failure();

    assert!(!settings_path(&dir).exists());
}

#[test]
fn test_settings_set_requires_a_change() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "set"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn test_settings_reset() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "set", "--work", "10"])
        .assert()
        .success();
    assert_eq!(read_record(&dir)["work_time"], 10);

    pomodoro(&dir)
        .args(["settings", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored to defaults"));
    assert_eq!(read_record(&dir)["work_time"], 1500);
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_status_and_quit() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .arg("run")
        .write_stdin("status\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:     work"))
        .stdout(predicate::str::contains("[25:00]"));
}

#[test]
fn test_run_exits_at_end_of_input() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .arg("run")
        .write_stdin("rest\nstatus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:     rest"));
}

#[test]
fn test_run_reports_unknown_command() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .arg("run")
        .write_stdin("bogus\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command 'bogus'"));
}
