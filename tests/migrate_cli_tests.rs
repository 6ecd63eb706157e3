use assert_cmd::prelude::*;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::tempdir;

/// Tests that `--help` is handled successfully by the migration binary.
///
/// This test verifies:
/// 1. Running `flashcards-migrate --help` exits successfully
/// 2. The help text lists both subcommands
/// 3. No unexpected stderr output is produced
#[test]
fn test_migrate_help_success() {
    let mut cmd = cargo_bin_cmd!("flashcards-migrate");

    let assert = cmd.arg("--help").assert().success();

    let out = assert.get_output();
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("up"), "expected `up` in help, got:\n{}", stdout);
    assert!(stdout.contains("down"), "expected `down` in help, got:\n{}", stdout);
    assert!(
        out.stderr.is_empty(),
        "expected empty stderr for --help, got:\n{}",
        String::from_utf8_lossy(&out.stderr)
    );
}

/// Tests applying and reverting the schema on a database file
#[test]
fn test_migrate_up_then_down() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("flashcards.db");
    let db_url = db_path.to_string_lossy().to_string();

    let assert = cargo_bin_cmd!("flashcards-migrate")
        .args(["--database-url", &db_url, "up"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Applied"), "unexpected output:\n{}", stdout);
    assert!(db_path.exists());

    // A second run has nothing left to apply
    let assert = cargo_bin_cmd!("flashcards-migrate")
        .args(["--database-url", &db_url, "up"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("No pending migrations"), "unexpected output:\n{}", stdout);

    let assert = cargo_bin_cmd!("flashcards-migrate")
        .args(["--database-url", &db_url, "down"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Reverted"), "unexpected output:\n{}", stdout);
}

/// Tests that a missing subcommand is a usage error
#[test]
fn test_migrate_requires_subcommand() {
    cargo_bin_cmd!("flashcards-migrate").assert().failure();
}
