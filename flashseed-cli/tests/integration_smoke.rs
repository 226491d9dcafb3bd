//! Smoke tests for the flashseed binary that need no database

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Empty working and home directory, so no `.env` or `~/.flashseed` of the
/// caller is picked up
fn sandbox() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "").unwrap();
    dir
}

/// Run inside `sandbox` with `config` as the config file
fn flashseed_with_config(sandbox: &TempDir, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("flashseed").unwrap();
    cmd.current_dir(sandbox.path())
        .env("HOME", sandbox.path())
        .env_remove("DATABASE_URL")
        .env_remove("FLASHSEED_USER")
        .env_remove("FLASHSEED_PASSWORD")
        .env_remove("FLASHSEED_COLLECTION")
        .env_remove("FLASHSEED_TEARDOWN_TIMEOUT_SECS")
        .env_remove("FLASHSEED_CONNECT_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn flashseed(sandbox: &TempDir) -> Command {
    flashseed_with_config(sandbox, &sandbox.path().join("config.toml"))
}

// === Help ===

#[test]
fn test_seed_help() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .arg("seed")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Prompt text to insert")
                .and(predicate::str::contains("--answer")),
        );
}

#[test]
fn test_answer_help() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .arg("answer")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Flashcard id"));
}

// === Dry run ===

#[test]
fn test_seed_dry_run_prints_one_record() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .arg("seed")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("flashcards: 1 record")
                .and(predicate::str::contains("#1  how big is a football stadium")),
        );
}

#[test]
fn test_seed_dry_run_json_keeps_payload_verbatim() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .args(["--format", "json", "seed", "--dry-run", "--prompt"])
        .arg("\"); DROP TABLE flashcards; --")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""prompt": "\"); DROP TABLE flashcards; --""#,
        ));
}

#[test]
fn test_seed_dry_run_with_answer() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .args(["seed", "--dry-run", "--prompt", "capital of peru", "--answer", "lima"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1  capital of peru  ->  lima"));
}

// === Failures ===

#[test]
fn test_unreachable_store_fails_with_diagnostic() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .args(["--database-url", "postgres://flashseed@127.0.0.1:1/flashcards", "seed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to connect to data store"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_collection_rejected() {
    let sandbox = sandbox();
    flashseed(&sandbox)
        .args(["--collection", "cards; drop", "seed", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --collection"));
}

// === Config ===

#[test]
fn test_config_show_redacts_password() {
    let sandbox = sandbox();
    let path = sandbox.path().join("alice.toml");
    std::fs::write(
        &path,
        "[store]\ndatabase_url = \"postgres://alice:secret@db/flashcards\"\n",
    )
    .unwrap();

    flashseed_with_config(&sandbox, &path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("alice:********@db")
                .and(predicate::str::contains("secret").not()),
        );
}
