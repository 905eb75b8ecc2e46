use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::time::Duration;

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let config_json = serde_json::json!({
        "quickpact_my_number": "919876543210",
        "quickpact_min_terms_length": 5,
        "observability": {
            "logs": { "level": "info", "destination": { "type": "stderr" } }
        }
    });
    let cfg_path = dir.path().join("quickpact.config.json");
    fs::write(&cfg_path, serde_json::to_string_pretty(&config_json).unwrap())
        .expect("write config");
    cfg_path
}

#[test]
fn server_keeps_stdout_clean_and_exits_cleanly_on_closed_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    // An empty stdin ends the session before the handshake.
    Command::cargo_bin("quickpact-mcp")
        .unwrap()
        .env("QUICKPACT_CONFIG", &config)
        .env_remove("RUST_LOG")
        .write_stdin("")
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("starting quickpact-mcp"));
}

#[test]
fn server_starts_without_config_file() {
    Command::cargo_bin("quickpact-mcp")
        .unwrap()
        .env("QUICKPACT_CONFIG", "/nonexistent/quickpact.config.json")
        .env("QUICKPACT_MY_NUMBER", "919876543210")
        .env_remove("RUST_LOG")
        .write_stdin("")
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("starting quickpact-mcp"));
}

#[test]
fn server_reports_broken_config_file_and_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("quickpact.config.json");
    fs::write(&cfg_path, "{ not json").expect("write config");

    Command::cargo_bin("quickpact-mcp")
        .unwrap()
        .env("QUICKPACT_CONFIG", &cfg_path)
        .env_remove("QUICKPACT_LOG_LEVEL")
        .env_remove("RUST_LOG")
        .write_stdin("")
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to parse config file"))
        .stderr(predicate::str::contains("starting quickpact-mcp"));
}
