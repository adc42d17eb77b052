//! Exit codes and stream discipline of the `bind-stats` binary

mod common;

use std::fs;
use std::process::{Command, Output};

use serde_json::{json, Value};

use common::{StubServer, STATUS_DOCUMENT};

fn run_collector(server: &StubServer, cache_file: &std::path::Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bind-stats"))
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(server.port().to_string())
        .arg("--cache-file")
        .arg(cache_file)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run bind-stats")
}

#[test]
fn test_success_prints_one_json_line() {
    let server = StubServer::start(200, STATUS_DOCUMENT);
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("bind.cache");

    let output = run_collector(&server, &cache_file, &["--verbose"]);

    assert!(output.status.success());
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);

    let value: Value = serde_json::from_str(stdout.trim_end()).unwrap();
    assert_eq!(value["resolvercounter"], json!({"Queryv4": 42}));
    assert_eq!(value["memory"], json!({"TotalUse": 1048576}));
    assert!(cache_file.exists());
}

#[test]
fn test_http_failure_exits_with_one() {
    let server = StubServer::start(503, "Service Unavailable");
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("bind.cache");

    let output = run_collector(&server, &cache_file, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("503"));
    assert!(!cache_file.exists());
}

#[test]
fn test_corrupt_fresh_cache_exits_with_one() {
    let server = StubServer::start(200, STATUS_DOCUMENT);
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("bind.cache");
    fs::write(&cache_file, "not json").unwrap();

    let output = run_collector(&server, &cache_file, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_eq!(server.hits(), 0);
}

#[test]
fn test_refresh_flag_bypasses_fresh_cache() {
    let server = StubServer::start(200, STATUS_DOCUMENT);
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("bind.cache");
    fs::write(&cache_file, "not json").unwrap();

    let output = run_collector(&server, &cache_file, &["--refresh"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(server.hits(), 1);
}

#[test]
fn test_invalid_port_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_bind-stats"))
        .arg("--port")
        .arg("not-a-port")
        .output()
        .expect("Failed to run bind-stats");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
