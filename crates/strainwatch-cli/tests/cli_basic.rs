//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_strainwatch"))
        .args(args)
        .env("STRAINWATCH_DATA_DIR", data_dir)
        .env_remove("STRAINWATCH_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_with_stdin(data_dir: &Path, args: &[&str], input: &str) -> (String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_strainwatch"))
        .args(args)
        .env("STRAINWATCH_DATA_DIR", data_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_config_get_set_reset() {
    let dir = tempfile::tempdir().unwrap();

    let (out, _, code) = run_cli(dir.path(), &["config", "get", "breaks.continuous_work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "20");
    assert!(dir.path().join("config.toml").exists());

    let (out, _, code) = run_cli(dir.path(), &["config", "set", "breaks.continuous_work_minutes", "30"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "ok");
    let (out, _, _) = run_cli(dir.path(), &["config", "get", "breaks.continuous_work_minutes"]);
    assert_eq!(out.trim(), "30");

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (out, _, _) = run_cli(dir.path(), &["config", "get", "breaks.continuous_work_minutes"]);
    assert_eq!(out.trim(), "20");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, err, code) = run_cli(dir.path(), &["config", "set", "ui.theme", "dark"]);
    assert_eq!(code, 1);
    assert!(err.contains("error:"), "stderr: {err}");
}

#[test]
fn test_config_list() {
    let dir = tempfile::tempdir().unwrap();
    let (out, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(out.contains("fatigue.media_multiplier = 0.3"));
}

#[test]
fn test_classify_docs_is_work() {
    let dir = tempfile::tempdir().unwrap();
    let (out, _, code) = run_cli(
        dir.path(),
        &["classify", "chrome.exe", "--title", "docs.google.com - Proposal", "--json"],
    );
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["category"], "work");
}

#[test]
fn test_cluster_add_list_remove() {
    let dir = tempfile::tempdir().unwrap();
    let (out, _, code) = run_cli(
        dir.path(),
        &["cluster", "add", "Reading", "--weight", "0.4", "--keyword", "arxiv", "--category", "work"],
    );
    assert_eq!(code, 0);
    let added: serde_json::Value = serde_json::from_str(&out).unwrap();
    let id = added["id"].as_str().unwrap().to_string();

    let (out, _, _) = run_cli(dir.path(), &["cluster", "list", "--json"]);
    let listed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(listed.len(), 4);

    let (out, _, _) = run_cli(dir.path(), &["classify", "firefox", "--title", "arXiv papers", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["cluster"]["name"], "Reading");

    let (_, _, code) = run_cli(dir.path(), &["cluster", "remove", "preset-video"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(dir.path(), &["cluster", "remove", &id]);
    assert_eq!(code, 0);
    let (_, _, code) = run_cli(dir.path(), &["cluster", "remove", &id]);
    assert_eq!(code, 1);
}

#[test]
fn test_simulate_long_session_creates_breaks() {
    let dir = tempfile::tempdir().unwrap();
    let (out, _, code) = run_cli(dir.path(), &["simulate", "--minutes", "25", "--json"]);
    assert_eq!(code, 0);

    let events: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events[0]["type"], "fatigue_restored");
    assert!(events
        .iter()
        .any(|e| e["type"] == "break_task_created" && e["task"]["task_type"] == "mobility"));
    assert!(events
        .iter()
        .any(|e| e["type"] == "break_task_settled" && e["task"]["result"] == "completed"));
    let last = events.last().unwrap();
    assert!(last["value"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_monitor_persists_and_status_restores() {
    let dir = tempfile::tempdir().unwrap();
    let input = concat!(
        r#"{"type":"sample","idle_seconds":0.0,"foreground":{"process_name":"code","window_title":"main.rs"}}"#,
        "\n",
        r#"{"type":"break","task_type":"eye"}"#,
        "\n",
        r#"{"type":"settle","result":"completed"}"#,
        "\n",
    );
    let (out, code) = run_with_stdin(
        dir.path(),
        &["monitor", "--interval-ms", "10", "--ticks", "100"],
        input,
    );
    assert_eq!(code, 0);
    assert!(out.contains("\"break_task_settled\""), "stdout: {out}");

    let (out, _, code) = run_cli(dir.path(), &["tasks", "--json"]);
    assert_eq!(code, 0);
    let tasks: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["result"], "completed");

    let (out, _, code) = run_cli(dir.path(), &["status", "--json"]);
    assert_eq!(code, 0);
    let status: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(status["counters"]["today_active_seconds"].as_u64().unwrap() > 0);

    let (out, _, code) = run_cli(dir.path(), &["status"]);
    assert_eq!(code, 0);
    let usage_line = out
        .lines()
        .find(|l| l.trim_start().starts_with("code "))
        .unwrap_or_else(|| panic!("no usage line for code in: {out}"));
    assert!(usage_line.contains("work"));
}
