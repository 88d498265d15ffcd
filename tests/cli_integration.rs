//! Integration tests for the `focus` CLI.
//!
//! Each test creates a temp data directory, runs `focus` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `focus` binary.
fn focus_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("focus");
    path
}

/// Run `focus` in `dir` and return (stdout, stderr, success).
fn run_focus(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(focus_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run focus");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `focus` expecting success, return stdout.
fn run_focus_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_focus(dir, args);
    if !success {
        panic!(
            "focus {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn write_tasks(dir: &Path, labels: &[&str]) {
    let json = serde_json::to_string_pretty(labels).unwrap();
    fs::write(dir.join("tasks.json"), json).unwrap();
}

fn read_tasks(path: &Path) -> Vec<String> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[test]
fn test_add_creates_document() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_focus_ok(tmp.path(), &["add", "Write report"]);
    assert_eq!(out.trim(), "New task 'Write report' has been added!");

    let text = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    assert_eq!(text, "[\n    \"Write report\"\n]\n");
}

#[test]
fn test_add_appends_in_order_and_allows_duplicates() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path(), &["Fix bugs"]);

    run_focus_ok(tmp.path(), &["add", "Review a PR"]);
    run_focus_ok(tmp.path(), &["add", "Fix bugs"]);

    assert_eq!(
        read_tasks(&tmp.path().join("tasks.json")),
        vec!["Fix bugs", "Review a PR", "Fix bugs"]
    );
}

#[test]
fn test_add_blank_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_focus(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("error: task label must not be empty"));
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn test_add_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path(), &["a"]);
    let out = run_focus_ok(tmp.path(), &["add", "b", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["added"], "b");
    assert_eq!(value["count"], 2);
}

#[test]
fn test_add_over_malformed_document_keeps_backup() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tasks.json"), "{not json").unwrap();

    let (_, stderr, success) = run_focus(tmp.path(), &["add", "Fresh start"]);
    assert!(success);
    assert!(stderr.contains("warning:"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("tasks.json.corrupt")).unwrap(),
        "{not json"
    );
    assert_eq!(
        read_tasks(&tmp.path().join("tasks.json")),
        vec!["Fresh start"]
    );
}

#[test]
fn test_add_skips_blank_entries_without_losing_the_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path(), &["Fix bugs", "  ", "Review a PR"]);

    let (_, stderr, success) = run_focus(tmp.path(), &["add", "Write report"]);
    assert!(success);
    assert!(stderr.contains("warning: skipped 1 blank entry"));
    assert_eq!(
        read_tasks(&tmp.path().join("tasks.json")),
        vec!["Fix bugs", "Review a PR", "Write report"]
    );
    assert!(!tmp.path().join("tasks.json.corrupt").exists());
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn test_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path(), &["Write report", "Fix bugs"]);

    let out = run_focus_ok(tmp.path(), &["list"]);
    assert_eq!(out, "1. Write report\n2. Fix bugs\n");
}

#[test]
fn test_list_missing_document() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_focus_ok(tmp.path(), &["list"]);
    assert_eq!(out.trim(), "no tasks");
    // Reading never creates the document
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_tasks(tmp.path(), &["Learn a new concept"]);

    let out = run_focus_ok(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["tasks"], serde_json::json!(["Learn a new concept"]));
}

// ---------------------------------------------------------------------------
// -C and focus.toml
// ---------------------------------------------------------------------------

#[test]
fn test_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    let data_arg = data.to_str().unwrap();

    run_focus_ok(tmp.path(), &["-C", data_arg, "add", "Elsewhere"]);
    assert!(data.join("tasks.json").exists());
    assert!(!tmp.path().join("tasks.json").exists());

    let out = run_focus_ok(tmp.path(), &["list", "--dir", data_arg]);
    assert!(out.contains("Elsewhere"));
}

#[test]
fn test_dir_flag_missing_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_focus(tmp.path(), &["-C", "nope", "list"]);
    assert!(!success);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_configured_file_names() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("focus.toml"),
        "[files]\ntasks = \"todo.json\"\nlog = \"history.txt\"\n",
    )
    .unwrap();

    run_focus_ok(tmp.path(), &["add", "Configured"]);
    assert_eq!(
        read_tasks(&tmp.path().join("todo.json")),
        vec!["Configured"]
    );
    assert!(tmp.path().join("history.txt").exists());
    assert!(!tmp.path().join("tasks.json").exists());
}

#[test]
fn test_broken_config_falls_back_with_warning() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("focus.toml"), "[session\nminutes = ").unwrap();

    let (stdout, stderr, success) = run_focus(tmp.path(), &["add", "Still works"]);
    assert!(success);
    assert!(stdout.contains("Still works"));
    assert!(stderr.contains("warning:"));
    assert!(tmp.path().join("tasks.json").exists());
}

// ---------------------------------------------------------------------------
// log
// ---------------------------------------------------------------------------

#[test]
fn test_log_records_adds() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_focus_ok(tmp.path(), &["add", "one"]);
    run_focus_ok(tmp.path(), &["add", "two"]);

    let out = run_focus_ok(tmp.path(), &["log"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - Task added: one"));
    assert!(lines[1].ends_with(" - Task added: two"));

    let out = run_focus_ok(tmp.path(), &["log", "--limit", "1"]);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("two"));
}

#[test]
fn test_log_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_focus_ok(tmp.path(), &["add", "one"]);

    let out = run_focus_ok(tmp.path(), &["log", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["event"], "task_added");
    assert_eq!(value[0]["detail"], "one");
}

#[test]
fn test_log_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_focus_ok(tmp.path(), &["log"]);
    assert_eq!(out.trim(), "no log entries");
}
