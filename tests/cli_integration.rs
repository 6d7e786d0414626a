//! Integration tests for the `kb` CLI.
//!
//! Each test creates a temp working directory, runs `kb` as a subprocess
//! against the default `.kanban` data dir inside it, and checks stdout and/or
//! the saved snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `kb` binary.
fn kb_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("kb");
    path
}

/// Run `kb` with the given args in the given directory, returning (stdout, stderr, success).
fn run_kb(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(kb_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run kb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `kb` expecting success, return stdout.
fn run_kb_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_kb(dir, args);
    if !success {
        panic!("kb {:?} failed:\nstdout: {}\nstderr: {}", args, stdout, stderr);
    }
    stdout
}

/// Run `kb` expecting failure, return stderr.
fn run_kb_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_kb(dir, args);
    if success {
        panic!("kb {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn state_file(dir: &Path) -> PathBuf {
    dir.join(".kanban").join("kanbanState.json")
}

fn read_state(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(state_file(dir)).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Board "Sprint 1" with one task "Write spec" (subtask "Draft") in TO DO.
/// Returns (board ID, task ID).
fn setup_board(dir: &Path) -> (String, String) {
    let board = run_kb_ok(dir, &["board", "add", "Sprint 1"]).trim().to_string();
    let task = run_kb_ok(dir, &["task", "add", "Write spec", "--subtask", "Draft"])
        .trim()
        .to_string();
    (board, task)
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

#[test]
fn test_board_add_creates_standard_columns() {
    let tmp = tempfile::TempDir::new().unwrap();
    let id = run_kb_ok(tmp.path(), &["board", "add", "Sprint 1"]).trim().to_string();
    assert!(!id.is_empty());

    let out = run_kb_ok(tmp.path(), &["board", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let boards = parsed.as_array().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["id"], id.as_str());
    assert_eq!(boards[0]["active"], true);
    let names: Vec<&str> = boards[0]["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["TO DO", "IN PROGRESS", "IN REVIEW", "DONE"]);
}

#[test]
fn test_board_use_and_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_kb_ok(tmp.path(), &["board", "add", "First"]);
    run_kb_ok(tmp.path(), &["board", "add", "Second"]);

    let out = run_kb_ok(tmp.path(), &["board", "use", "first"]);
    assert!(out.contains("active board: First"));
    let out = run_kb_ok(tmp.path(), &["board", "list"]);
    assert!(out.lines().any(|l| l.starts_with('*') && l.contains("First")));

    run_kb_ok(tmp.path(), &["board", "rm", "First"]);
    let state = read_state(tmp.path());
    let boards = state["boards"]["boards"].as_array().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(state["boards"]["activeBoard"], boards[0]["id"]);
}

#[test]
fn test_board_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_kb_err(tmp.path(), &["board", "rm", "ghost"]);
    assert!(err.contains("board not found: ghost"));
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_task_add_lands_in_todo() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, task) = setup_board(tmp.path());

    let out = run_kb_ok(tmp.path(), &["task", "show", &task, "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["title"], "Write spec");
    assert_eq!(parsed["status"], "TO DO");
    assert_eq!(parsed["priority"], "medium");
    assert_eq!(parsed["subtasks"][0]["isCompleted"], false);
    assert_eq!(parsed["completed"], false);
}

#[test]
fn test_task_mv_by_column_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, task) = setup_board(tmp.path());

    let out = run_kb_ok(tmp.path(), &["task", "mv", &task, "done"]);
    assert!(out.contains("DONE"));

    let state = read_state(tmp.path());
    let columns = state["boards"]["boards"][0]["columns"].as_array().unwrap();
    assert!(columns[0]["tasks"].as_array().unwrap().is_empty());
    assert_eq!(columns[3]["tasks"][0]["status"], "DONE");

    // same column again is a no-op
    let err = run_kb_err(tmp.path(), &["task", "mv", &task, "DONE"]);
    assert!(err.contains("nothing changed"));
}

#[test]
fn test_task_edit_fields_and_column() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, task) = setup_board(tmp.path());

    run_kb_ok(
        tmp.path(),
        &[
            "task", "edit", &task, "--title", "Write the spec", "--priority", "high", "--due",
            "2026-11-02", "--subtask", "Review", "--column", "doing",
        ],
    );
    let out = run_kb_ok(tmp.path(), &["task", "show", &task[..8]]);
    assert!(out.contains("Write the spec"));
    assert!(out.contains("board: Sprint 1 / IN PROGRESS"));
    assert!(out.contains("priority: high"));
    assert!(out.contains("due: 2026-11-02"));
    assert!(out.contains("1. [ ] Draft"));
    assert!(out.contains("2. [ ] Review"));

    run_kb_ok(tmp.path(), &["task", "edit", &task, "--clear-due"]);
    let out = run_kb_ok(tmp.path(), &["task", "show", &task]);
    assert!(!out.contains("due:"));
}

#[test]
fn test_task_add_rejects_bad_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    setup_board(tmp.path());
    let err = run_kb_err(tmp.path(), &["task", "add", "x", "--priority", "urgent"]);
    assert!(err.contains("unknown priority 'urgent'"));
}

#[test]
fn test_toggle_subtask() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, task) = setup_board(tmp.path());

    let out = run_kb_ok(tmp.path(), &["toggle", &task, "1"]);
    assert_eq!(out.trim(), "[x] Draft");
    let out = run_kb_ok(tmp.path(), &["toggle", &task, "1"]);
    assert_eq!(out.trim(), "[ ] Draft");

    let err = run_kb_err(tmp.path(), &["toggle", &task, "zz"]);
    assert!(err.contains("subtask not found"));
}

#[test]
fn test_task_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, task) = setup_board(tmp.path());
    run_kb_ok(tmp.path(), &["task", "rm", &task]);
    let err = run_kb_err(tmp.path(), &["task", "show", &task]);
    assert!(err.contains("task not found"));
}

#[test]
fn test_reorder_column() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, first) = setup_board(tmp.path());
    let second = run_kb_ok(tmp.path(), &["task", "add", "Second"]).trim().to_string();

    run_kb_ok(tmp.path(), &["reorder", "to do", &second]);
    let state = read_state(tmp.path());
    let tasks = state["boards"]["boards"][0]["columns"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["id"], second.as_str());
    assert_eq!(tasks[1]["id"], first.as_str());
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[test]
fn test_show_follows_view_mode() {
    let tmp = tempfile::TempDir::new().unwrap();
    setup_board(tmp.path());

    let out = run_kb_ok(tmp.path(), &["show"]);
    assert!(out.contains("== Sprint 1 =="));
    assert!(out.contains("TO DO (1)"));

    run_kb_ok(tmp.path(), &["view", "list"]);
    let out = run_kb_ok(tmp.path(), &[]);
    assert!(out.contains("v TO DO (1)"));
    assert!(out.contains("Write spec"));

    let out = run_kb_ok(tmp.path(), &["show", "--collapse", "to do"]);
    assert!(out.contains("> TO DO (1)"));
    assert!(!out.contains("Write spec"));
}

#[test]
fn test_timeline_json_packs_rows() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_kb_ok(tmp.path(), &["board", "add", "Plan"]);
    // tasks are created today, so anchor the window on today's date
    let today = chrono::Utc::now().date_naive();
    let due_a = (today + chrono::Duration::days(2)).to_string();
    let due_b = (today + chrono::Duration::days(3)).to_string();
    run_kb_ok(tmp.path(), &["task", "add", "A", "--due", &due_a]);
    run_kb_ok(tmp.path(), &["task", "add", "B", "--due", &due_b]);
    run_kb_ok(tmp.path(), &["task", "add", "undated"]);

    let out = run_kb_ok(
        tmp.path(),
        &["show", "--mode", "timeline", "--date", &today.to_string(), "--json"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let items = parsed["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["row"], 0);
    assert_eq!(items[1]["row"], 1);
    assert_eq!(parsed["rows"], 2);
}

#[test]
fn test_timeline_step_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_kb_ok(tmp.path(), &["board", "add", "Plan"]);
    let err = run_kb_err(tmp.path(), &["show", "--mode", "timeline", "--step", "10000000"]);
    assert!(err.contains("timeline step 10000000"), "stderr: {}", err);
    assert!(!err.contains("panicked"));

    let out = run_kb_ok(
        tmp.path(),
        &["show", "--mode", "timeline", "--date", "2026-10-21", "--step", "-2", "--json"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["start"], "2026-09-20");
}

#[test]
fn test_timeline_days_out_of_range_in_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".kanban")).unwrap();
    fs::write(
        tmp.path().join(".kanban/config.toml"),
        "[timeline]\ndays = 4000000000\n",
    )
    .unwrap();
    let err = run_kb_err(tmp.path(), &["show", "--mode", "timeline"]);
    assert!(err.contains("timeline.days must be between 1 and 366"), "stderr: {}", err);
    assert!(!err.contains("panicked"));
}

#[test]
fn test_view_rejects_unknown_mode() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_kb_err(tmp.path(), &["view", "gantt"]);
    assert!(err.contains("unknown view mode"));
}

// ---------------------------------------------------------------------------
// Stats / search
// ---------------------------------------------------------------------------

#[test]
fn test_stats_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    setup_board(tmp.path());
    run_kb_ok(tmp.path(), &["task", "add", "No subtasks", "--column", "done"]);

    let out = run_kb_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total_boards"], 1);
    assert_eq!(parsed["total_tasks"], 2);
    assert_eq!(parsed["completed_tasks"], 1);
    assert_eq!(parsed["completion_rate"], 50);
    assert_eq!(parsed["most_efficient_column"], "DONE");
}

#[test]
fn test_search_across_boards() {
    let tmp = tempfile::TempDir::new().unwrap();
    setup_board(tmp.path());
    run_kb_ok(tmp.path(), &["board", "add", "Other"]);
    run_kb_ok(tmp.path(), &["task", "add", "Spec review"]);

    let out = run_kb_ok(tmp.path(), &["search", "SPEC"]);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("[Sprint 1 / TO DO]"));
    assert!(out.contains("[Other / TO DO]"));

    let out = run_kb_ok(tmp.path(), &["search", "draft", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["field"], "subtask");
}

#[test]
fn test_search_is_literal_unless_regex() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_kb_ok(tmp.path(), &["board", "add", "Money"]);
    run_kb_ok(tmp.path(), &["task", "add", "Pay $5 fee"]);
    run_kb_ok(tmp.path(), &["task", "add", "axb"]);

    let out = run_kb_ok(tmp.path(), &["search", "$5"]);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("Pay $5 fee"));
    let out = run_kb_ok(tmp.path(), &["search", "a.b"]);
    assert!(out.is_empty());

    let out = run_kb_ok(tmp.path(), &["search", "--regex", "a.b"]);
    assert!(out.contains("axb"));
    let err = run_kb_err(tmp.path(), &["search", "--regex", "(unclosed"]);
    assert!(err.contains("error:"));
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[test]
fn test_person_add_and_assign() {
    let tmp = tempfile::TempDir::new().unwrap();
    setup_board(tmp.path());
    let person = run_kb_ok(
        tmp.path(),
        &["person", "add", "Ada Lovelace", "--role", "Engineer"],
    )
    .trim()
    .to_string();

    let out = run_kb_ok(tmp.path(), &["person", "list"]);
    assert!(out.contains("AL Ada Lovelace (Engineer)"));

    let task = run_kb_ok(tmp.path(), &["task", "add", "Pair", "--assignee", &person])
        .trim()
        .to_string();
    let out = run_kb_ok(tmp.path(), &["task", "show", &task]);
    assert!(out.contains("assignees: Ada Lovelace"));

    // deleting the person leaves the assignment dangling but hidden
    run_kb_ok(tmp.path(), &["person", "rm", &person]);
    let out = run_kb_ok(tmp.path(), &["task", "show", &task]);
    assert!(!out.contains("assignees:"));
}

#[test]
fn test_person_blank_name_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_kb_err(tmp.path(), &["person", "add", "   "]);
    assert!(err.contains("error:"));
}

#[test]
fn test_seed_defaults_from_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".kanban")).unwrap();
    fs::write(
        tmp.path().join(".kanban/config.toml"),
        "[people]\nseed_defaults = true\n",
    )
    .unwrap();
    let out = run_kb_ok(tmp.path(), &["person", "list"]);
    assert!(out.contains("John Doe"));
    assert!(out.contains("Jane Smith"));
}

// ---------------------------------------------------------------------------
// Raw commands and persistence
// ---------------------------------------------------------------------------

#[test]
fn test_apply_json_command() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_kb_ok(tmp.path(), &["apply", r#"{"type":"addBoard","name":"From JSON"}"#]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["result"], "created");

    let out = run_kb_ok(tmp.path(), &["apply", r#"{"type":"deleteBoard","id":"nope"}"#]);
    assert!(out.contains("noOp"));

    let out = run_kb_ok(tmp.path(), &["board", "list"]);
    assert!(out.contains("From JSON"));
}

#[test]
fn test_snapshot_shape() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (board, task) = setup_board(tmp.path());
    let state = read_state(tmp.path());
    assert_eq!(state["boards"]["activeBoard"], board.as_str());
    assert_eq!(state["boards"]["viewMode"], "kanban");
    assert_eq!(state["boards"]["boards"][0]["columns"][0]["tasks"][0]["id"], task.as_str());
    assert!(state["people"]["people"].is_array());
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".kanban")).unwrap();
    fs::write(state_file(tmp.path()), "{not json").unwrap();
    let out = run_kb_ok(tmp.path(), &["board", "list"]);
    assert!(out.trim().is_empty());
}

#[test]
fn test_custom_storage_key_and_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("elsewhere");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("config.toml"), "[storage]\nkey = \"boards\"\n").unwrap();

    let data_arg = data.to_string_lossy().to_string();
    run_kb_ok(tmp.path(), &["-C", &data_arg, "board", "add", "Kept"]);
    assert!(data.join("boards.json").exists());
    assert!(!state_file(tmp.path()).exists());
}

#[test]
fn test_malformed_config_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".kanban")).unwrap();
    fs::write(tmp.path().join(".kanban/config.toml"), "[storage\n").unwrap();
    let err = run_kb_err(tmp.path(), &["board", "list"]);
    assert!(err.contains("could not parse config.toml"));
}
