#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `provision` command.
//!
//! These tests run the full provisioning task list on the worker thread
//! against a temporary home, a recording executor and a recording package
//! adapter.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::*;
use omega_zsh::commands::provision::run_on_worker;
use omega_zsh::logging::{Logger, TaskStatus};
use omega_zsh::state::DesiredState;
use omega_zsh::tasks;

// ---------------------------------------------------------------------------
// Snapshot: provisioning task list
// ---------------------------------------------------------------------------

/// Snapshot of all provisioning task names in execution order.
///
/// Any addition, removal, reorder or rename of a step fails this test and
/// needs a deliberate snapshot update.
#[test]
fn provision_task_names() {
    let all_tasks = tasks::all_provision_tasks();
    let task_names: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    insta::assert_snapshot!("provision_task_names", task_names.join("\n"));
}

/// No two provisioning tasks may share the same name.
#[test]
fn provision_task_names_are_unique() {
    let tasks = tasks::all_provision_tasks();
    let mut seen: HashSet<&str> = HashSet::new();
    for task in &tasks {
        assert!(seen.insert(task.name()), "duplicate task name: {}", task.name());
    }
}

// ---------------------------------------------------------------------------
// Full runs
// ---------------------------------------------------------------------------

struct Run {
    result: anyhow::Result<()>,
    statuses: Vec<(String, TaskStatus)>,
    requests: Vec<String>,
    calls: Vec<String>,
}

fn provision(home: &TestHome, state: DesiredState, adapter: RecordingAdapter) -> Run {
    let adapter = Arc::new(adapter);
    let executor = Arc::new(RecordingExecutor::default());
    let log = Arc::new(Logger::new("test"));

    let result = run_on_worker(
        tasks::all_provision_tasks(),
        |worker_log, sink| {
            home.context(state, adapter.clone(), executor.clone(), worker_log, sink)
        },
        &log,
    );

    Run {
        result,
        statuses: log
            .task_entries()
            .into_iter()
            .map(|e| (e.name, e.status))
            .collect(),
        requests: adapter.requests(),
        calls: executor.calls(),
    }
}

/// A binary tool is installed through the adapter exactly once and never
/// cloned; a plugin source is cloned into the customization root.
#[test]
fn selected_items_are_installed_by_strategy() {
    let home = TestHome::new().with_base_environment();
    let run = provision(
        &home,
        selection(&["git", "lazygit", "zsh-autosuggestions"]),
        RecordingAdapter::default(),
    );

    assert!(run.result.is_ok(), "{:?}", run.result);
    assert_eq!(run.requests, ["update", "install lazygit"]);
    assert_eq!(run.calls.len(), 1);
    assert!(run.calls[0].starts_with("git clone --depth 1 https://github.com/zsh-users/zsh-autosuggestions"));
    assert!(home.paths.custom_dir().join("plugins/zsh-autosuggestions").is_dir());

    let rc = home.read(".zshrc");
    assert!(rc.contains("plugins=(git zsh-autosuggestions)"), "{rc}");
}

/// Steps run in order and each one records a result.
#[test]
fn every_step_records_a_result() {
    let home = TestHome::new().with_base_environment();
    let run = provision(&home, selection(&["git"]), RecordingAdapter::default());

    let names: Vec<&str> = run.statuses.iter().map(|(n, _)| n.as_str()).collect();
    let all_tasks = tasks::all_provision_tasks();
    let expected: Vec<&str> = all_tasks.iter().map(|t| t.name()).collect();
    assert_eq!(names, expected);
    assert_eq!(run.statuses[0], ("Ensure base environment".to_string(), TaskStatus::Skipped));
    assert_eq!(
        run.statuses.last().unwrap(),
        &("Generate configuration".to_string(), TaskStatus::Ok)
    );
}

/// The base environment is cloned first when it is missing.
#[test]
fn missing_base_environment_is_cloned_first() {
    let home = TestHome::new();
    let run = provision(&home, selection(&["git"]), RecordingAdapter::default());

    assert!(run.result.is_ok(), "{:?}", run.result);
    assert!(run.calls[0].starts_with("git clone --depth 1 https://github.com/ohmyzsh/ohmyzsh.git"));
    assert!(home.paths.base_dir.is_dir());
}

/// A failed package install is reported but later steps still run and the
/// command fails at the end.
#[test]
fn failed_install_does_not_stop_the_run() {
    let home = TestHome::new().with_base_environment();
    let adapter = RecordingAdapter {
        failing: vec!["eza".to_string()],
        ..RecordingAdapter::default()
    };
    let run = provision(&home, selection(&["eza", "bat"]), adapter);

    assert_eq!(run.result.unwrap_err().to_string(), "1 task(s) failed");
    assert_eq!(run.requests, ["update", "install eza", "install bat"]);
    assert!(run.statuses.contains(&("Install selected plugins".to_string(), TaskStatus::Failed)));
    assert!(run.statuses.contains(&("Generate configuration".to_string(), TaskStatus::Ok)));
    assert!(home.paths.zshrc.is_file());
}

/// Running twice clones nothing the second time and backs up the first rc.
#[test]
fn second_run_is_idempotent() {
    let home = TestHome::new().with_base_environment();
    let first = provision(&home, selection(&["zsh-autosuggestions"]), RecordingAdapter::default());
    assert!(first.result.is_ok());
    assert_eq!(first.calls.len(), 1);

    let second = provision(&home, selection(&["zsh-autosuggestions"]), RecordingAdapter::default());
    assert!(second.result.is_ok());
    assert!(second.calls.is_empty(), "{:?}", second.calls);

    let backups = std::fs::read_dir(home.dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with(".zshrc.bak."))
        .count();
    assert_eq!(backups, 1);
}
