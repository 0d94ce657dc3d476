// Shared helpers for integration tests.
//
// Provides a temporary home directory, a recording executor and a recording
// package adapter so each integration test can drive the engine without
// touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use omega_zsh::config::paths::BASE_ENTRY_POINT;
use omega_zsh::config::{Paths, Settings};
use omega_zsh::exec::{ExecResult, Executor};
use omega_zsh::logging::Log;
use omega_zsh::packages::PackageAdapter;
use omega_zsh::platform::{EnvironmentDescriptor, Os, PackageManager};
use omega_zsh::progress::ProgressSink;
use omega_zsh::state::DesiredState;
use omega_zsh::tasks::Context;

/// Executor that records command lines instead of running them.
///
/// `git clone ... <dir>` creates `<dir>` so later steps see the clone. The
/// base environment clone also gets its entry point.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str]) {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line);
    }
}

impl Executor for RecordingExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.record(program, args);
        Ok(ExecResult {
            success: true,
            ..ExecResult::default()
        })
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
        sink: &dyn ProgressSink,
    ) -> anyhow::Result<bool> {
        self.record(program, args);
        sink.line(&format!("{program} done"));
        if program == "git"
            && args.first() == Some(&"clone")
            && let Some(target) = args.last()
        {
            std::fs::create_dir_all(target).expect("create clone target");
            if args.contains(&omega_zsh::catalog::BASE_ENVIRONMENT_URL) {
                std::fs::write(Path::new(target).join(BASE_ENTRY_POINT), "")
                    .expect("write base entry point");
            }
        }
        Ok(true)
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// Adapter that records every request and fails the packages in `failing`.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    pub requests: Mutex<Vec<String>>,
    pub failing: Vec<String>,
    pub essentials: Vec<String>,
}

impl RecordingAdapter {
    /// Every request so far (`update` or `install <name>`).
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl PackageAdapter for RecordingAdapter {
    fn name(&self) -> &str {
        "recording"
    }

    fn update_repos(&self, _sink: &dyn ProgressSink) -> bool {
        self.requests
            .lock()
            .expect("requests lock")
            .push("update".to_string());
        true
    }

    fn install_package(&self, name: &str, sink: &dyn ProgressSink) -> bool {
        self.requests
            .lock()
            .expect("requests lock")
            .push(format!("install {name}"));
        let ok = !self.failing.iter().any(|f| f == name);
        if !ok {
            sink.line(&format!("command failed: install {name}"));
        }
        ok
    }

    fn essential_tools(&self) -> Vec<String> {
        self.essentials.clone()
    }
}

/// A Debian host.
pub fn debian() -> EnvironmentDescriptor {
    EnvironmentDescriptor {
        os: Os::Linux,
        distro_id: "debian".to_string(),
        distro_version: "12".to_string(),
        is_android: false,
        is_termux: false,
        is_gsi: false,
        package_manager: PackageManager::Apt,
        runtime_prefix: None,
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
pub struct TestHome {
    /// Temporary directory standing in for `$HOME`.
    pub dir: tempfile::TempDir,
    /// Layout beneath `dir`.
    pub paths: Paths,
}

impl TestHome {
    /// Create an empty home.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp home");
        let paths = Paths::from_home(dir.path());
        Self { dir, paths }
    }

    /// Create the base environment directory so no clone is needed.
    pub fn with_base_environment(self) -> Self {
        std::fs::create_dir_all(self.paths.standard_themes_dir()).expect("create base env");
        std::fs::write(self.paths.base_dir.join(BASE_ENTRY_POINT), "").expect("write entry point");
        self
    }

    /// Write `content` as the existing rc file.
    pub fn with_rc(self, content: &str) -> Self {
        std::fs::write(&self.paths.zshrc, content).expect("write rc");
        self
    }

    /// Read a file beneath the home, relative to it.
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).expect("read file")
    }

    /// Task context over this home.
    pub fn context(
        &self,
        state: DesiredState,
        adapter: Arc<RecordingAdapter>,
        executor: Arc<RecordingExecutor>,
        log: Arc<dyn Log>,
        progress: Arc<dyn ProgressSink>,
    ) -> Context {
        Context {
            env: Arc::new(debian()),
            paths: self.paths.clone(),
            settings: Settings::default(),
            state,
            adapter,
            executor,
            log,
            progress,
        }
    }
}

/// Desired state with `plugins` selected and no header.
pub fn selection(plugins: &[&str]) -> DesiredState {
    DesiredState {
        selected_plugins: plugins.iter().map(|p| (*p).to_string()).collect(),
        selected_header: "none".to_string(),
        ..DesiredState::default()
    }
}
