//! Top-level subcommand orchestration.
pub mod apply;
pub mod completions;
pub mod provision;
pub mod select;
pub mod status;
pub mod themes;
pub mod update;
pub mod version;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Paths, Settings};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::packages::{self, PackageAdapter};
use crate::platform::EnvironmentDescriptor;
use crate::progress::ProgressSink;
use crate::state::{DesiredState, StateManager};
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
///
/// Resolves the path layout, loads settings, detects the host and picks
/// the package adapter so that each command does not repeat it.
pub struct CommandSetup {
    /// Detected host.
    pub env: Arc<EnvironmentDescriptor>,
    /// Filesystem layout.
    pub paths: Paths,
    /// Loaded settings, or defaults.
    pub settings: Settings,
    /// Desired-state persistence.
    pub state: StateManager,
    /// Executor for every spawned command.
    pub executor: Arc<dyn Executor>,
    /// Package adapter chosen for the host.
    pub adapter: Arc<dyn PackageAdapter>,
}

impl std::fmt::Debug for CommandSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSetup")
            .field("env", &self.env)
            .field("paths", &self.paths)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("adapter", &self.adapter.name())
            .finish_non_exhaustive()
    }
}

impl CommandSetup {
    /// Resolve paths, load settings and detect the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        Self::with_executor(global, log, Arc::new(SystemExecutor))
    }

    /// [`init`](Self::init) with an explicit executor for detection and
    /// every command the run spawns.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn with_executor(
        global: &GlobalOpts,
        log: &Logger,
        executor: Arc<dyn Executor>,
    ) -> Result<Self> {
        let paths = resolve_paths(global)?;
        let settings = load_settings(&paths, log);

        log.stage("Detecting environment");
        let env = Arc::new(EnvironmentDescriptor::detect(executor.as_ref()));
        log.info(&env.to_string());

        let adapter: Arc<dyn PackageAdapter> =
            Arc::from(packages::select_adapter(&env, executor.clone()));
        log.debug(&format!("package adapter: {}", adapter.name()));

        Ok(Self {
            env,
            state: state_manager(&paths),
            paths,
            settings,
            executor,
            adapter,
        })
    }

    /// Build the task context for one run over `state`.
    #[must_use]
    pub fn context(
        &self,
        state: DesiredState,
        log: Arc<dyn Log>,
        progress: Arc<dyn ProgressSink>,
    ) -> Context {
        Context {
            env: self.env.clone(),
            paths: self.paths.clone(),
            settings: self.settings.clone(),
            state,
            adapter: self.adapter.clone(),
            executor: self.executor.clone(),
            log,
            progress,
        }
    }
}

/// Path layout for `--home`, or `$HOME`.
///
/// # Errors
///
/// Returns an error if neither is available.
pub fn resolve_paths(global: &GlobalOpts) -> Result<Paths> {
    Paths::resolve(global.home.as_deref()).context("resolving home directory")
}

/// State manager over the layout's state document and rc file.
#[must_use]
pub fn state_manager(paths: &Paths) -> StateManager {
    StateManager::new(&paths.state_file, &paths.zshrc)
}

/// Load `settings.toml`, warning and falling back to defaults when it is
/// unreadable.
pub fn load_settings(paths: &Paths, log: &Logger) -> Settings {
    Settings::load(paths).unwrap_or_else(|e| {
        log.warn(&format!("ignoring settings: {e}"));
        Settings::default()
    })
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
