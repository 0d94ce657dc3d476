use std::sync::Arc;

use crate::config::{Paths, Settings};
use crate::exec::Executor;
use crate::logging::Log;
use crate::packages::PackageAdapter;
use crate::platform::EnvironmentDescriptor;
use crate::progress::ProgressSink;
use crate::state::DesiredState;

/// Everything a provisioning step reads.
///
/// Built once per run on the interaction thread and moved to the worker.
/// `state` is a snapshot: selections changed after the run starts only
/// take effect on the next run.
pub struct Context {
    /// Detected host environment.
    pub env: Arc<EnvironmentDescriptor>,
    /// Filesystem layout.
    pub paths: Paths,
    /// User settings.
    pub settings: Settings,
    /// Desired state as of the start of the run.
    pub state: DesiredState,
    /// Package-manager adapter for this host.
    pub adapter: Arc<dyn PackageAdapter>,
    /// Command executor.
    pub executor: Arc<dyn Executor>,
    /// Logger for stage headers and task results.
    pub log: Arc<dyn Log>,
    /// Receiver of streamed command output.
    pub progress: Arc<dyn ProgressSink>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("env", &self.env)
            .field("paths", &self.paths)
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("adapter", &self.adapter.name())
            .field("executor", &"<dyn Executor>")
            .field("log", &"<dyn Log>")
            .field("progress", &"<dyn ProgressSink>")
            .finish()
    }
}

impl Context {
    /// The progress sink as a trait object reference.
    #[must_use]
    pub fn sink(&self) -> &dyn ProgressSink {
        self.progress.as_ref()
    }
}
