//! Read-only access to the host, injectable for tests.
use std::path::Path;

use crate::exec::Executor;

/// The host facts the environment prober consults.
///
/// Every method is infallible from the caller's point of view: a failed
/// lookup is reported as `None` / `false`.
#[cfg_attr(test, mockall::automock)]
pub trait HostProbe {
    /// Value of an environment variable, if set and valid UTF-8.
    fn env_var(&self, key: &str) -> Option<String>;
    /// Contents of a text file, if it exists and is readable.
    fn read_file(&self, path: &Path) -> Option<String>;
    /// Whether an executable is on `PATH`.
    fn binary_exists(&self, name: &str) -> bool;
    /// An Android device property, if the property query succeeds.
    fn device_property(&self, key: &str) -> Option<String>;
}

/// [`HostProbe`] backed by the real process environment, filesystem, and
/// an [`Executor`] for binary lookups and `getprop`.
pub struct SystemProbe<'a> {
    executor: &'a dyn Executor,
}

impl<'a> SystemProbe<'a> {
    /// Probe the host through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }
}

impl std::fmt::Debug for SystemProbe<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemProbe")
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl HostProbe for SystemProbe<'_> {
    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }

    fn binary_exists(&self, name: &str) -> bool {
        self.executor.which(name)
    }

    fn device_property(&self, key: &str) -> Option<String> {
        let result = self.executor.run_unchecked("getprop", &[key]).ok()?;
        if !result.success {
            return None;
        }
        let value = result.stdout.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
