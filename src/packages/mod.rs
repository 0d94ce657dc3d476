//! Platform adapters: one capability set per package-manager family.
//!
//! An adapter is chosen once from the [`EnvironmentDescriptor`] by
//! [`select_adapter`] and then used through `dyn PackageAdapter`. Adapter
//! operations never return errors: failures are reported once through the
//! progress sink and surface as `false`.
pub mod debian;
pub mod native;
pub mod termux;

use std::sync::Arc;

use crate::error::PlatformError;
use crate::exec::Executor;
use crate::platform::{EnvironmentDescriptor, PackageManager};
use crate::progress::ProgressSink;

pub use debian::DebianAdapter;
pub use native::{NativeAdapter, UnsupportedAdapter};
pub use termux::TermuxAdapter;

/// Operations every package-manager family supports.
pub trait PackageAdapter: Send + Sync {
    /// Short name for logs (e.g. `apt-get`, `pacman`).
    fn name(&self) -> &str;

    /// Refresh the package index. Returns whether it succeeded.
    fn update_repos(&self, sink: &dyn ProgressSink) -> bool;

    /// Install logical package `name`. Returns whether it succeeded.
    fn install_package(&self, name: &str, sink: &dyn ProgressSink) -> bool;

    /// Tools every provisioning run installs, in install order.
    fn essential_tools(&self) -> Vec<String>;
}

/// Whether this process already runs with elevated privilege.
#[must_use]
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}

/// Adapter for the family detected in `env`.
///
/// The privilege decision is taken here, once.
#[must_use]
pub fn select_adapter(
    env: &EnvironmentDescriptor,
    executor: Arc<dyn Executor>,
) -> Box<dyn PackageAdapter> {
    let elevate = !is_elevated();
    let runner = CommandRunner::new(executor, elevate);
    match env.package_manager {
        PackageManager::Pkg => Box::new(TermuxAdapter::new(
            runner.without_elevation(),
            "pkg",
            env.package_root(),
        )),
        PackageManager::Nala if env.is_termux => Box::new(TermuxAdapter::new(
            runner.without_elevation(),
            "nala",
            env.package_root(),
        )),
        PackageManager::Apt => Box::new(DebianAdapter::new(runner, "apt-get")),
        PackageManager::Nala => Box::new(DebianAdapter::new(runner, "nala")),
        family @ (PackageManager::Pacman
        | PackageManager::Dnf
        | PackageManager::Apk
        | PackageManager::Zypper
        | PackageManager::Xbps) => Box::new(NativeAdapter::new(runner, family)),
        PackageManager::Unknown => Box::new(UnsupportedAdapter::new(&env.distro_id)),
    }
}

/// Runs package-manager commands, optionally behind `sudo`, streaming their
/// output to a sink.
#[derive(Clone)]
pub struct CommandRunner {
    executor: Arc<dyn Executor>,
    elevate: bool,
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner")
            .field("elevate", &self.elevate)
            .finish_non_exhaustive()
    }
}

impl CommandRunner {
    /// Runner using `executor`; prefixes commands with `sudo` when
    /// `elevate` is set.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>, elevate: bool) -> Self {
        Self { executor, elevate }
    }

    /// The same runner, never elevating.
    #[must_use]
    pub fn without_elevation(self) -> Self {
        Self {
            elevate: false,
            ..self
        }
    }

    /// Whether commands are prefixed with `sudo`.
    #[must_use]
    pub const fn elevates(&self) -> bool {
        self.elevate
    }

    /// Run `program args…` with elevation applied.
    pub fn run(&self, program: &str, args: &[&str], sink: &dyn ProgressSink) -> bool {
        if self.elevate {
            let mut elevated = Vec::with_capacity(args.len() + 1);
            elevated.push(program);
            elevated.extend_from_slice(args);
            self.run_plain("sudo", &elevated, sink)
        } else {
            self.run_plain(program, args, sink)
        }
    }

    /// Run `program args…` exactly as given.
    pub fn run_plain(&self, program: &str, args: &[&str], sink: &dyn ProgressSink) -> bool {
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!("running: {command_line}");
        match self.executor.run_streaming(program, args, None, sink) {
            Ok(true) => true,
            Ok(false) => {
                sink.line(&format!("command failed: {command_line}"));
                false
            }
            Err(e) => {
                sink.line(&format!("error: {e:#}"));
                false
            }
        }
    }
}

/// Report that no package manager is available and fail.
fn unsupported(platform: &str, sink: &dyn ProgressSink) -> bool {
    sink.line(
        &PlatformError::Unsupported {
            platform: platform.to_string(),
        }
        .to_string(),
    );
    false
}
