//! Termux adapter (`pkg`, or `nala` when installed). Never elevates.
use std::path::PathBuf;

use super::{CommandRunner, PackageAdapter};
use crate::progress::ProgressSink;

const ESSENTIAL_TOOLS: &[&str] = &[
    "zsh", "git", "curl", "wget", "proot", "tsu", "fzf", "bat", "eza", "fastfetch", "figlet",
    "fortune", "cowsay",
];

/// Not packaged for Termux; installed with pip instead.
const PIP_PACKAGES: &[&str] = &["lolcat"];

/// Adapter for the Termux sandbox.
#[derive(Debug)]
pub struct TermuxAdapter {
    runner: CommandRunner,
    frontend: &'static str,
    prefix: PathBuf,
}

impl TermuxAdapter {
    /// Adapter driving `frontend` inside the sandbox rooted at `prefix`.
    #[must_use]
    pub const fn new(runner: CommandRunner, frontend: &'static str, prefix: PathBuf) -> Self {
        Self {
            runner,
            frontend,
            prefix,
        }
    }

    fn pip_install(&self, name: &str, sink: &dyn ProgressSink) -> bool {
        let python = self.prefix.join("bin").join("python3");
        self.runner.run_plain(
            &python.to_string_lossy(),
            &["-m", "pip", "install", name, "--break-system-packages"],
            sink,
        )
    }
}

impl PackageAdapter for TermuxAdapter {
    fn name(&self) -> &str {
        if self.frontend == "pkg" {
            "pkg"
        } else {
            "nala (termux)"
        }
    }

    fn update_repos(&self, sink: &dyn ProgressSink) -> bool {
        self.runner.run_plain(self.frontend, &["upgrade", "-y"], sink)
    }

    fn install_package(&self, name: &str, sink: &dyn ProgressSink) -> bool {
        if PIP_PACKAGES.contains(&name) {
            return self.pip_install(name, sink);
        }
        self.runner
            .run_plain(self.frontend, &["install", "-y", name], sink)
    }

    fn essential_tools(&self) -> Vec<String> {
        ESSENTIAL_TOOLS.iter().map(|t| (*t).to_string()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::testing::RecordingExecutor;
    use crate::progress::CollectingSink;
    use std::sync::Arc;

    const PREFIX: &str = "/data/data/com.termux/files/usr";

    fn adapter(frontend: &'static str) -> (TermuxAdapter, Arc<RecordingExecutor>) {
        let exec = Arc::new(RecordingExecutor::new());
        // Even an elevating runner must not add sudo here.
        let runner = CommandRunner::new(exec.clone(), true).without_elevation();
        (TermuxAdapter::new(runner, frontend, PathBuf::from(PREFIX)), exec)
    }

    #[test]
    fn update_upgrades_without_sudo() {
        let (pkg, exec) = adapter("pkg");
        assert!(pkg.update_repos(&CollectingSink::new()));
        assert_eq!(exec.calls(), ["pkg upgrade -y"]);
    }

    #[test]
    fn lolcat_goes_through_pip() {
        let (pkg, exec) = adapter("pkg");
        let sink = CollectingSink::new();
        assert!(pkg.install_package("lolcat", &sink));
        assert!(pkg.install_package("fd", &sink));
        assert_eq!(
            exec.calls(),
            [
                format!("{PREFIX}/bin/python3 -m pip install lolcat --break-system-packages"),
                "pkg install -y fd".to_string(),
            ]
        );
    }

    #[test]
    fn essentials_include_sandbox_tools() {
        let (pkg, _) = adapter("pkg");
        let tools = pkg.essential_tools();
        assert!(tools.contains(&"proot".to_string()));
        assert!(tools.contains(&"tsu".to_string()));
        assert!(!tools.iter().any(|t| t == "build-essential"));
    }

    #[test]
    fn nala_front_end() {
        let (nala, exec) = adapter("nala");
        assert_eq!(nala.name(), "nala (termux)");
        nala.install_package("eza", &CollectingSink::new());
        assert_eq!(exec.calls(), ["nala install -y eza"]);
    }
}
