//! Debian-family adapter (`apt-get`, or `nala` when installed).
use super::{CommandRunner, PackageAdapter};
use crate::progress::ProgressSink;

const ESSENTIAL_TOOLS: &[&str] = &[
    "zsh",
    "git",
    "curl",
    "wget",
    "build-essential",
    "fzf",
    "bat",
    "eza",
    "fastfetch",
    "figlet",
    "fortune-mod",
    "cowsay",
    "lolcat",
];

/// Logical name to Debian package name, where they differ.
const NAME_MAP: &[(&str, &str)] = &[("fd", "fd-find"), ("fortune", "fortune-mod")];

/// Adapter for apt-based distributions.
#[derive(Debug)]
pub struct DebianAdapter {
    runner: CommandRunner,
    frontend: &'static str,
}

impl DebianAdapter {
    /// Adapter driving `frontend` (`apt-get` or `nala`).
    #[must_use]
    pub const fn new(runner: CommandRunner, frontend: &'static str) -> Self {
        Self { runner, frontend }
    }

    /// Debian package name for logical `name`.
    #[must_use]
    pub fn package_name(name: &str) -> &str {
        NAME_MAP
            .iter()
            .find(|(logical, _)| *logical == name)
            .map_or(name, |(_, mapped)| *mapped)
    }
}

impl PackageAdapter for DebianAdapter {
    fn name(&self) -> &str {
        self.frontend
    }

    fn update_repos(&self, sink: &dyn ProgressSink) -> bool {
        self.runner.run(self.frontend, &["update", "-y"], sink)
    }

    fn install_package(&self, name: &str, sink: &dyn ProgressSink) -> bool {
        self.runner
            .run(self.frontend, &["install", "-y", Self::package_name(name)], sink)
    }

    fn essential_tools(&self) -> Vec<String> {
        ESSENTIAL_TOOLS.iter().map(|t| (*t).to_string()).collect()
    }
}
