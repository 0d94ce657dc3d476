//! Adapters for the remaining families, and the fallback for hosts with no
//! supported package manager.
use super::{CommandRunner, PackageAdapter, unsupported};
use crate::platform::PackageManager;
use crate::progress::ProgressSink;

const ESSENTIAL_TOOLS: &[&str] = &[
    "zsh",
    "git",
    "curl",
    "wget",
    "fzf",
    "bat",
    "eza",
    "fastfetch",
    "figlet",
    "fortune",
    "cowsay",
    "lolcat",
];

/// Fixed argument templates for one family.
#[derive(Debug, Clone, Copy)]
struct Commands {
    program: &'static str,
    update: &'static [&'static str],
    install: &'static [&'static str],
    names: &'static [(&'static str, &'static str)],
}

const PACMAN: Commands = Commands {
    program: "pacman",
    update: &["-Sy", "--noconfirm"],
    install: &["-S", "--needed", "--noconfirm"],
    names: &[("fortune", "fortune-mod")],
};

const DNF: Commands = Commands {
    program: "dnf",
    update: &["makecache", "-y"],
    install: &["install", "-y"],
    names: &[("fd", "fd-find"), ("fortune", "fortune-mod")],
};

// apk never prompts.
const APK: Commands = Commands {
    program: "apk",
    update: &["update"],
    install: &["add"],
    names: &[],
};

const ZYPPER: Commands = Commands {
    program: "zypper",
    update: &["--non-interactive", "refresh"],
    install: &["--non-interactive", "install"],
    names: &[],
};

const XBPS: Commands = Commands {
    program: "xbps-install",
    update: &["-Sy"],
    install: &["-y"],
    names: &[("fortune", "fortune-mod")],
};

/// Adapter for pacman, dnf, apk, zypper and xbps hosts.
#[derive(Debug)]
pub struct NativeAdapter {
    runner: CommandRunner,
    commands: Commands,
}

impl NativeAdapter {
    /// Adapter for `family`.
    ///
    /// Families without their own table here (apt, pkg, unknown) fall back
    /// to the pacman table; use [`super::select_adapter`] to pick adapters.
    #[must_use]
    pub const fn new(runner: CommandRunner, family: PackageManager) -> Self {
        let commands = match family {
            PackageManager::Dnf => DNF,
            PackageManager::Apk => APK,
            PackageManager::Zypper => ZYPPER,
            PackageManager::Xbps => XBPS,
            _ => PACMAN,
        };
        Self { runner, commands }
    }

    fn package_name<'a>(&self, name: &'a str) -> &'a str {
        self.commands
            .names
            .iter()
            .find(|(logical, _)| *logical == name)
            .map_or(name, |(_, mapped)| *mapped)
    }
}

impl PackageAdapter for NativeAdapter {
    fn name(&self) -> &str {
        self.commands.program
    }

    fn update_repos(&self, sink: &dyn ProgressSink) -> bool {
        self.runner
            .run(self.commands.program, self.commands.update, sink)
    }

    fn install_package(&self, name: &str, sink: &dyn ProgressSink) -> bool {
        let mut args = self.commands.install.to_vec();
        args.push(self.package_name(name));
        self.runner.run(self.commands.program, &args, sink)
    }

    fn essential_tools(&self) -> Vec<String> {
        ESSENTIAL_TOOLS.iter().map(|t| (*t).to_string()).collect()
    }
}

/// Adapter for hosts where no package manager was detected. Every
/// operation reports the problem and fails.
#[derive(Debug)]
pub struct UnsupportedAdapter {
    platform: String,
}

impl UnsupportedAdapter {
    /// Adapter for the host described as `platform`.
    #[must_use]
    pub fn new(platform: &str) -> Self {
        Self {
            platform: platform.to_string(),
        }
    }
}

impl PackageAdapter for UnsupportedAdapter {
    fn name(&self) -> &str {
        "unsupported"
    }

    fn update_repos(&self, sink: &dyn ProgressSink) -> bool {
        unsupported(&self.platform, sink)
    }

    fn install_package(&self, _name: &str, sink: &dyn ProgressSink) -> bool {
        unsupported(&self.platform, sink)
    }

    fn essential_tools(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::testing::RecordingExecutor;
    use crate::progress::CollectingSink;
    use std::sync::Arc;

    fn run_both(family: PackageManager, elevate: bool, package: &str) -> Vec<String> {
        let exec = Arc::new(RecordingExecutor::new());
        let adapter = NativeAdapter::new(CommandRunner::new(exec.clone(), elevate), family);
        let sink = CollectingSink::new();
        assert!(adapter.update_repos(&sink));
        assert!(adapter.install_package(package, &sink));
        exec.calls()
    }

    #[test]
    fn pacman_commands() {
        assert_eq!(
            run_both(PackageManager::Pacman, true, "fortune"),
            [
                "sudo pacman -Sy --noconfirm",
                "sudo pacman -S --needed --noconfirm fortune-mod"
            ]
        );
    }

    #[test]
    fn dnf_commands() {
        assert_eq!(
            run_both(PackageManager::Dnf, false, "fd"),
            ["dnf makecache -y", "dnf install -y fd-find"]
        );
    }

    #[test]
    fn apk_commands() {
        assert_eq!(
            run_both(PackageManager::Apk, false, "fd"),
            ["apk update", "apk add fd"]
        );
    }

    #[test]
    fn zypper_commands() {
        assert_eq!(
            run_both(PackageManager::Zypper, true, "bat"),
            [
                "sudo zypper --non-interactive refresh",
                "sudo zypper --non-interactive install bat"
            ]
        );
    }

    #[test]
    fn xbps_commands() {
        assert_eq!(
            run_both(PackageManager::Xbps, false, "eza"),
            ["xbps-install -Sy", "xbps-install -y eza"]
        );
    }

    #[test]
    fn unsupported_reports_and_fails() {
        let adapter = UnsupportedAdapter::new("plan9");
        let sink = CollectingSink::new();
        assert!(!adapter.update_repos(&sink));
        assert!(!adapter.install_package("bat", &sink));
        assert!(adapter.essential_tools().is_empty());
        assert_eq!(
            sink.lines(),
            [
                "no supported package manager detected on plan9",
                "no supported package manager detected on plan9"
            ]
        );
    }
}
