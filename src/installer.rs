//! Install strategy resolution: binary package, external clone, or native
//! activation.
//!
//! [`classify`] is a pure function of the identifier and the static
//! catalogs. [`Installer::install_all`] is best-effort: a failed item is
//! reported through the sink and the remaining items still run.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{self, ExternalSource, SourceKind};
use crate::config::Paths;
use crate::config::paths::{BASE_DIR_NAME, BASE_ENTRY_POINT};
use crate::exec::Executor;
use crate::packages::PackageAdapter;
use crate::progress::{Prefixed, ProgressSink};

/// How one selected identifier is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Installed through the host package manager.
    BinaryPackage,
    /// Shallow-cloned from its upstream repository.
    ExternalClone(&'static ExternalSource),
    /// Provided by the base environment; only referenced in configuration.
    NativeActivation,
}

/// Strategy for `id`.
#[must_use]
pub fn classify(id: &str) -> InstallStrategy {
    if catalog::is_binary_tool(id) {
        InstallStrategy::BinaryPackage
    } else if let Some(source) = catalog::external_source(id) {
        InstallStrategy::ExternalClone(source)
    } else {
        InstallStrategy::NativeActivation
    }
}

/// Identifiers for the shell's plugin-activation block: `ids` without
/// binary tools and theme sources, first occurrence kept.
#[must_use]
pub fn activation_list(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| match classify(id) {
            InstallStrategy::BinaryPackage => false,
            InstallStrategy::ExternalClone(source) => source.kind == SourceKind::Plugin,
            InstallStrategy::NativeActivation => true,
        })
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Selected identifiers installed through the package manager, first
/// occurrence kept.
#[must_use]
pub fn active_tools(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| catalog::is_binary_tool(id) && seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Directory `source` is cloned into.
#[must_use]
pub fn clone_target(source: &ExternalSource, paths: &Paths) -> PathBuf {
    paths
        .custom_dir()
        .join(source.kind.dir_name())
        .join(source.id)
}

/// Outcome of a single identifier during [`Installer::install_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Package installed or repository cloned.
    Installed,
    /// Clone target already on disk.
    AlreadyPresent,
    /// Nothing to install.
    Activated,
    /// Package install or clone failed.
    Failed,
}

/// Per-identifier results of [`Installer::install_all`], in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// `(identifier, outcome)` pairs.
    pub items: Vec<(String, ItemOutcome)>,
}

impl InstallReport {
    /// Identifiers that failed.
    #[must_use]
    pub fn failures(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, outcome)| *outcome == ItemOutcome::Failed)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Drives package installs and clones for a list of identifiers.
pub struct Installer<'a> {
    adapter: &'a dyn PackageAdapter,
    executor: Arc<dyn Executor>,
    paths: &'a Paths,
}

impl std::fmt::Debug for Installer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("adapter", &self.adapter.name())
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl<'a> Installer<'a> {
    /// Installer using `adapter` for packages and `executor` for `git`.
    #[must_use]
    pub fn new(
        adapter: &'a dyn PackageAdapter,
        executor: Arc<dyn Executor>,
        paths: &'a Paths,
    ) -> Self {
        Self {
            adapter,
            executor,
            paths,
        }
    }

    /// Install every identifier in `ids`, in order.
    pub fn install_all(&self, ids: &[String], sink: &dyn ProgressSink) -> InstallReport {
        let items = ids
            .iter()
            .map(|id| (id.clone(), self.install_one(id, sink)))
            .collect();
        InstallReport { items }
    }

    fn install_one(&self, id: &str, sink: &dyn ProgressSink) -> ItemOutcome {
        match classify(id) {
            InstallStrategy::BinaryPackage => {
                sink.line(&format!("installing {id}"));
                if self.adapter.install_package(id, sink) {
                    ItemOutcome::Installed
                } else {
                    ItemOutcome::Failed
                }
            }
            InstallStrategy::ExternalClone(source) => {
                let target = clone_target(source, self.paths);
                if target.exists() {
                    sink.line(&format!("{id} already present"));
                    ItemOutcome::AlreadyPresent
                } else if self.shallow_clone(source.url, &target, sink) {
                    ItemOutcome::Installed
                } else {
                    ItemOutcome::Failed
                }
            }
            InstallStrategy::NativeActivation => {
                sink.line(&format!("activating native plugin {id}"));
                ItemOutcome::Activated
            }
        }
    }

    /// Clone the base environment unless it is already installed.
    ///
    /// A base directory without the framework entry point, such as one
    /// holding only `custom/` after an earlier clone failed, is replaced by
    /// a fresh clone. Its `custom/` tree is moved into the new checkout.
    pub fn ensure_base_environment(&self, sink: &dyn ProgressSink) -> bool {
        let base = &self.paths.base_dir;
        if self.paths.base_installed() {
            sink.line(&format!("base environment present at {}", base.display()));
            return true;
        }
        if !base.exists() {
            return self.shallow_clone(catalog::BASE_ENVIRONMENT_URL, base, sink);
        }

        sink.line(&format!(
            "{} has no {BASE_ENTRY_POINT}; cloning it again",
            base.display()
        ));
        let staging = match tempfile::Builder::new()
            .prefix(".omega-zsh-base.")
            .tempdir_in(&self.paths.home)
        {
            Ok(dir) => dir,
            Err(e) => {
                sink.line(&format!("error creating staging directory: {e}"));
                return false;
            }
        };
        let fresh = staging.path().join(BASE_DIR_NAME);
        if !self.shallow_clone(catalog::BASE_ENVIRONMENT_URL, &fresh, sink) {
            return false;
        }
        if let Err(e) = replace_partial_base(base, &fresh) {
            sink.line(&format!("error replacing {}: {e}", base.display()));
            return false;
        }
        true
    }

    /// `git clone --depth 1 url target`, streaming git's output.
    fn shallow_clone(&self, url: &str, target: &Path, sink: &dyn ProgressSink) -> bool {
        sink.line(&format!("cloning {url}"));
        if let Some(parent) = target.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            sink.line(&format!("error cloning {url}: {e}"));
            return false;
        }
        let target_str = target.to_string_lossy();
        let git = Prefixed::new(sink, "[git] ");
        match self.executor.run_streaming(
            "git",
            &["clone", "--depth", "1", url, &target_str],
            None,
            &git,
        ) {
            Ok(true) => true,
            Ok(false) => {
                sink.line(&format!("error cloning {url}: git exited with failure"));
                false
            }
            Err(e) => {
                sink.line(&format!("error cloning {url}: {e:#}"));
                false
            }
        }
    }
}

/// Carry `stale/custom` into `fresh`, then move `fresh` into `stale`'s place.
fn replace_partial_base(stale: &Path, fresh: &Path) -> std::io::Result<()> {
    let custom = stale.join("custom");
    if custom.is_dir() {
        merge_into(&custom, &fresh.join("custom"))?;
    }
    std::fs::remove_dir_all(stale)?;
    std::fs::rename(fresh, stale)
}

/// Move every entry of `from` into `to`. Directories present on both sides
/// are merged; on a file clash the entry from `from` wins.
fn merge_into(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        let is_dir = entry.file_type()?.is_dir();
        if is_dir && target.is_dir() {
            merge_into(&entry.path(), &target)?;
        } else if !target.exists() || (!is_dir && target.is_file()) {
            std::fs::rename(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::progress::CollectingSink;
    use std::sync::Mutex;

    use crate::exec::testing::RecordingExecutor;

    /// Adapter that records install requests.
    #[derive(Default)]
    struct RecordingAdapter {
        installs: Mutex<Vec<String>>,
        fail: Vec<String>,
    }

    impl PackageAdapter for RecordingAdapter {
        fn name(&self) -> &str {
            "recording"
        }
        fn update_repos(&self, _sink: &dyn ProgressSink) -> bool {
            true
        }
        fn install_package(&self, name: &str, _sink: &dyn ProgressSink) -> bool {
            self.installs.lock().unwrap().push(name.to_string());
            !self.fail.iter().any(|f| f == name)
        }
        fn essential_tools(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    // ------------------------------------------------------------------
    // classify
    // ------------------------------------------------------------------

    #[test]
    fn classification_is_exclusive_and_stable() {
        for id in ["lazygit", "fzf-tab", "powerlevel10k", "git", "docker", ""] {
            assert_eq!(classify(id), classify(id), "{id}");
        }
        assert_eq!(classify("lazygit"), InstallStrategy::BinaryPackage);
        assert!(matches!(
            classify("fzf-tab"),
            InstallStrategy::ExternalClone(s) if s.kind == SourceKind::Plugin
        ));
        assert!(matches!(
            classify("powerlevel10k"),
            InstallStrategy::ExternalClone(s) if s.kind == SourceKind::Theme
        ));
        assert_eq!(classify("git"), InstallStrategy::NativeActivation);
    }

    #[test]
    fn activation_list_excludes_tools_and_themes() {
        let selected = ids(&[
            "git",
            "lazygit",
            "zsh-autosuggestions",
            "powerlevel10k",
            "git",
            "sudo",
            "eza",
        ]);
        assert_eq!(
            activation_list(&selected),
            ["git", "zsh-autosuggestions", "sudo"]
        );
        assert_eq!(active_tools(&selected), ["lazygit", "eza"]);
    }

    // ------------------------------------------------------------------
    // install_all
    // ------------------------------------------------------------------

    #[test]
    fn binary_tool_installs_once_without_clone() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new());
        let installer = Installer::new(&adapter, exec.clone(), &paths);

        let report = installer.install_all(&ids(&["lazygit"]), &CollectingSink::new());

        assert_eq!(*adapter.installs.lock().unwrap(), ["lazygit"]);
        assert!(exec.calls().is_empty(), "no clone expected");
        assert_eq!(report.items, [("lazygit".to_string(), ItemOutcome::Installed)]);
    }

    #[test]
    fn clone_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new());
        let installer = Installer::new(&adapter, exec.clone(), &paths);
        let target = paths.custom_dir().join("plugins/fzf-tab");

        let first = CollectingSink::new();
        installer.install_all(&ids(&["fzf-tab"]), &first);
        assert_eq!(
            exec.calls(),
            [format!(
                "git clone --depth 1 https://github.com/Aloxaf/fzf-tab {}",
                target.display()
            )]
        );

        for _ in 0..2 {
            let again = CollectingSink::new();
            let report = installer.install_all(&ids(&["fzf-tab"]), &again);
            assert!(again.contains("fzf-tab already present"));
            assert_eq!(report.items[0].1, ItemOutcome::AlreadyPresent);
        }
        assert_eq!(exec.calls().len(), 1, "no second clone");
    }

    #[test]
    fn theme_sources_clone_into_themes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new());
        let installer = Installer::new(&adapter, exec, &paths);

        installer.install_all(&ids(&["powerlevel10k"]), &CollectingSink::new());
        assert!(paths.custom_themes_dir().join("powerlevel10k").is_dir());
    }

    #[test]
    fn failures_do_not_stop_later_items() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter {
            fail: vec!["bat".into()],
            ..RecordingAdapter::default()
        };
        let exec = Arc::new(RecordingExecutor::new().failing("zsh-autopair"));
        let installer = Installer::new(&adapter, exec, &paths);
        let sink = CollectingSink::new();

        let report = installer.install_all(
            &ids(&["zsh-autopair", "bat", "eza", "git"]),
            &sink,
        );

        assert_eq!(report.failures(), ["zsh-autopair", "bat"]);
        assert_eq!(report.items[2].1, ItemOutcome::Installed);
        assert_eq!(report.items[3].1, ItemOutcome::Activated);
        assert!(sink.contains("error cloning https://github.com/hlissner/zsh-autopair"));
        assert!(sink.contains("activating native plugin git"));
    }

    #[test]
    fn clone_spawn_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new().unspawnable("git"));
        let installer = Installer::new(&adapter, exec, &paths);
        let sink = CollectingSink::new();

        let report = installer.install_all(&ids(&["k"]), &sink);
        assert_eq!(report.failures(), ["k"]);
        assert!(sink.contains("error cloning https://github.com/supercrabtree/k"));
    }

    #[test]
    fn git_output_is_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new().printing("Receiving objects: 100%"));
        let installer = Installer::new(&adapter, exec, &paths);
        let sink = CollectingSink::new();

        installer.install_all(&ids(&["alias-tips"]), &sink);
        assert!(sink.lines().contains(&"[git] Receiving objects: 100%".to_string()));
    }

    // ------------------------------------------------------------------
    // ensure_base_environment
    // ------------------------------------------------------------------

    #[test]
    fn base_environment_cloned_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new());
        let installer = Installer::new(&adapter, exec.clone(), &paths);

        assert!(installer.ensure_base_environment(&CollectingSink::new()));
        assert!(installer.ensure_base_environment(&CollectingSink::new()));
        assert_eq!(
            exec.calls(),
            [format!(
                "git clone --depth 1 {} {}",
                catalog::BASE_ENVIRONMENT_URL,
                paths.base_dir.display()
            )]
        );
    }

    #[test]
    fn base_environment_clone_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new().failing("clone"));
        let installer = Installer::new(&adapter, exec, &paths);
        let sink = CollectingSink::new();

        assert!(!installer.ensure_base_environment(&sink));
        assert!(sink.contains("error cloning https://github.com/ohmyzsh/ohmyzsh.git"));
    }

    #[test]
    fn incomplete_base_is_cloned_again_keeping_custom() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let leftover = paths.custom_dir().join("plugins/fzf-tab");
        std::fs::create_dir_all(&leftover).unwrap();
        std::fs::write(leftover.join("fzf-tab.plugin.zsh"), "# plugin").unwrap();
        let adapter = RecordingAdapter::default();
        let exec = Arc::new(RecordingExecutor::new());
        let installer = Installer::new(&adapter, exec.clone(), &paths);
        let sink = CollectingSink::new();

        assert!(installer.ensure_base_environment(&sink));
        assert!(paths.base_installed());
        assert_eq!(
            std::fs::read_to_string(leftover.join("fzf-tab.plugin.zsh")).unwrap(),
            "# plugin"
        );
        assert_eq!(exec.calls().len(), 1);
        assert!(!exec.calls()[0].ends_with(&paths.base_dir.display().to_string()));
        assert!(sink.contains("cloning it again"));
        // staging directory is gone
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn failed_base_clone_is_retried_after_plugins_were_cloned() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::from_home(dir.path());
        let adapter = RecordingAdapter::default();
        let ids = ["fzf-tab".to_string()];

        let offline = Arc::new(RecordingExecutor::new().failing("ohmyzsh"));
        let first = Installer::new(&adapter, offline, &paths);
        assert!(!first.ensure_base_environment(&CollectingSink::new()));
        first.install_all(&ids, &CollectingSink::new());
        assert!(paths.base_dir.is_dir());
        assert!(!paths.base_installed());

        let online = Arc::new(RecordingExecutor::new());
        let second = Installer::new(&adapter, online.clone(), &paths);
        assert!(second.ensure_base_environment(&CollectingSink::new()));
        assert!(paths.base_installed());
        assert!(paths.custom_dir().join("plugins/fzf-tab").is_dir());

        second.install_all(&ids, &CollectingSink::new());
        assert_eq!(online.calls().len(), 1);
    }
}
