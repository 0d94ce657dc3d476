//! Command: fast-forward the omega-zsh checkout.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::progress::{LogSink, Prefixed};

/// Environment variable naming the checkout.
pub const ROOT_VAR: &str = "OMEGA_ZSH_ROOT";

/// Run the update command.
///
/// # Errors
///
/// Returns an error if the checkout cannot be found, git cannot be started,
/// or the pull fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let root = resolve_root(global)?;
    pull(&SystemExecutor, &root, log)?;
    log.info("rebuild and run `omega-zsh apply` to pick up template changes");
    Ok(())
}

/// `git pull --ff-only` inside `root`, streaming git's output.
///
/// # Errors
///
/// Returns an error if git cannot be started or exits non-zero.
pub fn pull(executor: &dyn Executor, root: &Path, log: &Arc<Logger>) -> Result<()> {
    log.stage("Updating omega-zsh");
    log.info(&format!("checkout: {}", root.display()));

    let sink = LogSink::new(log.clone());
    let ok = executor
        .run_streaming(
            "git",
            &["pull", "--ff-only"],
            Some(root),
            &Prefixed::new(&sink, "[git] "),
        )
        .context("running git pull")?;
    if !ok {
        anyhow::bail!("git pull failed in {}", root.display());
    }
    log.info("up to date");
    Ok(())
}

/// Resolve the checkout from CLI arguments or auto-detection.
///
/// Order: `--root`, `OMEGA_ZSH_ROOT`, relative to the running binary
/// (`target/<profile>/` or `bin/`), then the current directory.
///
/// # Errors
///
/// Returns an error if no candidate is a git checkout.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }

    if let Ok(root) = std::env::var(ROOT_VAR)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        let candidates = [parent.join("../.."), parent.join("..")];
        for candidate in &candidates {
            if is_checkout(candidate) {
                return Ok(dunce::canonicalize(candidate)?);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    if is_checkout(&cwd) {
        return Ok(cwd);
    }

    anyhow::bail!("cannot find the omega-zsh checkout. Use --root or set {ROOT_VAR}");
}

fn is_checkout(dir: &Path) -> bool {
    dir.join(".git").exists() && dir.join("Cargo.toml").is_file()
}
