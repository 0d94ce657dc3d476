//! Step 1: make sure the base environment framework is checked out.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::catalog::BASE_ENVIRONMENT_URL;
use crate::installer::Installer;

/// Clone the base environment if it is missing.
#[derive(Debug)]
pub struct EnsureBaseEnvironment;

impl Task for EnsureBaseEnvironment {
    fn name(&self) -> &'static str {
        "Ensure base environment"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.paths.base_installed() {
            return Ok(TaskResult::Skipped(format!(
                "already present at {}",
                ctx.paths.base_dir.display()
            )));
        }
        let installer = Installer::new(ctx.adapter.as_ref(), ctx.executor.clone(), &ctx.paths);
        if !installer.ensure_base_environment(ctx.sink()) {
            anyhow::bail!("could not clone {BASE_ENVIRONMENT_URL}");
        }
        Ok(TaskResult::Ok)
    }
}
