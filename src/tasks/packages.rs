//! Steps 2 and 3: refresh the package index and install essential tools.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Refresh the package manager's index.
#[derive(Debug)]
pub struct UpdateRepositories;

impl Task for UpdateRepositories {
    fn name(&self) -> &'static str {
        "Update repositories"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        ctx.log
            .debug(&format!("package manager: {}", ctx.adapter.name()));
        if !ctx.adapter.update_repos(ctx.sink()) {
            anyhow::bail!("{} could not refresh the package index", ctx.adapter.name());
        }
        Ok(TaskResult::Ok)
    }
}

/// Install the host's essential tools, in catalog order.
#[derive(Debug)]
pub struct InstallEssentialTools;

impl Task for InstallEssentialTools {
    fn name(&self) -> &'static str {
        "Install essential tools"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let tools = ctx.adapter.essential_tools();
        if tools.is_empty() {
            return Ok(TaskResult::Skipped(format!(
                "no essential tools known for {}",
                ctx.adapter.name()
            )));
        }

        let mut failed = Vec::new();
        for tool in &tools {
            ctx.progress.line(&format!("installing {tool}"));
            if !ctx.adapter.install_package(tool, ctx.sink()) {
                failed.push(tool.as_str());
            }
        }

        if !failed.is_empty() {
            anyhow::bail!("failed to install: {}", failed.join(", "));
        }
        ctx.log.info(&format!("{} tools installed", tools.len()));
        Ok(TaskResult::Ok)
    }
}
