//! Named provisioning steps, executed strictly in order.
pub mod base;
mod context;
pub mod generate;
pub mod packages;
pub mod plugins;
pub mod theme;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a task that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// The step did its work.
    Ok,
    /// The step had nothing to do.
    Skipped(String),
}

/// A named provisioning step.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the step failed. Later steps still run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The provisioning run, in execution order.
///
/// Later steps rely on the side effects of earlier ones: plugins are cloned
/// beneath the base environment, and configuration references everything
/// installed before it.
#[must_use]
pub fn all_provision_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(base::EnsureBaseEnvironment),
        Box::new(packages::UpdateRepositories),
        Box::new(packages::InstallEssentialTools),
        Box::new(plugins::InstallSelectedPlugins),
        Box::new(theme::InstallTheme),
        Box::new(generate::GenerateConfiguration),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}
