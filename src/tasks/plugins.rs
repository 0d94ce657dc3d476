//! Step 4: install the selected plugins and tools.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::installer::Installer;

/// Install every selected identifier, in selection order.
#[derive(Debug)]
pub struct InstallSelectedPlugins;

impl Task for InstallSelectedPlugins {
    fn name(&self) -> &'static str {
        "Install selected plugins"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let selected = &ctx.state.selected_plugins;
        if selected.is_empty() {
            return Ok(TaskResult::Skipped("no plugins selected".to_string()));
        }

        let installer = Installer::new(ctx.adapter.as_ref(), ctx.executor.clone(), &ctx.paths);
        let report = installer.install_all(selected, ctx.sink());
        let failed = report.failures();
        if !failed.is_empty() {
            anyhow::bail!("failed to install: {}", failed.join(", "));
        }
        Ok(TaskResult::Ok)
    }
}
