//! Step 5: put the selected user and root themes in place.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::themes;

/// Write bundled themes into the customization root.
///
/// Built-in, standard and cloned themes need no work here; a theme that
/// cannot be found anywhere is reported but does not fail the step.
#[derive(Debug)]
pub struct InstallTheme;

impl Task for InstallTheme {
    fn name(&self) -> &'static str {
        "Install theme"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut ids = vec![ctx.state.selected_theme.as_str()];
        if ctx.state.selected_root_theme != ctx.state.selected_theme {
            ids.push(ctx.state.selected_root_theme.as_str());
        }

        let mut installed = Vec::new();
        for id in ids.iter().copied().filter(|id| !id.is_empty()) {
            if let Some(path) = themes::install_bundled(id, &ctx.paths)
                .with_context(|| format!("installing theme {id}"))?
            {
                ctx.progress
                    .line(&format!("installed {id} to {}", path.display()));
                installed.push(id);
            } else if themes::is_known(id, &ctx.paths) {
                ctx.log.debug(&format!("theme {id} already available"));
            } else {
                ctx.log.warn(&format!(
                    "theme {id} was not found; the shell will fall back to its default"
                ));
            }
        }

        if installed.is_empty() {
            return Ok(TaskResult::Skipped(format!(
                "{} needs no installation",
                ids.join(", ")
            )));
        }
        Ok(TaskResult::Ok)
    }
}
