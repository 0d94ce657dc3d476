//! Command: list the themes available to the generated configuration.
use anyhow::Result;

use crate::catalog;
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::themes::{self, ThemeDescriptor};

/// Run the themes command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let paths = super::resolve_paths(global)?;
    let state = super::state_manager(&paths).load();

    log.stage("Themes");
    for line in listing(
        &themes::discover(&paths),
        &state.selected_theme,
        &state.selected_root_theme,
    ) {
        log.info(&line);
    }

    log.stage("Built into the base environment");
    log.info(&catalog::BUILTIN_THEMES.join(" "));
    Ok(())
}

/// One line per discovered theme; the selected themes are marked.
#[must_use]
pub fn listing(discovered: &[ThemeDescriptor], user: &str, root: &str) -> Vec<String> {
    discovered
        .iter()
        .map(|theme| {
            let mark = match (theme.id == user, theme.id == root) {
                (true, true) => " *user *root",
                (true, false) => " *user",
                (false, true) => " *root",
                (false, false) => "",
            };
            format!(
                "{:<24} {:<9} {}{mark}",
                theme.id, theme.provenance, theme.description
            )
        })
        .collect()
}
