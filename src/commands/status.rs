//! Command: show the detected environment and the desired state.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Paths;
use crate::installer::{self, InstallStrategy};
use crate::logging::Logger;
use crate::state::DesiredState;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    log.info(&format!("package adapter: {}", setup.adapter.name()));

    log.stage("Paths");
    for (label, path, present) in layout(&setup.paths) {
        let mark = if present { "present" } else { "missing" };
        log.info(&format!("{label:<16} {} ({mark})", path.display()));
    }

    log.stage("Desired state");
    let state = setup.state.load();
    for line in describe(&state, &setup.paths) {
        log.info(&line);
    }
    Ok(())
}

fn layout(paths: &Paths) -> [(&'static str, &std::path::Path, bool); 5] {
    [
        ("base environment", &paths.base_dir, paths.base_installed()),
        ("rc file", &paths.zshrc, paths.zshrc.is_file()),
        ("state", &paths.state_file, paths.state_file.is_file()),
        ("personal file", &paths.personal_file, paths.personal_file.is_file()),
        ("custom file", &paths.custom_file, paths.custom_file.is_file()),
    ]
}

/// One line per selection, each plugin annotated with how it is satisfied
/// and whether it is installed.
#[must_use]
pub fn describe(state: &DesiredState, paths: &Paths) -> Vec<String> {
    let mut lines = vec![
        format!("theme:      {}", state.selected_theme),
        format!("root theme: {}", state.selected_root_theme),
        format!(
            "header:     {} (text {:?}, font {:?})",
            state.selected_header, state.header_text, state.header_font
        ),
    ];
    if state.selected_plugins.is_empty() {
        lines.push("plugins:    none".to_string());
    }
    for id in &state.selected_plugins {
        let how = match installer::classify(id) {
            InstallStrategy::BinaryPackage => "package".to_string(),
            InstallStrategy::ExternalClone(source) => {
                let cloned = installer::clone_target(source, paths).is_dir();
                let mark = if cloned { "cloned" } else { "not cloned" };
                format!("clone, {mark}")
            }
            InstallStrategy::NativeActivation => "native".to_string(),
        };
        lines.push(format!("plugin:     {id} [{how}]"));
    }
    lines
}
