//! Command: change the desired state. Every change is saved immediately.
use anyhow::{Context as _, Result};

use crate::catalog;
use crate::cli::{GlobalOpts, SelectCommand};
use crate::config::Paths;
use crate::logging::Logger;
use crate::state::DesiredState;
use crate::themes;

/// Run the select command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved, the header
/// style is unknown, or the state cannot be saved.
pub fn run(global: &GlobalOpts, cmd: &SelectCommand, log: &Logger) -> Result<()> {
    let paths = super::resolve_paths(global)?;
    let manager = super::state_manager(&paths);
    let mut state = manager.load();

    if !apply(&mut state, cmd, &paths, log)? {
        log.info("nothing changed");
        return Ok(());
    }

    manager.save(&state).context("saving desired state")?;
    log.info(&format!("saved {}", manager.state_file().display()));
    log.info("run `omega-zsh provision` or `omega-zsh apply` to use it");
    Ok(())
}

/// Apply one mutation to `state`. Returns whether anything changed.
///
/// Unknown plugin and theme ids are accepted with a warning. Ids that could
/// not be written into the rc file verbatim, and unknown header styles, are
/// rejected.
///
/// # Errors
///
/// Returns an error if a plugin or theme id is malformed, or the header
/// style is not one of [`catalog::HEADERS`].
pub fn apply(
    state: &mut DesiredState,
    cmd: &SelectCommand,
    paths: &Paths,
    log: &Logger,
) -> Result<bool> {
    let changed = match cmd {
        SelectCommand::Add { plugins } => {
            check_plugin_ids(plugins)?;
            let mut changed = false;
            for id in plugins {
                warn_if_uncataloged(id, log);
                if state.add_plugin(id) {
                    log.info(&format!("added {id}"));
                    changed = true;
                } else {
                    log.info(&format!("{id} is already selected"));
                }
            }
            changed
        }
        SelectCommand::Remove { plugins } => {
            let mut changed = false;
            for id in plugins {
                if state.remove_plugin(id) {
                    log.info(&format!("removed {id}"));
                    changed = true;
                } else {
                    log.info(&format!("{id} was not selected"));
                }
            }
            changed
        }
        SelectCommand::Plugins { plugins } => {
            check_plugin_ids(plugins)?;
            let mut selection = Vec::with_capacity(plugins.len());
            for id in plugins {
                if !selection.contains(id) {
                    warn_if_uncataloged(id, log);
                    selection.push(id.clone());
                }
            }
            replace(&mut state.selected_plugins, selection)
        }
        SelectCommand::Theme { id } => {
            check_theme_id(id)?;
            warn_if_unknown_theme(id, paths, log);
            replace(&mut state.selected_theme, id.clone())
        }
        SelectCommand::RootTheme { id } => {
            check_theme_id(id)?;
            warn_if_unknown_theme(id, paths, log);
            replace(&mut state.selected_root_theme, id.clone())
        }
        SelectCommand::Header { style, text, font } => {
            if catalog::header(style).is_none() {
                let known: Vec<&str> = catalog::HEADERS.iter().map(|h| h.id).collect();
                anyhow::bail!(
                    "unknown header style {style}; expected one of: {}",
                    known.join(", ")
                );
            }
            let mut changed = replace(&mut state.selected_header, style.clone());
            if let Some(text) = text {
                changed |= replace(&mut state.header_text, text.trim().to_string());
            }
            if let Some(font) = font {
                changed |= replace(&mut state.header_font, font.trim().to_string());
            }
            changed
        }
    };
    Ok(changed)
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn check_plugin_ids(ids: &[String]) -> Result<()> {
    if let Some(bad) = ids.iter().find(|id| !catalog::is_valid_id(id)) {
        anyhow::bail!("invalid plugin name {bad:?}: use letters, digits, '.', '_' or '-'");
    }
    Ok(())
}

fn check_theme_id(id: &str) -> Result<()> {
    if !catalog::is_valid_theme_id(id) {
        anyhow::bail!("invalid theme name {id:?}: use letters, digits, '.', '_', '-' or '/'");
    }
    Ok(())
}

fn warn_if_uncataloged(id: &str, log: &Logger) {
    let cataloged = catalog::plugin(id).is_some()
        || catalog::is_binary_tool(id)
        || catalog::external_source(id).is_some();
    if !cataloged {
        log.warn(&format!(
            "{id} is not in the catalog; it will be activated as a native plugin"
        ));
    }
}

fn warn_if_unknown_theme(id: &str, paths: &Paths, log: &Logger) {
    if !themes::is_known(id, paths) {
        log.warn(&format!("theme {id} was not found; it must exist before use"));
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;

    fn select(state: &mut DesiredState, cmd: SelectCommand) -> Result<bool> {
        let (log, _dir, _guard) = isolated_logger();
        apply(state, &cmd, &Paths::from_home("/nonexistent-home"), &log)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn add_appends_once() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Add {
            plugins: ids(&["eza", "git"]),
        };
        assert!(select(&mut state, cmd.clone()).unwrap());
        assert_eq!(state.selected_plugins.last().map(String::as_str), Some("eza"));
        assert!(!select(&mut state, cmd).unwrap());
    }

    #[test]
    fn remove_reports_no_change_for_unselected() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Remove {
            plugins: ids(&["lazygit"]),
        };
        assert!(!select(&mut state, cmd).unwrap());
        let cmd = SelectCommand::Remove {
            plugins: ids(&["git"]),
        };
        assert!(select(&mut state, cmd).unwrap());
        assert!(!state.selected_plugins.contains(&"git".to_string()));
    }

    #[test]
    fn plugins_replace_selection_without_duplicates() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Plugins {
            plugins: ids(&["bat", "fzf", "bat"]),
        };
        assert!(select(&mut state, cmd).unwrap());
        assert_eq!(state.selected_plugins, ids(&["bat", "fzf"]));
    }

    #[test]
    fn unknown_theme_is_accepted() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Theme {
            id: "my-own".to_string(),
        };
        assert!(select(&mut state, cmd).unwrap());
        assert_eq!(state.selected_theme, "my-own");
    }

    #[test]
    fn malformed_ids_are_rejected_without_change() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Add {
            plugins: ids(&["eza", "a)b"]),
        };
        let err = select(&mut state, cmd).unwrap_err();
        assert!(err.to_string().contains("invalid plugin name"));
        let cmd = SelectCommand::Theme {
            id: "my\"theme $(touch x)".to_string(),
        };
        let err = select(&mut state, cmd).unwrap_err();
        assert!(err.to_string().contains("invalid theme name"));
        assert_eq!(state, DesiredState::default());

        let cmd = SelectCommand::Theme {
            id: "powerlevel10k/powerlevel10k".to_string(),
        };
        assert!(select(&mut state, cmd).unwrap());
    }

    #[test]
    fn header_sets_style_text_and_font() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Header {
            style: "figlet_custom".to_string(),
            text: Some("  Hello ".to_string()),
            font: Some("banner".to_string()),
        };
        assert!(select(&mut state, cmd).unwrap());
        assert_eq!(state.selected_header, "figlet_custom");
        assert_eq!(state.header_text, "Hello");
        assert_eq!(state.header_font, "banner");
    }

    #[test]
    fn unknown_header_style_is_rejected() {
        let mut state = DesiredState::default();
        let cmd = SelectCommand::Header {
            style: "banner".to_string(),
            text: None,
            font: None,
        };
        let err = select(&mut state, cmd).unwrap_err();
        assert!(err.to_string().contains("unknown header style banner"));
        assert_eq!(state, DesiredState::default());
    }

    #[test]
    fn run_saves_the_change() {
        let (log, _dir, _guard) = isolated_logger();
        let home = tempfile::tempdir().unwrap();
        let global = GlobalOpts {
            home: Some(home.path().to_path_buf()),
            root: None,
        };
        let cmd = SelectCommand::RootTheme {
            id: "kali_red".to_string(),
        };
        run(&global, &cmd, &log).unwrap();

        let saved = super::super::state_manager(&Paths::from_home(home.path())).load();
        assert_eq!(saved.selected_root_theme, "kali_red");
    }
}
