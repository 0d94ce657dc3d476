//! Optional `settings.toml` in the per-user configuration directory.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::Paths;
use super::toml_loader::load_config;
use crate::error::ConfigError;

/// Tool settings. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory searched for templates before the embedded set. Relative
    /// paths are resolved against the configuration directory.
    pub templates_dir: Option<PathBuf>,
    /// Defaults written into the personal file on first creation.
    pub personal: PersonalDefaults,
}

/// Content of the personal file when it is first generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonalDefaults {
    /// Directories prepended to `PATH`.
    pub extra_paths: Vec<String>,
    /// Shell aliases.
    pub aliases: BTreeMap<String, String>,
    /// Exported environment variables.
    pub env_vars: BTreeMap<String, String>,
}

impl Default for PersonalDefaults {
    fn default() -> Self {
        Self {
            extra_paths: vec![
                "/usr/local/bin".to_string(),
                "$HOME/.cargo/bin".to_string(),
                "$HOME/.local/bin".to_string(),
            ],
            aliases: BTreeMap::from([
                ("lg".to_string(), "lazygit".to_string()),
                ("upd".to_string(), "omega-zsh update".to_string()),
            ]),
            env_vars: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load `settings.toml`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or invalid.
    pub fn load(paths: &Paths) -> Result<Self, ConfigError> {
        load_config(&paths.settings_file)
    }

    /// Absolute template override directory, if configured.
    #[must_use]
    pub fn resolved_templates_dir(&self, paths: &Paths) -> Option<PathBuf> {
        self.templates_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                paths.config_dir.join(dir)
            }
        })
    }
}
