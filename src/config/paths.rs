//! Filesystem layout consumed and produced by the tool.
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Base environment framework directory, relative to home.
pub const BASE_DIR_NAME: &str = ".oh-my-zsh";

/// Script the base environment framework is loaded from, relative to
/// [`BASE_DIR_NAME`].
pub const BASE_ENTRY_POINT: &str = "oh-my-zsh.sh";

/// Per-user configuration directory, relative to home.
pub const CONFIG_DIR_NAME: &str = ".omega-zsh";

/// Resolved locations for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// User home directory.
    pub home: PathBuf,
    /// Base environment framework (`~/.oh-my-zsh`).
    pub base_dir: PathBuf,
    /// Per-user configuration directory (`~/.omega-zsh`).
    pub config_dir: PathBuf,
    /// Generated shell rc file (`~/.zshrc`).
    pub zshrc: PathBuf,
    /// Persisted desired state.
    pub state_file: PathBuf,
    /// Personal file, generated once.
    pub personal_file: PathBuf,
    /// Custom file, created once with boilerplate.
    pub custom_file: PathBuf,
    /// Optional tool settings.
    pub settings_file: PathBuf,
}

impl Paths {
    /// Lay out every path beneath `home`.
    #[must_use]
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let base_dir = home.join(BASE_DIR_NAME);
        let config_dir = home.join(CONFIG_DIR_NAME);
        Self {
            zshrc: home.join(".zshrc"),
            state_file: config_dir.join("state.json"),
            personal_file: config_dir.join("personal.zsh"),
            custom_file: config_dir.join("custom.zsh"),
            settings_file: config_dir.join("settings.toml"),
            base_dir,
            config_dir,
            home,
        }
    }

    /// Resolve the layout from an explicit home, or from `HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if no override is given and
    /// `HOME` is unset or empty.
    pub fn resolve(home_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(home) = home_override {
            return Ok(Self::from_home(home));
        }
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => Ok(Self::from_home(home)),
            _ => Err(ConfigError::MissingHome),
        }
    }

    /// Whether the framework itself is checked out, not just a directory
    /// that later steps created beneath `base_dir`.
    #[must_use]
    pub fn base_installed(&self) -> bool {
        self.base_dir.join(BASE_ENTRY_POINT).is_file()
    }

    /// Customization root (`~/.oh-my-zsh/custom`).
    #[must_use]
    pub fn custom_dir(&self) -> PathBuf {
        self.base_dir.join("custom")
    }

    /// User-custom themes (`~/.oh-my-zsh/custom/themes`).
    #[must_use]
    pub fn custom_themes_dir(&self) -> PathBuf {
        self.custom_dir().join("themes")
    }

    /// Themes shipped with the base environment (`~/.oh-my-zsh/themes`).
    #[must_use]
    pub fn standard_themes_dir(&self) -> PathBuf {
        self.base_dir.join("themes")
    }
}
