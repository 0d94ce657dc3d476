//! Persistence of the desired state, with recovery from an existing rc file.
//!
//! The state document is JSON. [`StateManager::load`] never fails: a missing
//! or corrupt document falls back to heuristically reading the user's rc
//! file, and then to [`DesiredState::default`].
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Substring marking a theme intended for the privileged user.
const ROOT_THEME_MARKER: &str = "root";

/// Header guesses tried against the rc text, in priority order.
const HEADER_HINTS: [(&str, &str); 3] = [
    ("fastfetch", "fastfetch"),
    ("figlet", "figlet_slant"),
    ("cowsay", "cow"),
];

static THEME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"ZSH_THEME="([^"]+)""#).ok());
static PLUGINS_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)plugins=\((.*?)\)").ok());
static ROOT_BRANCH_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*if\b.*\$\{?E?UID\}?\b.*(-eq|==)\s*0\b").ok());
static BRANCH_END_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(else|elif|fi)\b").ok());

/// The user's declared configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredState {
    /// Selected plugin and tool identifiers, in selection order.
    pub selected_plugins: Vec<String>,
    /// Prompt theme for regular users.
    pub selected_theme: String,
    /// Prompt theme for the privileged user.
    pub selected_root_theme: String,
    /// Header style identifier.
    pub selected_header: String,
    /// Free text drawn by the figlet header styles.
    pub header_text: String,
    /// Figlet font for the custom header style.
    pub header_font: String,
}

impl Default for DesiredState {
    fn default() -> Self {
        Self {
            selected_plugins: ["git", "zsh-autosuggestions", "zsh-syntax-highlighting"]
                .map(String::from)
                .to_vec(),
            selected_theme: "robbyrussell".to_string(),
            selected_root_theme: "root_p10k_red".to_string(),
            selected_header: "fastfetch".to_string(),
            header_text: "Omega".to_string(),
            header_font: "slant".to_string(),
        }
    }
}

impl DesiredState {
    /// Append `id` unless it is already selected. Returns `true` if added.
    pub fn add_plugin(&mut self, id: &str) -> bool {
        if self.selected_plugins.iter().any(|p| p == id) {
            return false;
        }
        self.selected_plugins.push(id.to_string());
        true
    }

    /// Remove every occurrence of `id`. Returns `true` if any was removed.
    pub fn remove_plugin(&mut self, id: &str) -> bool {
        let before = self.selected_plugins.len();
        self.selected_plugins.retain(|p| p != id);
        before != self.selected_plugins.len()
    }
}

/// Loads and saves [`DesiredState`].
#[derive(Debug, Clone)]
pub struct StateManager {
    state_file: PathBuf,
    rc_file: PathBuf,
}

impl StateManager {
    /// Manager persisting to `state_file`, recovering from `rc_file`.
    #[must_use]
    pub fn new(state_file: impl Into<PathBuf>, rc_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
            rc_file: rc_file.into(),
        }
    }

    /// Path of the state document.
    #[must_use]
    pub fn state_file(&self) -> &Path {
        &self.state_file
    }

    /// Load the desired state.
    ///
    /// Order: the state document, then recovery from the rc file, then
    /// defaults.
    #[must_use]
    pub fn load(&self) -> DesiredState {
        match self.read_document() {
            Ok(Some(state)) => return state,
            Ok(None) => {}
            Err(e) => tracing::warn!("ignoring state document: {e}"),
        }
        match fs::read(&self.rc_file) {
            Ok(bytes) => {
                tracing::debug!("recovering state from {}", self.rc_file.display());
                recover_from_rc(&String::from_utf8_lossy(&bytes))
            }
            Err(_) => DesiredState::default(),
        }
    }

    /// Read and parse the state document; `Ok(None)` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read or parsed.
    pub fn read_document(&self) -> Result<Option<DesiredState>, StateError> {
        let content = match fs::read_to_string(&self.state_file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StateError::Read {
                    path: self.state_file.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StateError::Parse {
                path: self.state_file.clone(),
                source,
            })
    }

    /// Write `state` to the state document, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or written.
    pub fn save(&self, state: &DesiredState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;
        if let Some(parent) = self.state_file.parent() {
            fs::create_dir_all(parent).map_err(|source| StateError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.state_file, format!("{json}\n")).map_err(|source| StateError::Write {
            path: self.state_file.clone(),
            source,
        })
    }
}

/// Best-effort reconstruction of a [`DesiredState`] from rc file text.
///
/// This is a pattern matcher, not a shell parser. Fields it cannot find
/// keep their defaults.
#[must_use]
pub fn recover_from_rc(rc: &str) -> DesiredState {
    let mut state = DesiredState::default();

    // Each assignment goes to the root or user field; the last one per
    // field wins.
    let mut in_root_branch = false;
    for line in rc.lines() {
        if matches_line(&ROOT_BRANCH_RE, line) {
            in_root_branch = true;
        } else if matches_line(&BRANCH_END_RE, line) {
            in_root_branch = false;
        }
        let Some(theme) = THEME_RE
            .as_ref()
            .and_then(|re| re.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            continue;
        };
        if in_root_branch || theme.contains(ROOT_THEME_MARKER) {
            state.selected_root_theme = theme;
        } else {
            state.selected_theme = theme;
        }
    }

    if let Some(block) = PLUGINS_RE
        .as_ref()
        .and_then(|re| re.captures(rc))
        .and_then(|caps| caps.get(1))
    {
        state.selected_plugins = plugin_words(block.as_str());
    }

    if let Some((_, header)) = HEADER_HINTS.iter().find(|(hint, _)| rc.contains(hint)) {
        state.selected_header = (*header).to_string();
    }

    state
}

fn matches_line(re: &LazyLock<Option<Regex>>, line: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(line))
}

/// Words of a `plugins=(...)` body, ignoring `#` comments.
fn plugin_words(block: &str) -> Vec<String> {
    block
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(before, _)| before))
        .flat_map(str::split_whitespace)
        .map(String::from)
        .collect()
}
