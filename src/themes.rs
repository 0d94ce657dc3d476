//! Theme discovery across provenances, and installation of bundled themes.
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::config::Paths;
use crate::error::GenerateError;

/// File extension of a theme file.
pub const THEME_EXTENSION: &str = "zsh-theme";

/// Where a theme comes from. Earlier variants take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    /// Embedded in this binary.
    Bundled,
    /// Under the user's customization root.
    UserCustom,
    /// Shipped with the base environment.
    Standard,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Bundled => "bundled",
            Self::UserCustom => "custom",
            Self::Standard => "standard",
        })
    }
}

/// A theme available for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDescriptor {
    /// Identifier (file stem).
    pub id: String,
    /// Human description.
    pub description: String,
    /// Where the theme was found.
    pub provenance: Provenance,
    /// File on disk; `None` for bundled themes.
    pub path: Option<PathBuf>,
}

/// A theme embedded in the binary.
#[derive(Debug, Clone, Copy)]
pub struct BundledTheme {
    /// Identifier.
    pub id: &'static str,
    /// Human description.
    pub description: &'static str,
    /// File content.
    pub content: &'static str,
}

macro_rules! bundled_theme {
    ($id:literal, $description:literal) => {
        BundledTheme {
            id: $id,
            description: $description,
            content: include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/themes/",
                $id,
                ".zsh-theme"
            )),
        }
    };
}

/// Themes shipped with this tool.
pub const BUNDLED: &[BundledTheme] = &[
    bundled_theme!("omega", "Two-line prompt with git status and exit code"),
    bundled_theme!("root_p10k_red", "Loud red prompt for root sessions"),
    bundled_theme!("root_warning", "Warning banner prompt for root sessions"),
    bundled_theme!("kali_red", "Kali-style two-line red prompt"),
];

/// Bundled theme `id`, if any.
#[must_use]
pub fn bundled(id: &str) -> Option<&'static BundledTheme> {
    BUNDLED.iter().find(|t| t.id == id)
}

/// Every selectable theme, deduplicated by id with precedence
/// bundled > user-custom > standard, sorted by lowercase id.
#[must_use]
pub fn discover(paths: &Paths) -> Vec<ThemeDescriptor> {
    let mut found: BTreeMap<String, ThemeDescriptor> = BTreeMap::new();
    let mut offer = |theme: ThemeDescriptor| {
        found
            .entry(theme.id.clone())
            .and_modify(|existing| {
                if theme.provenance < existing.provenance {
                    *existing = theme.clone();
                }
            })
            .or_insert(theme);
    };

    for theme in BUNDLED {
        offer(ThemeDescriptor {
            id: theme.id.to_string(),
            description: theme.description.to_string(),
            provenance: Provenance::Bundled,
            path: None,
        });
    }

    // User themes may live in per-theme subdirectories.
    for path in WalkDir::new(paths.custom_themes_dir())
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
    {
        if let Some(theme) = on_disk(path, Provenance::UserCustom) {
            offer(theme);
        }
    }

    if let Ok(entries) = fs::read_dir(paths.standard_themes_dir()) {
        for path in entries.filter_map(Result::ok).map(|e| e.path()) {
            if let Some(theme) = on_disk(path, Provenance::Standard) {
                offer(theme);
            }
        }
    }

    let mut themes: Vec<ThemeDescriptor> = found.into_values().collect();
    themes.sort_by_cached_key(|t| t.id.to_lowercase());
    themes
}

fn on_disk(path: PathBuf, provenance: Provenance) -> Option<ThemeDescriptor> {
    if path.extension().and_then(|e| e.to_str()) != Some(THEME_EXTENSION) {
        return None;
    }
    let id = path.file_stem()?.to_str()?.to_string();
    let description = match provenance {
        Provenance::UserCustom => "User custom theme",
        _ => "Standard theme",
    };
    Some(ThemeDescriptor {
        id,
        description: description.to_string(),
        provenance,
        path: Some(path),
    })
}

/// Write bundled theme `id` into the customization root.
///
/// Returns the written path, or `None` if `id` is not bundled.
///
/// # Errors
///
/// Returns an error if the theme directory or file cannot be written.
pub fn install_bundled(id: &str, paths: &Paths) -> Result<Option<PathBuf>, GenerateError> {
    let Some(theme) = bundled(id) else {
        return Ok(None);
    };
    let dir = paths.custom_themes_dir();
    fs::create_dir_all(&dir).map_err(|source| GenerateError::Io {
        action: "create directory",
        path: dir.clone(),
        source,
    })?;
    let target = dir.join(format!("{id}.{THEME_EXTENSION}"));
    fs::write(&target, theme.content).map_err(|source| GenerateError::Io {
        action: "write",
        path: target.clone(),
        source,
    })?;
    Ok(Some(target))
}

/// Path of theme `id` in the customization root.
#[must_use]
pub fn custom_theme_path(id: &str, paths: &Paths) -> PathBuf {
    paths
        .custom_themes_dir()
        .join(format!("{id}.{THEME_EXTENSION}"))
}

/// Whether `id` names a theme that is bundled, built into the base
/// environment, discovered on disk, or cloned into the customization root.
#[must_use]
pub fn is_known(id: &str, paths: &Paths) -> bool {
    bundled(id).is_some()
        || crate::catalog::BUILTIN_THEMES.contains(&id)
        || discover(paths).iter().any(|t| t.id == id)
        || paths.custom_themes_dir().join(id).is_dir()
}
