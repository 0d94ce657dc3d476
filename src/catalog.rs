//! Static catalogs: selectable plugins, binary tools, external plugin
//! sources, themes, and header styles.
//!
//! Nothing here is mutated at runtime.

/// Category tag of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Core shell experience.
    Core,
    /// Navigation and search.
    Nav,
    /// Interaction niceties.
    Ux,
    /// Visual replacements for standard tools.
    Ui,
    /// General command-line utilities.
    Util,
    /// System administration.
    Sys,
    /// Documentation.
    Doc,
    /// Development workflow.
    Dev,
    /// Text editing.
    Edit,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Core => "CORE",
            Self::Nav => "NAV",
            Self::Ux => "UX",
            Self::Ui => "UI",
            Self::Util => "UTIL",
            Self::Sys => "SYS",
            Self::Doc => "DOC",
            Self::Dev => "DEV",
            Self::Edit => "EDIT",
        };
        f.write_str(tag)
    }
}

/// A selectable plugin or tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginCatalogEntry {
    /// Unique identifier.
    pub id: &'static str,
    /// Human description.
    pub description: &'static str,
    /// Category tag.
    pub category: Category,
    /// Upstream repository, if the item is cloned.
    pub url: Option<&'static str>,
}

const fn entry(
    id: &'static str,
    description: &'static str,
    category: Category,
    url: Option<&'static str>,
) -> PluginCatalogEntry {
    PluginCatalogEntry {
        id,
        description,
        category,
        url,
    }
}

/// Plugins and tools offered for selection, in display order.
pub const PLUGINS: &[PluginCatalogEntry] = &[
    entry(
        "zsh-autosuggestions",
        "Suggests commands as you type based on history",
        Category::Core,
        Some("https://github.com/zsh-users/zsh-autosuggestions"),
    ),
    entry(
        "zsh-syntax-highlighting",
        "Highlights commands while they are typed",
        Category::Core,
        Some("https://github.com/zsh-users/zsh-syntax-highlighting"),
    ),
    entry(
        "fzf-tab",
        "Replaces tab completion with an fzf menu",
        Category::Core,
        Some("https://github.com/Aloxaf/fzf-tab"),
    ),
    entry(
        "zsh-completions",
        "Additional completion definitions",
        Category::Core,
        Some("https://github.com/zsh-users/zsh-completions"),
    ),
    entry(
        "zsh-history-substring-search",
        "Fish-like history search with up/down arrows",
        Category::Nav,
        Some("https://github.com/zsh-users/zsh-history-substring-search"),
    ),
    entry(
        "zsh-autopair",
        "Auto-closes brackets and quotes",
        Category::Ux,
        Some("https://github.com/hlissner/zsh-autopair"),
    ),
    entry("zoxide", "Smarter cd that learns your habits", Category::Nav, None),
    entry("eza", "Modern ls replacement with icons", Category::Ui, None),
    entry("bat", "cat with syntax highlighting", Category::Ui, None),
    entry("yazi", "Terminal file manager", Category::Nav, None),
    entry("fzf", "Fuzzy finder for files and history", Category::Nav, None),
    entry("fd", "Fast, user-friendly find", Category::Util, None),
    entry("ripgrep", "Very fast recursive grep", Category::Util, None),
    entry("nala", "Friendlier apt front-end", Category::Sys, None),
    entry("tldr", "Simplified, example-driven man pages", Category::Doc, None),
    entry("lazygit", "Terminal UI for git", Category::Dev, None),
    entry("micro", "Intuitive terminal text editor", Category::Edit, None),
    entry("sudo", "Press ESC twice to prefix sudo", Category::Util, None),
];

/// Items satisfied by installing a package through the host package
/// manager.
pub const BINARY_TOOLS: &[&str] = &[
    "zoxide",
    "eza",
    "bat",
    "yazi",
    "fd",
    "ripgrep",
    "duf",
    "ncdu",
    "procs",
    "jq",
    "httpie",
    "neofetch",
    "tldr",
    "lazygit",
    "glow",
    "chafa",
    "micro",
    "lolcat",
    "fastfetch",
    "figlet",
    "fortune",
    "cowsay",
    "nala",
];

/// Where a cloned repository lands under the customization root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `custom/plugins/<id>`, referenced in the plugin-activation block.
    Plugin,
    /// `custom/themes/<id>`, referenced through the theme setting.
    Theme,
}

impl SourceKind {
    /// Directory name under the customization root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Plugin => "plugins",
            Self::Theme => "themes",
        }
    }
}

/// An externally hosted repository installed by shallow clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalSource {
    /// Identifier, as selected by the user.
    pub id: &'static str,
    /// Clone URL.
    pub url: &'static str,
    /// Target kind.
    pub kind: SourceKind,
}

const fn plugin_source(id: &'static str, url: &'static str) -> ExternalSource {
    ExternalSource {
        id,
        url,
        kind: SourceKind::Plugin,
    }
}

/// Repositories cloned on demand.
pub const EXTERNAL_SOURCES: &[ExternalSource] = &[
    plugin_source(
        "zsh-autosuggestions",
        "https://github.com/zsh-users/zsh-autosuggestions",
    ),
    plugin_source(
        "zsh-syntax-highlighting",
        "https://github.com/zsh-users/zsh-syntax-highlighting",
    ),
    plugin_source(
        "zsh-completions",
        "https://github.com/zsh-users/zsh-completions",
    ),
    plugin_source(
        "zsh-history-substring-search",
        "https://github.com/zsh-users/zsh-history-substring-search",
    ),
    plugin_source(
        "fast-syntax-highlighting",
        "https://github.com/zdharma-continuum/fast-syntax-highlighting",
    ),
    plugin_source("fzf-tab", "https://github.com/Aloxaf/fzf-tab"),
    plugin_source(
        "you-should-use",
        "https://github.com/MichaelAquilina/zsh-you-should-use",
    ),
    plugin_source(
        "zsh-alias-finder",
        "https://github.com/akash329d/zsh-alias-finder",
    ),
    ExternalSource {
        id: "powerlevel10k",
        url: "https://github.com/romkatv/powerlevel10k",
        kind: SourceKind::Theme,
    },
    plugin_source("zsh-autopair", "https://github.com/hlissner/zsh-autopair"),
    plugin_source("k", "https://github.com/supercrabtree/k"),
    plugin_source(
        "zsh-navigation-tools",
        "https://github.com/psprint/zsh-navigation-tools",
    ),
    plugin_source("alias-tips", "https://github.com/djui/alias-tips"),
];

/// Upstream of the base environment framework.
pub const BASE_ENVIRONMENT_URL: &str = "https://github.com/ohmyzsh/ohmyzsh.git";

/// Whether `id` is installed through the package manager.
#[must_use]
pub fn is_binary_tool(id: &str) -> bool {
    BINARY_TOOLS.contains(&id)
}

/// Clone source for `id`, if it is externally hosted.
#[must_use]
pub fn external_source(id: &str) -> Option<&'static ExternalSource> {
    EXTERNAL_SOURCES.iter().find(|s| s.id == id)
}

/// Catalog entry for `id`, if it is offered for selection.
#[must_use]
pub fn plugin(id: &str) -> Option<&'static PluginCatalogEntry> {
    PLUGINS.iter().find(|p| p.id == id)
}

/// Whether `id` can be written into the rc file as a plugin or tool name:
/// one or more of `[A-Za-z0-9._-]`, and not `.` or `..`.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Like [`is_valid_id`], also allowing `/` between segments as in
/// `powerlevel10k/powerlevel10k`.
#[must_use]
pub fn is_valid_theme_id(id: &str) -> bool {
    id.split('/').all(is_valid_id)
}

/// Themes shipped with the base environment that never need installing.
pub const BUILTIN_THEMES: &[&str] = &[
    "robbyrussell",
    "agnoster",
    "bira",
    "fox",
    "gentoo",
    "kphoen",
    "lambda",
    "cloud",
    "arrow",
    "random",
];

/// Themes intended for the privileged user.
pub const ROOT_THEMES: &[&str] = &["root_p10k_red", "root_warning", "kali_red"];

/// A selectable header style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDescriptor {
    /// Identifier stored in the desired state.
    pub id: &'static str,
    /// Human description.
    pub description: &'static str,
}

/// Header styles offered for selection.
pub const HEADERS: &[HeaderDescriptor] = &[
    HeaderDescriptor {
        id: "fastfetch",
        description: "System information summary",
    },
    HeaderDescriptor {
        id: "figlet_slant",
        description: "Header text in the slant figlet font",
    },
    HeaderDescriptor {
        id: "figlet_standard",
        description: "Header text in the standard figlet font",
    },
    HeaderDescriptor {
        id: "figlet_custom",
        description: "Header text in a font of your choice",
    },
    HeaderDescriptor {
        id: "cow",
        description: "A fortune told by a cow",
    },
    HeaderDescriptor {
        id: "none",
        description: "No header",
    },
];

/// Header descriptor for `id`, if it is a known style.
#[must_use]
pub fn header(id: &str) -> Option<&'static HeaderDescriptor> {
    HEADERS.iter().find(|h| h.id == id)
}
