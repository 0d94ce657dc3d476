//! `/etc/os-release` parsing and the distribution → package-manager table.
use super::PackageManager;

/// Standard location of the release-info file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Distribution identity read from the release-info file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    /// Lowercased `ID`, or `"linux"` when the file has no `ID` key.
    pub id: String,
    /// `VERSION_ID`, or empty when absent.
    pub version_id: String,
}

/// Parse `KEY=value` lines, tolerating comments, blank lines and quoted
/// values.
#[must_use]
pub fn parse(content: &str) -> OsRelease {
    let mut id = None;
    let mut version_id = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key.trim() {
            "ID" => id = Some(value.to_lowercase()),
            "VERSION_ID" => version_id = Some(value.to_string()),
            _ => {}
        }
    }
    OsRelease {
        id: id.unwrap_or_else(|| "linux".to_string()),
        version_id: version_id.unwrap_or_default(),
    }
}

/// Map a distribution id to its package-manager family.
///
/// Returns `None` for ids outside the table; callers fall back to probing
/// for package-manager binaries.
#[must_use]
pub fn family_for_id(id: &str) -> Option<PackageManager> {
    let family = match id {
        "debian" | "ubuntu" | "kali" | "pop" | "linuxmint" | "parrot" => PackageManager::Apt,
        "arch" | "manjaro" | "endeavouros" => PackageManager::Pacman,
        "fedora" | "rhel" | "centos" | "almalinux" => PackageManager::Dnf,
        "alpine" => PackageManager::Apk,
        "opensuse" | "sles" => PackageManager::Zypper,
        "void" => PackageManager::Xbps,
        _ => return None,
    };
    Some(family)
}

/// Package-manager executables probed, in priority order, when the
/// distribution id is not in the table.
pub const FALLBACK_PROBES: &[(&str, PackageManager)] = &[
    ("apt-get", PackageManager::Apt),
    ("pacman", PackageManager::Pacman),
    ("dnf", PackageManager::Dnf),
    ("apk", PackageManager::Apk),
    ("zypper", PackageManager::Zypper),
    ("xbps-install", PackageManager::Xbps),
];
