//! Host environment detection.
//!
//! [`EnvironmentDescriptor::detect`] runs once at startup. The resulting
//! value is immutable and passed by reference (or `Arc`) to every component
//! that needs it. Detection never fails: each probe that cannot be answered
//! degrades its field to an "unknown" sentinel.
pub mod os_release;
pub mod probe;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::exec::Executor;
use probe::{HostProbe, SystemProbe};

/// Environment variables whose presence marks an Android runtime.
const ANDROID_ENV_VARS: [&str; 2] = ["ANDROID_ROOT", "ANDROID_DATA"];

/// Runtime-prefix variable; also locates the sandbox's package root.
pub const PREFIX_VAR: &str = "PREFIX";

/// Substring of [`PREFIX_VAR`] identifying the Termux sandbox.
const TERMUX_MARKER: &str = "com.termux";

/// Device properties consulted for generic-system-image detection.
const GSI_PROPERTIES: [&str; 2] = ["ro.build.flavor", "ro.product.name"];

/// Case-insensitive fingerprints of a generic system image.
const GSI_FINGERPRINTS: [&str; 3] = ["aosp", "gsi", "treble"];

/// Sentinel used for fields detection could not determine.
pub const UNKNOWN: &str = "unknown";

/// Detected operating system kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux, including Android userlands.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Anything else.
    Other,
}

impl Os {
    /// The OS this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "linux") || cfg!(target_os = "android") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Package-manager family (and preferred front-end) of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian family through `apt-get`.
    Apt,
    /// Debian family (or Termux) through the `nala` front-end.
    Nala,
    /// Termux `pkg`.
    Pkg,
    /// Arch family.
    Pacman,
    /// Fedora / RHEL family.
    Dnf,
    /// Alpine.
    Apk,
    /// openSUSE / SLES.
    Zypper,
    /// Void Linux.
    Xbps,
    /// Nothing usable was detected.
    Unknown,
}

impl PackageManager {
    /// Executable that implements this family, if any.
    #[must_use]
    pub const fn binary(self) -> Option<&'static str> {
        match self {
            Self::Apt => Some("apt-get"),
            Self::Nala => Some("nala"),
            Self::Pkg => Some("pkg"),
            Self::Pacman => Some("pacman"),
            Self::Dnf => Some("dnf"),
            Self::Apk => Some("apk"),
            Self::Zypper => Some("zypper"),
            Self::Xbps => Some("xbps-install"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Nala => write!(f, "nala"),
            Self::Pkg => write!(f, "pkg"),
            Self::Pacman => write!(f, "pacman"),
            Self::Dnf => write!(f, "dnf"),
            Self::Apk => write!(f, "apk"),
            Self::Zypper => write!(f, "zypper"),
            Self::Xbps => write!(f, "xbps"),
            Self::Unknown => write!(f, "{UNKNOWN}"),
        }
    }
}

/// Immutable description of the host, computed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    /// Operating system kind.
    pub os: Os,
    /// Distribution id (`"android"` on Android, [`UNKNOWN`] if undetected).
    pub distro_id: String,
    /// Distribution version, empty if undetected.
    pub distro_version: String,
    /// Running inside an Android userland.
    pub is_android: bool,
    /// Running inside the Termux sandbox specifically.
    pub is_termux: bool,
    /// The device runs a generic system image.
    pub is_gsi: bool,
    /// Resolved package-manager family.
    pub package_manager: PackageManager,
    /// Value of the runtime-prefix variable, when set.
    pub runtime_prefix: Option<PathBuf>,
}

impl EnvironmentDescriptor {
    /// Detect the current host.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        Self::detect_with(Os::current(), &SystemProbe::new(executor))
    }

    /// Detect the host as seen through `probe`, assuming `os`.
    #[must_use]
    pub fn detect_with(os: Os, probe: &dyn HostProbe) -> Self {
        let runtime_prefix = probe.env_var(PREFIX_VAR);
        let is_android = ANDROID_ENV_VARS
            .iter()
            .any(|var| probe.env_var(var).is_some());
        let is_termux = runtime_prefix
            .as_deref()
            .is_some_and(|prefix| prefix.contains(TERMUX_MARKER));

        let mut descriptor = Self {
            os,
            distro_id: UNKNOWN.to_string(),
            distro_version: String::new(),
            is_android,
            is_termux,
            is_gsi: false,
            package_manager: PackageManager::Unknown,
            runtime_prefix: runtime_prefix.map(PathBuf::from),
        };

        if is_android || is_termux {
            descriptor.distro_id = "android".to_string();
            descriptor.is_gsi = detect_gsi(probe);
            if is_termux {
                descriptor.package_manager = prefer_nala(PackageManager::Pkg, probe);
            }
        } else if os == Os::Linux {
            if let Some(content) = probe.read_file(Path::new(os_release::OS_RELEASE_PATH)) {
                let release = os_release::parse(&content);
                descriptor.distro_id = release.id;
                descriptor.distro_version = release.version_id;
            }
            let family = os_release::family_for_id(&descriptor.distro_id)
                .unwrap_or_else(|| probe_family(probe));
            descriptor.package_manager = prefer_nala(family, probe);
        }

        descriptor
    }

    /// Root of the sandbox's package tree (`$PREFIX`), or `/usr`.
    #[must_use]
    pub fn package_root(&self) -> PathBuf {
        self.runtime_prefix
            .clone()
            .unwrap_or_else(|| PathBuf::from("/usr"))
    }
}

impl fmt::Display for EnvironmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.os, self.distro_id)?;
        if !self.distro_version.is_empty() {
            write!(f, " {}", self.distro_version)?;
        }
        write!(f, "), package manager: {}", self.package_manager)?;
        if self.is_termux {
            write!(f, ", termux")?;
        } else if self.is_android {
            write!(f, ", android")?;
        }
        if self.is_gsi {
            write!(f, ", gsi")?;
        }
        Ok(())
    }
}

fn detect_gsi(probe: &dyn HostProbe) -> bool {
    GSI_PROPERTIES
        .iter()
        .filter_map(|prop| probe.device_property(prop))
        .any(|value| {
            let value = value.to_lowercase();
            GSI_FINGERPRINTS.iter().any(|fp| value.contains(fp))
        })
}

fn probe_family(probe: &dyn HostProbe) -> PackageManager {
    os_release::FALLBACK_PROBES
        .iter()
        .find(|(binary, _)| probe.binary_exists(binary))
        .map_or(PackageManager::Unknown, |(_, family)| *family)
}

/// `nala` replaces `apt-get` / `pkg` as the front-end when it is installed.
fn prefer_nala(family: PackageManager, probe: &dyn HostProbe) -> PackageManager {
    match family {
        PackageManager::Apt | PackageManager::Pkg if probe.binary_exists("nala") => {
            PackageManager::Nala
        }
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use probe::MockHostProbe;

    /// Build a probe answering from fixed tables.
    fn fake_host(
        env: &[(&str, &str)],
        os_release: Option<&str>,
        binaries: &[&str],
        props: &[(&str, &str)],
    ) -> MockHostProbe {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let release = os_release.map(str::to_string);
        let binaries: Vec<String> = binaries.iter().map(|b| (*b).to_string()).collect();
        let props: Vec<(String, String)> = props
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        let mut probe = MockHostProbe::new();
        probe.expect_env_var().returning(move |key| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        });
        probe.expect_read_file().returning(move |path| {
            (path == Path::new(os_release::OS_RELEASE_PATH))
                .then(|| release.clone())
                .flatten()
        });
        probe
            .expect_binary_exists()
            .returning(move |name| binaries.iter().any(|b| b == name));
        probe.expect_device_property().returning(move |key| {
            props
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        });
        probe
    }

    fn linux_with_id(id: &str, binaries: &[&str]) -> EnvironmentDescriptor {
        let content = format!("ID={id}\nVERSION_ID=\"1.0\"\n");
        EnvironmentDescriptor::detect_with(Os::Linux, &fake_host(&[], Some(&content), binaries, &[]))
    }

    // -----------------------------------------------------------------------
    // Linux distributions
    // -----------------------------------------------------------------------

    #[test]
    fn every_table_id_maps_to_its_family() {
        let cases = [
            ("debian", PackageManager::Apt),
            ("ubuntu", PackageManager::Apt),
            ("kali", PackageManager::Apt),
            ("pop", PackageManager::Apt),
            ("linuxmint", PackageManager::Apt),
            ("parrot", PackageManager::Apt),
            ("arch", PackageManager::Pacman),
            ("manjaro", PackageManager::Pacman),
            ("endeavouros", PackageManager::Pacman),
            ("fedora", PackageManager::Dnf),
            ("rhel", PackageManager::Dnf),
            ("centos", PackageManager::Dnf),
            ("almalinux", PackageManager::Dnf),
            ("alpine", PackageManager::Apk),
            ("opensuse", PackageManager::Zypper),
            ("sles", PackageManager::Zypper),
            ("void", PackageManager::Xbps),
        ];
        for (id, expected) in cases {
            let env = linux_with_id(id, &[]);
            assert_eq!(env.package_manager, expected, "id {id}");
            assert_eq!(env.distro_id, id);
            assert_eq!(env.distro_version, "1.0");
        }
    }

    #[test]
    fn table_wins_over_installed_binaries() {
        let env = linux_with_id("fedora", &["apt-get", "pacman"]);
        assert_eq!(env.package_manager, PackageManager::Dnf);
    }

    #[test]
    fn debian_prefers_nala_when_installed() {
        let env = linux_with_id("ubuntu", &["apt-get", "nala"]);
        assert_eq!(env.package_manager, PackageManager::Nala);
    }

    #[test]
    fn unknown_id_uses_first_probed_binary() {
        let env = linux_with_id("gentoo", &["apk", "pacman"]);
        assert_eq!(env.package_manager, PackageManager::Pacman);
    }

    #[test]
    fn unknown_id_without_binaries_is_unknown() {
        let env = linux_with_id("gentoo", &[]);
        assert_eq!(env.package_manager, PackageManager::Unknown);
        assert_eq!(env.distro_id, "gentoo");
    }

    #[test]
    fn missing_os_release_keeps_unknown_id_and_probes() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(&[], None, &["zypper"], &[]),
        );
        assert_eq!(env.distro_id, UNKNOWN);
        assert_eq!(env.package_manager, PackageManager::Zypper);
    }

    #[test]
    fn non_linux_is_unknown_without_probing_release() {
        let env = EnvironmentDescriptor::detect_with(
            Os::MacOs,
            &fake_host(&[], Some("ID=debian\n"), &["apt-get"], &[]),
        );
        assert_eq!(env.distro_id, UNKNOWN);
        assert_eq!(env.package_manager, PackageManager::Unknown);
    }

    // -----------------------------------------------------------------------
    // Android / Termux
    // -----------------------------------------------------------------------

    const TERMUX_PREFIX: &str = "/data/data/com.termux/files/usr";

    #[test]
    fn termux_uses_pkg() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(
                &[("ANDROID_ROOT", "/system"), (PREFIX_VAR, TERMUX_PREFIX)],
                Some("ID=debian\n"),
                &[],
                &[],
            ),
        );
        assert!(env.is_android);
        assert!(env.is_termux);
        assert_eq!(env.distro_id, "android");
        assert_eq!(env.package_manager, PackageManager::Pkg);
        assert_eq!(env.package_root(), PathBuf::from(TERMUX_PREFIX));
    }

    #[test]
    fn termux_prefers_nala() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(
                &[("ANDROID_DATA", "/data"), (PREFIX_VAR, TERMUX_PREFIX)],
                None,
                &["nala"],
                &[],
            ),
        );
        assert_eq!(env.package_manager, PackageManager::Nala);
    }

    #[test]
    fn android_without_termux_has_no_package_manager() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(&[("ANDROID_ROOT", "/system")], None, &["apt-get"], &[]),
        );
        assert!(env.is_android);
        assert!(!env.is_termux);
        assert_eq!(env.package_manager, PackageManager::Unknown);
    }

    #[test]
    fn gsi_fingerprint_is_case_insensitive() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(
                &[("ANDROID_ROOT", "/system")],
                None,
                &[],
                &[("ro.product.name", "Phone_TREBLE_arm64")],
            ),
        );
        assert!(env.is_gsi);
    }

    #[test]
    fn gsi_flavor_fingerprint() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(
                &[("ANDROID_ROOT", "/system")],
                None,
                &[],
                &[("ro.build.flavor", "aosp_arm64-userdebug")],
            ),
        );
        assert!(env.is_gsi);
    }

    #[test]
    fn failed_property_query_means_not_gsi() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(&[("ANDROID_ROOT", "/system")], None, &[], &[]),
        );
        assert!(!env.is_gsi);
    }

    #[test]
    fn vendor_image_is_not_gsi() {
        let env = EnvironmentDescriptor::detect_with(
            Os::Linux,
            &fake_host(
                &[("ANDROID_DATA", "/data")],
                None,
                &[],
                &[("ro.build.flavor", "user"), ("ro.product.name", "sunfish")],
            ),
        );
        assert!(!env.is_gsi);
    }

    #[test]
    fn package_root_defaults_to_usr() {
        let env = linux_with_id("arch", &[]);
        assert_eq!(env.package_root(), PathBuf::from("/usr"));
    }

    #[test]
    fn display_summarises_descriptor() {
        let env = linux_with_id("debian", &[]);
        assert_eq!(env.to_string(), "linux (debian 1.0), package manager: apt");
    }
}
