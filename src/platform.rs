//! Detecting which system this machine is, as a package system tag.
use std::fmt;
use std::path::Path;

/// Release-info file sniffed on Linux.
pub const OS_RELEASE: &str = "/etc/os-release";

/// Linux distributions recognised in the release file, in priority order.
pub const DISTROS: [&str; 4] = ["arch", "ubuntu", "debian", "fedora"];

/// Tags that `add` stores as a bare string rather than a structured entry.
pub const SIMPLE_TAGS: [&str; 7] = ["all", "linux", "macos", "arch", "ubuntu", "debian", "fedora"];

/// Tags `adopt` recognises when splitting its arguments into package and systems.
pub const KNOWN_TAGS: [&str; 8] = [
    "all", "linux", "macos", "arch", "ubuntu", "debian", "fedora", "windows",
];

/// Wildcard tag that matches every system.
pub const ALL: &str = "all";

/// System tag of the running machine (e.g. `arch`, `macos`, `linux`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemTag(String);

impl SystemTag {
    /// Create a tag from an arbitrary string.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `linux` and the distributions in [`DISTROS`].
    ///
    /// Only template conditions use this; package eligibility treats every
    /// distribution as independent of the `linux` family token.
    #[must_use]
    pub fn is_linux_family(&self) -> bool {
        self.0 == "linux" || DISTROS.contains(&self.0.as_str())
    }
}

impl fmt::Display for SystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Detect the current system.
///
/// Never fails: an unreadable release file yields `linux`.
#[must_use]
pub fn identify() -> SystemTag {
    let os = std::env::consts::OS;
    let release = if os == "linux" {
        read_os_release(Path::new(OS_RELEASE))
    } else {
        None
    };
    identify_from(os, release.as_deref())
}

/// Pure classification of an OS name and optional release-file contents.
#[must_use]
pub fn identify_from(os: &str, os_release: Option<&str>) -> SystemTag {
    match os {
        "macos" | "darwin" => SystemTag::new("macos"),
        "linux" => {
            let Some(release) = os_release else {
                return SystemTag::new("linux");
            };
            let lower = release.to_lowercase();
            DISTROS
                .iter()
                .find(|d| lower.contains(*d))
                .map_or_else(|| SystemTag::new("linux"), |d| SystemTag::new(*d))
        }
        other => SystemTag::new(other),
    }
}

/// Read the release file, treating any failure as absent.
#[must_use]
pub fn read_os_release(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}
