//! Where a package lands in the home directory.
use std::path::{Path, PathBuf};

use crate::config::PackageEntry;

/// Package whose files are linked one by one into `$HOME`.
pub const SHELL_PACKAGE: &str = "shell";

/// Destination of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// The whole package directory is linked at `link`.
    Directory {
        /// Path of the symlink.
        link: PathBuf,
    },
    /// Each direct file of the package is linked (or rendered) into `home`.
    PerFile {
        /// Directory receiving the per-file links.
        home: PathBuf,
    },
}

impl LinkTarget {
    /// Classify package `name`.
    ///
    /// Checked in order: the `home` flag, the `shell` package, a leading
    /// dot, and finally `~/.config/<name>`.
    #[must_use]
    pub fn resolve(name: &str, entry: Option<&PackageEntry>, home: &Path) -> Self {
        if entry.is_some_and(PackageEntry::home) {
            Self::Directory {
                link: home.join(name),
            }
        } else if name == SHELL_PACKAGE {
            Self::PerFile {
                home: home.to_path_buf(),
            }
        } else if name.starts_with('.') {
            Self::Directory {
                link: home.join(name),
            }
        } else {
            Self::Directory {
                link: home.join(".config").join(name),
            }
        }
    }

    /// The symlink path, or the receiving directory for per-file packages.
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::Directory { link } => link,
            Self::PerFile { home } => home,
        }
    }
}
