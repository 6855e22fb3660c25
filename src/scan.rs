//! Discovery of package directories under the dotfiles root.
use anyhow::Result;
use std::path::Path;

use crate::config::store::{CONFIG_FILE, LEGACY_CONFIG_FILE};
use crate::error::DotctlError;

/// Names that are never packages.
const SKIP: [&str; 4] = [".git", CONFIG_FILE, LEGACY_CONFIG_FILE, "__pycache__"];

fn is_skipped(name: &str) -> bool {
    SKIP.contains(&name) || name.ends_with(".tmp")
}

/// Every direct subdirectory of `root` that qualifies as a package, sorted.
///
/// A missing root yields an empty list.
///
/// # Errors
///
/// Returns an error if `root` exists but cannot be read.
pub fn scan(root: &Path) -> Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(root).map_err(|e| DotctlError::io(root, e))?;
    let mut packages = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DotctlError::io(root, e))?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_skipped(&name) {
            packages.push(name);
        }
    }
    packages.sort();
    Ok(packages)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_skips_metadata_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        for dir in ["vim", "tmux", ".git", "__pycache__", "nvim.tmp"] {
            fs::create_dir(root.join(dir)).unwrap();
        }
        fs::write(root.join("dotctl.yaml"), "packages: {}\n").unwrap();
        fs::write(root.join("README.md"), "# dots\n").unwrap();

        assert_eq!(scan(root).unwrap(), vec!["tmux", "vim"]);
    }

    #[test]
    fn scan_keeps_dot_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(".oh-my-zsh")).unwrap();
        fs::create_dir(tmp.path().join("shell")).unwrap();
        assert_eq!(scan(tmp.path()).unwrap(), vec![".oh-my-zsh", "shell"]);
    }

    #[test]
    fn scan_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(scan(&tmp.path().join("absent")).unwrap().is_empty());
    }
}
