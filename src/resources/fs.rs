//! File-system helpers shared by deployment and adoption.
use anyhow::{Context as _, Result};
use std::path::{Component, Path, PathBuf};

use crate::error::DotctlError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DotctlError::io(parent, e))
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Whether `path` itself is a symlink (broken links included).
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink())
}

/// Whether anything, including a broken symlink, exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Remove an existing file, symlink or empty directory at `path`.
///
/// Does nothing if `path` does not exist.  A non-empty directory is left in
/// place and reported as an error.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir(path)
    } else {
        remove_link_or_file(path)
    };
    result
        .map_err(|e| DotctlError::io(path, e))
        .with_context(|| format!("remove existing: {}", path.display()))?;
    Ok(())
}

/// Remove a file or symlink.
///
/// Directory symlinks on Windows must go through `remove_dir`.
pub(crate) fn remove_link_or_file(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        #[cfg(windows)]
        Err(_) if is_symlink(path) => std::fs::remove_dir(path),
        other => other,
    }
}

/// Path of `to` relative to the directory `from_dir`.
///
/// Purely lexical; both paths should be absolute and canonical.
#[must_use]
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in to.iter().skip(common) {
        out.push(component.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Move `from` to `to` with a rename.
///
/// # Errors
///
/// Returns an error if the rename fails (e.g. across filesystems).
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to)
        .map_err(|e| DotctlError::io(from, e))
        .with_context(|| format!("move {} to {}", from.display(), to.display()))
}
