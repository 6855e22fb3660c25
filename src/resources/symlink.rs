//! Symlink resource.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use super::fs::{ensure_parent_dir, relative_path, remove_existing, remove_link_or_file};
use super::{ResourceChange, ResourceState};
use crate::error::DotctlError;

/// A link at `link` pointing back at `source` through a relative path.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The file or directory inside the dotfiles root.
    pub source: PathBuf,
    /// Where the symlink lives.
    pub link: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, link: PathBuf) -> Self {
        Self { source, link }
    }

    /// Human-readable description of this resource.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.source.display())
    }

    /// Relative path stored in the link.
    ///
    /// Both the source and the link's parent are canonicalized first so that
    /// the link keeps working when the home tree and the dotfiles root move
    /// together.  The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if either path cannot be canonicalized.
    pub fn relative_target(&self) -> Result<PathBuf> {
        let source =
            dunce::canonicalize(&self.source).map_err(|e| DotctlError::io(&self.source, e))?;
        let parent = self.link.parent().unwrap_or_else(|| Path::new("."));
        let parent = dunce::canonicalize(parent).map_err(|e| DotctlError::io(parent, e))?;
        Ok(relative_path(&parent, &source))
    }

    /// Inspect what currently exists at the link path.
    #[must_use]
    pub fn current_state(&self) -> ResourceState {
        let Ok(meta) = self.link.symlink_metadata() else {
            return ResourceState::Missing;
        };
        if meta.file_type().is_symlink() {
            if self.points_to_source() {
                return ResourceState::Correct;
            }
            let current = std::fs::read_link(&self.link)
                .map_or_else(|_| "unreadable link".to_string(), |t| t.display().to_string());
            return ResourceState::Incorrect {
                current: format!("points to {current}"),
            };
        }
        if meta.is_dir() {
            return ResourceState::Invalid {
                reason: "destination is a real directory".to_string(),
            };
        }
        ResourceState::Incorrect {
            current: "destination is a regular file".to_string(),
        }
    }

    fn points_to_source(&self) -> bool {
        match (
            dunce::canonicalize(&self.link),
            dunce::canonicalize(&self.source),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Create the link, replacing a file, symlink or empty directory in the
    /// way.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent cannot be created, the existing entry
    /// cannot be removed, or the link cannot be created.
    pub fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.link)?;
        remove_existing(&self.link)?;
        let target = self.relative_target()?;
        create_symlink(&target, &self.link)
            .with_context(|| format!("create link: {}", self.link.display()))?;
        Ok(ResourceChange::Applied)
    }

    /// Remove the link.
    ///
    /// A missing destination is not an error.  Anything other than a symlink
    /// is left untouched and reported as [`DotctlError::NotManaged`].
    ///
    /// # Errors
    ///
    /// Returns an error if the destination is not a symlink or cannot be
    /// removed.
    pub fn remove(&self) -> Result<ResourceChange> {
        let Ok(meta) = self.link.symlink_metadata() else {
            return Ok(ResourceChange::Skipped {
                reason: "not deployed".to_string(),
            });
        };
        if !meta.file_type().is_symlink() {
            return Err(DotctlError::NotManaged {
                path: self.link.clone(),
            }
            .into());
        }
        remove_link_or_file(&self.link).map_err(|e| DotctlError::io(&self.link, e))?;
        Ok(ResourceChange::Applied)
    }
}

/// Create a symlink at `link` pointing to `target`.
///
/// A relative `target` is resolved against the link's parent.
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).map_err(|e| DotctlError::io(link, e))?;
    }

    #[cfg(windows)]
    {
        let resolved = link.parent().map_or_else(|| target.to_path_buf(), |p| p.join(target));
        let result = if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(|e| DotctlError::io(link, e))?;
    }

    Ok(())
}
