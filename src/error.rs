//! Domain-specific error types for dotctl.
//!
//! Internal modules return [`anyhow::Result`] values that carry a
//! [`DotctlError`] at their root, decorated with `.context(..)` breadcrumbs.
//! Callers that need to branch on the failure kind (e.g. the sync command
//! distinguishing a merge conflict) use [`anyhow::Error::downcast_ref`].
//!
//! # Error taxonomy
//!
//! ```text
//! DotctlError
//! ├── NotFound                          package or directory missing
//! ├── ToolUnavailable                   helper program not on PATH
//! ├── ToolFailed                        non-zero exit from a subprocess
//! ├── ConfigParse                       unreadable configuration (non-fatal)
//! ├── ConflictRequiresManualResolution  sync stopped on merge conflicts
//! ├── NothingToDeploy                   batch had no packages to act on
//! ├── NotManaged                        destination is not a dotctl link
//! └── Io                                filesystem failure
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by dotctl operations.
#[derive(Error, Debug)]
pub enum DotctlError {
    /// A package or directory does not exist where it was expected.
    #[error("{what} not found at {}", .path.display())]
    NotFound {
        /// Human-readable description of the missing item.
        what: String,
        /// Path that was checked.
        path: PathBuf,
    },

    /// A required external program is not available on PATH.
    #[error("required tool '{program}' is not available on PATH")]
    ToolUnavailable {
        /// Name of the missing program.
        program: String,
    },

    /// An external program exited with a non-zero status.
    #[error("command '{program}' failed (exit {code}): {stderr}")]
    ToolFailed {
        /// Program and arguments that were invoked.
        program: String,
        /// Exit code, or `-1` when terminated by a signal.
        code: i32,
        /// Captured diagnostic output.
        stderr: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("could not parse configuration {}: {message}", .path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Restoring stashed changes produced merge conflicts.
    #[error(
        "merge conflicts detected - resolve them manually (see 'git status') and run 'dotctl sync' again"
    )]
    ConflictRequiresManualResolution,

    /// A bulk operation had no packages to act on.
    #[error("no packages configured for system '{system}'")]
    NothingToDeploy {
        /// Detected system tag.
        system: String,
    },

    /// A destination exists but is not a link created by dotctl.
    #[error("{} exists and is not a symlink; refusing to remove it", .path.display())]
    NotManaged {
        /// Destination path.
        path: PathBuf,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DotctlError {
    /// Build an [`DotctlError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn not_found_display() {
        let e = DotctlError::NotFound {
            what: "package 'vim'".to_string(),
            path: PathBuf::from("/home/u/.dotfiles/vim"),
        };
        assert_eq!(
            e.to_string(),
            "package 'vim' not found at /home/u/.dotfiles/vim"
        );
    }

    #[test]
    fn tool_unavailable_display() {
        let e = DotctlError::ToolUnavailable {
            program: "gh".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "required tool 'gh' is not available on PATH"
        );
    }

    #[test]
    fn tool_failed_display() {
        let e = DotctlError::ToolFailed {
            program: "git push".to_string(),
            code: 128,
            stderr: "remote rejected".to_string(),
        };
        assert!(e.to_string().contains("git push"));
        assert!(e.to_string().contains("exit 128"));
        assert!(e.to_string().contains("remote rejected"));
    }

    #[test]
    fn config_parse_display() {
        let e = DotctlError::ConfigParse {
            path: PathBuf::from("dotctl.yaml"),
            message: "mapping values are not allowed".to_string(),
        };
        assert!(e.to_string().contains("dotctl.yaml"));
        assert!(e.to_string().contains("mapping values"));
    }

    #[test]
    fn conflict_mentions_manual_resolution() {
        let e = DotctlError::ConflictRequiresManualResolution;
        assert!(e.to_string().contains("resolve them manually"));
    }

    #[test]
    fn io_has_source() {
        use std::error::Error as StdError;
        let e = DotctlError::io("/x", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/x"));
    }

    #[test]
    fn downcast_through_anyhow_context() {
        let err = anyhow::Error::from(DotctlError::ConflictRequiresManualResolution)
            .context("sync failed");
        assert!(matches!(
            err.downcast_ref::<DotctlError>(),
            Some(DotctlError::ConflictRequiresManualResolution)
        ));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<DotctlError>();
    }
}
