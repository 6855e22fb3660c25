//! Subprocess execution behind an [`Executor`] seam.
//!
//! Only the git controller and the status command shell out; they do
//! so through [`Executor`] so that tests can script the responses of `git`
//! and `gh` without touching a real repository.
use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::DotctlError;

/// Result of a command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, absent when terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl ExecResult {
    /// Convert a non-zero exit into [`DotctlError::ToolFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the process did not succeed.
    pub fn check(self, label: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let diagnostic = if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        };
        Err(DotctlError::ToolFailed {
            program: label.to_string(),
            code: self.code.unwrap_or(-1),
            stderr: diagnostic,
        }
        .into())
    }
}

/// Abstraction over process spawning.
pub trait Executor: std::fmt::Debug {
    /// Run `program` with `args` in `dir`, returning the result regardless of
    /// the exit status.
    ///
    /// # Errors
    ///
    /// Returns [`DotctlError::ToolUnavailable`] if the program cannot be
    /// found, or another error if it cannot be spawned.
    fn run_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Check if a program is available on PATH.
    fn which(&self, program: &str) -> bool;

    /// Run `program` in `dir` and fail on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns [`DotctlError::ToolFailed`] with the captured output when the
    /// program exits non-zero.
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        let label = command_label(program, args);
        self.run_unchecked(dir, program, args)?.check(&label)
    }
}

/// Executor that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        match Command::new(program).args(args).current_dir(dir).output() {
            Ok(output) => Ok(ExecResult::from(output)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && dir.is_dir() => {
                Err(DotctlError::ToolUnavailable {
                    program: program.to_string(),
                }
                .into())
            }
            Err(e) => Err(DotctlError::io(dir, e).into()),
        }
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render `program args...` for diagnostics.
#[must_use]
pub fn command_label(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}
