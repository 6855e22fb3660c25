//! Commands: `version` and `completions`.
use anyhow::Result;
use clap::CommandFactory as _;
use std::io::Write as _;

use crate::cli::Cli;

/// Version string, preferring the one stamped in at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTCTL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<()> {
    writeln!(std::io::stdout().lock(), "dotctl {}", version())?;
    Ok(())
}

/// Write a completion script for `shell` to `out`.
pub fn completions(shell: clap_complete::Shell, out: &mut dyn std::io::Write) {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "dotctl", out);
}
