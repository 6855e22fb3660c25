//! Commands: `deploy` and `undeploy`.
use anyhow::Result;

use super::Session;
use crate::deploy::{self, Action, BatchReport};
use crate::logging::Log;

/// Deploy or undeploy `packages` (every eligible package when empty).
///
/// Individual failures only count against the summary, except when a single
/// package was named explicitly: then its failure is the command's failure.
///
/// # Errors
///
/// Returns an error if there is nothing to act on or the single named
/// package fails.
pub fn run(session: &Session, action: Action, packages: &[String], log: &dyn Log) -> Result<()> {
    let ctx = session.deploy_context(log);
    let report = deploy::run_batch(&ctx, action, packages)?;
    single_failure(&report, packages.len())
}

fn single_failure(report: &BatchReport, requested: usize) -> Result<()> {
    if requested != 1 {
        return Ok(());
    }
    match report.entries.first() {
        Some(entry) => match &entry.error {
            Some(message) => anyhow::bail!("{}: {message}", entry.name),
            None => Ok(()),
        },
        None => Ok(()),
    }
}
