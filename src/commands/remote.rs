//! Command: `github-repo`.
use anyhow::Result;

use super::Session;
use crate::config::DEFAULT_BRANCH;
use crate::logging::Log;

/// Record the GitHub repository (and branch, default `main`) to sync with.
///
/// # Errors
///
/// Returns an error if the repository is not in `owner/repo` form or the
/// configuration cannot be saved.
pub fn run(session: &mut Session, repository: &str, branch: Option<&str>, log: &dyn Log) -> Result<()> {
    if !is_owner_repo(repository) {
        anyhow::bail!("invalid repository '{repository}'; expected owner/repo");
    }
    let branch = branch.filter(|b| !b.is_empty()).unwrap_or(DEFAULT_BRANCH);
    if session.dry_run {
        log.dry_run(&format!(
            "would set GitHub repository to '{repository}' (branch: {branch})"
        ));
        return Ok(());
    }
    session.config.set_remote(repository, Some(branch));
    session.save()?;
    log.info(&format!(
        "Set GitHub repository to '{repository}' (branch: {branch})"
    ));
    Ok(())
}

fn is_owner_repo(value: &str) -> bool {
    value
        .split_once('/')
        .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
}
