//! Commands: `sync` and `pull`.
use anyhow::Result;

use super::Session;
use crate::exec::Executor;
use crate::git::{self, GitSync, PullOutcome, SyncOutcome};
use crate::logging::Log;

fn controller<'a>(
    session: &'a Session,
    exec: &'a dyn Executor,
    log: &'a dyn Log,
) -> Result<GitSync<'a>> {
    let remote = git::check_prerequisites(exec, &session.root, &session.config)?;
    Ok(GitSync {
        exec,
        root: &session.root,
        remote,
        dry_run: session.dry_run,
        log,
    })
}

/// Reconcile the root with its GitHub repository.
///
/// # Errors
///
/// Returns an error if a prerequisite is missing or any git step fails.
pub fn sync(session: &Session, exec: &dyn Executor, log: &dyn Log) -> Result<SyncOutcome> {
    controller(session, exec, log)?.sync()
}

/// Clone or update the root from its GitHub repository.
///
/// # Errors
///
/// Returns an error if a prerequisite is missing or any git step fails.
pub fn pull(session: &Session, exec: &dyn Executor, log: &dyn Log) -> Result<PullOutcome> {
    let outcome = controller(session, exec, log)?.pull()?;
    if outcome != PullOutcome::DryRun {
        log.info(&format!(
            "Dotfiles pulled into {}",
            session.root.display()
        ));
    }
    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::remote;
    use crate::commands::test_helpers::Fixture;
    use crate::exec::test_helpers::MockExecutor;

    #[test]
    fn sync_without_remote_fails_before_git() {
        let fx = Fixture::new();
        let session = fx.session("arch", false);
        let exec = MockExecutor::new().with_tool("gh");
        let err = sync(&session, &exec, &fx.log).unwrap_err();
        assert!(err.to_string().contains("github-repo"));
        assert!(!exec.called("git"));
    }

    #[test]
    fn pull_into_existing_repository() {
        let fx = Fixture::new();
        std::fs::create_dir(fx.root().join(".git")).unwrap();
        let mut session = fx.session("arch", false);
        session.config.set_remote("me/dots", None);
        let exec = MockExecutor::new().with_tool("gh");
        assert_eq!(pull(&session, &exec, &fx.log).unwrap(), PullOutcome::Pulled);
        assert!(exec.called("git pull origin main"));
    }

    #[test]
    fn pull_clones_after_github_repo_is_recorded() {
        let fx = Fixture::new();
        let mut session = fx.session("arch", false);
        remote::run(&mut session, "me/dots", None, &fx.log).unwrap();
        let staging = fx.tmp.path().join("dots.tmp");
        let exec = MockExecutor::new()
            .with_tool("gh")
            .writing("git clone", staging.join(".git/HEAD"), "ref: refs/heads/main\n");

        assert_eq!(pull(&session, &exec, &fx.log).unwrap(), PullOutcome::Cloned);
        assert!(exec.called("git clone https://github.com/me/dots.git"));
        assert!(fx.root().join(".git").is_dir());
        let reloaded = fx.session("arch", false);
        assert_eq!(reloaded.config.github.unwrap().repository, "me/dots");
    }

    #[test]
    fn pull_dry_run_after_github_repo_reports_clone() {
        let fx = Fixture::new();
        let mut session = fx.session("arch", false);
        remote::run(&mut session, "me/dots", None, &fx.log).unwrap();
        session.dry_run = true;
        let exec = MockExecutor::new().with_tool("gh");

        assert_eq!(pull(&session, &exec, &fx.log).unwrap(), PullOutcome::DryRun);
        assert!(!exec.called("git clone"));
        assert!(!fx.root().join(".git").exists());
    }
}
