//! Reconciling the dotfiles root with its GitHub repository.
//!
//! `sync` fetches, stashes local changes when the branch is behind, pulls,
//! restores the stash, then commits and pushes whatever changed.  `pull`
//! clones or fast-forwards.  All process calls go through [`Executor`].
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::config::store::{CONFIG_FILE, LEGACY_CONFIG_FILE};
use crate::config::{Config, RemoteRepo};
use crate::error::DotctlError;
use crate::exec::{ExecResult, Executor, command_label};
use crate::logging::Log;

/// How a `sync` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The root was turned into a repository; the next run syncs.
    Initialized,
    /// Steps were reported, nothing ran.
    DryRun,
    /// Local and remote already agree.
    NothingToSync,
    /// A commit was created and pushed.
    Pushed,
}

/// How a `pull` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// The repository was cloned into the root.
    Cloned,
    /// The existing repository was updated.
    Pulled,
    /// Steps were reported, nothing ran.
    DryRun,
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Verify that a remote is configured and `gh` is installed and logged in.
///
/// # Errors
///
/// Returns an error naming the missing prerequisite.
pub fn check_prerequisites<'c>(
    exec: &dyn Executor,
    root: &Path,
    config: &'c Config,
) -> Result<&'c RemoteRepo> {
    let remote = config
        .github
        .as_ref()
        .filter(|r| !r.repository.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no GitHub repository configured; use 'dotctl github-repo <owner/repo>' first"
            )
        })?;
    if !exec.which("gh") {
        return Err(DotctlError::ToolUnavailable {
            program: "gh".to_string(),
        })
        .context("install the GitHub CLI from https://cli.github.com/");
    }
    let dir = existing_dir(root);
    let auth = exec.run_unchecked(&dir, "gh", &["auth", "status"])?;
    if !auth.success {
        anyhow::bail!("GitHub CLI is not authenticated; run 'gh auth login' first");
    }
    Ok(remote)
}

/// `root` if it exists, else its nearest existing ancestor.
fn existing_dir(root: &Path) -> PathBuf {
    root.ancestors()
        .find(|p| p.is_dir())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Git operations on one dotfiles root.
pub struct GitSync<'a> {
    /// Process runner.
    pub exec: &'a dyn Executor,
    /// Dotfiles root (the working tree).
    pub root: &'a Path,
    /// Remote repository.
    pub remote: &'a RemoteRepo,
    /// Report instead of running.
    pub dry_run: bool,
    /// Progress output.
    pub log: &'a dyn Log,
}

impl std::fmt::Debug for GitSync<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitSync")
            .field("exec", &self.exec)
            .field("root", &self.root)
            .field("remote", &self.remote)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl GitSync<'_> {
    fn git(&self, args: &[&str]) -> Result<ExecResult> {
        self.log.debug(&command_label("git", args));
        self.exec.run(self.root, "git", args)
    }

    /// Run a `--quiet` diff: exit 0 means no changes, exit 1 means changes.
    fn quiet_diff(&self, args: &[&str]) -> Result<bool> {
        let result = self.exec.run_unchecked(self.root, "git", args)?;
        match result.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => result.check(&command_label("git", args)).map(|_| false),
        }
    }

    fn is_repository(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Staged, unstaged or untracked changes in the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails unexpectedly.
    pub fn has_local_changes(&self) -> Result<bool> {
        if self.quiet_diff(&["diff", "--cached", "--quiet"])? {
            return Ok(true);
        }
        if self.quiet_diff(&["diff", "--quiet"])? {
            return Ok(true);
        }
        let untracked = self.git(&["ls-files", "--others", "--exclude-standard"])?;
        Ok(!untracked.stdout.trim().is_empty())
    }

    /// Whether `HEAD` differs from the fetched remote branch.
    ///
    /// # Errors
    ///
    /// Returns an error if either revision cannot be resolved.
    pub fn is_behind(&self) -> Result<bool> {
        let local = self.git(&["rev-parse", "HEAD"])?;
        let upstream_ref = format!("origin/{}", self.remote.branch());
        let upstream = self.git(&["rev-parse", &upstream_ref])?;
        Ok(local.stdout.trim() != upstream.stdout.trim())
    }

    fn has_conflicts(&self) -> bool {
        self.git(&["diff", "--name-only", "--diff-filter=U"])
            .is_ok_and(|r| !r.stdout.trim().is_empty())
    }

    fn initialize(&self) -> Result<()> {
        let url = self.remote.url();
        if self.dry_run {
            self.log.dry_run(&format!(
                "would initialize a git repository in {}",
                self.root.display()
            ));
            self.log.dry_run(&format!("would add remote origin {url}"));
            return Ok(());
        }
        self.log.info(&format!(
            "Initializing git repository in {}",
            self.root.display()
        ));
        std::fs::create_dir_all(self.root).map_err(|e| DotctlError::io(self.root, e))?;
        self.git(&["init"]).context("initialize git repository")?;
        self.git(&["remote", "add", "origin", &url])
            .context("add remote origin")?;
        self.log
            .info("Repository initialized; run 'dotctl sync' again to synchronize");
        Ok(())
    }

    /// Reconcile the working tree with the remote and push local changes.
    ///
    /// # Errors
    ///
    /// Returns [`DotctlError::ConflictRequiresManualResolution`] when the
    /// restored stash conflicts, or the first failing git step otherwise.
    pub fn sync(&self) -> Result<SyncOutcome> {
        if !self.is_repository() {
            self.initialize()?;
            return Ok(SyncOutcome::Initialized);
        }

        let branch = self.remote.branch();
        if self.dry_run {
            for step in [
                format!("would fetch origin {branch}"),
                "would check for local changes".to_string(),
                "would stash local changes if behind".to_string(),
                format!("would pull origin {branch}"),
                "would restore stashed changes".to_string(),
                "would stage all files".to_string(),
                "would commit changes".to_string(),
                format!("would push to {}:{branch}", self.remote.repository),
            ] {
                self.log.dry_run(&step);
            }
            return Ok(SyncOutcome::DryRun);
        }

        self.log.stage(&format!(
            "Syncing with GitHub repository {}",
            self.remote.repository
        ));
        self.git(&["fetch", "origin", branch])
            .context("fetch from upstream")?;

        let dirty = self
            .has_local_changes()
            .context("check for local changes")?;
        let behind = self.is_behind().context("check upstream status")?;
        self.log
            .debug(&format!("local changes: {dirty}, behind upstream: {behind}"));

        let stashed = dirty && behind;
        if stashed {
            self.log.info("Local changes detected, stashing before pull");
            let message = format!("dotctl-sync-stash-{}", timestamp());
            self.git(&["stash", "push", "-m", &message])
                .context("stash local changes")?;
        }

        if behind {
            self.log.info("Pulling upstream changes");
            if let Err(e) = self.git(&["pull", "origin", branch]) {
                if stashed {
                    self.log.warn("Pull failed, restoring stashed changes");
                    if let Err(pop) = self.git(&["stash", "pop"]) {
                        self.log.warn(&format!("could not restore stash: {pop:#}"));
                    }
                }
                return Err(e).context("pull from upstream");
            }
        }

        if stashed {
            self.log.info("Restoring local changes");
            if let Err(e) = self.git(&["stash", "pop"]) {
                if self.has_conflicts() {
                    return Err(DotctlError::ConflictRequiresManualResolution.into());
                }
                return Err(e).context("restore stashed changes");
            }
        }

        self.git(&["add", "."]).context("stage files")?;
        if !self.quiet_diff(&["diff", "--cached", "--quiet"])? {
            self.log.info("Repository is up to date, no changes to sync");
            return Ok(SyncOutcome::NothingToSync);
        }

        let message = format!("Update dotfiles - {}", timestamp());
        self.git(&["commit", "-m", &message])
            .context("commit changes")?;
        self.git(&["push", "origin", branch])
            .context("push to GitHub")?;
        self.log.info(&format!(
            "Synced with GitHub repository {}",
            self.remote.repository
        ));
        Ok(SyncOutcome::Pushed)
    }

    /// Clone the repository into the root, or pull into an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is a non-empty directory without a
    /// repository, or if git fails.
    pub fn pull(&self) -> Result<PullOutcome> {
        if self.is_repository() {
            let branch = self.remote.branch();
            if self.dry_run {
                self.log.dry_run(&format!(
                    "would pull from {}:{branch}",
                    self.remote.repository
                ));
                return Ok(PullOutcome::DryRun);
            }
            self.log.stage(&format!(
                "Pulling from GitHub repository {}",
                self.remote.repository
            ));
            self.git(&["pull", "origin", branch])
                .context("pull from GitHub")?;
            return Ok(PullOutcome::Pulled);
        }
        self.clone_into_root()
    }

    fn clone_into_root(&self) -> Result<PullOutcome> {
        if self.dry_run {
            self.log.dry_run(&format!(
                "would clone {} to {}",
                self.remote.url(),
                self.root.display()
            ));
            return Ok(PullOutcome::DryRun);
        }
        let Some(local_configs) = config_only_entries(self.root)? else {
            anyhow::bail!(
                "{} exists and is not a git repository; move its contents aside before pulling, \
                 or run 'dotctl sync' to initialize it in place",
                self.root.display()
            );
        };
        let staging = staging_path(self.root);
        if staging.symlink_metadata().is_ok() {
            anyhow::bail!(
                "{} already exists; remove it and try again",
                staging.display()
            );
        }

        self.log
            .stage(&format!("Cloning repository {}", self.remote.repository));
        let parent = existing_dir(self.root);
        let url = self.remote.url();
        let staging_arg = staging.to_string_lossy();
        self.exec
            .run(&parent, "git", &["clone", &url, &staging_arg])
            .context("clone repository")?;

        let clone_has_config = CONFIG_FILES.iter().any(|f| staging.join(f).exists());
        for file in &local_configs {
            if clone_has_config {
                self.log.debug(&format!(
                    "discarding local {} in favor of the cloned configuration",
                    file.display()
                ));
                std::fs::remove_file(file).map_err(|e| DotctlError::io(file, e))?;
            } else if let Some(name) = file.file_name() {
                self.log
                    .info(&format!("Keeping local {}", name.to_string_lossy()));
                let target = staging.join(name);
                std::fs::rename(file, &target).map_err(|e| DotctlError::io(file, e))?;
            }
        }

        if self.root.exists() {
            std::fs::remove_dir(self.root).map_err(|e| DotctlError::io(self.root, e))?;
        }
        std::fs::rename(&staging, self.root)
            .map_err(|e| DotctlError::io(&staging, e))
            .context("move cloned repository into place")?;
        Ok(PullOutcome::Cloned)
    }
}

/// Configuration files that may sit in a root before its first clone.
const CONFIG_FILES: [&str; 2] = [CONFIG_FILE, LEGACY_CONFIG_FILE];

/// Sibling path `<root>.tmp` used while cloning.
fn staging_path(root: &Path) -> PathBuf {
    let mut name = root.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    root.with_file_name(name)
}

/// The configuration files in `path` when it holds nothing else.
///
/// `None` means the directory has other content and must not be replaced.
fn config_only_entries(path: &Path) -> Result<Option<Vec<PathBuf>>> {
    if !path.exists() {
        return Ok(Some(Vec::new()));
    }
    let mut configs = Vec::new();
    for entry in std::fs::read_dir(path).map_err(|e| DotctlError::io(path, e))? {
        let entry = entry.map_err(|e| DotctlError::io(path, e))?;
        let is_config = entry.file_type().as_ref().is_ok_and(std::fs::FileType::is_file)
            && CONFIG_FILES.iter().any(|f| entry.file_name() == *f);
        if !is_config {
            return Ok(None);
        }
        configs.push(entry.path());
    }
    configs.sort();
    Ok(Some(configs))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::{Level, RecordingLog};
    use std::fs;

    fn remote() -> RemoteRepo {
        RemoteRepo {
            repository: "me/dots".to_string(),
            branch: None,
        }
    }

    fn repo() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        tmp
    }

    fn sync_with(exec: &MockExecutor, root: &Path, dry_run: bool) -> (Result<SyncOutcome>, RecordingLog) {
        let log = RecordingLog::default();
        let remote = remote();
        let git = GitSync {
            exec,
            root,
            remote: &remote,
            dry_run,
            log: &log,
        };
        let outcome = git.sync();
        (outcome, log)
    }

    #[test]
    fn prerequisites_require_remote() {
        let exec = MockExecutor::new().with_tool("gh");
        let err = check_prerequisites(&exec, Path::new("."), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("github-repo"));
    }

    #[test]
    fn prerequisites_require_gh() {
        let mut config = Config::default();
        config.set_remote("me/dots", None);
        let err = check_prerequisites(&MockExecutor::new(), Path::new("."), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DotctlError>(),
            Some(DotctlError::ToolUnavailable { .. })
        ));
    }

    #[test]
    fn prerequisites_require_authentication() {
        let mut config = Config::default();
        config.set_remote("me/dots", None);
        let exec = MockExecutor::new()
            .with_tool("gh")
            .on("gh auth status", 1, "");
        let err = check_prerequisites(&exec, Path::new("."), &config).unwrap_err();
        assert!(err.to_string().contains("gh auth login"));
    }

    #[test]
    fn prerequisites_return_remote() {
        let mut config = Config::default();
        config.set_remote("me/dots", Some("trunk"));
        let exec = MockExecutor::new().with_tool("gh");
        let remote = check_prerequisites(&exec, Path::new("."), &config).unwrap();
        assert_eq!(remote.branch(), "trunk");
        assert!(exec.called("gh auth status"));
    }

    #[test]
    fn sync_without_repository_initializes_and_stops() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert_eq!(outcome.unwrap(), SyncOutcome::Initialized);
        assert_eq!(
            exec.calls(),
            vec![
                "git init",
                "git remote add origin https://github.com/me/dots.git"
            ]
        );
    }

    #[test]
    fn sync_dry_run_runs_nothing() {
        let tmp = repo();
        let exec = MockExecutor::new();
        let (outcome, log) = sync_with(&exec, tmp.path(), true);
        assert_eq!(outcome.unwrap(), SyncOutcome::DryRun);
        assert!(exec.calls().is_empty());
        assert!(log.contains(Level::DryRun, "would push to me/dots:main"));
    }

    #[test]
    fn sync_up_to_date_and_clean_pushes_nothing() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "abc\n");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert_eq!(outcome.unwrap(), SyncOutcome::NothingToSync);
        assert!(!exec.called("git stash"));
        assert!(!exec.called("git pull"));
        assert!(!exec.called("git commit"));
        assert!(!exec.called("git push"));
    }

    #[test]
    fn sync_dirty_and_behind_stashes_pulls_and_pushes() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git diff --cached --quiet", 1, "")
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert_eq!(outcome.unwrap(), SyncOutcome::Pushed);

        let calls: Vec<String> = exec
            .calls()
            .into_iter()
            .filter(|c| !c.starts_with("git diff") && !c.starts_with("git rev-parse"))
            .map(|c| {
                if c.starts_with("git stash push") {
                    "git stash push".to_string()
                } else if c.starts_with("git commit") {
                    "git commit".to_string()
                } else {
                    c
                }
            })
            .collect();
        assert_eq!(
            calls,
            vec![
                "git fetch origin main",
                "git stash push",
                "git pull origin main",
                "git stash pop",
                "git add .",
                "git commit",
                "git push origin main",
            ]
        );
        assert!(exec.called("git stash push -m dotctl-sync-stash-"));
        assert!(exec.called("git commit -m Update dotfiles - "));
    }

    #[test]
    fn sync_clean_but_behind_pulls_without_stash() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert_eq!(outcome.unwrap(), SyncOutcome::NothingToSync);
        assert!(exec.called("git pull origin main"));
        assert!(!exec.called("git stash"));
    }

    #[test]
    fn sync_untracked_files_count_as_dirty() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git ls-files --others", 0, "new.conf\n")
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n");
        let (_outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert!(exec.called("git stash push"));
    }

    #[test]
    fn sync_stash_conflict_requires_manual_resolution() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git diff --quiet", 1, "")
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n")
            .on("git stash pop", 1, "")
            .on("git diff --name-only --diff-filter=U", 0, "zshrc\n");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        let err = outcome.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DotctlError>(),
            Some(DotctlError::ConflictRequiresManualResolution)
        ));
        assert!(!exec.called("git commit"));
    }

    #[test]
    fn sync_stash_pop_failure_without_conflicts_is_generic() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git diff --quiet", 1, "")
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n")
            .on("git stash pop", 1, "");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        let err = outcome.unwrap_err();
        assert!(!matches!(
            err.downcast_ref::<DotctlError>(),
            Some(DotctlError::ConflictRequiresManualResolution)
        ));
        assert!(format!("{err:#}").contains("restore stashed changes"));
    }

    #[test]
    fn sync_pull_failure_restores_stash() {
        let tmp = repo();
        let exec = MockExecutor::new()
            .on("git diff --quiet", 1, "")
            .on("git rev-parse HEAD", 0, "abc\n")
            .on("git rev-parse origin/main", 0, "def\n")
            .on("git pull", 1, "");
        let (outcome, log) = sync_with(&exec, tmp.path(), false);
        assert!(format!("{:#}", outcome.unwrap_err()).contains("pull from upstream"));
        assert!(exec.called("git stash pop"));
        assert!(log.contains(Level::Warn, "restoring stashed changes"));
    }

    #[test]
    fn sync_unexpected_diff_exit_is_an_error() {
        let tmp = repo();
        let exec = MockExecutor::new().on("git diff --cached --quiet", 128, "");
        let (outcome, _log) = sync_with(&exec, tmp.path(), false);
        assert!(outcome.is_err());
        assert!(!exec.called("git add"));
    }

    #[test]
    fn pull_existing_repository() {
        let tmp = repo();
        let exec = MockExecutor::new();
        let log = RecordingLog::default();
        let remote = remote();
        let git = GitSync {
            exec: &exec,
            root: tmp.path(),
            remote: &remote,
            dry_run: false,
            log: &log,
        };
        assert_eq!(git.pull().unwrap(), PullOutcome::Pulled);
        assert_eq!(exec.calls(), vec!["git pull origin main"]);
    }

    fn pull_with(exec: &MockExecutor, root: &Path, dry_run: bool) -> (Result<PullOutcome>, RecordingLog) {
        let log = RecordingLog::default();
        let remote = remote();
        let git = GitSync {
            exec,
            root,
            remote: &remote,
            dry_run,
            log: &log,
        };
        let outcome = git.pull();
        (outcome, log)
    }

    #[test]
    fn pull_refuses_root_with_content_besides_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("dotctl.yaml"), "packages: {}\n").unwrap();
        fs::create_dir(tmp.path().join("vim")).unwrap();
        let exec = MockExecutor::new();
        let (outcome, _log) = pull_with(&exec, tmp.path(), false);
        assert!(outcome.unwrap_err().to_string().contains("not a git repository"));
        assert!(exec.calls().is_empty());
        assert!(tmp.path().join("vim").is_dir());
    }

    #[test]
    fn pull_clones_over_root_holding_only_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("dots");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("dotctl.yaml"), "github:\n  repository: me/dots\n").unwrap();
        let staging = tmp.path().join("dots.tmp");
        let exec = MockExecutor::new()
            .writing("git clone", staging.join(".git/HEAD"), "ref: refs/heads/main\n")
            .writing("git clone", staging.join("vim/.vimrc"), "set nu\n");

        let (outcome, log) = pull_with(&exec, &root, false);
        assert_eq!(outcome.unwrap(), PullOutcome::Cloned);
        assert_eq!(
            exec.calls(),
            vec![format!(
                "git clone https://github.com/me/dots.git {}",
                staging.display()
            )]
        );
        assert!(root.join(".git/HEAD").is_file());
        assert!(root.join("vim/.vimrc").is_file());
        assert_eq!(
            fs::read_to_string(root.join("dotctl.yaml")).unwrap(),
            "github:\n  repository: me/dots\n"
        );
        assert!(!staging.exists());
        assert!(log.contains(Level::Info, "Keeping local dotctl.yaml"));
    }

    #[test]
    fn pull_prefers_configuration_from_the_clone() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("dots");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("dotctl.json"), r#"{"github":{"repository":"me/dots"}}"#).unwrap();
        let staging = tmp.path().join("dots.tmp");
        let exec = MockExecutor::new()
            .writing("git clone", staging.join(".git/HEAD"), "ref: refs/heads/main\n")
            .writing("git clone", staging.join("dotctl.yaml"), "packages:\n  vim: all\n");

        let (outcome, _log) = pull_with(&exec, &root, false);
        assert_eq!(outcome.unwrap(), PullOutcome::Cloned);
        assert_eq!(
            fs::read_to_string(root.join("dotctl.yaml")).unwrap(),
            "packages:\n  vim: all\n"
        );
        assert!(!root.join("dotctl.json").exists());
    }

    #[test]
    fn pull_refuses_stale_staging_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("dots");
        fs::create_dir(tmp.path().join("dots.tmp")).unwrap();
        let exec = MockExecutor::new();
        let (outcome, _log) = pull_with(&exec, &root, false);
        assert!(outcome.unwrap_err().to_string().contains("already exists"));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn pull_dry_run_reports_clone_even_when_root_has_content() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("vim")).unwrap();
        let exec = MockExecutor::new();
        let (outcome, log) = pull_with(&exec, tmp.path(), true);
        assert_eq!(outcome.unwrap(), PullOutcome::DryRun);
        assert!(exec.calls().is_empty());
        assert!(log.contains(Level::DryRun, "would clone"));
    }

    #[test]
    fn pull_dry_run_reports_clone() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("dots");
        let exec = MockExecutor::new();
        let log = RecordingLog::default();
        let remote = remote();
        let git = GitSync {
            exec: &exec,
            root: &root,
            remote: &remote,
            dry_run: true,
            log: &log,
        };
        assert_eq!(git.pull().unwrap(), PullOutcome::DryRun);
        assert!(exec.calls().is_empty());
        assert!(log.contains(Level::DryRun, "would clone https://github.com/me/dots.git"));
        assert!(!root.exists());
    }

    #[test]
    fn staging_path_is_sibling() {
        assert_eq!(
            staging_path(Path::new("/home/u/.dotfiles")),
            PathBuf::from("/home/u/.dotfiles.tmp")
        );
    }
}
