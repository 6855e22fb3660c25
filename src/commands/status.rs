//! Command: show the root, system, tooling and per-package state.
use anyhow::Result;
use std::collections::BTreeSet;

use super::Session;
use crate::exec::Executor;
use crate::logging::Log;
use crate::scan;

const fn checkmark(ok: bool) -> &'static str {
    if ok { "✓" } else { "✗" }
}

/// How a package directory relates to the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    /// Configured and eligible on this system.
    Deployable,
    /// Configured for other systems.
    OtherSystem,
    /// Present on disk but not configured.
    NotConfigured,
}

impl PackageStatus {
    /// Label shown by `status`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deployable => "✓ deployable",
            Self::OtherSystem => "- not for this system",
            Self::NotConfigured => "? not configured",
        }
    }
}

/// Status of every scanned package plus configured names with no directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Scanned packages, sorted.
    pub packages: Vec<(String, PackageStatus)>,
    /// Configured packages without a directory, sorted.
    pub orphaned: Vec<String>,
}

/// Classify the packages found under the root.
///
/// # Errors
///
/// Returns an error if the root cannot be listed.
pub fn package_report(session: &Session) -> Result<PackageReport> {
    let scanned = scan::scan(&session.root)?;
    let eligible: BTreeSet<String> = session
        .config
        .packages_for_system(session.system.as_str())
        .into_iter()
        .collect();

    let packages = scanned
        .iter()
        .map(|name| {
            let status = if session.config.package(name).is_none() {
                PackageStatus::NotConfigured
            } else if eligible.contains(name) {
                PackageStatus::Deployable
            } else {
                PackageStatus::OtherSystem
            };
            (name.clone(), status)
        })
        .collect();

    let orphaned = session
        .config
        .packages
        .keys()
        .filter(|name| !scanned.contains(name))
        .cloned()
        .collect();

    Ok(PackageReport { packages, orphaned })
}

/// Print the status overview.
///
/// # Errors
///
/// Returns an error if the root cannot be listed.
pub fn run(session: &Session, exec: &dyn Executor, log: &dyn Log) -> Result<()> {
    log.stage("Status");
    log.info(&format!("Dotfiles directory: {}", session.root.display()));
    log.info(&format!("Current system: {}", session.system));
    log.info(&format!("git available: {}", checkmark(exec.which("git"))));

    let gh = exec.which("gh");
    log.info(&format!("GitHub CLI available: {}", checkmark(gh)));
    if gh {
        let authenticated = exec
            .run_unchecked(&session.home, "gh", &["auth", "status"])
            .is_ok_and(|r| r.success);
        log.info(&format!(
            "GitHub authenticated: {}",
            checkmark(authenticated)
        ));
    }
    if let Some(remote) = session.config.github.as_ref().filter(|r| !r.repository.is_empty()) {
        log.info(&format!("GitHub repository: {}", remote.repository));
        log.info(&format!("GitHub branch: {}", remote.branch()));
    }

    let report = package_report(session)?;
    log.stage("Packages");
    if report.packages.is_empty() {
        log.info(&format!(
            "No package directories found in {}",
            session.root.display()
        ));
    }
    for (name, status) in &report.packages {
        log.info(&format!("{name}: {}", status.label()));
    }
    if !report.orphaned.is_empty() {
        log.warn(&format!(
            "Orphaned config entries: {}",
            report.orphaned.join(", ")
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::Fixture;
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::Level;

    #[test]
    fn classifies_packages_and_orphans() {
        let fx = Fixture::new();
        fx.package("vim");
        fx.package("tmux");
        fx.package("zsh");
        let mut session = fx.session("arch", false);
        session.config.add_package("vim", &["all".to_string()]);
        session
            .config
            .add_package("tmux", &["linux".to_string(), "macos".to_string()]);
        session.config.add_package("ghost", &[]);

        let report = package_report(&session).unwrap();
        assert_eq!(
            report.packages,
            vec![
                ("tmux".to_string(), PackageStatus::OtherSystem),
                ("vim".to_string(), PackageStatus::Deployable),
                ("zsh".to_string(), PackageStatus::NotConfigured),
            ]
        );
        assert_eq!(report.orphaned, vec!["ghost"]);
    }

    #[test]
    fn auth_is_only_checked_when_gh_is_present() {
        let fx = Fixture::new();
        let session = fx.session("arch", false);
        let exec = MockExecutor::new().with_tool("git");
        run(&session, &exec, &fx.log).unwrap();
        assert!(!exec.called("gh"));
        assert!(fx.log.contains(Level::Info, "GitHub CLI available: ✗"));
    }

    #[test]
    fn reports_remote_and_authentication() {
        let fx = Fixture::new();
        let mut session = fx.session("arch", false);
        session.config.set_remote("me/dots", None);
        let exec = MockExecutor::new().with_tool("gh");
        run(&session, &exec, &fx.log).unwrap();
        assert!(fx.log.contains(Level::Info, "GitHub authenticated: ✓"));
        assert!(fx.log.contains(Level::Info, "GitHub repository: me/dots"));
        assert!(fx.log.contains(Level::Info, "GitHub branch: main"));
    }
}
