//! Command: adopt `~/.config` directories.
use anyhow::Result;

use super::Session;
use crate::adopt::{self, AdoptRequest};
use crate::logging::Log;

/// Adopt directories selected by `args` and save the configuration once.
///
/// # Errors
///
/// Returns an error if `~/.config` cannot be listed, any candidate fails,
/// or the configuration cannot be saved.
pub fn run(session: &mut Session, args: &[String], log: &dyn Log) -> Result<()> {
    let request = AdoptRequest::from_args(args);
    let ctx = adopt::Context {
        root: &session.root,
        home: &session.home,
        dry_run: session.dry_run,
        log,
    };
    let report = adopt::adopt(&ctx, &request, &mut session.config)?;
    if report.changed() {
        session.save()?;
        log.info(&format!(
            "Adopted {} package(s): {}",
            report.adopted.len(),
            report.adopted.join(", ")
        ));
    }
    if !report.failed.is_empty() {
        let names: Vec<&str> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
        anyhow::bail!("failed to adopt: {}", names.join(", "));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_helpers::Fixture;

    #[cfg(unix)]
    #[test]
    fn adopted_package_is_saved() {
        let fx = Fixture::new();
        let app = fx.home().join(".config").join("foo");
        std::fs::create_dir_all(&app).unwrap();
        std::fs::write(app.join("foo.conf"), "x=1").unwrap();

        let mut session = fx.session("arch", false);
        run(&mut session, &["foo".to_string(), "arch".to_string()], &fx.log).unwrap();

        assert!(fx.root().join("foo").join("foo.conf").is_file());
        let reloaded = fx.session("arch", false);
        assert_eq!(reloaded.config.packages_for_system("arch"), vec!["foo"]);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let fx = Fixture::new();
        std::fs::create_dir_all(fx.home().join(".config").join("foo")).unwrap();
        let mut session = fx.session("arch", true);
        run(&mut session, &[], &fx.log).unwrap();
        assert!(!session.store.exists());
        assert!(fx.home().join(".config").join("foo").is_dir());
    }
}
