//! Command: build a configuration from the package directories on disk.
use anyhow::{Context as _, Result};

use super::Session;
use crate::config::PackageEntry;
use crate::logging::Log;
use crate::scan;

/// Register every scanned package for the current system.
///
/// An existing configuration is left alone.
///
/// # Errors
///
/// Returns an error if the root cannot be scanned or the configuration
/// cannot be saved.
pub fn run(session: &mut Session, log: &dyn Log) -> Result<()> {
    if session.store.exists() {
        log.info(&format!(
            "Configuration file already exists at {}",
            session.store.path().display()
        ));
        log.info("Run 'dotctl status' to see the current configuration");
        return Ok(());
    }

    let packages = scan::scan(&session.root).context("scan packages")?;
    if packages.is_empty() {
        log.info(&format!(
            "No package directories found in {}",
            session.root.display()
        ));
        log.info("Create package directories first, then run 'dotctl init'");
        return Ok(());
    }

    if session.dry_run {
        log.dry_run(&format!(
            "would create configuration with packages: {}",
            packages.join(", ")
        ));
        log.dry_run(&format!(
            "all packages would be configured for {}",
            session.system
        ));
        return Ok(());
    }

    let tag = session.system.to_string();
    for name in &packages {
        session
            .config
            .packages
            .insert(name.clone(), PackageEntry::Simple(tag.clone()));
    }
    session.save()?;

    log.info(&format!(
        "✓ Initialized configuration with {} packages for system '{}'",
        packages.len(),
        session.system
    ));
    log.info(&format!("Packages configured: {}", packages.join(", ")));
    log.info(&format!(
        "Configuration saved to {}",
        session.store.path().display()
    ));
    log.info("Run 'dotctl deploy' to deploy your dotfiles");
    Ok(())
}
