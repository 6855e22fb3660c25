//! Commands: `add` and `remove`.
use anyhow::Result;

use super::Session;
use crate::logging::Log;
use crate::platform::ALL;

/// Register `name` for `systems` (default: all), overwriting any entry.
///
/// # Errors
///
/// Returns an error if the configuration cannot be saved.
pub fn add(session: &mut Session, name: &str, systems: &[String], log: &dyn Log) -> Result<()> {
    let shown = if systems.is_empty() {
        ALL.to_string()
    } else {
        systems.join(", ")
    };
    if session.dry_run {
        log.dry_run(&format!("would add package '{name}' for systems: {shown}"));
        return Ok(());
    }
    session.config.add_package(name, systems);
    session.save()?;
    log.info(&format!("Added package '{name}' for systems: {shown}"));
    Ok(())
}

/// Unregister `name`.  An unknown package is reported, not an error.
///
/// # Errors
///
/// Returns an error if the configuration cannot be saved.
pub fn remove(session: &mut Session, name: &str, log: &dyn Log) -> Result<()> {
    if session.config.package(name).is_none() {
        log.info(&format!("Package '{name}' not found in configuration"));
        return Ok(());
    }
    if session.dry_run {
        log.dry_run(&format!("would remove package '{name}' from configuration"));
        return Ok(());
    }
    session.config.remove_package(name);
    session.save()?;
    log.info(&format!("Removed package '{name}' from configuration"));
    Ok(())
}
