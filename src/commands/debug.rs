//! Command: diagnostics for the root, configuration and system detection.
use super::Session;
use crate::config::PackageEntry;
use crate::logging::Log;
use crate::platform::{self, OS_RELEASE};

/// Systems whose eligible package lists are always shown.
const REPORTED_SYSTEMS: [&str; 4] = ["arch", "linux", "macos", "ubuntu"];

fn describe(entry: &PackageEntry) -> String {
    let PackageEntry::Detailed(spec) = entry else {
        return entry.systems().join(", ");
    };
    let mut parts = vec![if spec.systems.is_empty() {
        "systems: (any)".to_string()
    } else {
        format!("systems: [{}]", spec.systems.join(", "))
    }];
    if spec.home {
        parts.push("home".to_string());
    }
    if let Some(description) = &spec.description {
        parts.push(format!("\"{description}\""));
    }
    parts.join(", ")
}

/// Print everything useful for diagnosing a misbehaving setup.
///
/// Never fails on missing files; each problem is reported inline.
pub fn run(session: &Session, log: &dyn Log) {
    log.stage("Filesystem");
    match std::env::current_dir() {
        Ok(cwd) => log.info(&format!("Current working directory: {}", cwd.display())),
        Err(e) => log.warn(&format!("cannot read current directory: {e}")),
    }
    log.info(&format!("Dotfiles directory: {}", session.root.display()));
    match std::fs::metadata(&session.root) {
        Ok(meta) => log.info(&format!("Dotfiles directory is a directory: {}", meta.is_dir())),
        Err(e) => log.warn(&format!("Dotfiles directory: {e}")),
    }

    let config_path = session.store.path();
    log.info(&format!("Config file path: {}", config_path.display()));
    match std::fs::metadata(&config_path) {
        Ok(meta) => log.info(&format!("Config file size: {} bytes", meta.len())),
        Err(e) => log.info(&format!("Config file: {e}")),
    }
    if session.store.legacy_path().exists() {
        log.info(&format!(
            "Legacy config present: {}",
            session.store.legacy_path().display()
        ));
    }

    log.stage("System detection");
    log.info(&format!("Platform: {}", std::env::consts::OS));
    log.info(&format!("Detected system: {}", session.system));
    if cfg!(target_os = "linux") {
        match platform::read_os_release(std::path::Path::new(OS_RELEASE)) {
            Some(contents) => {
                log.info(&format!("{OS_RELEASE}:"));
                for line in contents.lines() {
                    log.info(&format!("  {line}"));
                }
            }
            None => log.warn(&format!("cannot read {OS_RELEASE}")),
        }
    }

    log.stage("Configuration");
    log.info(&format!(
        "Exclusion patterns: {}",
        session.config.global_excludes.join(", ")
    ));
    if let Some(options) = &session.config.stow_options {
        log.info(&format!("Legacy stow options: {}", options.join(" ")));
    }
    log.info(&format!(
        "Total packages in config: {}",
        session.config.packages.len()
    ));
    for (name, entry) in &session.config.packages {
        log.info(&format!(
            "{name}: {} -> deployable for {}: {}",
            describe(entry),
            session.system,
            entry.is_eligible(session.system.as_str())
        ));
    }

    for system in REPORTED_SYSTEMS {
        let packages = session.config.packages_for_system(system);
        log.info(&format!(
            "Packages for {system}: {} ({})",
            packages.len(),
            packages.join(", ")
        ));
    }
}
