//! Moving unmanaged `~/.config` directories into the dotfiles root.
use anyhow::{Context as _, Result};
use std::path::Path;

use crate::config::Config;
use crate::error::DotctlError;
use crate::logging::Log;
use crate::platform::{ALL, KNOWN_TAGS};
use crate::resources::fs::{is_symlink, move_path};
use crate::resources::symlink::SymlinkResource;

/// Directories under `~/.config` that belong to the desktop, not the user.
const SKIP: [&str; 15] = [
    "pulse",
    "systemd",
    "dconf",
    "gconf",
    "ibus",
    "fontconfig",
    "gtk-2.0",
    "gtk-3.0",
    "gtk-4.0",
    "qt5ct",
    "qt6ct",
    "Trolltech.conf",
    "mimeapps.list",
    "user-dirs.dirs",
    "user-dirs.locale",
];

/// What to adopt and for which systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptRequest {
    /// Explicit package names; empty means every unmanaged directory.
    pub packages: Vec<String>,
    /// Systems to register the packages for.
    pub systems: Vec<String>,
}

impl AdoptRequest {
    /// Split command-line arguments.
    ///
    /// A first argument that is not a known system tag names a package and
    /// the rest are systems; otherwise every argument is a system.  Systems
    /// default to `all`.
    #[must_use]
    pub fn from_args(args: &[String]) -> Self {
        let (packages, mut systems) = match args.split_first() {
            Some((first, rest)) if !KNOWN_TAGS.contains(&first.as_str()) => {
                (vec![first.clone()], rest.to_vec())
            }
            _ => (Vec::new(), args.to_vec()),
        };
        if systems.is_empty() {
            systems.push(ALL.to_string());
        }
        Self { packages, systems }
    }
}

/// Inputs of an adoption run.
pub struct Context<'a> {
    /// Dotfiles root receiving the directories.
    pub root: &'a Path,
    /// Home directory; candidates come from `<home>/.config`.
    pub home: &'a Path,
    /// Report instead of mutating.
    pub dry_run: bool,
    /// Progress output.
    pub log: &'a dyn Log,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("home", &self.home)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Outcome of an adoption run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptReport {
    /// Directories selected for adoption.
    pub candidates: Vec<String>,
    /// Directories moved, linked and registered.
    pub adopted: Vec<String>,
    /// Directories that could not be adopted, with the reason.
    pub failed: Vec<(String, String)>,
}

impl AdoptReport {
    /// Whether the configuration was changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.adopted.is_empty()
    }
}

/// Links `~/.config/<name>` (second argument) to the moved directory.
type LinkBack = dyn Fn(&Path, &Path) -> Result<()>;

fn symlink_back(source: &Path, target: &Path) -> Result<()> {
    SymlinkResource::new(source.to_path_buf(), target.to_path_buf())
        .apply()
        .map(drop)
}

/// Adopt directories from `~/.config` according to `request`.
///
/// Registered packages are added to `config`; the caller saves it once.
///
/// # Errors
///
/// Returns an error if `~/.config` exists but cannot be listed.
pub fn adopt(ctx: &Context<'_>, request: &AdoptRequest, config: &mut Config) -> Result<AdoptReport> {
    adopt_with(ctx, request, config, &symlink_back)
}

fn adopt_with(
    ctx: &Context<'_>,
    request: &AdoptRequest,
    config: &mut Config,
    link: &LinkBack,
) -> Result<AdoptReport> {
    let config_dir = ctx.home.join(".config");
    if !config_dir.is_dir() {
        ctx.log.info("No ~/.config directory found");
        return Ok(AdoptReport::default());
    }

    let candidates = if request.packages.is_empty() {
        discover(&config_dir, config)?
    } else {
        select(&config_dir, &request.packages, config, ctx.log)
    };

    let mut report = AdoptReport {
        candidates,
        ..AdoptReport::default()
    };
    if report.candidates.is_empty() {
        ctx.log.info(if request.packages.is_empty() {
            "No new config directories found to adopt"
        } else {
            "No specified packages available to adopt"
        });
        return Ok(report);
    }

    ctx.log.stage(&format!(
        "Adopting {} for systems: {}",
        report.candidates.join(", "),
        request.systems.join(", ")
    ));
    if ctx.dry_run {
        for name in &report.candidates {
            ctx.log.dry_run(&format!(
                "would move {} to {} and link it back",
                config_dir.join(name).display(),
                ctx.root.join(name).display()
            ));
        }
        return Ok(report);
    }

    for name in &report.candidates {
        match adopt_one(ctx, &config_dir, name, link) {
            Ok(()) => {
                config.add_package(name, &request.systems);
                ctx.log.info(&format!("✓ Adopted {name}"));
                report.adopted.push(name.clone());
            }
            Err(e) => {
                ctx.log.warn(&format!("✗ Failed to adopt {name}: {e:#}"));
                report.failed.push((name.clone(), format!("{e:#}")));
            }
        }
    }
    ctx.log.info(&format!(
        "Successfully adopted {}/{} packages",
        report.adopted.len(),
        report.candidates.len()
    ));
    Ok(report)
}

/// Every real, unregistered directory in `config_dir` outside the skip list.
fn discover(config_dir: &Path, config: &Config) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(config_dir).map_err(|e| DotctlError::io(config_dir, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DotctlError::io(config_dir, e))?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if SKIP.contains(&name.as_str()) || config.package(&name).is_some() {
            continue;
        }
        found.push(name);
    }
    found.sort();
    Ok(found)
}

/// Explicitly named directories that can be adopted.
fn select(config_dir: &Path, names: &[String], config: &Config, log: &dyn Log) -> Vec<String> {
    let mut selected = Vec::new();
    for name in names {
        let path = config_dir.join(name);
        if config.package(name).is_some() {
            log.info(&format!("Package '{name}' is already managed"));
        } else if is_symlink(&path) {
            log.info(&format!("Package '{name}' is already a symlink"));
        } else if !path.is_dir() {
            log.info(&format!("Package '{name}' not found in ~/.config"));
        } else {
            selected.push(name.clone());
        }
    }
    selected
}

/// Move one directory into the root and link it back, undoing the move if
/// the link cannot be created.
fn adopt_one(ctx: &Context<'_>, config_dir: &Path, name: &str, link: &LinkBack) -> Result<()> {
    let original = config_dir.join(name);
    let destination = ctx.root.join(name);
    if destination.symlink_metadata().is_ok() {
        anyhow::bail!("{} already exists", destination.display());
    }
    std::fs::create_dir_all(ctx.root).map_err(|e| DotctlError::io(ctx.root, e))?;
    move_path(&original, &destination)?;

    if let Err(link_err) = link(&destination, &original) {
        if let Err(restore_err) = move_path(&destination, &original) {
            ctx.log.error(&format!(
                "could not restore {} from {}: {restore_err:#}; move it back manually",
                original.display(),
                destination.display()
            ));
        }
        return Err(link_err).context("link back into ~/.config");
    }
    Ok(())
}
