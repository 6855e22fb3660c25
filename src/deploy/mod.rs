//! Deploying packages as symlinks and removing them again.
//!
//! The filesystem is the only record of what is deployed: every operation
//! recomputes the destination with [`LinkTarget::resolve`] and inspects what
//! exists there.
pub mod target;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

pub use target::LinkTarget;

use crate::config::Config;
use crate::error::DotctlError;
use crate::logging::Log;
use crate::platform::SystemTag;
use crate::resources::fs::{ensure_parent_dir, entry_exists, is_symlink, remove_existing};
use crate::resources::symlink::SymlinkResource;
use crate::resources::{ResourceChange, ResourceState};
use crate::template;

/// Everything a deployment needs to know.
pub struct Context<'a> {
    /// Dotfiles root holding the package directories.
    pub root: &'a Path,
    /// Home directory receiving the links.
    pub home: &'a Path,
    /// Detected system.
    pub system: &'a SystemTag,
    /// Loaded configuration.
    pub config: &'a Config,
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
            .field("system", &self.system)
            .field("config", &"<Config>")
            .field("dry_run", &self.dry_run)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl Context<'_> {
    fn target(&self, name: &str) -> LinkTarget {
        LinkTarget::resolve(name, self.config.package(name), self.home)
    }

    fn source(&self, name: &str) -> Result<PathBuf> {
        let source = self.root.join(name);
        if !source.exists() {
            return Err(DotctlError::NotFound {
                what: format!("package '{name}'"),
                path: source,
            }
            .into());
        }
        Ok(source)
    }
}

/// Link package `name` into the home directory.
///
/// # Errors
///
/// Returns an error if the package directory is missing, a template fails
/// to render, or a link cannot be created.
pub fn deploy(ctx: &Context<'_>, name: &str) -> Result<()> {
    let source = ctx.source(name)?;
    match ctx.target(name) {
        LinkTarget::Directory { link } => deploy_directory(ctx, &source, &link),
        LinkTarget::PerFile { home } => deploy_files(ctx, &source, &home),
    }
    .with_context(|| format!("deploying {name}"))
}

fn deploy_directory(ctx: &Context<'_>, source: &Path, link: &Path) -> Result<()> {
    let resource = SymlinkResource::new(source.to_path_buf(), link.to_path_buf());
    if ctx.dry_run {
        ctx.log
            .dry_run(&format!("would link {}", resource.description()));
        template::expand_tree(source, ctx.system, true, ctx.log)?;
        return Ok(());
    }

    if ctx.log.debug_enabled() {
        match resource.current_state() {
            ResourceState::Missing => {}
            ResourceState::Correct => ctx
                .log
                .debug(&format!("{} already linked, refreshing", link.display())),
            ResourceState::Incorrect { current } | ResourceState::Invalid { reason: current } => {
                ctx.log
                    .debug(&format!("replacing {}: {current}", link.display()));
            }
        }
    }

    template::expand_tree(source, ctx.system, false, ctx.log)?;
    resource.apply()?;
    let relative = resource.relative_target()?;
    ctx.log.info(&format!(
        "LINK: {} -> {}",
        link.display(),
        relative.display()
    ));
    Ok(())
}

/// Direct files of a package directory, sorted by name.
fn package_files(source: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(source).map_err(|e| DotctlError::io(source, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DotctlError::io(source, e))?;
        if entry.path().is_dir() {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

fn deploy_files(ctx: &Context<'_>, source: &Path, home: &Path) -> Result<()> {
    for file in package_files(source)? {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        if let Some(rendered) = template::output_path(&file) {
            let Some(rendered_name) = rendered.file_name() else {
                continue;
            };
            let dst = home.join(rendered_name);
            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "would render template {} -> {}",
                    file.display(),
                    dst.display()
                ));
                continue;
            }
            ensure_parent_dir(&dst)?;
            remove_existing(&dst)?;
            template::expand_file(&file, &dst, ctx.system)?;
            ctx.log.info(&format!(
                "TEMPLATE: {} -> {}",
                file.display(),
                dst.display()
            ));
        } else {
            let resource = SymlinkResource::new(file.clone(), home.join(file_name));
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would link {}", resource.description()));
                continue;
            }
            resource.apply()?;
            ctx.log.info(&format!(
                "LINK: {} -> {}",
                resource.link.display(),
                resource.relative_target()?.display()
            ));
        }
    }
    Ok(())
}

/// Remove the links of package `name`.
///
/// A package that was never deployed is not an error.
///
/// # Errors
///
/// Returns [`DotctlError::NotManaged`] if a real file or directory occupies
/// the destination, or an error if a link cannot be removed.
pub fn undeploy(ctx: &Context<'_>, name: &str) -> Result<()> {
    match ctx.target(name) {
        LinkTarget::Directory { link } => {
            let resource = SymlinkResource::new(ctx.root.join(name), link);
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would remove link {}", resource.link.display()));
                return Ok(());
            }
            match resource
                .remove()
                .with_context(|| format!("undeploying {name}"))?
            {
                ResourceChange::Applied => ctx
                    .log
                    .info(&format!("UNLINK: {}", resource.link.display())),
                ResourceChange::Skipped { .. } => {
                    ctx.log.info(&format!("{name} is not deployed"));
                }
            }
            Ok(())
        }
        LinkTarget::PerFile { home } => {
            let source = ctx.source(name)?;
            undeploy_files(ctx, &source, &home).with_context(|| format!("undeploying {name}"))
        }
    }
}

fn undeploy_files(ctx: &Context<'_>, source: &Path, home: &Path) -> Result<()> {
    for file in package_files(source)? {
        let dst = match template::output_path(&file) {
            Some(rendered) => rendered.file_name().map(|n| home.join(n)),
            None => file.file_name().map(|n| home.join(n)),
        };
        let Some(dst) = dst else {
            continue;
        };
        if !entry_exists(&dst) {
            continue;
        }
        if ctx.dry_run {
            ctx.log
                .dry_run(&format!("would remove {}", dst.display()));
            continue;
        }
        if template::output_path(&file).is_some() || is_symlink(&dst) {
            remove_existing(&dst)?;
            ctx.log.info(&format!("UNLINK: {}", dst.display()));
        } else {
            ctx.log
                .warn(&DotctlError::NotManaged { path: dst.clone() }.to_string());
        }
    }
    Ok(())
}

/// Which way a batch goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create links.
    Deploy,
    /// Remove links.
    Undeploy,
}

impl Action {
    const fn noun(self) -> &'static str {
        match self {
            Self::Deploy => "Deployment",
            Self::Undeploy => "Undeployment",
        }
    }

    const fn gerund(self) -> &'static str {
        match self {
            Self::Deploy => "Deploying",
            Self::Undeploy => "Undeploying",
        }
    }
}

/// Outcome of one package in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Package name.
    pub name: String,
    /// `None` on success, the error chain otherwise.
    pub error: Option<String>,
}

/// Outcome of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Direction of the batch.
    pub action: Action,
    /// One entry per attempted package, in order.
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Number of packages attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Number of packages that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    /// Number of packages that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.total() - self.failed()
    }

    /// One-line summary, e.g. `Deployment complete: 3/4 packages successful`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} complete: {}/{} packages successful",
            self.action.noun(),
            self.succeeded(),
            self.total()
        )
    }
}

/// Apply `action` to `names`, or to every eligible package when `names` is
/// empty.
///
/// Individual failures are logged and counted rather than aborting the
/// batch.
///
/// # Errors
///
/// Returns [`DotctlError::NothingToDeploy`] if there is nothing to act on.
pub fn run_batch(ctx: &Context<'_>, action: Action, names: &[String]) -> Result<BatchReport> {
    let names = if names.is_empty() {
        ctx.config.packages_for_system(ctx.system.as_str())
    } else {
        names.to_vec()
    };
    if names.is_empty() {
        return Err(DotctlError::NothingToDeploy {
            system: ctx.system.to_string(),
        }
        .into());
    }

    ctx.log.stage(&format!(
        "{} packages for {}: {}",
        action.gerund(),
        ctx.system,
        names.join(", ")
    ));

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let result = match action {
            Action::Deploy => deploy(ctx, &name),
            Action::Undeploy => undeploy(ctx, &name),
        };
        let error = result.err().map(|e| format!("{e:#}"));
        if let Some(message) = &error {
            ctx.log.warn(&format!("✗ {message}"));
        }
        entries.push(BatchEntry { name, error });
    }

    let report = BatchReport { action, entries };
    ctx.log.info(&report.summary());
    Ok(report)
}

/// Deploy `names`, or every eligible package.
///
/// # Errors
///
/// See [`run_batch`].
pub fn deploy_all(ctx: &Context<'_>, names: &[String]) -> Result<BatchReport> {
    run_batch(ctx, Action::Deploy, names)
}

/// Undeploy `names`, or every eligible package.
///
/// # Errors
///
/// See [`run_batch`].
pub fn undeploy_all(ctx: &Context<'_>, names: &[String]) -> Result<BatchReport> {
    run_batch(ctx, Action::Undeploy, names)
}
