//! Line-oriented conditional templates.
//!
//! A file named `<name>.template` is rendered to `<name>`.  Blocks are
//! delimited by marker lines:
//!
//! ```text
//! {{#if macos}}
//! export BROWSER=open
//! {{/if}}
//! ```
//!
//! Markers are recognised on the trimmed line and never emitted.  Blocks do
//! not nest; a second opening marker re-evaluates the condition.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::DotctlError;
use crate::logging::Log;
use crate::platform::SystemTag;

/// File suffix that marks a template.
pub const SUFFIX: &str = ".template";

const OPEN: &str = "{{#if ";
const CLOSE: &str = "{{/if}}";

/// Whether a block condition holds on `system`.
///
/// `linux` also matches every known distribution; everything else is an
/// exact comparison.
#[must_use]
pub fn matches(condition: &str, system: &SystemTag) -> bool {
    if condition == "linux" {
        system.is_linux_family()
    } else {
        condition == system.as_str()
    }
}

/// Render `content` for `system`.
///
/// Content without markers is returned unchanged.
#[must_use]
pub fn expand(content: &str, system: &SystemTag) -> String {
    let mut kept = Vec::new();
    let mut skipping = false;
    for line in content.split('\n') {
        let trimmed = line.trim();
        if let Some(condition) = trimmed
            .strip_prefix(OPEN)
            .and_then(|rest| rest.strip_suffix("}}"))
        {
            skipping = !matches(condition.trim(), system);
            continue;
        }
        if trimmed == CLOSE {
            skipping = false;
            continue;
        }
        if !skipping {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Output path for a template file, or `None` if `path` is not a template.
#[must_use]
pub fn output_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(stem))
}

/// Read `src`, render it for `system`, and write the result to `dst`.
///
/// # Errors
///
/// Returns an error if `src` cannot be read or `dst` cannot be written.
pub fn expand_file(src: &Path, dst: &Path, system: &SystemTag) -> Result<()> {
    let content = std::fs::read_to_string(src)
        .map_err(|e| DotctlError::io(src, e))
        .with_context(|| format!("read template {}", src.display()))?;
    std::fs::write(dst, expand(&content, system))
        .map_err(|e| DotctlError::io(dst, e))
        .with_context(|| format!("write rendered template {}", dst.display()))?;
    Ok(())
}

/// Render every template under `dir` next to itself.
///
/// Symlinks are not followed.  Returns the number of templates found (in
/// dry-run mode they are reported but not written).
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a template fails to
/// render.
pub fn expand_tree(dir: &Path, system: &SystemTag, dry_run: bool, log: &dyn Log) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(dst) = output_path(entry.path()) else {
            continue;
        };
        count += 1;
        if dry_run {
            log.dry_run(&format!(
                "would render template {} -> {}",
                entry.path().display(),
                dst.display()
            ));
            continue;
        }
        expand_file(entry.path(), &dst, system)?;
        log.info(&format!(
            "TEMPLATE: {} -> {}",
            entry.path().display(),
            dst.display()
        ));
    }
    Ok(count)
}
