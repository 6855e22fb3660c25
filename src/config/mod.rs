//! The configuration document: packages, exclusion patterns and remote.
pub mod package;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use package::{PackageEntry, PackageSpec};
pub use store::ConfigStore;

/// Branch used when the remote descriptor does not name one.
pub const DEFAULT_BRANCH: &str = "main";

/// Exclusion patterns written into every new configuration.
pub const DEFAULT_EXCLUDES: [&str; 4] = [".git", ".DS_Store", "*.pyc", "__pycache__"];

/// GitHub repository used by `sync` and `pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    /// `owner/repo` identifier.
    #[serde(default)]
    pub repository: String,
    /// Branch to track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl RemoteRepo {
    /// Branch to track, defaulting to [`DEFAULT_BRANCH`].
    #[must_use]
    pub fn branch(&self) -> &str {
        self.branch
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BRANCH)
    }

    /// HTTPS clone URL for the repository.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://github.com/{}.git", self.repository)
    }
}

/// The in-memory configuration document for one dotfiles root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Package name to entry, serialized in sorted order.
    pub packages: BTreeMap<String, PackageEntry>,
    /// Glob patterns; persisted and displayed, not applied.
    pub global_excludes: Vec<String>,
    /// Options carried over from older documents, never interpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stow_options: Option<Vec<String>>,
    /// Remote repository descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<RemoteRepo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packages: BTreeMap::new(),
            global_excludes: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
            stow_options: None,
            github: None,
        }
    }
}

/// Document as parsed from disk, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    packages: Option<BTreeMap<String, PackageEntry>>,
    #[serde(default)]
    global_excludes: Option<Vec<String>>,
    #[serde(default)]
    stow_options: Option<Vec<String>>,
    #[serde(default)]
    github: Option<RemoteRepo>,
}

impl From<RawDocument> for Config {
    fn from(raw: RawDocument) -> Self {
        let defaults = Self::default();
        Self {
            packages: raw.packages.unwrap_or_default(),
            global_excludes: raw
                .global_excludes
                .filter(|g| !g.is_empty())
                .unwrap_or(defaults.global_excludes),
            stow_options: raw.stow_options,
            github: raw.github,
        }
    }
}

impl Config {
    /// Register (or overwrite) `name` for `systems`.
    pub fn add_package(&mut self, name: &str, systems: &[String]) -> PackageEntry {
        let entry = PackageEntry::from_systems(systems);
        self.packages.insert(name.to_string(), entry.clone());
        entry
    }

    /// Remove `name`, returning its entry if it was configured.
    pub fn remove_package(&mut self, name: &str) -> Option<PackageEntry> {
        self.packages.remove(name)
    }

    /// Look up a package entry.
    #[must_use]
    pub fn package(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    /// Names of every package eligible on `system`, sorted.
    #[must_use]
    pub fn packages_for_system(&self, system: &str) -> Vec<String> {
        self.packages
            .iter()
            .filter(|(_, entry)| entry.is_eligible(system))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Point the configuration at a GitHub repository.
    pub fn set_remote(&mut self, repository: &str, branch: Option<&str>) {
        self.github = Some(RemoteRepo {
            repository: repository.to_string(),
            branch: Some(branch.unwrap_or(DEFAULT_BRANCH).to_string()),
        });
    }
}
