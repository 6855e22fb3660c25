//! Loading and saving the configuration document.
//!
//! `dotctl.yaml` is canonical.  A legacy `dotctl.json` is migrated to YAML
//! the first time it is loaded and then deleted.  Unreadable documents
//! degrade to the built-in default so that `add` and `init` can repair them.
use anyhow::{Context as _, Result};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use super::{Config, RawDocument};
use crate::error::DotctlError;
use crate::logging::Log;

/// Canonical configuration file name.
pub const CONFIG_FILE: &str = "dotctl.yaml";

/// Legacy configuration file name, read only for migration.
pub const LEGACY_CONFIG_FILE: &str = "dotctl.json";

const HEADER: &str = "# dotctl configuration file\n\
                      # This file defines your dotfiles packages and their target systems\n\n";

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Json,
}

/// Reads and writes the configuration of one dotfiles root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: PathBuf,
}

impl ConfigStore {
    /// Create a store for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Dotfiles root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical configuration path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Legacy configuration path.
    #[must_use]
    pub fn legacy_path(&self) -> PathBuf {
        self.root.join(LEGACY_CONFIG_FILE)
    }

    /// Whether either configuration file is present.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path().exists() || self.legacy_path().exists()
    }

    /// Load the configuration.
    ///
    /// Never fails: a missing document yields the default without touching
    /// the disk, and a corrupt one is reported as a warning.
    pub fn load(&self, log: &dyn Log) -> Config {
        let canonical = self.path();
        let legacy = self.legacy_path();

        if !canonical.exists() && legacy.exists() {
            return self.migrate(&legacy, log);
        }
        if !canonical.exists() {
            log.debug("no configuration file, using defaults");
            return Config::default();
        }
        parse_file(&canonical, Format::Yaml).unwrap_or_else(|e| {
            log.warn(&format!("{e}; using default configuration"));
            Config::default()
        })
    }

    /// Load the configuration without migrating a legacy document.
    ///
    /// Used in dry-run mode, which must leave the root untouched.
    pub fn peek(&self, log: &dyn Log) -> Config {
        let canonical = self.path();
        let (path, format) = if canonical.exists() {
            (canonical, Format::Yaml)
        } else if self.legacy_path().exists() {
            (self.legacy_path(), Format::Json)
        } else {
            return Config::default();
        };
        parse_file(&path, format).unwrap_or_else(|e| {
            log.warn(&format!("{e}; using default configuration"));
            Config::default()
        })
    }

    fn migrate(&self, legacy: &Path, log: &dyn Log) -> Config {
        let config = match parse_file(legacy, Format::Json) {
            Ok(config) => config,
            Err(e) => {
                log.warn(&format!("{e}; using default configuration"));
                return Config::default();
            }
        };
        if let Err(e) = self.save(&config) {
            log.warn(&format!("could not migrate {}: {e:#}", legacy.display()));
            return config;
        }
        if let Err(e) = fs::remove_file(legacy) {
            log.warn(&format!("could not remove {}: {e}", legacy.display()));
        }
        log.info(&format!(
            "Migrated {LEGACY_CONFIG_FILE} to {CONFIG_FILE}"
        ));
        parse_file(&self.path(), Format::Yaml).unwrap_or_else(|e| {
            log.warn(&format!("{e}; using migrated configuration"));
            config
        })
    }

    /// Write `config` as YAML, atomically replacing the canonical file.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or the file cannot be
    /// written.
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| DotctlError::io(&self.root, e))?;
        let body = serde_yaml::to_string(config).context("serializing configuration")?;
        let path = self.path();

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| DotctlError::io(&self.root, e))?;
        tmp.write_all(HEADER.as_bytes())
            .and_then(|()| tmp.write_all(body.as_bytes()))
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| DotctlError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| DotctlError::io(&path, e.error))?;
        Ok(())
    }
}

fn parse_file(path: &Path, format: Format) -> std::result::Result<Config, DotctlError> {
    let parse_error = |message: String| DotctlError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };
    let text = fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Config::default());
    }
    let raw: Option<RawDocument> = match format {
        Format::Yaml => serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?,
        Format::Json => serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?,
    };
    Ok(raw.map(Config::from).unwrap_or_default())
}
