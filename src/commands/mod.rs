//! Subcommand handlers.
//!
//! Every handler receives a [`Session`]: the resolved dotfiles root, the
//! home directory, the detected system and the loaded configuration.
//! Handlers that mutate the configuration call [`Session::save`] once at
//! the end; saving is a no-op in dry-run mode.
pub mod adopt;
pub mod debug;
pub mod deploy;
pub mod init;
pub mod packages;
pub mod remote;
pub mod status;
pub mod sync;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::{Config, ConfigStore, store};
use crate::deploy as engine;
use crate::logging::Log;
use crate::platform::{self, SystemTag};

/// Environment variable naming the dotfiles root.
pub const ROOT_ENV: &str = "DOTCTL_ROOT";

/// Default root relative to the home directory.
pub const DEFAULT_ROOT: &str = ".dotfiles";

/// Pick the dotfiles root.
///
/// Order: explicit flag, `DOTCTL_ROOT`, the current directory when it holds
/// a configuration file, then `~/.dotfiles`.
///
/// # Errors
///
/// Returns an error if no candidate applies and the home directory is
/// unknown.
pub fn resolve_root(
    flag: Option<&Path>,
    env: Option<PathBuf>,
    cwd: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(root) = flag {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(root);
    }
    if let Some(cwd) = cwd
        && (cwd.join(store::CONFIG_FILE).exists() || cwd.join(store::LEGACY_CONFIG_FILE).exists())
    {
        return Ok(cwd.to_path_buf());
    }
    home.map(|h| h.join(DEFAULT_ROOT)).ok_or_else(|| {
        anyhow::anyhow!(
            "cannot determine dotfiles root; use --dotfiles-dir or set {ROOT_ENV}"
        )
    })
}

/// Everything a handler needs, resolved once per invocation.
#[derive(Debug)]
pub struct Session {
    /// Dotfiles root.
    pub root: PathBuf,
    /// Home directory links are created under.
    pub home: PathBuf,
    /// Detected system.
    pub system: SystemTag,
    /// Where the configuration lives.
    pub store: ConfigStore,
    /// Loaded configuration.
    pub config: Config,
    /// Report instead of mutating.
    pub dry_run: bool,
}

impl Session {
    /// Resolve the root and home, detect the system and load the
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory or the root cannot be
    /// determined.
    pub fn init(global: &GlobalOpts, log: &dyn Log) -> Result<Self> {
        let home = dirs::home_dir().context("cannot determine home directory")?;
        let root = resolve_root(
            global.root.as_deref(),
            std::env::var_os(ROOT_ENV).map(PathBuf::from),
            std::env::current_dir().ok().as_deref(),
            Some(&home),
        )?;
        let system = platform::identify();
        log.debug(&format!("root: {}", root.display()));
        log.debug(&format!("system: {system}"));
        Ok(Self::open(root, home, system, global.dry_run, log))
    }

    /// Build a session from already-resolved parts.
    #[must_use]
    pub fn open(
        root: PathBuf,
        home: PathBuf,
        system: SystemTag,
        dry_run: bool,
        log: &dyn Log,
    ) -> Self {
        let store = ConfigStore::new(&root);
        let config = if dry_run {
            store.peek(log)
        } else {
            store.load(log)
        };
        log.debug(&format!("{} packages configured", config.packages.len()));
        Self {
            root,
            home,
            system,
            store,
            config,
            dry_run,
        }
    }

    /// Context for the deployment resolver.
    #[must_use]
    pub fn deploy_context<'a>(&'a self, log: &'a dyn Log) -> engine::Context<'a> {
        engine::Context {
            root: &self.root,
            home: &self.home,
            system: &self.system,
            config: &self.config,
            dry_run: self.dry_run,
            log,
        }
    }

    /// Persist the configuration unless this is a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        self.store
            .save(&self.config)
            .with_context(|| format!("save {}", self.store.path().display()))
    }
}
