//! Command-line definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotctl",
    about = "System-aware dotfiles manager",
    version = option_env!("DOTCTL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options accepted by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Path to the dotfiles directory (default: ~/.dotfiles)
    #[arg(long = "dotfiles-dir", visible_alias = "root", global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize configuration by scanning package directories
    Init,
    /// Deploy packages (default: all for the current system)
    Deploy(PackagesOpts),
    /// Undeploy packages (default: all for the current system)
    Undeploy(PackagesOpts),
    /// Show current status
    Status,
    /// Add a package to the configuration
    Add(AddOpts),
    /// Remove a package from the configuration
    Remove(RemoveOpts),
    /// Adopt directories from ~/.config into the dotfiles root
    Adopt(AdoptOpts),
    /// Set the GitHub repository used by sync and pull
    #[command(name = "github-repo")]
    GithubRepo(GithubRepoOpts),
    /// Sync dotfiles with the GitHub repository
    Sync,
    /// Pull dotfiles from the GitHub repository
    Pull,
    /// Print diagnostics about the root, configuration and system detection
    Debug,
    /// Generate a shell completion script
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for `deploy` and `undeploy`.
#[derive(Parser, Debug, Clone)]
pub struct PackagesOpts {
    /// Packages to act on
    pub packages: Vec<String>,
}

/// Options for the `add` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AddOpts {
    /// Package name (directory under the dotfiles root)
    pub package: String,

    /// Systems the package applies to (default: all)
    pub systems: Vec<String>,
}

/// Options for the `remove` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RemoveOpts {
    /// Package name
    pub package: String,
}

/// Options for the `adopt` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AdoptOpts {
    /// Optional package name followed by systems (default: every directory, all systems)
    pub args: Vec<String>,
}

/// Options for the `github-repo` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GithubRepoOpts {
    /// Repository in owner/repo form
    pub repository: String,

    /// Branch to sync (default: main)
    pub branch: Option<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Deploy(_) => "deploy",
            Self::Undeploy(_) => "undeploy",
            Self::Status => "status",
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Adopt(_) => "adopt",
            Self::GithubRepo(_) => "github-repo",
            Self::Sync => "sync",
            Self::Pull => "pull",
            Self::Debug => "debug",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}
