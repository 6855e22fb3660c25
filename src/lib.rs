//! System-aware dotfiles manager.
//!
//! Packages are directories under a dotfiles root.  A YAML configuration
//! maps each package to the systems it belongs on; `deploy` links eligible
//! packages into the home directory, rendering `*.template` files for the
//! detected system first.  The root can be synchronized with a GitHub
//! repository through `git` and `gh`.
//!
//! The public API is organised into layers:
//!
//! - **[`platform`]**, **[`config`]**, **[`scan`]**: what is on this machine and what should be deployed
//! - **[`template`]**, **[`resources`]**: rendering and idempotent link primitives
//! - **[`deploy`]**, **[`adopt`]**, **[`git`]**: the operations behind each subcommand
//! - **[`commands`]**: subcommand handlers wired to a [`commands::Session`]
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod adopt;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod git;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod scan;
pub mod template;
