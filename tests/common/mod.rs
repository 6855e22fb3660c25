// Shared helpers for integration tests.
//
// Provides a temporary dotfiles root and home directory plus a fluent
// builder, so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dotctl::commands::Session;
use dotctl::logging::Log;
use dotctl::platform::SystemTag;

/// A [`Log`] that keeps every message, prefixed with its level.
#[derive(Debug, Default)]
pub struct CapturedLog {
    lines: Mutex<Vec<String>>,
}

impl CapturedLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push(format!("{level} {msg}"));
    }

    /// Every captured line, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lock").clone()
    }

    /// Whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl Log for CapturedLog {
    fn stage(&self, msg: &str) {
        self.push("STAGE", msg);
    }
    fn info(&self, msg: &str) {
        self.push("INFO", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("DEBUG", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("WARN", msg);
    }
    fn error(&self, msg: &str) {
        self.push("ERROR", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("DRY_RUN", msg);
    }
}

/// An isolated dotfiles root and home directory backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Holds `dots/` (the root) and `home/`.
    pub tmp: tempfile::TempDir,
    /// Captured output of every operation run against this context.
    pub log: CapturedLog,
}

impl IntegrationTestContext {
    /// Create empty root and home directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("dots")).expect("create root");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home");
        Self {
            tmp,
            log: CapturedLog::default(),
        }
    }

    /// Path to the dotfiles root.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("dots")
    }

    /// Path to the home directory.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Open a session as if running on `system`.
    pub fn session(&self, system: &str, dry_run: bool) -> Session {
        Session::open(
            self.root(),
            self.home(),
            SystemTag::new(system),
            dry_run,
            &self.log,
        )
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new, empty context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `<root>/<relative>`, creating parents.
    pub fn with_package_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.root().join(relative), content);
        self
    }

    /// Write `content` to `<home>/<relative>`, creating parents.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.home().join(relative), content);
        self
    }

    /// Write the configuration document verbatim.
    pub fn with_config(self, file_name: &str, content: &str) -> Self {
        write_file(&self.ctx.root().join(file_name), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write file");
}

/// Whether `path` is a symlink (without following it).
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
}
