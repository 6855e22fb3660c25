//! The [`Log`] trait shared by every component that reports progress.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; unit tests use
/// a recording implementation so they can assert on emitted messages.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Whether a debug message would be recorded anywhere.
    ///
    /// Callers on hot paths check this before formatting debug output.
    fn debug_enabled(&self) -> bool {
        true
    }
}

/// Severity tag attached to a recorded message.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage header.
    Stage,
    /// Informational message.
    Info,
    /// Debug message.
    Debug,
    /// Warning message.
    Warn,
    /// Error message.
    Error,
    /// Dry-run action message.
    DryRun,
}

/// A [`Log`] that keeps every message in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: std::sync::Mutex<Vec<(Level, String)>>,
    debug_off: bool,
}

#[cfg(test)]
impl RecordingLog {
    /// A log that reports debug output as disabled.
    pub fn without_debug() -> Self {
        Self {
            debug_off: true,
            ..Self::default()
        }
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, msg.to_string()));
        }
    }

    /// Every message recorded at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines.lock().map_or_else(
            |_| Vec::new(),
            |lines| {
                lines
                    .iter()
                    .filter(|(l, _)| *l == level)
                    .map(|(_, m)| m.clone())
                    .collect()
            },
        )
    }

    /// Whether any message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }
}

#[cfg(test)]
impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push(Level::Stage, msg);
    }
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }
    fn debug(&self, msg: &str) {
        self.push(Level::Debug, msg);
    }
    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }
    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push(Level::DryRun, msg);
    }
    fn debug_enabled(&self) -> bool {
        !self.debug_off
    }
}
