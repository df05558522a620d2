//! Reporter sinks for user-facing progress and summary lines
//!
//! The warm pipeline never prints directly. It hands leveled lines to a
//! [`Reporter`], which decides how (and whether) to show them.

use colored::Colorize;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Severity/colour of a reported line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Plain progress text
    Normal,

    /// Section headers and neutral highlights
    Info,

    /// Timestamps and run boundaries
    Notice,

    /// Positive results
    Success,

    /// Something worth a look, but not a failure
    Warning,

    /// Failures
    Error,

    /// Verbose detail, shown only in debug mode
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Debug => "debug",
        };
        write!(f, "{}", name)
    }
}

/// Append-only sink for human-readable lines
///
/// Implementations must be shareable across dispatcher tasks.
pub trait Reporter: Send + Sync {
    /// Writes one line at the given level
    fn line(&self, level: Level, message: &str);

    /// Whether debug lines are shown
    fn debug_enabled(&self) -> bool;

    fn normal(&self, message: &str) {
        self.line(Level::Normal, message);
    }

    fn info(&self, message: &str) {
        self.line(Level::Info, message);
    }

    fn notice(&self, message: &str) {
        self.line(Level::Notice, message);
    }

    fn success(&self, message: &str) {
        self.line(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.line(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.line(Level::Error, message);
    }

    /// Writes a debug line; dropped unless debug output is enabled
    fn debug(&self, message: &str) {
        if self.debug_enabled() {
            self.line(Level::Debug, message);
        }
    }
}

/// Prints coloured lines to stdout and mirrors them, uncoloured, to a log file
pub struct ConsoleReporter {
    log_file: Option<Mutex<File>>,
    debug: bool,
}

impl ConsoleReporter {
    /// Creates a reporter that only prints to stdout
    pub fn new(debug: bool) -> Self {
        Self {
            log_file: None,
            debug,
        }
    }

    /// Creates a reporter that also writes to `path`, truncating it first
    pub fn with_log_file(path: &Path, debug: bool) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            log_file: Some(Mutex::new(file)),
            debug,
        })
    }

    fn paint(level: Level, message: &str) -> String {
        match level {
            Level::Normal | Level::Debug => message.to_string(),
            Level::Info => message.blue().to_string(),
            Level::Notice => message.cyan().to_string(),
            Level::Success => message.green().to_string(),
            Level::Warning => message.yellow().to_string(),
            Level::Error => message.red().to_string(),
        }
    }
}

impl fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("log_file", &self.log_file.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

impl Reporter for ConsoleReporter {
    fn line(&self, level: Level, message: &str) {
        println!("{}", Self::paint(level, message));

        if let Some(file) = &self.log_file {
            let Ok(mut file) = file.lock() else {
                return;
            };
            if let Err(e) = writeln!(file, "{}", message) {
                tracing::warn!("Failed to write log file: {}", e);
            }
        }
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}

/// Collects lines in memory; used by tests and embedders
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<(Level, String)>>,
    debug: bool,
}

impl MemoryReporter {
    pub fn new(debug: bool) -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            debug,
        }
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Messages written at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn line(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }

    fn debug_enabled(&self) -> bool {
        self.debug
    }
}
