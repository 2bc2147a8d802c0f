//! Internal logging system for the Nebula core
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Minimum severity filtering (configured through `EngineConfig`)
//! - File and line information for detailed ERROR logs

use colored::*;
use serde::Deserialize;
use std::fmt;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to create custom loggers (file logging, network logging, etc.)
///
/// # Example
///
/// ```no_run
/// use nebula_core::nebula::log::{Logger, LogEntry};
///
/// struct FileLogger {
///     file: std::fs::File,
/// }
///
/// impl Logger for FileLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Write to file...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "nebula::ClassManager", "nebula::ResourceManager")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
///
/// Deserialized from lowercase names (`"trace"`, `"info"`, ...) in configuration files.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// Very verbose debug information (typically disabled in release)
    #[default]
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (critical issues with file:line details)
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in console output
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    fn colored_label(&self) -> ColoredString {
        let label = self.label();
        match self {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        }
    }
}

/// Default logger: colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Detailed: `[timestamp] [SEVERITY] [source] message (file:line)`
///
/// Warnings and errors go to stderr, everything else to stdout.
pub struct DefaultLogger;

impl DefaultLogger {
    /// `YYYY-MM-DD HH:MM:SS.mmm` in local time
    fn timestamp(entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    /// Uncolored line for an entry
    pub fn format_entry(entry: &LogEntry) -> String {
        Self::format_with(entry, entry.severity.label(), &entry.source)
    }

    fn format_with(entry: &LogEntry, severity: impl fmt::Display, source: impl fmt::Display) -> String {
        let mut line = format!("[{}] [{}] [{}] {}", Self::timestamp(entry), severity, source, entry.message);
        if let (Some(file), Some(line_number)) = (entry.file, entry.line) {
            line.push_str(&format!(" ({}:{})", file, line_number));
        }
        line
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let line = Self::format_with(entry, entry.severity.colored_label(), entry.source.bright_blue());
        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a message with an explicit severity
///
/// # Example
///
/// ```no_run
/// use nebula_core::nebula::log::LogSeverity;
///
/// nebula_core::engine_log!(LogSeverity::Info, "nebula::Scene", "{} nodes loaded", 12);
/// ```
#[macro_export]
macro_rules! engine_log {
    ($severity:expr, $source:expr, $($arg:tt)*) => {
        $crate::nebula::Engine::log($severity, $source, format!($($arg)*))
    };
}

/// Log a TRACE message (very verbose)
///
/// ```no_run
/// nebula_core::engine_trace!("nebula::ClassManager", "Resolving base of {}", "Demo::Derived");
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!($crate::nebula::log::LogSeverity::Trace, $source, $($arg)*)
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!($crate::nebula::log::LogSeverity::Debug, $source, $($arg)*)
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!($crate::nebula::log::LogSeverity::Info, $source, $($arg)*)
    };
}

/// Log a WARN message
///
/// ```no_run
/// nebula_core::engine_warn!("nebula::ClassManager", "Name conflict for class '{}'", "Demo::Base");
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_log!($crate::nebula::log::LogSeverity::Warn, $source, $($arg)*)
    };
}

/// Log an ERROR message with file:line information
///
/// ```no_run
/// nebula_core::engine_error!("nebula::ClassManager", "Failed to load plugin: {}", "scene.plugin");
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::nebula::Engine::log_detailed(
            $crate::nebula::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
