// Logger - Timestamped diagnostics for the frame loop
//
// Provides:
// - Configurable log levels
// - Bounded in-memory buffer of recent entries
// - Optional echo to stderr and optional log file

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Log level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warning,
    /// Info, warnings, and errors
    #[default]
    Info,
    /// Frame statistics and setup details
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::None => "NONE",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {:<5} {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level.label(),
            self.message
        )
    }
}

/// Logger
///
/// Keeps the most recent entries in memory and forwards each entry to
/// stderr and/or a file when those sinks are enabled.
pub struct Logger {
    /// Current log level
    log_level: LogLevel,

    /// Echo entries to stderr
    echo_stderr: bool,

    /// In-memory entry buffer
    buffer: VecDeque<LogEntry>,

    /// Maximum number of entries in the buffer (0 = unlimited)
    max_buffer_size: usize,

    /// Output file
    output_file: Option<File>,
}

impl Logger {
    /// Create a logger at `Info` with stderr echo off
    pub fn new() -> Self {
        Logger {
            log_level: LogLevel::Info,
            echo_stderr: false,
            buffer: VecDeque::new(),
            max_buffer_size: 256,
            output_file: None,
        }
    }

    /// Set the log level
    pub fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = level;
    }

    /// Get the current log level
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Enable or disable the stderr echo
    pub fn set_echo_stderr(&mut self, echo: bool) {
        self.echo_stderr = echo;
    }

    /// Set maximum buffer size
    ///
    /// When the buffer exceeds this size, old entries are removed.
    /// Set to 0 for unlimited size.
    pub fn set_max_buffer_size(&mut self, size: usize) {
        self.max_buffer_size = size;
        self.trim();
    }

    /// Open a log file for output
    ///
    /// # Returns
    ///
    /// `Ok(())` if successful, `Err` otherwise
    pub fn open_log_file<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        self.output_file = Some(file);
        Ok(())
    }

    /// Close the log file
    pub fn close_log_file(&mut self) {
        self.output_file = None;
    }

    /// Whether messages at `level` are recorded
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self.log_level
    }

    /// Record a message
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        };

        if self.echo_stderr {
            eprintln!("{}", entry);
        }

        if let Some(file) = &mut self.output_file {
            // Stop writing after the first failure
            if writeln!(file, "{}", entry).is_err() {
                self.output_file = None;
            }
        }

        self.buffer.push_back(entry);
        self.trim();
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn trace(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    /// Buffered entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.buffer.iter()
    }

    /// Whether any buffered entry contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.buffer.iter().any(|entry| entry.message.contains(needle))
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn trim(&mut self) {
        if self.max_buffer_size > 0 {
            while self.buffer.len() > self.max_buffer_size {
                self.buffer.pop_front();
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        let mut logger = Logger::new();
        logger.set_log_level(LogLevel::Warning);

        logger.error("bad");
        logger.warn("odd");
        logger.info("fine");
        logger.debug("noise");

        let levels: Vec<LogLevel> = logger.entries().map(|e| e.level).collect();
        assert_eq!(levels, vec![LogLevel::Error, LogLevel::Warning]);
    }

    #[test]
    fn test_none_records_nothing() {
        let mut logger = Logger::new();
        logger.set_log_level(LogLevel::None);
        logger.error("bad");
        logger.log(LogLevel::None, "never");

        assert_eq!(logger.entries().count(), 0);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut logger = Logger::new();
        logger.set_max_buffer_size(3);

        for i in 0..5 {
            logger.info(format!("entry {}", i));
        }

        let messages: Vec<&str> = logger.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn test_entry_display() {
        let mut logger = Logger::new();
        logger.info("Starting");

        let line = logger.entries().next().unwrap().to_string();
        assert!(line.contains("INFO"));
        assert!(line.ends_with("Starting"));
    }

    #[test]
    fn test_log_file_sink() {
        let path = std::env::temp_dir().join(format!("nes_v5_logger_{}.log", std::process::id()));
        let mut logger = Logger::new();
        logger.open_log_file(&path).unwrap();
        logger.info("written to disk");
        logger.close_log_file();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(contents.contains("written to disk"));
    }
}
