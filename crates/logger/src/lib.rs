//! Logging infrastructure for lineend.
//!
//! A `log` facade backend with file output and in-memory storage of the
//! most recent entries.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Module that produced the entry
    pub target: String,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            // Trace is folded into Debug
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Logger state
#[derive(Debug)]
struct LoggerState {
    /// Last N messages
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries in memory
    max_entries: usize,
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path (None keeps entries in memory only)
    file_path: Option<PathBuf>,
}

impl LoggerState {
    fn new(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> Self {
        if let Some(path) = &file_path {
            // Create parent directory if it doesn't exist
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Clear log file on startup
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== lineend log start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    fn add_entry(&mut self, level: LogLevel, target: &str, message: String) {
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(
                    file,
                    "[{}] {} {}: {}",
                    timestamp,
                    level.to_str(),
                    target,
                    message
                );
            }
        }

        self.entries.push_back(LogEntry {
            timestamp,
            level,
            target: target.to_string(),
            message,
        });

        // Limit queue size
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

/// `log::Log` implementation backed by `LoggerState`.
#[derive(Debug)]
struct Logger {
    state: Mutex<LoggerState>,
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.state
            .lock()
            .map(|state| LogLevel::from(metadata.level()) >= state.min_level)
            .unwrap_or(false)
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Ok(mut state) = self.state.lock() {
            state.add_entry(
                record.level().into(),
                record.target(),
                record.args().to_string(),
            );
        }
    }

    fn flush(&self) {}
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Initialize the global logger and install it as the `log` backend.
///
/// Subsequent calls are ignored. Returns false if another `log` backend
/// was already installed.
///
/// # Arguments
///
/// * `file_path` - Path to the log file (None for memory only)
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record
pub fn init(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> bool {
    if LOGGER.get().is_some() {
        return true;
    }

    let logger = LOGGER.get_or_init(|| Logger {
        state: Mutex::new(LoggerState::new(file_path, max_entries, min_level)),
    });

    if log::set_logger(logger).is_err() {
        return false;
    }
    log::set_max_level(min_level.to_filter());
    true
}

/// Set minimum log level dynamically
pub fn set_min_level(level: LogLevel) {
    if let Some(logger) = LOGGER.get() {
        if let Ok(mut state) = logger.state.lock() {
            state.min_level = level;
        }
        log::set_max_level(level.to_filter());
    }
}

/// Get all log entries currently stored in memory.
pub fn get_entries() -> Vec<LogEntry> {
    LOGGER
        .get()
        .and_then(|logger| logger.state.lock().ok())
        .map(|state| state.entries.iter().cloned().collect())
        .unwrap_or_default()
}

/// Most recent log entry, if any.
pub fn last_entry() -> Option<LogEntry> {
    LOGGER
        .get()
        .and_then(|logger| logger.state.lock().ok())
        .and_then(|state| state.entries.back().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("trace".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
    }

    #[test]
    fn test_state_filters_and_caps_entries() {
        let mut state = LoggerState::new(None, 2, LogLevel::Info);

        state.add_entry(LogLevel::Debug, "t", "hidden".to_string());
        state.add_entry(LogLevel::Info, "t", "one".to_string());
        state.add_entry(LogLevel::Warn, "t", "two".to_string());
        state.add_entry(LogLevel::Error, "t", "three".to_string());

        let messages: Vec<_> = state.entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_state_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("test.log");
        let mut state = LoggerState::new(Some(path.clone()), 10, LogLevel::Debug);

        state.add_entry(LogLevel::Info, "lineend_tracker", "attached".to_string());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== lineend log start ==="));
        assert!(content.contains("INFO lineend_tracker: attached"));
    }

    #[test]
    fn test_global_logger_records_log_macros() {
        assert!(init(None, 100, LogLevel::Debug));
        log::info!(target: "logger_test", "hello {}", 42);

        let entries = get_entries();
        assert!(entries
            .iter()
            .any(|e| e.target == "logger_test" && e.message == "hello 42"));

        log::warn!(target: "logger_test", "latest");
        let last = last_entry().unwrap();
        assert_eq!(last.message, "latest");
        assert_eq!(last.level, LogLevel::Warn);
    }
}
