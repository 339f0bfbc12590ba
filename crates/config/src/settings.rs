//! Configuration structures for lineend settings.

use serde::{Deserialize, Serialize};
use std::fmt;

use lineend_core::{LineEnding, Platform};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Line ending detection settings
    #[serde(default)]
    pub line_endings: LineEndingSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Line ending detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineEndingSettings {
    /// Line ending applied to buffers without any terminator
    /// ("LF", "CRLF" or "OS Default")
    #[serde(default)]
    pub default_line_ending: DefaultLineEnding,

    /// Delay in ms between the last relevant edit and the rescan
    #[serde(default = "default_rescan_debounce_ms")]
    pub rescan_debounce_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the data directory)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

/// Configured default line ending.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefaultLineEnding {
    Lf,
    Crlf,
    #[default]
    OsDefault,
    /// Unknown setting value, kept so it survives a save. Resolves like OsDefault.
    Unrecognized(String),
}

impl DefaultLineEnding {
    /// Resolve to a concrete style for the given host.
    pub fn resolve(&self, platform: Platform) -> LineEnding {
        match self {
            DefaultLineEnding::Lf => LineEnding::LF,
            DefaultLineEnding::Crlf => LineEnding::CRLF,
            DefaultLineEnding::OsDefault | DefaultLineEnding::Unrecognized(_) => {
                if platform.is_windows() {
                    LineEnding::CRLF
                } else {
                    LineEnding::LF
                }
            }
        }
    }

    /// Setting value as written in the config file.
    pub fn as_str(&self) -> &str {
        match self {
            DefaultLineEnding::Lf => "LF",
            DefaultLineEnding::Crlf => "CRLF",
            DefaultLineEnding::OsDefault => defaults::DEFAULT_LINE_ENDING,
            DefaultLineEnding::Unrecognized(value) => value,
        }
    }
}

impl From<String> for DefaultLineEnding {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LF" => DefaultLineEnding::Lf,
            "CRLF" => DefaultLineEnding::Crlf,
            defaults::DEFAULT_LINE_ENDING => DefaultLineEnding::OsDefault,
            _ => DefaultLineEnding::Unrecognized(value),
        }
    }
}

impl From<DefaultLineEnding> for String {
    fn from(value: DefaultLineEnding) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DefaultLineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Default value functions for serde
fn default_rescan_debounce_ms() -> u64 {
    defaults::RESCAN_DEBOUNCE_MS
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

// Default implementations
impl Default for LineEndingSettings {
    fn default() -> Self {
        Self {
            default_line_ending: DefaultLineEnding::default(),
            rescan_debounce_ms: default_rescan_debounce_ms(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
