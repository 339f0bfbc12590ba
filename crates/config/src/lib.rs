//! Configuration management for lineend.
//!
//! This crate provides configuration loading and saving with support for
//! TOML format and XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{Config, DefaultLineEnding, LineEndingSettings, LoggingSettings};
pub use xdg::{get_config_dir, get_data_dir};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    /// Setting value meaning "CRLF on Windows, LF elsewhere".
    pub const DEFAULT_LINE_ENDING: &str = "OS Default";
    /// Rescan debounce. Zero coalesces notifications until the next poll.
    pub const RESCAN_DEBOUNCE_MS: u64 = 0;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 500;
}

impl Config {
    /// Load configuration from the XDG config file.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit path, creating it if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run - create config file with default values
            let config = Self::default();
            config.save_to(path)?;
            log::info!("Created default config: {}", path.display());
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::validate_content(&original_content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;

        // Serialize back to get normalized content
        let normalized_content = toml::to_string_pretty(&config)?;

        // If content changed, save the updated config
        if original_content != normalized_content {
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to the XDG config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Get path to the default log file.
    pub fn default_log_path() -> Result<PathBuf> {
        Ok(get_data_dir()?.join("lineend.log"))
    }

    /// Problems worth reporting once logging is set up.
    ///
    /// Loading happens before the logger exists, so callers log these.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let DefaultLineEnding::Unrecognized(value) = &self.line_endings.default_line_ending {
            warnings.push(format!(
                "Unknown default_line_ending {:?}, falling back to {}",
                value,
                defaults::DEFAULT_LINE_ENDING
            ));
        }
        warnings
    }

    /// Validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineend_core::{LineEnding, Platform};
    use tempfile::TempDir;

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(
            config.line_endings.default_line_ending,
            DefaultLineEnding::OsDefault
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("default_line_ending = \"OS Default\""));
    }

    #[test]
    fn test_load_from_completes_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[line_endings]\ndefault_line_ending = \"CRLF\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(
            config.line_endings.default_line_ending,
            DefaultLineEnding::Crlf
        );
        assert_eq!(
            config.line_endings.rescan_debounce_ms,
            defaults::RESCAN_DEBOUNCE_MS
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("rescan_debounce_ms"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn test_unknown_default_behaves_like_os_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[line_endings]\ndefault_line_ending = \"CR\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        let default = &config.line_endings.default_line_ending;

        assert_eq!(default.resolve(Platform::Unix), LineEnding::LF);
        assert_eq!(default.resolve(Platform::Windows), LineEnding::CRLF);

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("\"CR\""));
    }

    #[test]
    fn test_known_defaults_have_no_warnings() {
        let mut config = Config::default();
        assert!(config.warnings().is_empty());

        config.line_endings.default_line_ending = DefaultLineEnding::Crlf;
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[line_endings\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.line_endings.default_line_ending = DefaultLineEnding::Lf;
        config.line_endings.rescan_debounce_ms = 25;
        config.logging.min_level = "debug".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.line_endings.default_line_ending, DefaultLineEnding::Lf);
        assert_eq!(loaded.line_endings.rescan_debounce_ms, 25);
        assert_eq!(loaded.logging.min_level, "debug");
    }
}
