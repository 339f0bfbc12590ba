mod cli;
mod event;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use lineend_buffer::TextBuffer;
use lineend_config::{defaults, Config};
use lineend_core::{LineEnding, LineEndingSet};
use lineend_logger::LogLevel;
use lineend_tracker::{compute_line_endings, convert, LineEndingTracker, TrackerSettings};

use cli::{CliArgs, Mode};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let config = load_config(args.config.as_deref())?;
    init_logging(&config, args.verbose);
    for warning in config.warnings() {
        log::warn!("{}", warning);
    }

    match args.mode() {
        Mode::Report => {
            let mut buffer = TextBuffer::from_file(&args.file)?;
            println!("{}", report(&args.file, &mut buffer, &config));
        }
        Mode::Convert(ending) => {
            let mut buffer = TextBuffer::from_file(&args.file)?;
            println!("{}", convert_file(&args.file, &mut buffer, ending)?);
        }
        Mode::Pick => tui::run(&args.file, &config, args.config.as_deref())?,
    }

    Ok(())
}

/// Load `path` if given, else the user config or the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load().unwrap_or_default()),
    }
}

/// Install the log backend configured in `[logging]`.
fn init_logging(config: &Config, verbose: bool) {
    let file_path = config
        .logging
        .file_path
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| Config::default_log_path().ok());
    let min_level = config
        .logging
        .min_level
        .parse()
        .unwrap_or(LogLevel::Info);

    if !lineend_logger::init(file_path, defaults::MAX_LOG_ENTRIES, min_level) {
        eprintln!("Warning: another logger is already installed");
    }
    if verbose {
        lineend_logger::set_min_level(LogLevel::Debug);
    }
}

/// One-line summary of the file's line endings.
fn report(path: &Path, buffer: &mut TextBuffer, config: &Config) -> String {
    let scanned = compute_line_endings(&*buffer);
    let mut tracker =
        LineEndingTracker::new(LineEndingSet::new(), TrackerSettings::from_config(config));
    let handle = tracker.attach(buffer);
    handle.dispose();

    if scanned.is_empty() {
        format!(
            "{}: no line endings (new lines use {})",
            path.display(),
            tracker.get_default()
        )
    } else {
        format!("{}: {}", path.display(), tracker.display().description())
    }
}

/// Convert `buffer` to `ending` and save it if anything changed.
fn convert_file(path: &Path, buffer: &mut TextBuffer, ending: LineEnding) -> Result<String> {
    convert(buffer, ending);
    if !buffer.is_modified() {
        return Ok(format!("{}: already uses {}", path.display(), ending));
    }

    buffer
        .save()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(format!("{}: converted to {}", path.display(), ending))
}
