//! Command-line argument parsing
//!
//! Supports:
//! - Reporting a file's line endings
//! - Converting and saving (`--to`)
//! - Interactive picking in a terminal UI (`--pick`)

use clap::Parser;
use std::path::PathBuf;

use lineend_core::LineEnding;

/// Detect, display and convert LF/CRLF line endings
#[derive(Parser, Debug)]
#[command(
    name = "lineend",
    version,
    about = "Detect, display and convert LF/CRLF line endings"
)]
pub struct CliArgs {
    /// File to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Convert the file to LF or CRLF and save it
    #[arg(long, value_name = "ENDING", conflicts_with = "pick")]
    pub to: Option<LineEnding>,

    /// Open the file in the interactive line ending picker
    #[arg(long)]
    pub pick: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug messages
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// What the binary should do with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the detected line endings
    Report,
    /// Convert and save
    Convert(LineEnding),
    /// Run the terminal UI
    Pick,
}

impl CliArgs {
    pub fn mode(&self) -> Mode {
        match (self.to, self.pick) {
            (Some(ending), _) => Mode::Convert(ending),
            (None, true) => Mode::Pick,
            (None, false) => Mode::Report,
        }
    }
}
