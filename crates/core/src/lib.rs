//! Core line ending types for lineend.
//!
//! Pure data types shared by the buffer, tracker and UI crates,
//! without dependencies on specific implementations.

mod platform;
mod set;

pub use platform::Platform;
pub use set::LineEndingSet;

use std::fmt;
use std::str::FromStr;

/// Line terminator style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum LineEnding {
    #[default]
    LF, // Unix \n
    CRLF, // Windows \r\n
}

impl LineEnding {
    /// All styles in picker order.
    pub const ALL: [LineEnding; 2] = [LineEnding::LF, LineEnding::CRLF];

    /// Literal terminator text.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::LF => "\n",
            LineEnding::CRLF => "\r\n",
        }
    }

    /// Display name shown in the status tile and picker.
    pub fn name(self) -> &'static str {
        match self {
            LineEnding::LF => "LF",
            LineEnding::CRLF => "CRLF",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lf" | "unix" => Ok(LineEnding::LF),
            "crlf" | "windows" | "dos" => Ok(LineEnding::CRLF),
            _ => Err(format!("Unknown line ending: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(LineEnding::LF.as_str(), "\n");
        assert_eq!(LineEnding::CRLF.as_str(), "\r\n");
        assert_eq!(LineEnding::CRLF.to_string(), "CRLF");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("LF".parse::<LineEnding>(), Ok(LineEnding::LF));
        assert_eq!("crlf".parse::<LineEnding>(), Ok(LineEnding::CRLF));
        assert!("cr".parse::<LineEnding>().is_err());
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(LineEnding::CRLF.to_string(), "CRLF");
    }
}
