//! Named commands exposed by the line ending selector.

use std::fmt;

use lineend_core::LineEnding;

/// Commands operating on the active item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the line ending picker
    ShowPicker,
    /// Convert the active buffer to LF
    ConvertToLf,
    /// Convert the active buffer to CRLF
    ConvertToCrlf,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::ShowPicker,
        Command::ConvertToLf,
        Command::ConvertToCrlf,
    ];

    /// Registered command name.
    pub fn name(self) -> &'static str {
        match self {
            Command::ShowPicker => "line-ending-selector:show",
            Command::ConvertToLf => "line-ending-selector:convert-to-LF",
            Command::ConvertToCrlf => "line-ending-selector:convert-to-CRLF",
        }
    }

    /// Look up a command by its registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Target style for conversion commands.
    pub fn target(self) -> Option<LineEnding> {
        match self {
            Command::ShowPicker => None,
            Command::ConvertToLf => Some(LineEnding::LF),
            Command::ConvertToCrlf => Some(LineEnding::CRLF),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
