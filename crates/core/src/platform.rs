//! Host platform family.

/// Platform family, used to resolve the "OS Default" line ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform the process was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Check if this is a Windows-family host.
    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
