// Setup errors
//
// Every failure the frame loop can hit happens before the first frame, and
// every one of them ends the session. Each variant renders as the short line
// shown to the operator.

use std::io;
use std::path::{Path, PathBuf};

/// Buffers the frame loop allocates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTarget {
    /// Cartridge image read from storage
    GameData,
    /// Converted color buffer
    ColorBuffer,
}

/// Errors that end a presenter session
#[derive(Debug)]
pub enum PresenterError {
    /// Cartridge image could not be opened or read
    Io { path: PathBuf, source: io::Error },

    /// A buffer could not be allocated
    Allocation(AllocationTarget),

    /// The engine could not be constructed
    EngineInit,

    /// The engine rejected the cartridge image
    Load,
}

impl PresenterError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PresenterError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short message for the operator text display
    pub fn operator_message(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for PresenterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresenterError::Io { path, .. } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_else(|| path.to_string_lossy());
                write!(f, "Failed to open {}", name)
            }
            PresenterError::Allocation(AllocationTarget::GameData) => {
                write!(f, "Failed to allocate memory for game data")
            }
            PresenterError::Allocation(AllocationTarget::ColorBuffer) => {
                write!(f, "Failed to allocate color buffer")
            }
            PresenterError::EngineInit => write!(f, "Failed to create emulator"),
            PresenterError::Load => write!(f, "Failed to load ROM data"),
        }
    }
}

impl std::error::Error for PresenterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresenterError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<AllocationTarget> for PresenterError {
    fn from(target: AllocationTarget) -> Self {
        PresenterError::Allocation(target)
    }
}
