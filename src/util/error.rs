//! Error types for effect library loading.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading effect libraries.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed document, reported by the markup backend
    #[error("Parsing error at #{offset} : {description}")]
    Parse { offset: usize, description: String },

    /// The document has no `<EFFECTS>` root container
    #[error("Root element <EFFECTS> is missing")]
    MissingRoot,

    /// Shape cursor is exhausted
    #[error("No more shapes there")]
    NoMoreShapes,

    /// Effect cursor is exhausted
    #[error("No more effects there")]
    NoMoreEffects,

    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document bytes are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl Error {
    /// Create a parse error.
    pub fn parse(offset: usize, description: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            description: description.into(),
        }
    }

    /// True for cursor exhaustion, which ends an enumeration rather than failing it.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::NoMoreShapes | Self::NoMoreEffects)
    }
}

/// I/O errors are cloned by kind and message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::Parse { offset, description } => Self::parse(*offset, description.clone()),
            Self::MissingRoot => Self::MissingRoot,
            Self::NoMoreShapes => Self::NoMoreShapes,
            Self::NoMoreEffects => Self::NoMoreEffects,
            Self::FileNotFound(path) => Self::FileNotFound(path.clone()),
            Self::MmapFailed(msg) => Self::MmapFailed(msg.clone()),
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Utf8(e) => Self::Utf8(*e),
        }
    }
}

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;
