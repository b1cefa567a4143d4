//! Error types shared across otio-rv crates.

use std::path::PathBuf;

/// Top-level error type for adapter plumbing that is not owned by a
/// specific crate (stdin and output paths).
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Input error: {message}")]
    Input { message: String },

    #[error("Output error at {path}: {message}")]
    Output { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using AdapterError.
pub type AdapterResult<T> = Result<T, AdapterError>;

impl AdapterError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Output {
            path: path.into(),
            message: msg.into(),
        }
    }
}
