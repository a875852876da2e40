//! Error types for the development tools.

use std::path::PathBuf;

use mech_core::error::ConstructionError;
use thiserror::Error;

use crate::mtf::MtfError;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while reading, converting or validating unit files.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A `.mtf` file could not be parsed.
    #[error("{}: {source}", path.display())]
    Mtf {
        /// File involved.
        path: PathBuf,
        /// Parse failure.
        source: MtfError,
    },

    /// A JSON unit file could not be decoded or encoded.
    #[error("{}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The engine rejected the unit or a configuration file.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// The file extension is not one the tools understand.
    #[error("{}: unsupported unit file (expected .mtf or .json)", .0.display())]
    UnsupportedFile(PathBuf),
}

impl ToolError {
    /// Wrap an IO error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
