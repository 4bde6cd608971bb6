//! Tool error type.

use std::path::PathBuf;

use geoscape_core::error::GameError;
use geoscape_core::lifecycle::EquipError;
use thiserror::Error;

/// Errors reported by the command-line tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A data directory holds no catalog files.
    #[error("No .ron data files found in '{0}'")]
    NoDataFiles(PathBuf),

    /// Catalog, plan or save data is invalid.
    #[error(transparent)]
    Game(#[from] GameError),

    /// A planned equipment change was refused.
    #[error("Equipment refused: {0}")]
    Equip(#[from] EquipError),

    /// A simulation plan asks for something the catalog cannot provide.
    #[error("Invalid plan: {0}")]
    Plan(String),
}

impl ToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;
