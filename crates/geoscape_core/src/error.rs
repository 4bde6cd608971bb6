//! Error types for the equipment engine.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for catalog, data and persistence failures.
///
/// Slot constraint violations (wrong type, too heavy, out of stock) are not
/// reported through this type; see [`crate::lifecycle::EquipError`].
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the data that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Catalog data failed validation.
    #[error("Catalog validation failed: {errors:?}")]
    CatalogValidation {
        /// Every problem found, in catalog order.
        errors: Vec<String>,
    },

    /// A provided-item id has no catalog entry.
    #[error("Unknown craft item: {0}")]
    UnknownItem(String),

    /// An aircraft class id has no template.
    #[error("Unknown aircraft class: {0}")]
    UnknownAircraftClass(String),

    /// Invalid base identifier.
    #[error("Invalid base ID: {0}")]
    InvalidBaseId(u32),

    /// Save data could not be encoded or decoded.
    #[error("Save data error: {0}")]
    SaveFormat(String),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
