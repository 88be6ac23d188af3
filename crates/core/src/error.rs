//! Error types for slabcut.

use thiserror::Error;

/// Result type alias for slabcut operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the validating entry points.
///
/// The optimizer itself never fails: unplaceable pieces go to the unplaced
/// list and an unusable slab yields an all-waste result. These errors only
/// surface from explicit validation.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid piece provided.
    #[error("Invalid piece: {0}")]
    InvalidPiece(String),

    /// Invalid slab provided.
    #[error("Invalid slab: {0}")]
    InvalidSlab(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
