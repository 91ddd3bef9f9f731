//! Error types for U-Stow.

use thiserror::Error;

/// Result type alias for U-Stow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when preparing or running a packing operation.
///
/// A unit that merely fails to fit is not an error; it is reported through
/// the unfitted lists on the solve result. These variants cover malformed
/// caller input, which is rejected before the engine runs.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid unit provided.
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// Invalid container provided.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
