//! Placement error types.

use thiserror::Error;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that can occur while computing locality preferences.
///
/// Both variants are deterministic in their inputs: retrying the same call
/// yields the same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// The caller passed arguments outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal invariant did not hold. Indicates a bug, not bad input.
    #[error("placement invariant violated: {0}")]
    Invariant(String),
}
