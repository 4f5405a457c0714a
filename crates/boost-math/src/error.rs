//! Error types for boost-math.

use thiserror::Error;

/// Derivation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Bad leverage or amount input, caught before any submission.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reference price missing, stale, or non-positive.
    #[error("Reference price unavailable")]
    PriceUnavailable,
}

/// Result type alias for derivation operations.
pub type Result<T> = std::result::Result<T, MathError>;
