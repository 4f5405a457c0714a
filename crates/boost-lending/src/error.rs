//! Error types for boost-lending.

use thiserror::Error;

/// Lending adapter error types.
///
/// All of these occur at submission time, before any chain state changes;
/// on-chain rejection surfaces later through the confirmation poller.
#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Signer unavailable: {0}")]
    Signer(String),

    #[error("Invalid call: {0}")]
    InvalidCall(String),
}

/// Result type alias for lending operations.
pub type LendingResult<T> = std::result::Result<T, LendingError>;
