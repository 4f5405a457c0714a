//! Error types for boost-chain.

use thiserror::Error;

/// Chain client error types.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport or deserialization failure while looking up a transaction.
    /// The poller treats this as "not yet observable", not as a revert.
    #[error("Status lookup failed: {0}")]
    Lookup(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Result type alias for chain operations.
pub type ChainResult<T> = std::result::Result<T, ChainError>;
