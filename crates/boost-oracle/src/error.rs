//! Error types for boost-oracle.

use thiserror::Error;

/// Oracle error types.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Feed unreachable, stale, or returned a non-positive price.
    #[error("Price unavailable for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Unknown price symbol: {0}")]
    UnknownSymbol(String),
}

impl OracleError {
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PriceUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for oracle operations.
pub type OracleResult<T> = std::result::Result<T, OracleError>;
