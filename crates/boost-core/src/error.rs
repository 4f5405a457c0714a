//! Error types for boost-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
