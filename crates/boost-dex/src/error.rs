//! Error types for boost-dex.

use thiserror::Error;

/// DEX aggregation error types.
#[derive(Debug, Error)]
pub enum DexError {
    /// Every enabled venue errored or returned no route for the pair.
    #[error("No swap route available for {from} -> {to}")]
    NoRouteAvailable { from: String, to: String },

    /// Requested slippage exceeds the configured maximum.
    #[error("Slippage {requested_bps} bps exceeds maximum {max_bps} bps")]
    SlippageTooHigh { requested_bps: u32, max_bps: u32 },

    /// A single venue failed to produce a quote. Collected per venue and
    /// logged by the aggregator; never fatal for the aggregation call.
    #[error("Venue {venue} quote failed: {reason}")]
    VenueQuote { venue: String, reason: String },

    /// Swap submission failed before broadcast.
    #[error("Swap submission failed: {0}")]
    Submission(String),
}

/// Result type alias for DEX operations.
pub type DexResult<T> = std::result::Result<T, DexError>;
