//! Engine error taxonomy.
//!
//! Two families with very different consequences:
//! - `InvalidParameter`, `PriceUnavailable`, `NoRouteAvailable`: detected
//!   before anything is submitted; the whole sequence aborts with no side
//!   effects.
//! - `SubmissionFailed`, `Reverted`, `TimedOut`: can only occur
//!   mid-sequence; further steps abort and the already-confirmed steps are
//!   reported intact. No compensation or blind retry — retrying a financial
//!   operation risks double-execution.

use boost_core::TxId;
use boost_dex::DexError;
use boost_lending::LendingError;
use boost_math::MathError;
use boost_oracle::OracleError;
use thiserror::Error;

use crate::plan::SequenceFailure;

/// One step's failure cause.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad leverage/amount/slippage input, caught before any submission.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Oracle unreachable or stale.
    #[error("Reference price unavailable: {0}")]
    PriceUnavailable(String),

    /// Aggregator found zero usable venues for the pair.
    #[error("No swap route available: {0}")]
    NoRouteAvailable(String),

    /// Signing/broadcast error; no chain state changed.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// The chain accepted and then rejected the transaction.
    #[error("Transaction {tx_id} reverted on-chain")]
    Reverted { tx_id: TxId },

    /// No terminal status observed within the attempt budget. Chain state
    /// is unknown, not necessarily failed; the caller must check the chain
    /// before any retry.
    #[error("Transaction {tx_id} confirmation timed out; chain state unknown")]
    TimedOut { tx_id: TxId },
}

impl From<MathError> for EngineError {
    fn from(e: MathError) -> Self {
        match e {
            MathError::InvalidParameter(msg) => Self::InvalidParameter(msg),
            MathError::PriceUnavailable => Self::PriceUnavailable("non-positive price".to_string()),
        }
    }
}

impl From<OracleError> for EngineError {
    fn from(e: OracleError) -> Self {
        Self::PriceUnavailable(e.to_string())
    }
}

impl From<DexError> for EngineError {
    fn from(e: DexError) -> Self {
        match e {
            DexError::NoRouteAvailable { .. } => Self::NoRouteAvailable(e.to_string()),
            DexError::SlippageTooHigh { .. } => Self::InvalidParameter(e.to_string()),
            DexError::VenueQuote { .. } => Self::NoRouteAvailable(e.to_string()),
            DexError::Submission(msg) => Self::SubmissionFailed(msg),
        }
    }
}

impl From<LendingError> for EngineError {
    fn from(e: LendingError) -> Self {
        Self::SubmissionFailed(e.to_string())
    }
}

/// Failure of a whole flow.
#[derive(Debug, Error)]
pub enum FlowFailure {
    /// Rejected before any submission; no chain state changed.
    #[error("{0}")]
    Preflight(#[from] EngineError),

    /// Failed mid-sequence. Carries every already-confirmed step so the
    /// caller can reconcile partial on-chain state manually.
    #[error("{0}")]
    Sequence(#[from] SequenceFailure),
}

/// Result type alias for flow operations.
pub type FlowResult<T> = std::result::Result<T, FlowFailure>;
