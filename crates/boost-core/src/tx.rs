//! Transaction lifecycle types.
//!
//! A submitted contract call yields a `TransactionHandle` which is owned by
//! the confirmation poller until it resolves to a `TerminalStatus`. Handles
//! are single-use: once resolved they are not polled again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stacks transaction identifier (hex string with `0x` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Handle to a broadcast, not-yet-final transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    /// Identifier returned by the adapter at submission time.
    pub tx_id: TxId,
    /// When the transaction was broadcast.
    pub submitted_at: DateTime<Utc>,
}

impl TransactionHandle {
    /// Create a handle stamped with the current time.
    pub fn new(tx_id: TxId) -> Self {
        Self {
            tx_id,
            submitted_at: Utc::now(),
        }
    }

    /// Age of this handle in milliseconds.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.submitted_at).num_milliseconds()
    }
}

/// Terminal state of a polled transaction.
///
/// `Reverted` means the chain accepted and then rejected the call; chain
/// state did not change. `TimedOut` means no terminal status was observed
/// within the attempt budget; chain state is unknown, not necessarily
/// failed. The two require different remedial action and are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    /// Anchored in a block and executed successfully.
    Confirmed,
    /// Rejected on-chain (abort by response or post-condition).
    Reverted,
    /// Attempt budget exhausted without observing a terminal status.
    TimedOut,
}

impl TerminalStatus {
    /// Check whether the next step of a sequence may proceed.
    pub fn permits_continuation(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Reverted => write!(f, "reverted"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}
