//! Transaction status client trait.
//!
//! Abstraction over the chain's indexing API, allowing the poller to be
//! tested against scripted status sequences.

use boost_core::TxId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ChainResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Status reported by the indexing API for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Anchored and executed successfully.
    Success,
    /// In the mempool or an unanchored microblock.
    #[default]
    Pending,
    /// Aborted by the contract's response.
    AbortByResponse,
    /// Aborted by a post-condition check.
    AbortByPostCondition,
    /// Not yet indexed by the API.
    NotFound,
}

impl TxStatus {
    /// Whether this status is terminal on-chain.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::AbortByResponse | Self::AbortByPostCondition
        )
    }

    /// Whether this status means the chain rejected the transaction.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::AbortByResponse | Self::AbortByPostCondition)
    }
}

/// Client for looking up the status of a submitted transaction.
pub trait TransactionStatusClient: Send + Sync {
    /// Look up the current status of `tx_id`.
    ///
    /// A transport error is distinct from `TxStatus::NotFound` in the
    /// return type, but the poller treats both as non-terminal.
    fn status<'a>(&'a self, tx_id: &'a TxId) -> BoxFuture<'a, ChainResult<TxStatus>>;
}

/// Arc wrapper for TransactionStatusClient trait objects.
pub type DynStatusClient = Arc<dyn TransactionStatusClient>;

/// Mock status client replaying a scripted sequence of responses.
#[derive(Debug, Default)]
pub struct MockStatusClient {
    /// Scripted responses, consumed front to back. When empty, the last
    /// configured fallback is returned.
    script: parking_lot::Mutex<VecDeque<ChainResult<TxStatus>>>,
    fallback: parking_lot::Mutex<TxStatus>,
    /// Number of lookups performed, for asserting attempt counts.
    lookups: std::sync::atomic::AtomicU32,
}

impl MockStatusClient {
    pub fn new() -> Self {
        Self {
            script: parking_lot::Mutex::new(VecDeque::new()),
            fallback: parking_lot::Mutex::new(TxStatus::Pending),
            lookups: std::sync::atomic::AtomicU32::new(0),
        }
    }

    /// Append a scripted response.
    pub fn push(&self, response: ChainResult<TxStatus>) {
        self.script.lock().push_back(response);
    }

    /// Append `n` copies of a status.
    pub fn push_repeated(&self, status: TxStatus, n: usize) {
        let mut script = self.script.lock();
        for _ in 0..n {
            script.push_back(Ok(status));
        }
    }

    /// Status returned once the script is exhausted.
    pub fn set_fallback(&self, status: TxStatus) {
        *self.fallback.lock() = status;
    }

    /// Number of lookups performed so far.
    pub fn lookup_count(&self) -> u32 {
        self.lookups.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl TransactionStatusClient for MockStatusClient {
    fn status<'a>(&'a self, _tx_id: &'a TxId) -> BoxFuture<'a, ChainResult<TxStatus>> {
        Box::pin(async move {
            self.lookups
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match self.script.lock().pop_front() {
                Some(response) => response,
                None => Ok(*self.fallback.lock()),
            }
        })
    }
}
