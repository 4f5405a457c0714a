//! Swap execution adapter boundary.
//!
//! Executing a selected quote requires a signed contract call; that lives
//! behind this trait so the engine stays independent of key custody and
//! call encoding.

use boost_core::TxId;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::{DexError, DexResult};
use crate::quote::SelectedQuote;
use crate::venue::BoxFuture;

/// Executes a chosen venue's swap as a signed contract call.
pub trait SwapExecutor: Send + Sync {
    /// Submit the swap for `quote` with the given slippage tolerance.
    ///
    /// Returns the identifier of a broadcast, not-yet-final transaction.
    fn execute_swap<'a>(
        &'a self,
        quote: &'a SelectedQuote,
        slippage_bps: u32,
    ) -> BoxFuture<'a, DexResult<TxId>>;
}

/// Arc wrapper for SwapExecutor trait objects.
pub type DynSwapExecutor = Arc<dyn SwapExecutor>;

/// Mock swap executor for testing.
#[derive(Default)]
pub struct MockSwapExecutor {
    /// Recorded submissions for verification.
    submissions: Mutex<Vec<(SelectedQuote, u32)>>,
    /// When set, submissions fail with this reason.
    fail_with: Mutex<Option<String>>,
    /// Tx ids to hand out, in order.
    tx_ids: Mutex<Vec<TxId>>,
}

impl MockSwapExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tx id for the next submission.
    pub fn push_tx_id(&self, tx_id: impl Into<TxId>) {
        self.tx_ids.lock().push(tx_id.into());
    }

    /// Make subsequent submissions fail.
    pub fn set_failure(&self, reason: impl Into<String>) {
        *self.fail_with.lock() = Some(reason.into());
    }

    /// Recorded submissions.
    pub fn submissions(&self) -> Vec<(SelectedQuote, u32)> {
        self.submissions.lock().clone()
    }

    /// Number of submissions attempted.
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }
}

impl SwapExecutor for MockSwapExecutor {
    fn execute_swap<'a>(
        &'a self,
        quote: &'a SelectedQuote,
        slippage_bps: u32,
    ) -> BoxFuture<'a, DexResult<TxId>> {
        Box::pin(async move {
            if let Some(reason) = self.fail_with.lock().clone() {
                return Err(DexError::Submission(reason));
            }
            self.submissions.lock().push((quote.clone(), slippage_bps));
            let mut ids = self.tx_ids.lock();
            if ids.is_empty() {
                Ok(TxId::new(format!("0xswap{}", self.submissions.lock().len())))
            } else {
                Ok(ids.remove(0))
            }
        })
    }
}
