//! Confirmation poller.
//!
//! Resolves a `TransactionHandle` to a `TerminalStatus` by re-polling the
//! status client on a fixed interval with a bounded attempt budget. The
//! budget is the only cancellation mechanism: callers wanting a tighter
//! ceiling wrap `await_terminal` in their own timeout.
//!
//! Per-poll state machine:
//! - `success` → `Confirmed`
//! - `abort_by_response` / `abort_by_post_condition` → `Reverted`
//! - `pending` / `not_found` / lookup error → consume one attempt, sleep,
//!   re-poll
//!
//! A lookup error (transaction not yet indexed, transport hiccup) is never
//! mapped to `Reverted`; if the budget runs out on lookup errors alone the
//! result is `TimedOut`, leaving the chain state explicitly unknown.

use boost_core::{TerminalStatus, TransactionHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::status::{DynStatusClient, TxStatus};

/// Polling parameters.
///
/// Defaults match the reference behavior: 60 attempts at 5 s, a ceiling of
/// roughly five minutes per transaction.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    /// Sleep between polls.
    pub poll_interval: Duration,
    /// Maximum number of polls before giving up.
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

/// Blocks (cooperatively) until a transaction reaches a terminal state or
/// the attempt budget is exhausted.
pub struct ConfirmationPoller {
    client: DynStatusClient,
    config: PollerConfig,
}

impl ConfirmationPoller {
    /// Create a poller over a status client.
    pub fn new(client: DynStatusClient, config: PollerConfig) -> Self {
        Self { client, config }
    }

    /// Poll until `handle` resolves.
    ///
    /// Handles are single-use; the caller must not re-poll a handle that
    /// already resolved.
    pub async fn await_terminal(&self, handle: &TransactionHandle) -> TerminalStatus {
        let tx_id = &handle.tx_id;

        for attempt in 1..=self.config.max_attempts {
            match self.client.status(tx_id).await {
                Ok(TxStatus::Success) => {
                    info!(tx_id = %tx_id, attempt, "Transaction confirmed");
                    return TerminalStatus::Confirmed;
                }
                Ok(status) if status.is_abort() => {
                    warn!(tx_id = %tx_id, attempt, ?status, "Transaction reverted on-chain");
                    return TerminalStatus::Reverted;
                }
                Ok(status) => {
                    debug!(tx_id = %tx_id, attempt, ?status, "Transaction not yet terminal");
                }
                Err(e) => {
                    // Not yet indexed or transport failure: still pending
                    // from our point of view, but it costs an attempt.
                    debug!(tx_id = %tx_id, attempt, error = %e, "Status lookup failed");
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        warn!(
            tx_id = %tx_id,
            attempts = self.config.max_attempts,
            "Confirmation timed out; chain state unknown"
        );
        TerminalStatus::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChainError;
    use crate::status::MockStatusClient;
    use boost_core::TxId;
    use std::sync::Arc;

    fn poller(client: Arc<MockStatusClient>, max_attempts: u32) -> ConfirmationPoller {
        ConfirmationPoller::new(
            client,
            PollerConfig {
                poll_interval: Duration::from_millis(10),
                max_attempts,
            },
        )
    }

    fn handle() -> TransactionHandle {
        TransactionHandle::new(TxId::new("0xdeadbeef"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success() {
        let client = Arc::new(MockStatusClient::new());
        client.push(Ok(TxStatus::Success));

        let status = poller(client.clone(), 60).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::Confirmed);
        assert_eq!(client.lookup_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_then_success_within_budget() {
        // 5 consecutive "not found" lookups, then success on attempt 6.
        let client = Arc::new(MockStatusClient::new());
        client.push_repeated(TxStatus::NotFound, 5);
        client.push(Ok(TxStatus::Success));

        let status = poller(client.clone(), 60).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::Confirmed);
        assert_eq!(client.lookup_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_maps_to_reverted() {
        let client = Arc::new(MockStatusClient::new());
        client.push(Ok(TxStatus::Pending));
        client.push(Ok(TxStatus::AbortByResponse));

        let status = poller(client.clone(), 60).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::Reverted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_post_condition_abort_maps_to_reverted() {
        let client = Arc::new(MockStatusClient::new());
        client.push(Ok(TxStatus::AbortByPostCondition));

        let status = poller(client.clone(), 60).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::Reverted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhaustion_times_out() {
        let client = Arc::new(MockStatusClient::new());
        client.set_fallback(TxStatus::Pending);

        let status = poller(client.clone(), 4).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::TimedOut);
        assert_eq!(client.lookup_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_errors_consume_budget_and_time_out() {
        // Repeated transport errors are not a revert: the chain state is
        // unknown, so the result must be TimedOut.
        let client = Arc::new(MockStatusClient::new());
        for _ in 0..3 {
            client.push(Err(ChainError::Lookup("connection reset".to_string())));
        }

        let status = poller(client.clone(), 3).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::TimedOut);
        assert_eq!(client.lookup_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_lookup_errors() {
        let client = Arc::new(MockStatusClient::new());
        client.push(Err(ChainError::Lookup("timeout".to_string())));
        client.push(Err(ChainError::Lookup("timeout".to_string())));
        client.push(Ok(TxStatus::Success));

        let status = poller(client.clone(), 60).await_terminal(&handle()).await;
        assert_eq!(status, TerminalStatus::Confirmed);
    }
}
