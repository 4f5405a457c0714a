//! Step sequencer.
//!
//! Executes a `StepPlan` strictly in declared order. Each step is submitted
//! through the relevant adapter and then polled to a terminal state before
//! the next step runs. `Reverted` and `TimedOut` are both sequence-fatal;
//! so is any submission-time failure, which aborts without consuming poller
//! attempts. No compensating transactions are ever issued: a partial
//! sequence leaves a real on-chain position, and the failure report
//! surfaces exactly how far execution got.

use boost_chain::ConfirmationPoller;
use boost_core::{TerminalStatus, TransactionHandle, TxId};
use boost_dex::{DynSwapExecutor, QuoteAggregator};
use boost_lending::DynLendingMarket;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::plan::{
    AmountSource, SequenceFailure, SequenceResult, Step, StepAction, StepPlan, StepResult,
    SwapDetail,
};

/// Executes step plans against the injected adapters.
///
/// Holds no mutable state; a sequencer can serve many plans, and separate
/// plans (even on separate networks) are fully independent.
pub struct StepSequencer {
    lending: DynLendingMarket,
    aggregator: Arc<QuoteAggregator>,
    swapper: DynSwapExecutor,
    poller: ConfirmationPoller,
}

impl StepSequencer {
    pub fn new(
        lending: DynLendingMarket,
        aggregator: Arc<QuoteAggregator>,
        swapper: DynSwapExecutor,
        poller: ConfirmationPoller,
    ) -> Self {
        Self {
            lending,
            aggregator,
            swapper,
            poller,
        }
    }

    /// Execute every step of `plan` in order.
    ///
    /// On failure the returned `SequenceFailure` carries the results of all
    /// steps confirmed before the failing one.
    pub async fn execute(&self, plan: &StepPlan) -> SequenceResult {
        let mut completed: Vec<StepResult> = Vec::with_capacity(plan.len());

        for (index, step) in plan.iter().enumerate() {
            info!(
                step = index + 1,
                of = plan.len(),
                kind = %step.kind(),
                "Executing step"
            );

            match self.run_step(index, step, completed.last()).await {
                Ok(result) => {
                    info!(
                        step = index + 1,
                        tx_id = %result.tx_id,
                        output = %result.output,
                        "Step confirmed"
                    );
                    completed.push(result);
                }
                Err(cause) => {
                    warn!(
                        step = index + 1,
                        kind = %step.kind(),
                        confirmed = completed.len(),
                        error = %cause,
                        "Sequence aborted; no rollback is attempted"
                    );
                    return Err(SequenceFailure {
                        completed,
                        step_index: index,
                        step_kind: step.kind(),
                        cause,
                    });
                }
            }
        }

        Ok(completed)
    }

    async fn run_step(
        &self,
        index: usize,
        step: &Step,
        prior: Option<&StepResult>,
    ) -> Result<StepResult, EngineError> {
        match &step.action {
            StepAction::Supply { asset, amount } => {
                let tx_id = self.lending.supply(*asset, *amount).await?;
                self.confirm(tx_id.clone()).await?;
                Ok(StepResult {
                    index,
                    kind: step.kind(),
                    tx_id,
                    output: amount.inner(),
                    swap: None,
                })
            }
            StepAction::Borrow {
                asset,
                amount,
                rate_mode,
            } => {
                let tx_id = self.lending.borrow(*asset, *amount, *rate_mode).await?;
                self.confirm(tx_id.clone()).await?;
                Ok(StepResult {
                    index,
                    kind: step.kind(),
                    tx_id,
                    output: amount.inner(),
                    swap: None,
                })
            }
            StepAction::Swap {
                from,
                to,
                amount_in,
                slippage_bps,
            } => {
                let amount = self.resolve_amount(*amount_in, prior)?;
                let (selected, quotes) = self.aggregator.best_quote(*from, *to, amount).await?;
                let tx_id = self.swapper.execute_swap(&selected, *slippage_bps).await?;
                self.confirm(tx_id.clone()).await?;
                let amount_out = selected.amount_out();
                Ok(StepResult {
                    index,
                    kind: step.kind(),
                    tx_id,
                    output: amount_out,
                    swap: Some(SwapDetail { selected, quotes }),
                })
            }
            StepAction::Repay { asset, amount } => {
                let tx_id = self.lending.repay(*asset, *amount).await?;
                self.confirm(tx_id.clone()).await?;
                let output = match amount {
                    boost_lending::RepayAmount::Exact(v) => v.inner(),
                    // The market determines the realized max-repay amount.
                    boost_lending::RepayAmount::Max => Decimal::ZERO,
                };
                Ok(StepResult {
                    index,
                    kind: step.kind(),
                    tx_id,
                    output,
                    swap: None,
                })
            }
            StepAction::Withdraw { asset, amount } => {
                let tx_id = self.lending.withdraw(*asset, *amount).await?;
                self.confirm(tx_id.clone()).await?;
                Ok(StepResult {
                    index,
                    kind: step.kind(),
                    tx_id,
                    output: amount.inner(),
                    swap: None,
                })
            }
        }
    }

    /// Resolve a step's input amount, preferring the prior step's realized
    /// output over any pre-submission estimate.
    fn resolve_amount(
        &self,
        source: AmountSource,
        prior: Option<&StepResult>,
    ) -> Result<Decimal, EngineError> {
        match source {
            AmountSource::Fixed(amount) => Ok(amount),
            AmountSource::PriorStepOutput => prior
                .map(|r| r.output)
                .ok_or_else(|| {
                    EngineError::InvalidParameter(
                        "step depends on prior output but no step has completed".to_string(),
                    )
                }),
        }
    }

    /// Poll a broadcast transaction to a terminal state.
    async fn confirm(&self, tx_id: TxId) -> Result<(), EngineError> {
        let handle = TransactionHandle::new(tx_id);
        match self.poller.await_terminal(&handle).await {
            TerminalStatus::Confirmed => Ok(()),
            TerminalStatus::Reverted => Err(EngineError::Reverted {
                tx_id: handle.tx_id,
            }),
            TerminalStatus::TimedOut => Err(EngineError::TimedOut {
                tx_id: handle.tx_id,
            }),
        }
    }
}
