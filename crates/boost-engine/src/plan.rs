//! Step plans and results.
//!
//! A `StepPlan` is built fresh per user request, never mutated once
//! execution starts, and discarded after the final result is returned.
//! Execution produces a parallel sequence of `StepResult`s; a result's
//! realized output (not the pre-submission estimate) is the authoritative
//! input to the next dependent step.

use boost_core::{Amount, Asset, CollateralAsset, DebtAsset, TxId, UsdValue};
use boost_dex::{QuoteSet, SelectedQuote};
use boost_lending::{InterestRateMode, RepayAmount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::error::EngineError;

/// Where a step's input amount comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountSource {
    /// Known when the plan is built.
    Fixed(Decimal),
    /// Resolved from the immediately preceding step's realized output at
    /// execution time.
    PriorStepOutput,
}

/// What a step does on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    Supply {
        asset: CollateralAsset,
        amount: Amount,
    },
    Borrow {
        asset: DebtAsset,
        amount: UsdValue,
        rate_mode: InterestRateMode,
    },
    Swap {
        from: Asset,
        to: Asset,
        amount_in: AmountSource,
        slippage_bps: u32,
    },
    Repay {
        asset: DebtAsset,
        amount: RepayAmount,
    },
    Withdraw {
        asset: CollateralAsset,
        amount: Amount,
    },
}

/// Step category, for reporting and failure attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Supply,
    Borrow,
    Swap,
    Repay,
    Withdraw,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supply => write!(f, "supply"),
            Self::Borrow => write!(f, "borrow"),
            Self::Swap => write!(f, "swap"),
            Self::Repay => write!(f, "repay"),
            Self::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// One planned on-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: StepAction,
}

impl Step {
    pub fn new(action: StepAction) -> Self {
        Self { action }
    }

    pub fn kind(&self) -> StepKind {
        match &self.action {
            StepAction::Supply { .. } => StepKind::Supply,
            StepAction::Borrow { .. } => StepKind::Borrow,
            StepAction::Swap { .. } => StepKind::Swap,
            StepAction::Repay { .. } => StepKind::Repay,
            StepAction::Withdraw { .. } => StepKind::Withdraw,
        }
    }

    /// Whether executing this step needs the prior step's realized output.
    pub fn depends_on_prior_output(&self) -> bool {
        matches!(
            &self.action,
            StepAction::Swap {
                amount_in: AmountSource::PriorStepOutput,
                ..
            }
        )
    }
}

/// Ordered sequence of steps for one user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPlan {
    steps: Vec<Step>,
}

impl StepPlan {
    /// Build a plan. The first step may not depend on a prior output.
    pub fn new(steps: Vec<Step>) -> Result<Self, EngineError> {
        if steps.is_empty() {
            return Err(EngineError::InvalidParameter("empty step plan".to_string()));
        }
        if steps[0].depends_on_prior_output() {
            return Err(EngineError::InvalidParameter(
                "first step cannot depend on a prior step's output".to_string(),
            ));
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

/// Swap execution detail recorded on a confirmed swap step, for reporting
/// and audit of the venue selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDetail {
    /// The quote that was executed.
    pub selected: SelectedQuote,
    /// Every venue quote collected for the request.
    pub quotes: QuoteSet,
}

/// Realized outcome of one confirmed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Position of the step in its plan.
    pub index: usize,
    pub kind: StepKind,
    /// Identifier of the confirmed transaction.
    pub tx_id: TxId,
    /// Realized output quantity: supplied/withdrawn amount, borrowed USD
    /// value, or swap amount out. Zero for a max-repay, whose realized
    /// amount the market determines on-chain.
    pub output: Decimal,
    /// Present on swap steps.
    pub swap: Option<SwapDetail>,
}

/// Mid-sequence failure carrying everything the caller needs to reconcile
/// partial on-chain state: every confirmed step's result, which step
/// failed, and why.
#[derive(Debug, Error)]
#[error("step {step_index} ({step_kind}) failed after {} confirmed step(s): {cause}", .completed.len())]
pub struct SequenceFailure {
    /// Results of every step confirmed before the failure.
    pub completed: Vec<StepResult>,
    /// Index of the failed step in the plan.
    pub step_index: usize,
    pub step_kind: StepKind,
    #[source]
    pub cause: EngineError,
}

/// Result of executing a plan.
pub type SequenceResult = std::result::Result<Vec<StepResult>, SequenceFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_plan_rejects_empty() {
        assert!(StepPlan::new(vec![]).is_err());
    }

    #[test]
    fn test_plan_rejects_dangling_dependency() {
        let step = Step::new(StepAction::Swap {
            from: DebtAsset::Aeusdc.into(),
            to: CollateralAsset::Sbtc.into(),
            amount_in: AmountSource::PriorStepOutput,
            slippage_bps: 50,
        });
        assert!(StepPlan::new(vec![step]).is_err());
    }

    #[test]
    fn test_dependency_detection() {
        let fixed = Step::new(StepAction::Swap {
            from: DebtAsset::Aeusdc.into(),
            to: CollateralAsset::Sbtc.into(),
            amount_in: AmountSource::Fixed(dec!(100)),
            slippage_bps: 50,
        });
        assert!(!fixed.depends_on_prior_output());

        let dependent = Step::new(StepAction::Swap {
            from: DebtAsset::Aeusdc.into(),
            to: CollateralAsset::Sbtc.into(),
            amount_in: AmountSource::PriorStepOutput,
            slippage_bps: 50,
        });
        assert!(dependent.depends_on_prior_output());

        let supply = Step::new(StepAction::Supply {
            asset: CollateralAsset::Sbtc,
            amount: Amount::new(dec!(1)),
        });
        assert!(!supply.depends_on_prior_output());
    }

    #[test]
    fn test_step_kind_labels() {
        assert_eq!(StepKind::Supply.to_string(), "supply");
        assert_eq!(StepKind::Withdraw.to_string(), "withdraw");
    }
}
