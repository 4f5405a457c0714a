//! Engine facade: builds plans, runs the sequencer, derives reports.
//!
//! One engine instance is bound to one network's adapters and one set of
//! trading defaults. Nothing here is process-global; two engines (say,
//! mainnet and testnet) run isolated in the same process.

use boost_core::{Amount, UsdValue};
use boost_dex::{DexError, QuoteAggregator, QuoteSet, SelectedQuote};
use boost_lending::{InterestRateMode, RepayAmount};
use boost_math::{position_figures, size_borrow};
use boost_oracle::DynPriceOracle;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::error::{EngineError, FlowFailure, FlowResult};
use crate::plan::{AmountSource, Step, StepAction, StepPlan};
use crate::sequencer::StepSequencer;
use crate::types::{
    DeleverageOutcome, DeleverageParams, DeleverageTransactions, LeverageOutcome, LeverageParams,
    LeverageQuote, LeverageTransactions, SwapOutcome, SwapParams,
};

/// Trading defaults and risk parameters, threaded in explicitly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target leverage when a request does not specify one.
    pub default_leverage: Decimal,
    /// Stablecoin to borrow when a request does not specify one.
    pub default_stablecoin: boost_core::DebtAsset,
    /// Swap slippage tolerance when a request does not specify one.
    pub default_slippage_bps: u32,
    /// Hard ceiling on requested slippage.
    pub max_slippage_bps: u32,
    /// Lending-market liquidation threshold for the collateral asset.
    pub liquidation_threshold: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_leverage: Decimal::new(15, 1),
            default_stablecoin: boost_core::DebtAsset::Aeusdc,
            default_slippage_bps: 50,
            max_slippage_bps: 300,
            liquidation_threshold: Decimal::new(8, 1),
        }
    }
}

/// Orchestrates leverage, deleverage, and swap flows.
pub struct BoostEngine {
    oracle: DynPriceOracle,
    aggregator: Arc<QuoteAggregator>,
    sequencer: StepSequencer,
    config: EngineConfig,
}

impl BoostEngine {
    pub fn new(
        oracle: DynPriceOracle,
        aggregator: Arc<QuoteAggregator>,
        sequencer: StepSequencer,
        config: EngineConfig,
    ) -> Self {
        Self {
            oracle,
            aggregator,
            sequencer,
            config,
        }
    }

    /// Validate a requested slippage against the configured ceiling.
    fn resolve_slippage(&self, requested: Option<u32>) -> Result<u32, EngineError> {
        let slippage = requested.unwrap_or(self.config.default_slippage_bps);
        if slippage > self.config.max_slippage_bps {
            return Err(DexError::SlippageTooHigh {
                requested_bps: slippage,
                max_bps: self.config.max_slippage_bps,
            }
            .into());
        }
        Ok(slippage)
    }

    /// Open a leveraged position: supply collateral, borrow stablecoin
    /// sized for the target leverage, swap the borrow back into collateral.
    pub async fn leverage(&self, params: &LeverageParams) -> FlowResult<LeverageOutcome> {
        let leverage = params.target_leverage.unwrap_or(self.config.default_leverage);
        let stablecoin = params.stablecoin.unwrap_or(self.config.default_stablecoin);
        let slippage_bps = self.resolve_slippage(params.slippage_bps)?;

        // Everything up to here and including sizing is pre-submission:
        // a failure leaves no side effects.
        let price = self
            .oracle
            .reference_price(params.collateral_asset.price_symbol())
            .await
            .map_err(EngineError::from)?;

        let sizing = size_borrow(params.collateral_amount, price.price, leverage)
            .map_err(EngineError::from)?;

        info!(
            collateral = %params.collateral_amount,
            asset = %params.collateral_asset,
            borrow_usd = %sizing.borrow_value_usd,
            %leverage,
            "Planned leverage-up"
        );

        let plan = StepPlan::new(vec![
            Step::new(StepAction::Supply {
                asset: params.collateral_asset,
                amount: params.collateral_amount,
            }),
            Step::new(StepAction::Borrow {
                asset: stablecoin,
                amount: sizing.borrow_value_usd,
                rate_mode: InterestRateMode::Stable,
            }),
            Step::new(StepAction::Swap {
                from: stablecoin.into(),
                to: params.collateral_asset.into(),
                amount_in: AmountSource::PriorStepOutput,
                slippage_bps,
            }),
        ])
        .map_err(FlowFailure::Preflight)?;

        let results = self.sequencer.execute(&plan).await?;

        // Final report from realized amounts, not the pre-trade estimate.
        let realized_borrow = UsdValue::new(results[1].output);
        let realized_additional = Amount::new(results[2].output);
        let position = position_figures(
            params.collateral_amount,
            price.price,
            realized_borrow,
            realized_additional,
            self.config.liquidation_threshold,
        )
        .map_err(EngineError::from)?;

        let swap_detail = results[2].swap.clone().ok_or_else(|| {
            EngineError::SubmissionFailed("swap step result missing execution detail".to_string())
        })?;

        Ok(LeverageOutcome {
            transactions: LeverageTransactions {
                supply: results[0].tx_id.clone(),
                borrow: results[1].tx_id.clone(),
                swap: results[2].tx_id.clone(),
            },
            position,
            quotes: swap_detail.quotes,
        })
    }

    /// Quote a leverage-up without executing: identical derivation, nothing
    /// submitted.
    pub async fn leverage_quote(&self, params: &LeverageParams) -> FlowResult<LeverageQuote> {
        let leverage = params.target_leverage.unwrap_or(self.config.default_leverage);

        let price = self
            .oracle
            .reference_price(params.collateral_asset.price_symbol())
            .await
            .map_err(EngineError::from)?;

        let sizing = size_borrow(params.collateral_amount, price.price, leverage)
            .map_err(EngineError::from)?;
        let position = position_figures(
            params.collateral_amount,
            price.price,
            sizing.borrow_value_usd,
            sizing.additional_collateral,
            self.config.liquidation_threshold,
        )
        .map_err(EngineError::from)?;

        Ok(LeverageQuote {
            position,
            reference_price: price,
        })
    }

    /// Unwind a position: swap wallet collateral into the debt asset, repay
    /// the debt, withdraw the posted collateral.
    ///
    /// The ordering is deliberate: the market enforces a health-factor
    /// floor on withdrawal, so debt is repaid first.
    pub async fn deleverage(&self, params: &DeleverageParams) -> FlowResult<DeleverageOutcome> {
        let slippage_bps = self.resolve_slippage(params.slippage_bps)?;

        if !params.wallet_collateral.is_positive() {
            return Err(EngineError::InvalidParameter(format!(
                "wallet collateral must be > 0, got {}",
                params.wallet_collateral
            ))
            .into());
        }
        if !params.collateral_amount.is_positive() {
            return Err(EngineError::InvalidParameter(format!(
                "collateral amount must be > 0, got {}",
                params.collateral_amount
            ))
            .into());
        }

        // A full unwind always uses the market's max-repay sentinel, even
        // when a numeric debt figure was supplied: interest accrues between
        // quoting and confirmation.
        let repay_amount = if params.repay_all {
            RepayAmount::Max
        } else {
            let debt = params.debt_amount.ok_or_else(|| {
                EngineError::InvalidParameter(
                    "partial repayment requires a debt amount".to_string(),
                )
            })?;
            RepayAmount::Exact(debt)
        };

        let plan = StepPlan::new(vec![
            Step::new(StepAction::Swap {
                from: params.collateral_asset.into(),
                to: params.debt_asset.into(),
                amount_in: AmountSource::Fixed(params.wallet_collateral.inner()),
                slippage_bps,
            }),
            Step::new(StepAction::Repay {
                asset: params.debt_asset,
                amount: repay_amount,
            }),
            Step::new(StepAction::Withdraw {
                asset: params.collateral_asset,
                amount: params.collateral_amount,
            }),
        ])
        .map_err(FlowFailure::Preflight)?;

        let results = self.sequencer.execute(&plan).await?;

        Ok(DeleverageOutcome {
            transactions: DeleverageTransactions {
                swap: results[0].tx_id.clone(),
                repay: results[1].tx_id.clone(),
                withdraw: results[2].tx_id.clone(),
            },
            recovered_collateral: params.collateral_amount,
        })
    }

    /// Execute a standalone best-execution swap.
    pub async fn swap(&self, params: &SwapParams) -> FlowResult<SwapOutcome> {
        let slippage_bps = self.resolve_slippage(params.slippage_bps)?;

        if params.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidParameter(format!(
                "swap amount must be > 0, got {}",
                params.amount
            ))
            .into());
        }

        let plan = StepPlan::new(vec![Step::new(StepAction::Swap {
            from: params.from,
            to: params.to,
            amount_in: AmountSource::Fixed(params.amount),
            slippage_bps,
        })])
        .map_err(FlowFailure::Preflight)?;

        let results = self.sequencer.execute(&plan).await?;
        let result = &results[0];
        let detail = result.swap.clone().ok_or_else(|| {
            EngineError::SubmissionFailed("swap step result missing execution detail".to_string())
        })?;

        Ok(SwapOutcome {
            tx_id: result.tx_id.clone(),
            selected: detail.selected,
            quotes: detail.quotes,
        })
    }

    /// Quote a swap across all venues without executing.
    pub async fn swap_quote(&self, params: &SwapParams) -> FlowResult<(SelectedQuote, QuoteSet)> {
        if params.amount <= Decimal::ZERO {
            return Err(EngineError::InvalidParameter(format!(
                "swap amount must be > 0, got {}",
                params.amount
            ))
            .into());
        }

        let (selected, set) = self
            .aggregator
            .best_quote(params.from, params.to, params.amount)
            .await
            .map_err(EngineError::from)?;
        Ok((selected, set))
    }
}
