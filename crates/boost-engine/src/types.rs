//! Request and response objects exposed to callers.
//!
//! Requests carry only what the user chose; defaults (leverage, stablecoin,
//! slippage) are filled from `EngineConfig` at execution time. Responses
//! carry every step's transaction identifier, so partial failures can be
//! reconciled against the chain manually.

use boost_core::{Amount, Asset, CollateralAsset, DebtAsset, TxId, UsdValue};
use boost_dex::{QuoteSet, SelectedQuote};
use boost_math::PositionFigures;
use boost_oracle::ReferencePrice;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters for opening a leveraged position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageParams {
    /// Asset to post as collateral.
    pub collateral_asset: CollateralAsset,
    /// Collateral to deposit, asset-native units.
    pub collateral_amount: Amount,
    /// Target leverage; engine default when absent.
    #[serde(default)]
    pub target_leverage: Option<Decimal>,
    /// Stablecoin to borrow; engine default when absent.
    #[serde(default)]
    pub stablecoin: Option<DebtAsset>,
    /// Swap slippage tolerance in basis points; engine default when absent.
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

/// Transaction identifiers of a completed leverage-up sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageTransactions {
    pub supply: TxId,
    pub borrow: TxId,
    pub swap: TxId,
}

/// Successful leverage-up outcome.
///
/// The position figures are recomputed from the realized borrow and swap
/// amounts, not from the pre-trade estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageOutcome {
    pub transactions: LeverageTransactions,
    pub position: PositionFigures,
    /// Every venue quote collected for the swap step, for audit.
    pub quotes: QuoteSet,
}

/// Read-only leverage quote: same derivation as execution, nothing
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageQuote {
    pub position: PositionFigures,
    pub reference_price: ReferencePrice,
}

/// Parameters for unwinding a leveraged position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleverageParams {
    /// Posted collateral asset.
    pub collateral_asset: CollateralAsset,
    /// Collateral held in the wallet, swapped into the debt asset to fund
    /// repayment.
    pub wallet_collateral: Amount,
    /// Outstanding debt asset.
    pub debt_asset: DebtAsset,
    /// Numeric debt figure, used only when `repay_all` is false.
    #[serde(default)]
    pub debt_amount: Option<UsdValue>,
    /// Posted collateral to withdraw after repayment.
    pub collateral_amount: Amount,
    /// Fully unwind via the market's max-repay sentinel. Default true.
    #[serde(default = "default_repay_all")]
    pub repay_all: bool,
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

fn default_repay_all() -> bool {
    true
}

/// Transaction identifiers of a completed deleverage sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleverageTransactions {
    pub swap: TxId,
    pub repay: TxId,
    pub withdraw: TxId,
}

/// Successful deleverage outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleverageOutcome {
    pub transactions: DeleverageTransactions,
    /// Collateral returned to the wallet by the withdraw step.
    pub recovered_collateral: Amount,
}

/// Parameters for a standalone best-execution swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    pub from: Asset,
    pub to: Asset,
    /// Input amount in `from`-asset units.
    pub amount: Decimal,
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

/// Successful standalone swap outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub tx_id: TxId,
    pub selected: SelectedQuote,
    pub quotes: QuoteSet,
}
