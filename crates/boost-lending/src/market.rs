//! Lending-market trait and call types.

use boost_core::{Amount, CollateralAsset, DebtAsset, TxId, UsdValue};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{LendingError, LendingResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Interest rate mode for borrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestRateMode {
    #[default]
    Stable,
    Variable,
}

/// Repayment amount.
///
/// `Max` is the market's "repay maximum outstanding" sentinel. Full unwinds
/// must use it rather than a pre-computed numeric amount: interest accrues
/// between quoting and confirmation, so a numeric amount would leave dust
/// debt behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepayAmount {
    /// Repay exactly this USD value.
    Exact(UsdValue),
    /// Repay everything outstanding.
    Max,
}

impl fmt::Display for RepayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// A recorded adapter call, for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketCall {
    Supply {
        asset: CollateralAsset,
        amount: Amount,
    },
    Borrow {
        asset: DebtAsset,
        amount: UsdValue,
        rate_mode: InterestRateMode,
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

/// Signed contract calls against the lending market.
///
/// Every method returns the identifier of a broadcast, not-yet-final
/// transaction; callers must await confirmation before trusting any
/// financial quantity derived from the call.
pub trait LendingMarket: Send + Sync {
    fn supply(&self, asset: CollateralAsset, amount: Amount) -> BoxFuture<'_, LendingResult<TxId>>;

    fn borrow(
        &self,
        asset: DebtAsset,
        amount: UsdValue,
        rate_mode: InterestRateMode,
    ) -> BoxFuture<'_, LendingResult<TxId>>;

    fn repay(&self, asset: DebtAsset, amount: RepayAmount) -> BoxFuture<'_, LendingResult<TxId>>;

    fn withdraw(
        &self,
        asset: CollateralAsset,
        amount: Amount,
    ) -> BoxFuture<'_, LendingResult<TxId>>;
}

/// Arc wrapper for LendingMarket trait objects.
pub type DynLendingMarket = Arc<dyn LendingMarket>;

/// Mock lending market for testing.
#[derive(Default)]
pub struct MockLendingMarket {
    /// Recorded calls in submission order.
    calls: Mutex<Vec<MarketCall>>,
    /// When set, the named operation fails at submission time.
    fail_op: Mutex<Option<(&'static str, String)>>,
    /// Monotonic counter for generated tx ids.
    counter: std::sync::atomic::AtomicU32,
}

impl MockLendingMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make one operation ("supply", "borrow", "repay", "withdraw") fail.
    pub fn fail_operation(&self, op: &'static str, reason: impl Into<String>) {
        *self.fail_op.lock() = Some((op, reason.into()));
    }

    /// Recorded calls.
    pub fn calls(&self) -> Vec<MarketCall> {
        self.calls.lock().clone()
    }

    fn submit(&self, op: &'static str, call: MarketCall) -> LendingResult<TxId> {
        if let Some((fail_op, reason)) = self.fail_op.lock().clone() {
            if fail_op == op {
                return Err(LendingError::Submission(reason));
            }
        }
        self.calls.lock().push(call);
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(TxId::new(format!("0x{op}{n}")))
    }
}

impl LendingMarket for MockLendingMarket {
    fn supply(&self, asset: CollateralAsset, amount: Amount) -> BoxFuture<'_, LendingResult<TxId>> {
        Box::pin(async move { self.submit("supply", MarketCall::Supply { asset, amount }) })
    }

    fn borrow(
        &self,
        asset: DebtAsset,
        amount: UsdValue,
        rate_mode: InterestRateMode,
    ) -> BoxFuture<'_, LendingResult<TxId>> {
        Box::pin(async move {
            self.submit(
                "borrow",
                MarketCall::Borrow {
                    asset,
                    amount,
                    rate_mode,
                },
            )
        })
    }

    fn repay(&self, asset: DebtAsset, amount: RepayAmount) -> BoxFuture<'_, LendingResult<TxId>> {
        Box::pin(async move { self.submit("repay", MarketCall::Repay { asset, amount }) })
    }

    fn withdraw(
        &self,
        asset: CollateralAsset,
        amount: Amount,
    ) -> BoxFuture<'_, LendingResult<TxId>> {
        Box::pin(async move { self.submit("withdraw", MarketCall::Withdraw { asset, amount }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let market = MockLendingMarket::new();

        market
            .supply(CollateralAsset::Sbtc, Amount::new(dec!(1)))
            .await
            .unwrap();
        market
            .borrow(
                DebtAsset::Aeusdc,
                UsdValue::new(dec!(20000)),
                InterestRateMode::Stable,
            )
            .await
            .unwrap();

        let calls = market.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], MarketCall::Supply { .. }));
        assert!(matches!(calls[1], MarketCall::Borrow { .. }));
    }

    #[tokio::test]
    async fn test_mock_failure_is_submission_error() {
        let market = MockLendingMarket::new();
        market.fail_operation("borrow", "nonce conflict");

        assert!(market
            .supply(CollateralAsset::Sbtc, Amount::new(dec!(1)))
            .await
            .is_ok());
        let err = market
            .borrow(
                DebtAsset::Aeusdc,
                UsdValue::new(dec!(1)),
                InterestRateMode::Stable,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LendingError::Submission(_)));
    }

    #[test]
    fn test_repay_amount_display() {
        assert_eq!(RepayAmount::Max.to_string(), "max");
        assert_eq!(RepayAmount::Exact(UsdValue::new(dec!(5))).to_string(), "5");
    }
}
