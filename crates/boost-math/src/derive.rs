//! Borrow sizing and position figures.
//!
//! For a target leverage `L` on collateral `c` at reference price `p`:
//!
//! ```text
//! ltv              = (L - 1) / L
//! borrow_value_usd = c * p * ltv
//! additional       = borrow_value_usd / p
//! leverage         = (c * p) / (c * p - borrow_value_usd)
//! liq_price        = borrow_value_usd / (c * threshold)
//! health_factor    = (c * p * threshold) / borrow_value_usd
//! ```
//!
//! All amounts are `rust_decimal::Decimal`; division by zero is impossible
//! because every denominator is validated up front.

use boost_core::{Amount, UsdValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, Result};

/// Health factor of a collateralized position.
///
/// A position with zero debt can never be liquidated; that case is an
/// explicit variant rather than a division producing NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthFactor {
    /// Zero outstanding debt; liquidation cannot occur.
    NeverLiquidatable,
    /// Ratio of liquidation-weighted collateral value to debt value.
    /// Values below 1 mean the position is liquidatable.
    Finite(Decimal),
}

impl HealthFactor {
    pub fn is_never_liquidatable(&self) -> bool {
        matches!(self, Self::NeverLiquidatable)
    }

    /// Finite ratio, if any.
    pub fn ratio(&self) -> Option<Decimal> {
        match self {
            Self::NeverLiquidatable => None,
            Self::Finite(r) => Some(*r),
        }
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverLiquidatable => write!(f, "inf"),
            Self::Finite(r) => write!(f, "{r}"),
        }
    }
}

/// Pre-trade borrow sizing for a target leverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowSizing {
    /// Loan-to-value implied by the target leverage, in (0, 1).
    pub loan_to_value: Decimal,
    /// USD value to borrow against the collateral.
    pub borrow_value_usd: UsdValue,
    /// Collateral-asset amount the borrowed value buys at the reference price.
    pub additional_collateral: Amount,
}

/// Derived figures for a leveraged position.
///
/// Computed identically for quoting (pre-trade estimate) and final
/// reporting (post-trade realized values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFigures {
    /// Collateral posted by the user, asset-native units.
    pub collateral_amount: Amount,
    /// Outstanding debt in USD.
    pub debt_value_usd: UsdValue,
    /// Extra collateral acquired by swapping the borrowed value.
    pub additional_collateral: Amount,
    /// collateral + additional collateral.
    pub total_exposure: Amount,
    /// Collateral value over equity (collateral value minus debt). Inverts
    /// the loan-to-value derivation, so quoting a target leverage and
    /// reading it back agree.
    pub realized_leverage: Decimal,
    /// Reference price at which the position becomes liquidatable.
    pub liquidation_price: UsdValue,
    /// Current health factor.
    pub health_factor: HealthFactor,
}

/// Loan-to-value for a target leverage: `(L - 1) / L`.
///
/// Fails when `target_leverage <= 1`: the division would produce a
/// degenerate (zero or negative) borrow.
pub fn loan_to_value(target_leverage: Decimal) -> Result<Decimal> {
    if target_leverage <= Decimal::ONE {
        return Err(MathError::InvalidParameter(format!(
            "target leverage must be > 1, got {target_leverage}"
        )));
    }
    Ok((target_leverage - Decimal::ONE) / target_leverage)
}

/// Size the borrow for a target leverage on the given collateral.
pub fn size_borrow(
    collateral_amount: Amount,
    reference_price: UsdValue,
    target_leverage: Decimal,
) -> Result<BorrowSizing> {
    if !collateral_amount.is_positive() {
        return Err(MathError::InvalidParameter(format!(
            "collateral amount must be > 0, got {collateral_amount}"
        )));
    }
    if !reference_price.is_positive() {
        return Err(MathError::PriceUnavailable);
    }

    let ltv = loan_to_value(target_leverage)?;
    let borrow_value_usd = collateral_amount.value_at(reference_price) * ltv;
    // Denominator checked positive above.
    let additional_collateral = borrow_value_usd
        .amount_at(reference_price)
        .ok_or(MathError::PriceUnavailable)?;

    Ok(BorrowSizing {
        loan_to_value: ltv,
        borrow_value_usd,
        additional_collateral,
    })
}

/// Derive position figures from collateral, price, and debt.
///
/// Used with estimated amounts for quoting and with realized step outputs
/// for final reporting. The health factor is recomputed on every call and
/// never cached across steps.
pub fn position_figures(
    collateral_amount: Amount,
    reference_price: UsdValue,
    debt_value_usd: UsdValue,
    additional_collateral: Amount,
    liquidation_threshold: Decimal,
) -> Result<PositionFigures> {
    if !collateral_amount.is_positive() {
        return Err(MathError::InvalidParameter(format!(
            "collateral amount must be > 0, got {collateral_amount}"
        )));
    }
    if !reference_price.is_positive() {
        return Err(MathError::PriceUnavailable);
    }
    if liquidation_threshold <= Decimal::ZERO || liquidation_threshold > Decimal::ONE {
        return Err(MathError::InvalidParameter(format!(
            "liquidation threshold must be in (0, 1], got {liquidation_threshold}"
        )));
    }
    if debt_value_usd.inner() < Decimal::ZERO {
        return Err(MathError::InvalidParameter(format!(
            "debt value must be >= 0, got {debt_value_usd}"
        )));
    }

    let collateral_value = collateral_amount.value_at(reference_price);
    let equity = collateral_value.inner() - debt_value_usd.inner();
    if equity <= Decimal::ZERO {
        return Err(MathError::InvalidParameter(format!(
            "debt {debt_value_usd} is not covered by collateral value {collateral_value}"
        )));
    }

    let total_exposure = collateral_amount + additional_collateral;
    let realized_leverage = collateral_value.inner() / equity;

    let (liquidation_price, health_factor) = if debt_value_usd.is_zero() {
        // No debt: liquidation is unreachable.
        (UsdValue::ZERO, HealthFactor::NeverLiquidatable)
    } else {
        let liq = debt_value_usd / (collateral_amount.inner() * liquidation_threshold);
        let hf = collateral_amount.value_at(reference_price).inner() * liquidation_threshold
            / debt_value_usd.inner();
        (liq, HealthFactor::Finite(hf))
    };

    Ok(PositionFigures {
        collateral_amount,
        debt_value_usd,
        additional_collateral,
        total_exposure,
        realized_leverage,
        liquidation_price,
        health_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ltv_for_common_leverages() {
        assert_eq!(loan_to_value(dec!(1.5)).unwrap(), dec!(1) / dec!(3));
        assert_eq!(loan_to_value(dec!(2)).unwrap(), dec!(0.5));
    }

    #[test]
    fn test_ltv_in_unit_interval() {
        for lev in [dec!(1.01), dec!(1.5), dec!(2), dec!(3), dec!(10)] {
            let ltv = loan_to_value(lev).unwrap();
            assert!(ltv > Decimal::ZERO && ltv < Decimal::ONE, "ltv {ltv} for {lev}");
        }
    }

    #[test]
    fn test_ltv_rejects_degenerate_leverage() {
        assert!(loan_to_value(dec!(1)).is_err());
        assert!(loan_to_value(dec!(0.5)).is_err());
        assert!(loan_to_value(dec!(-2)).is_err());
    }

    #[test]
    fn test_borrow_sizing_reference_case() {
        // 1 sBTC at $60k, 1.5x: borrow $20k, buy back 1/3 sBTC.
        let sizing =
            size_borrow(Amount::new(dec!(1)), UsdValue::new(dec!(60000)), dec!(1.5)).unwrap();

        assert_eq!(sizing.borrow_value_usd.inner().round_dp(2), dec!(20000));
        assert_eq!(sizing.additional_collateral.inner().round_dp(8), dec!(0.33333333));
    }

    #[test]
    fn test_borrow_sizing_rejects_zero_collateral() {
        let err = size_borrow(Amount::ZERO, UsdValue::new(dec!(60000)), dec!(1.5)).unwrap_err();
        assert!(matches!(err, MathError::InvalidParameter(_)));
    }

    #[test]
    fn test_borrow_sizing_rejects_zero_price() {
        let err = size_borrow(Amount::new(dec!(1)), UsdValue::ZERO, dec!(1.5)).unwrap_err();
        assert_eq!(err, MathError::PriceUnavailable);
    }

    #[test]
    fn test_round_trip_reproduces_target_leverage() {
        let price = UsdValue::new(dec!(60000));
        let collateral = Amount::new(dec!(1));
        let sizing = size_borrow(collateral, price, dec!(1.5)).unwrap();

        let figures = position_figures(
            collateral,
            price,
            sizing.borrow_value_usd,
            sizing.additional_collateral,
            dec!(0.8),
        )
        .unwrap();

        assert_eq!(figures.realized_leverage.round_dp(8), dec!(1.5));
        assert_eq!(figures.total_exposure.inner().round_dp(8), dec!(1.33333333));
    }

    #[test]
    fn test_health_factor_never_liquidatable_iff_zero_debt() {
        let figures = position_figures(
            Amount::new(dec!(1)),
            UsdValue::new(dec!(60000)),
            UsdValue::ZERO,
            Amount::ZERO,
            dec!(0.8),
        )
        .unwrap();
        assert!(figures.health_factor.is_never_liquidatable());
        assert_eq!(figures.liquidation_price, UsdValue::ZERO);

        let figures = position_figures(
            Amount::new(dec!(1)),
            UsdValue::new(dec!(60000)),
            UsdValue::new(dec!(1)),
            Amount::ZERO,
            dec!(0.8),
        )
        .unwrap();
        assert!(!figures.health_factor.is_never_liquidatable());
    }

    #[test]
    fn test_health_factor_reference_case() {
        // HF = (1 * 60000 * 0.8) / 20000 = 2.4
        let figures = position_figures(
            Amount::new(dec!(1)),
            UsdValue::new(dec!(60000)),
            UsdValue::new(dec!(20000)),
            Amount::new(dec!(0.33333333)),
            dec!(0.8),
        )
        .unwrap();

        assert_eq!(figures.health_factor.ratio().unwrap(), dec!(2.4));
        // Liquidation at 20000 / (1 * 0.8) = 25000.
        assert_eq!(figures.liquidation_price.inner(), dec!(25000));
    }

    #[test]
    fn test_health_factor_decreasing_in_debt() {
        let hf = |debt: Decimal| {
            position_figures(
                Amount::new(dec!(1)),
                UsdValue::new(dec!(60000)),
                UsdValue::new(debt),
                Amount::ZERO,
                dec!(0.8),
            )
            .unwrap()
            .health_factor
            .ratio()
            .unwrap()
        };

        assert!(hf(dec!(10000)) > hf(dec!(20000)));
        assert!(hf(dec!(20000)) > hf(dec!(40000)));
    }

    #[test]
    fn test_health_factor_increasing_in_price() {
        let hf = |price: Decimal| {
            position_figures(
                Amount::new(dec!(1)),
                UsdValue::new(price),
                UsdValue::new(dec!(20000)),
                Amount::ZERO,
                dec!(0.8),
            )
            .unwrap()
            .health_factor
            .ratio()
            .unwrap()
        };

        assert!(hf(dec!(70000)) > hf(dec!(60000)));
        assert!(hf(dec!(60000)) > hf(dec!(50000)));
    }

    #[test]
    fn test_figures_reject_debt_exceeding_collateral_value() {
        let err = position_figures(
            Amount::new(dec!(1)),
            UsdValue::new(dec!(60000)),
            UsdValue::new(dec!(60000)),
            Amount::ZERO,
            dec!(0.8),
        )
        .unwrap_err();
        assert!(matches!(err, MathError::InvalidParameter(_)));
    }

    #[test]
    fn test_figures_reject_bad_threshold() {
        let run = |t: Decimal| {
            position_figures(
                Amount::new(dec!(1)),
                UsdValue::new(dec!(60000)),
                UsdValue::new(dec!(20000)),
                Amount::ZERO,
                t,
            )
        };
        assert!(run(dec!(0)).is_err());
        assert!(run(dec!(1.2)).is_err());
        assert!(run(dec!(0.8)).is_ok());
    }
}
