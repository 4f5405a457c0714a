//! End-to-end flow tests for the engine against mock adapters.

use boost_chain::{ConfirmationPoller, MockStatusClient, PollerConfig, TxStatus};
use boost_core::{Amount, CollateralAsset, DebtAsset, UsdValue};
use boost_dex::{MockSwapExecutor, MockVenue, QuoteAggregator, VenueId};
use boost_engine::{
    BoostEngine, DeleverageParams, EngineConfig, EngineError, FlowFailure, LeverageParams,
    StepSequencer, SwapParams,
};
use boost_lending::{MarketCall, MockLendingMarket, RepayAmount};
use boost_math::HealthFactor;
use boost_oracle::MockPriceOracle;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

struct Rig {
    oracle: Arc<MockPriceOracle>,
    lending: Arc<MockLendingMarket>,
    swapper: Arc<MockSwapExecutor>,
    status: Arc<MockStatusClient>,
    engine: BoostEngine,
}

fn rig_with_venues(venues: Vec<Arc<MockVenue>>) -> Rig {
    let oracle = Arc::new(MockPriceOracle::new());
    oracle.set_price(UsdValue::new(dec!(60000)));

    let lending = Arc::new(MockLendingMarket::new());
    let swapper = Arc::new(MockSwapExecutor::new());
    let status = Arc::new(MockStatusClient::new());
    status.set_fallback(TxStatus::Success);

    let aggregator = Arc::new(QuoteAggregator::new(
        venues
            .into_iter()
            .map(|v| v as boost_dex::DynQuoteVenue)
            .collect(),
    ));

    let poller = ConfirmationPoller::new(
        status.clone(),
        PollerConfig {
            poll_interval: Duration::from_millis(1),
            max_attempts: 3,
        },
    );

    let sequencer = StepSequencer::new(
        lending.clone(),
        aggregator.clone(),
        swapper.clone(),
        poller,
    );

    let engine = BoostEngine::new(
        oracle.clone(),
        aggregator,
        sequencer,
        EngineConfig::default(),
    );

    Rig {
        oracle,
        lending,
        swapper,
        status,
        engine,
    }
}

fn rig() -> Rig {
    rig_with_venues(vec![Arc::new(MockVenue::new(
        VenueId::Alex,
        Some(dec!(0.3333)),
    ))])
}

fn leverage_params() -> LeverageParams {
    LeverageParams {
        collateral_asset: CollateralAsset::Sbtc,
        collateral_amount: Amount::new(dec!(1)),
        target_leverage: None,
        stablecoin: None,
        slippage_bps: None,
    }
}

fn deleverage_params() -> DeleverageParams {
    DeleverageParams {
        collateral_asset: CollateralAsset::Sbtc,
        wallet_collateral: Amount::new(dec!(0.3)),
        debt_asset: DebtAsset::Aeusdc,
        debt_amount: Some(UsdValue::new(dec!(20000))),
        collateral_amount: Amount::new(dec!(1)),
        repay_all: true,
        slippage_bps: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_leverage_runs_supply_borrow_swap() {
    let rig = rig();

    let outcome = rig.engine.leverage(&leverage_params()).await.unwrap();

    // 1 sBTC at 60k with default 1.5x leverage borrows 20k USD.
    let calls = rig.lending.calls();
    assert!(calls.iter().any(|c| matches!(
        c,
        MarketCall::Borrow { amount, .. } if *amount == UsdValue::new(dec!(20000))
    )));

    // The position report uses realized amounts.
    assert_eq!(outcome.position.debt_value_usd, UsdValue::new(dec!(20000)));
    assert_eq!(
        outcome.position.additional_collateral,
        Amount::new(dec!(0.3333))
    );
    assert_eq!(outcome.quotes.quotes.len(), 1);

    // All three transactions confirmed means three status lookups.
    assert_eq!(rig.status.lookup_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_leverage_swap_is_funded_by_realized_borrow() {
    let rig = rig();
    rig.engine.leverage(&leverage_params()).await.unwrap();

    let (submitted, slippage) = rig.swapper.submissions().pop().unwrap();
    assert_eq!(submitted.quote.amount_in, dec!(20000));
    assert_eq!(slippage, 50);
}

#[tokio::test(start_paused = true)]
async fn test_leverage_stale_price_aborts_before_any_submission() {
    let rig = rig();
    rig.oracle.set_unavailable();

    let failure = rig.engine.leverage(&leverage_params()).await.unwrap_err();

    assert!(matches!(
        failure,
        FlowFailure::Preflight(EngineError::PriceUnavailable(_))
    ));
    assert!(rig.lending.calls().is_empty());
    assert_eq!(rig.status.lookup_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_leverage_rejects_excessive_slippage() {
    let rig = rig();
    let mut params = leverage_params();
    params.slippage_bps = Some(1000);

    let failure = rig.engine.leverage(&params).await.unwrap_err();

    assert!(matches!(
        failure,
        FlowFailure::Preflight(EngineError::InvalidParameter(_))
    ));
    assert!(rig.lending.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_leverage_borrow_revert_reports_confirmed_steps() {
    let rig = rig();
    // Supply confirms, borrow reverts on-chain.
    rig.status.push(Ok(TxStatus::Success));
    rig.status.push(Ok(TxStatus::AbortByResponse));

    let failure = rig.engine.leverage(&leverage_params()).await.unwrap_err();

    match failure {
        FlowFailure::Sequence(seq) => {
            assert_eq!(seq.completed.len(), 1);
            assert_eq!(seq.step_index, 1);
            assert!(matches!(seq.cause, EngineError::Reverted { .. }));
        }
        other => panic!("expected sequence failure, got {other}"),
    }
    // No compensating transactions: exactly supply and borrow were sent.
    assert_eq!(rig.lending.calls().len(), 2);
    assert_eq!(rig.swapper.submission_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_leverage_quote_submits_nothing() {
    let rig = rig();

    let quote = rig.engine.leverage_quote(&leverage_params()).await.unwrap();

    assert_eq!(quote.position.debt_value_usd, UsdValue::new(dec!(20000)));
    assert_eq!(quote.position.realized_leverage, dec!(1.5));
    assert_eq!(quote.reference_price.price, UsdValue::new(dec!(60000)));
    match quote.position.health_factor {
        HealthFactor::Finite(ratio) => assert!(ratio > dec!(1)),
        HealthFactor::NeverLiquidatable => panic!("leveraged position has debt"),
    }

    assert!(rig.lending.calls().is_empty());
    assert_eq!(rig.swapper.submission_count(), 0);
    assert_eq!(rig.status.lookup_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_deleverage_repays_max_even_with_numeric_debt() {
    let rig = rig();

    let outcome = rig.engine.deleverage(&deleverage_params()).await.unwrap();

    // repay_all wins over the numeric figure: interest accrues after quoting.
    let calls = rig.lending.calls();
    assert!(calls.contains(&MarketCall::Repay {
        asset: DebtAsset::Aeusdc,
        amount: RepayAmount::Max,
    }));
    assert!(calls.iter().any(|c| matches!(
        c,
        MarketCall::Withdraw { amount, .. } if *amount == Amount::new(dec!(1))
    )));
    assert_eq!(outcome.recovered_collateral, Amount::new(dec!(1)));
}

#[tokio::test(start_paused = true)]
async fn test_deleverage_partial_repay_uses_exact_amount() {
    let rig = rig();
    let mut params = deleverage_params();
    params.repay_all = false;

    rig.engine.deleverage(&params).await.unwrap();

    assert!(rig.lending.calls().contains(&MarketCall::Repay {
        asset: DebtAsset::Aeusdc,
        amount: RepayAmount::Exact(UsdValue::new(dec!(20000))),
    }));
}

#[tokio::test(start_paused = true)]
async fn test_deleverage_partial_repay_requires_debt_amount() {
    let rig = rig();
    let mut params = deleverage_params();
    params.repay_all = false;
    params.debt_amount = None;

    let failure = rig.engine.deleverage(&params).await.unwrap_err();

    assert!(matches!(
        failure,
        FlowFailure::Preflight(EngineError::InvalidParameter(_))
    ));
    assert!(rig.lending.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_swap_executes_best_quote() {
    // Second venue quotes higher output and must win.
    let rig = rig_with_venues(vec![
        Arc::new(MockVenue::new(VenueId::Alex, Some(dec!(100)))),
        Arc::new(MockVenue::new(VenueId::Velar, Some(dec!(105)))),
    ]);

    let outcome = rig
        .engine
        .swap(&SwapParams {
            from: CollateralAsset::Sbtc.into(),
            to: DebtAsset::Aeusdc.into(),
            amount: dec!(0.5),
            slippage_bps: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.selected.venue(), VenueId::Velar);
    assert_eq!(outcome.quotes.quotes.len(), 2);
    assert_eq!(rig.swapper.submission_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_swap_quote_submits_nothing() {
    let rig = rig();

    let (selected, set) = rig
        .engine
        .swap_quote(&SwapParams {
            from: CollateralAsset::Sbtc.into(),
            to: DebtAsset::Aeusdc.into(),
            amount: dec!(0.5),
            slippage_bps: None,
        })
        .await
        .unwrap();

    assert_eq!(selected.venue(), VenueId::Alex);
    assert_eq!(set.amount_in, dec!(0.5));
    assert_eq!(rig.swapper.submission_count(), 0);
    assert_eq!(rig.status.lookup_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_swap_rejects_non_positive_amount() {
    let rig = rig();

    let failure = rig
        .engine
        .swap(&SwapParams {
            from: CollateralAsset::Sbtc.into(),
            to: DebtAsset::Aeusdc.into(),
            amount: dec!(0),
            slippage_bps: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        failure,
        FlowFailure::Preflight(EngineError::InvalidParameter(_))
    ));
}
