//! Boost agent entry point.

use anyhow::Result;
use boost_agent::AppConfig;
use boost_chain::{ConfirmationPoller, StacksApiClient, TransactionStatusClient};
use boost_core::{CollateralAsset, TransactionHandle, TxId};
use boost_math::{position_figures, size_borrow};
use boost_oracle::{PriceOracle, PythClient};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Stacks leverage boost agent.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BOOST_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote a leveraged position without submitting anything.
    Quote {
        /// Collateral asset (sbtc, ststx, wstx).
        #[arg(long, default_value = "sbtc")]
        asset: CollateralAsset,
        /// Collateral amount in asset-native units.
        #[arg(long)]
        amount: Decimal,
        /// Target leverage; the configured default when absent.
        #[arg(long)]
        leverage: Option<Decimal>,
    },
    /// Look up a transaction's status, optionally polling to a terminal state.
    TxStatus {
        /// Transaction identifier.
        tx_id: String,
        /// Poll until confirmed/reverted or the attempt budget runs out.
        #[arg(long)]
        wait: bool,
    },
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    asset: CollateralAsset,
    reference_price: boost_oracle::ReferencePrice,
    target_leverage: Decimal,
    loan_to_value: Decimal,
    borrow_value_usd: boost_core::UsdValue,
    position: boost_math::PositionFigures,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    boost_telemetry::init_logging()?;

    info!("Starting boost agent v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    info!(network = %config.network, "Configuration loaded");

    match args.command {
        Command::Quote {
            asset,
            amount,
            leverage,
        } => quote(&config, asset, amount, leverage).await,
        Command::TxStatus { tx_id, wait } => tx_status(&config, tx_id, wait).await,
    }
}

async fn quote(
    config: &AppConfig,
    asset: CollateralAsset,
    amount: Decimal,
    leverage: Option<Decimal>,
) -> Result<()> {
    let oracle = PythClient::new(config.oracle.clone().into())?;
    let target_leverage = leverage.unwrap_or(config.trading.default_leverage);

    let price = oracle.reference_price(asset.price_symbol()).await?;

    let collateral = boost_core::Amount::new(amount);
    let sizing = size_borrow(collateral, price.price, target_leverage)?;
    let position = position_figures(
        collateral,
        price.price,
        sizing.borrow_value_usd,
        sizing.additional_collateral,
        config.trading.liquidation_threshold,
    )?;

    let report = QuoteReport {
        asset,
        reference_price: price,
        target_leverage,
        loan_to_value: sizing.loan_to_value,
        borrow_value_usd: sizing.borrow_value_usd,
        position,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn tx_status(config: &AppConfig, tx_id: String, wait: bool) -> Result<()> {
    let client = Arc::new(StacksApiClient::new(config.api_url())?);
    let tx_id = TxId::new(tx_id);

    if wait {
        let poller = ConfirmationPoller::new(client, config.poller.clone().into());
        let handle = TransactionHandle::new(tx_id.clone());
        let terminal = poller.await_terminal(&handle).await;
        info!(tx_id = %tx_id, status = ?terminal, "Transaction reached terminal state");
        println!("{}", serde_json::to_string(&terminal)?);
    } else {
        let status = client.status(&tx_id).await?;
        println!("{}", serde_json::to_string(&status)?);
    }
    Ok(())
}
