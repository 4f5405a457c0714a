//! Pyth Hermes HTTP client.
//!
//! Fetches the latest published price for a configured set of feeds via
//! `GET /v2/updates/price/latest`. Prices older than the configured maximum
//! age are rejected as unavailable rather than silently served.

use boost_core::UsdValue;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::{BoxFuture, PriceOracle, ReferencePrice};
use crate::error::{OracleError, OracleResult};

/// Default timeout for feed requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pyth feed identifiers for the symbols the engine prices.
const BTC_USD_FEED: &str = "e62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43";
const STX_USD_FEED: &str = "ec7a775f46379b5e943c3526b1c8d54cd49749176b0b98e02dde68d1bd335c17";

/// Configuration for the Pyth client.
#[derive(Debug, Clone)]
pub struct PythConfig {
    /// Hermes endpoint base URL.
    pub endpoint: String,
    /// Maximum acceptable price age in seconds.
    pub max_age_secs: i64,
    /// Symbol to feed-id mapping.
    pub feeds: HashMap<String, String>,
}

impl Default for PythConfig {
    fn default() -> Self {
        let mut feeds = HashMap::new();
        feeds.insert("BTC/USD".to_string(), BTC_USD_FEED.to_string());
        feeds.insert("STX/USD".to_string(), STX_USD_FEED.to_string());
        Self {
            endpoint: "https://hermes.pyth.network".to_string(),
            max_age_secs: 120,
            feeds,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestPriceResponse {
    parsed: Vec<ParsedFeed>,
}

#[derive(Debug, Deserialize)]
struct ParsedFeed {
    id: String,
    price: FeedPrice,
}

#[derive(Debug, Deserialize)]
struct FeedPrice {
    /// Fixed-point mantissa as a decimal string.
    price: String,
    /// Power-of-ten exponent, typically negative.
    expo: i32,
    /// Unix seconds of publication.
    publish_time: i64,
}

impl FeedPrice {
    /// Scale the fixed-point mantissa into a decimal price.
    fn to_decimal(&self) -> OracleResult<Decimal> {
        let mantissa: i128 = self
            .price
            .parse()
            .map_err(|_| OracleError::HttpClient(format!("bad price mantissa: {}", self.price)))?;

        if self.expo < 0 {
            Decimal::try_from_i128_with_scale(mantissa, self.expo.unsigned_abs())
                .map_err(|e| OracleError::HttpClient(format!("price out of range: {e}")))
        } else {
            let base = Decimal::try_from_i128_with_scale(mantissa, 0)
                .map_err(|e| OracleError::HttpClient(format!("price out of range: {e}")))?;
            Ok(base * Decimal::from(10u64.pow(self.expo as u32)))
        }
    }
}

/// HTTP client for the Pyth Hermes price API.
pub struct PythClient {
    client: Client,
    config: PythConfig,
}

impl PythClient {
    /// Create a new Pyth client.
    pub fn new(config: PythConfig) -> OracleResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| OracleError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn fetch(&self, symbol: &str) -> OracleResult<ReferencePrice> {
        let feed_id = self
            .config
            .feeds
            .get(symbol)
            .ok_or_else(|| OracleError::UnknownSymbol(symbol.to_string()))?;

        let url = format!("{}/v2/updates/price/latest", self.config.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("ids[]", feed_id.as_str())])
            .send()
            .await
            .map_err(|e| OracleError::unavailable(symbol, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::unavailable(symbol, format!("HTTP {status}")));
        }

        let body: LatestPriceResponse = response
            .json()
            .await
            .map_err(|e| OracleError::unavailable(symbol, format!("bad response: {e}")))?;

        let feed = body
            .parsed
            .iter()
            .find(|f| f.id.trim_start_matches("0x") == feed_id.trim_start_matches("0x"))
            .ok_or_else(|| OracleError::unavailable(symbol, "feed missing from response"))?;

        let price = feed.price.to_decimal()?;
        if price <= Decimal::ZERO {
            return Err(OracleError::unavailable(symbol, "non-positive price"));
        }

        let as_of = Utc
            .timestamp_opt(feed.price.publish_time, 0)
            .single()
            .ok_or_else(|| OracleError::unavailable(symbol, "bad publish time"))?;

        let reference = ReferencePrice::new(UsdValue::new(price), as_of);
        if reference.age_secs() > self.config.max_age_secs {
            warn!(symbol, age_secs = reference.age_secs(), "Stale oracle price");
            return Err(OracleError::unavailable(
                symbol,
                format!("stale price, age {}s", reference.age_secs()),
            ));
        }

        debug!(symbol, price = %reference.price, "Fetched reference price");
        Ok(reference)
    }
}

impl PriceOracle for PythClient {
    fn reference_price(&self, symbol: &str) -> BoxFuture<'_, OracleResult<ReferencePrice>> {
        let symbol = symbol.to_string();
        Box::pin(async move { self.fetch(&symbol).await })
    }
}
