//! Price oracle trait.
//!
//! Trait-based abstraction over the reference price source, allowing
//! dependency injection for testing and alternative feed backends.

use boost_core::UsdValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::OracleResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// A reference price with its observation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePrice {
    /// Price in USD.
    pub price: UsdValue,
    /// When the feed published this price.
    pub as_of: DateTime<Utc>,
}

impl ReferencePrice {
    pub fn new(price: UsdValue, as_of: DateTime<Utc>) -> Self {
        Self { price, as_of }
    }

    /// Age of this observation in seconds.
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.as_of).num_seconds()
    }
}

/// Source of reference prices for collateral assets.
///
/// Implementations must fail with `OracleError::PriceUnavailable` when the
/// feed is stale or unreachable rather than returning a best guess: the
/// price gates borrow sizing.
pub trait PriceOracle: Send + Sync {
    /// Fetch the current reference price for a symbol (e.g., "BTC/USD").
    fn reference_price(&self, symbol: &str) -> BoxFuture<'_, OracleResult<ReferencePrice>>;
}

/// Arc wrapper for PriceOracle trait objects.
pub type DynPriceOracle = Arc<dyn PriceOracle>;

/// Mock oracle for testing.
#[derive(Debug, Default)]
pub struct MockPriceOracle {
    /// Next price to return, or None to report unavailability.
    next_price: parking_lot::Mutex<Option<ReferencePrice>>,
}

impl MockPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a fixed price to return.
    pub fn set_price(&self, price: UsdValue) {
        *self.next_price.lock() = Some(ReferencePrice::new(price, Utc::now()));
    }

    /// Make subsequent lookups fail with `PriceUnavailable`.
    pub fn set_unavailable(&self) {
        *self.next_price.lock() = None;
    }
}

impl PriceOracle for MockPriceOracle {
    fn reference_price(&self, symbol: &str) -> BoxFuture<'_, OracleResult<ReferencePrice>> {
        let symbol = symbol.to_string();
        Box::pin(async move {
            (*self.next_price.lock())
                .ok_or_else(|| crate::error::OracleError::unavailable(symbol, "mock unavailable"))
        })
    }
}
