//! Swap venues.
//!
//! Venue identifiers are a closed enum internally; config names them as
//! strings and they are validated once at the boundary.

use boost_core::{Asset, CoreError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::DexResult;
use crate::quote::VenueQuote;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// DEX venues the aggregator can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueId {
    Alex,
    Velar,
    Bitflow,
    Faktory,
}

impl VenueId {
    pub const ALL: [Self; 4] = [Self::Alex, Self::Velar, Self::Bitflow, Self::Faktory];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alex => "alex",
            Self::Velar => "velar",
            Self::Bitflow => "bitflow",
            Self::Faktory => "faktory",
        }
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alex" => Ok(Self::Alex),
            "velar" => Ok(Self::Velar),
            "bitflow" => Ok(Self::Bitflow),
            "faktory" => Ok(Self::Faktory),
            other => Err(CoreError::UnknownAsset(format!("unknown venue: {other}"))),
        }
    }
}

/// A single venue's quoting interface.
///
/// Returning `Ok(None)` means the venue has no route for the pair; that is
/// an ordinary outcome, not an error. `Err` covers transport and venue-side
/// failures. The aggregator treats both as "omit this venue".
pub trait QuoteVenue: Send + Sync {
    /// Which venue this is; used for priority tie-breaking and reporting.
    fn id(&self) -> VenueId;

    /// Quote swapping `amount` of `from` into `to`.
    fn quote(
        &self,
        from: Asset,
        to: Asset,
        amount: Decimal,
    ) -> BoxFuture<'_, DexResult<Option<VenueQuote>>>;
}

/// Arc wrapper for QuoteVenue trait objects.
pub type DynQuoteVenue = Arc<dyn QuoteVenue>;

/// Mock venue for testing.
pub struct MockVenue {
    id: VenueId,
    /// Amount out to quote, or None for "no route".
    amount_out: parking_lot::Mutex<Option<Decimal>>,
    /// When set, quote calls fail with this reason.
    fail_with: parking_lot::Mutex<Option<String>>,
    /// Artificial delay before answering, to exercise completion-order
    /// independence in tests.
    delay: parking_lot::Mutex<std::time::Duration>,
    /// Number of quote calls received.
    calls: std::sync::atomic::AtomicU32,
}

impl MockVenue {
    pub fn new(id: VenueId, amount_out: Option<Decimal>) -> Self {
        Self {
            id,
            amount_out: parking_lot::Mutex::new(amount_out),
            fail_with: parking_lot::Mutex::new(None),
            delay: parking_lot::Mutex::new(std::time::Duration::ZERO),
            calls: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub fn failing(id: VenueId, reason: impl Into<String>) -> Self {
        let venue = Self::new(id, None);
        *venue.fail_with.lock() = Some(reason.into());
        venue
    }

    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock() = delay;
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl QuoteVenue for MockVenue {
    fn id(&self) -> VenueId {
        self.id
    }

    fn quote(
        &self,
        from: Asset,
        to: Asset,
        amount: Decimal,
    ) -> BoxFuture<'_, DexResult<Option<VenueQuote>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

            let delay = *self.delay.lock();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            if let Some(reason) = self.fail_with.lock().clone() {
                return Err(crate::error::DexError::VenueQuote {
                    venue: self.id.to_string(),
                    reason,
                });
            }

            Ok(self.amount_out.lock().map(|out| VenueQuote {
                venue: self.id,
                amount_in: amount,
                amount_out: out,
                route: vec![from.as_str().to_string(), to.as_str().to_string()],
                fee: Decimal::ZERO,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_roundtrip() {
        for venue in VenueId::ALL {
            assert_eq!(venue.as_str().parse::<VenueId>().unwrap(), venue);
        }
    }

    #[test]
    fn test_unknown_venue_rejected() {
        assert!("uniswap".parse::<VenueId>().is_err());
    }
}
