//! Quote data model.
//!
//! A `QuoteSet` is transient: it exists for the duration of one aggregation
//! call, yields exactly one `SelectedQuote`, and is carried along in
//! responses for reporting.

use boost_core::Asset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::venue::VenueId;

/// One venue's execution quote for a pair and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueQuote {
    /// Quoting venue.
    pub venue: VenueId,
    /// Input amount, in `from`-asset units.
    pub amount_in: Decimal,
    /// Quoted output amount, in `to`-asset units.
    pub amount_out: Decimal,
    /// Ordered pool/token hops the venue would route through.
    pub route: Vec<String>,
    /// Estimated fee in `from`-asset units.
    pub fee: Decimal,
}

/// All usable quotes collected for one pair+amount request.
///
/// Quotes are stored in configured venue priority order regardless of which
/// venue answered first, so selection is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSet {
    pub from: Asset,
    pub to: Asset,
    pub amount_in: Decimal,
    pub quotes: Vec<VenueQuote>,
}

impl QuoteSet {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }
}

/// The winning quote plus the pair it was selected for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedQuote {
    pub from: Asset,
    pub to: Asset,
    pub quote: VenueQuote,
}

impl SelectedQuote {
    /// Venue that won the selection.
    pub fn venue(&self) -> VenueId {
        self.quote.venue
    }

    /// Quoted output amount.
    pub fn amount_out(&self) -> Decimal {
        self.quote.amount_out
    }
}
