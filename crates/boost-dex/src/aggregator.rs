//! Quote fan-out and best-execution selection.

use boost_core::Asset;
use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{DexError, DexResult};
use crate::quote::{QuoteSet, SelectedQuote, VenueQuote};
use crate::venue::DynQuoteVenue;

/// Queries every enabled venue and selects the best quote.
///
/// The venue list order is the configured priority order; it decides ties
/// and nothing else. Venue queries run concurrently, and `join_all`
/// preserves input order, so selection never depends on which venue
/// answered first.
pub struct QuoteAggregator {
    venues: Vec<DynQuoteVenue>,
}

impl QuoteAggregator {
    /// Create an aggregator over venues in priority order.
    pub fn new(venues: Vec<DynQuoteVenue>) -> Self {
        Self { venues }
    }

    /// Number of enabled venues.
    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    /// Collect quotes from every venue for one pair+amount request.
    ///
    /// A venue that errors or has no route is omitted from the set with a
    /// warning; per-venue failure is never fatal for the aggregation call.
    pub async fn all_quotes(&self, from: Asset, to: Asset, amount: Decimal) -> QuoteSet {
        let queries = self
            .venues
            .iter()
            .map(|venue| venue.quote(from, to, amount));
        let settled = join_all(queries).await;

        let mut quotes = Vec::with_capacity(settled.len());
        for (venue, outcome) in self.venues.iter().zip(settled) {
            match outcome {
                Ok(Some(quote)) => {
                    debug!(
                        venue = %venue.id(),
                        amount_out = %quote.amount_out,
                        "Venue quote received"
                    );
                    quotes.push(quote);
                }
                Ok(None) => {
                    debug!(venue = %venue.id(), %from, %to, "Venue has no route");
                }
                Err(e) => {
                    warn!(venue = %venue.id(), error = %e, "Venue quote failed, omitting");
                }
            }
        }

        QuoteSet {
            from,
            to,
            amount_in: amount,
            quotes,
        }
    }

    /// Select the quote maximizing `amount_out`.
    ///
    /// Ties go to the venue earliest in configured priority order. Fails
    /// with `NoRouteAvailable` when the set is empty.
    pub fn select_best(&self, set: &QuoteSet) -> DexResult<SelectedQuote> {
        let best: Option<&VenueQuote> = set.quotes.iter().fold(None, |best, candidate| {
            match best {
                // Strictly greater wins; equal keeps the earlier venue.
                Some(current) if candidate.amount_out > current.amount_out => Some(candidate),
                Some(current) => Some(current),
                None => Some(candidate),
            }
        });

        match best {
            Some(quote) => {
                debug!(
                    venue = %quote.venue,
                    amount_out = %quote.amount_out,
                    candidates = set.len(),
                    "Selected best quote"
                );
                Ok(SelectedQuote {
                    from: set.from,
                    to: set.to,
                    quote: quote.clone(),
                })
            }
            None => Err(DexError::NoRouteAvailable {
                from: set.from.to_string(),
                to: set.to.to_string(),
            }),
        }
    }

    /// Convenience: fan out, then select.
    pub async fn best_quote(
        &self,
        from: Asset,
        to: Asset,
        amount: Decimal,
    ) -> DexResult<(SelectedQuote, QuoteSet)> {
        let set = self.all_quotes(from, to, amount).await;
        let selected = self.select_best(&set)?;
        Ok((selected, set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::{MockVenue, VenueId};
    use boost_core::{CollateralAsset, DebtAsset};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    fn pair() -> (Asset, Asset) {
        (DebtAsset::Aeusdc.into(), CollateralAsset::Sbtc.into())
    }

    #[tokio::test]
    async fn test_tie_breaks_by_priority_order() {
        // A: 100, B: 105, C: 105 — B wins because it precedes C.
        let a = Arc::new(MockVenue::new(VenueId::Alex, Some(dec!(100))));
        let b = Arc::new(MockVenue::new(VenueId::Velar, Some(dec!(105))));
        let c = Arc::new(MockVenue::new(VenueId::Bitflow, Some(dec!(105))));
        let aggregator = QuoteAggregator::new(vec![a, b, c]);

        let (from, to) = pair();
        let set = aggregator.all_quotes(from, to, dec!(1000)).await;
        let selected = aggregator.select_best(&set).unwrap();

        assert_eq!(selected.venue(), VenueId::Velar);
        assert_eq!(selected.amount_out(), dec!(105));
    }

    #[tokio::test]
    async fn test_selection_independent_of_completion_order() {
        // The higher-priority tying venue answers last; it must still win.
        let b = Arc::new(MockVenue::new(VenueId::Velar, Some(dec!(105))));
        b.set_delay(Duration::from_millis(50));
        let c = Arc::new(MockVenue::new(VenueId::Bitflow, Some(dec!(105))));
        let aggregator = QuoteAggregator::new(vec![b, c]);

        let (from, to) = pair();
        let selected = aggregator
            .best_quote(from, to, dec!(1000))
            .await
            .unwrap()
            .0;

        assert_eq!(selected.venue(), VenueId::Velar);
    }

    #[tokio::test]
    async fn test_failing_venue_is_omitted_not_fatal() {
        let ok = Arc::new(MockVenue::new(VenueId::Alex, Some(dec!(100))));
        let bad = Arc::new(MockVenue::failing(VenueId::Velar, "upstream 500"));
        let no_route = Arc::new(MockVenue::new(VenueId::Bitflow, None));
        let aggregator = QuoteAggregator::new(vec![bad, no_route, ok.clone()]);

        let (from, to) = pair();
        let set = aggregator.all_quotes(from, to, dec!(1000)).await;

        assert_eq!(set.len(), 1);
        let selected = aggregator.select_best(&set).unwrap();
        assert_eq!(selected.venue(), VenueId::Alex);
        assert_eq!(ok.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_set_is_no_route() {
        let bad = Arc::new(MockVenue::failing(VenueId::Alex, "down"));
        let no_route = Arc::new(MockVenue::new(VenueId::Velar, None));
        let aggregator = QuoteAggregator::new(vec![bad, no_route]);

        let (from, to) = pair();
        let err = aggregator.best_quote(from, to, dec!(1000)).await.unwrap_err();
        assert!(matches!(err, DexError::NoRouteAvailable { .. }));
    }

    #[tokio::test]
    async fn test_all_venues_queried_once() {
        let venues: Vec<Arc<MockVenue>> = VenueId::ALL
            .iter()
            .map(|&id| Arc::new(MockVenue::new(id, Some(dec!(1)))))
            .collect();
        let aggregator =
            QuoteAggregator::new(venues.iter().map(|v| v.clone() as DynQuoteVenue).collect());

        let (from, to) = pair();
        aggregator.all_quotes(from, to, dec!(10)).await;

        for venue in &venues {
            assert_eq!(venue.call_count(), 1);
        }
    }
}
