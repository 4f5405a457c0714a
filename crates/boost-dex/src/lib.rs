//! Multi-venue swap quote aggregation.
//!
//! Queries every enabled DEX venue for an execution quote on a token
//! pair/amount, then selects the best one under a deterministic tie-break
//! rule. Venue queries fan out concurrently; selection happens only after
//! all of them settle.

pub mod aggregator;
pub mod error;
pub mod executor;
pub mod quote;
pub mod venue;

pub use aggregator::QuoteAggregator;
pub use error::{DexError, DexResult};
pub use executor::{DynSwapExecutor, MockSwapExecutor, SwapExecutor};
pub use quote::{QuoteSet, SelectedQuote, VenueQuote};
pub use venue::{DynQuoteVenue, MockVenue, QuoteVenue, VenueId};
