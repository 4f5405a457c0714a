//! Lending-market adapter boundary.
//!
//! The engine drives supply/borrow/repay/withdraw through the
//! `LendingMarket` trait; the signed contract-call implementation lives
//! outside this workspace's core and is injected at wiring time.

pub mod error;
pub mod market;

pub use error::{LendingError, LendingResult};
pub use market::{
    DynLendingMarket, InterestRateMode, LendingMarket, MockLendingMarket, MarketCall, RepayAmount,
};
