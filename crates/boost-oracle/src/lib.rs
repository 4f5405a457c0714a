//! Reference price feeds for the stx-boost engine.
//!
//! Exposes the `PriceOracle` trait consumed by the quote and sizing paths,
//! plus an HTTP client for the Pyth Hermes API.

pub mod client;
pub mod error;
pub mod pyth;

pub use client::{DynPriceOracle, MockPriceOracle, PriceOracle, ReferencePrice};
pub use error::{OracleError, OracleResult};
pub use pyth::{PythClient, PythConfig};
