//! CLI wiring for the boost engine's read-only operations.
//!
//! Execution flows need a signing backend and are wired by embedding
//! applications; the CLI exposes the operations that only need public
//! endpoints: leverage quoting and transaction status tracking.

pub mod config;
pub mod error;

pub use config::{AppConfig, OracleConfig, PollerSettings, TradingConfig};
pub use error::{AppError, AppResult};
