//! Structured logging for the boost engine.
//!
//! JSON output in production, pretty output in development, selected by
//! `RUST_ENV`. Filtering follows `RUST_LOG` when set.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
