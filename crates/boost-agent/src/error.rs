//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Oracle error: {0}")]
    Oracle(#[from] boost_oracle::OracleError),

    #[error("Chain error: {0}")]
    Chain(#[from] boost_chain::ChainError),

    #[error("Math error: {0}")]
    Math(#[from] boost_math::MathError),

    #[error("Core error: {0}")]
    Core(#[from] boost_core::CoreError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] boost_telemetry::TelemetryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
