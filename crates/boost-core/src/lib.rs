//! Core domain types for the stx-boost leverage engine.
//!
//! This crate provides fundamental types used throughout the system:
//! - `Amount`, `UsdValue`: precision-safe numeric types
//! - `CollateralAsset`, `DebtAsset`, `Asset`: closed asset universe
//! - `TxId`, `TransactionHandle`, `TerminalStatus`: transaction lifecycle
//! - `Network`: mainnet/testnet selection

pub mod asset;
pub mod decimal;
pub mod error;
pub mod network;
pub mod tx;

pub use asset::{Asset, CollateralAsset, DebtAsset};
pub use decimal::{Amount, UsdValue};
pub use error::{CoreError, Result};
pub use network::Network;
pub use tx::{TerminalStatus, TransactionHandle, TxId};
