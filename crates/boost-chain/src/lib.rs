//! Transaction status tracking and confirmation polling.
//!
//! A submitted transaction is only authoritative once it reaches a terminal
//! on-chain state. This crate provides:
//! - `TransactionStatusClient`: the indexing-API boundary
//! - `StacksApiClient`: reqwest implementation against the extended API
//! - `ConfirmationPoller`: bounded re-poll loop resolving a handle to a
//!   `TerminalStatus`

pub mod error;
pub mod http;
pub mod poller;
pub mod status;

pub use error::{ChainError, ChainResult};
pub use http::StacksApiClient;
pub use poller::{ConfirmationPoller, PollerConfig};
pub use status::{DynStatusClient, MockStatusClient, TransactionStatusClient, TxStatus};
