//! Stacks extended-API status client.
//!
//! Looks up transactions via `GET /extended/v1/tx/{tx_id}`. A 404 maps to
//! `TxStatus::NotFound` (the transaction is broadcast but not yet indexed),
//! which the poller treats the same as pending.

use boost_core::{Network, TxId};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{ChainError, ChainResult};
use crate::status::{BoxFuture, TransactionStatusClient, TxStatus};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TxResponse {
    tx_status: String,
}

/// HTTP client for the Stacks extended API.
pub struct StacksApiClient {
    client: Client,
    base_url: String,
}

impl StacksApiClient {
    /// Create a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ChainError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against the default API for a network.
    pub fn for_network(network: Network) -> ChainResult<Self> {
        Self::new(network.default_api_url())
    }

    async fn fetch_status(&self, tx_id: &TxId) -> ChainResult<TxStatus> {
        let url = format!("{}/extended/v1/tx/{}", self.base_url, tx_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::Lookup(format!("request failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(tx_id = %tx_id, "Transaction not yet indexed");
            return Ok(TxStatus::NotFound);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Lookup(format!("HTTP {status}")));
        }

        let body: TxResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Lookup(format!("bad response: {e}")))?;

        let parsed = match body.tx_status.as_str() {
            "success" => TxStatus::Success,
            "pending" => TxStatus::Pending,
            "abort_by_response" => TxStatus::AbortByResponse,
            "abort_by_post_condition" => TxStatus::AbortByPostCondition,
            other => {
                // Dropped or replaced transactions surface with their own
                // status strings; none of them are a confirmed success.
                debug!(tx_id = %tx_id, status = other, "Unrecognized tx status");
                return Err(ChainError::Lookup(format!("unrecognized status: {other}")));
            }
        };

        debug!(tx_id = %tx_id, status = ?parsed, "Fetched transaction status");
        Ok(parsed)
    }
}

impl TransactionStatusClient for StacksApiClient {
    fn status<'a>(&'a self, tx_id: &'a TxId) -> BoxFuture<'a, ChainResult<TxStatus>> {
        Box::pin(self.fetch_status(tx_id))
    }
}
