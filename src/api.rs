//! HTTP client for the stock lookup backend.

use crate::error::FetchError;
use crate::models::{ApiErrorBody, StockResult};
use anyhow::{Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Anything that can answer a stock lookup.
pub trait StockSource: Send + Sync {
    fn fetch_stock(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<StockResult, FetchError>> + Send;
}

/// Client for `GET {base_url}/api/stock/{symbol}`.
#[derive(Debug, Clone)]
pub struct StockApiClient {
    client: Client,
    base_url: String,
}

impl StockApiClient {
    /// Create a new client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lookup URL for `symbol`. The symbol is embedded as is.
    pub fn stock_url(&self, symbol: &str) -> String {
        format!("{}/api/stock/{}", self.base_url, symbol)
    }
}

impl StockSource for StockApiClient {
    async fn fetch_stock(&self, symbol: &str) -> Result<StockResult, FetchError> {
        let url = self.stock_url(symbol);
        tracing::debug!(%url, "requesting stock data");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "stock response");

        decode_response(status.as_u16(), &body)
    }
}

/// Map a status code and raw body to a lookup outcome.
pub fn decode_response(status: u16, body: &str) -> Result<StockResult, FetchError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_str(body)?);
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => Err(FetchError::Server {
            status,
            message: err.error,
        }),
        Err(_) => Err(FetchError::UnexpectedStatus { status }),
    }
}
