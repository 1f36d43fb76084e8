#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricefeed/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Alpha Vantage data provider.
//!
//! This crate implements the pricefeed-core provider traits for the
//! [Alpha Vantage](https://www.alphavantage.co/) `TIME_SERIES_DAILY` endpoint.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pricefeed_alphavantage::AlphaVantageProvider;
//! use pricefeed_core::{DailySeriesProvider, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> pricefeed_core::Result<()> {
//!     let provider = AlphaVantageProvider::new("your_api_key");
//!
//!     if let Some(response) = provider.fetch_daily(&Symbol::new("SPY")).await? {
//!         println!("{} days", response.series().len());
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use pricefeed_core::{
    DailyResponse, DailySeriesProvider, DataError, DataProvider, OutputSize, Result, Symbol,
};
use reqwest::Client;
use std::fmt;
use tracing::{debug, error, warn};

/// Alpha Vantage query endpoint.
pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// API function for daily OHLCV bars.
const TIME_SERIES_DAILY: &str = "TIME_SERIES_DAILY";

/// Alpha Vantage data provider.
///
/// Each call to [`fetch_daily`](DailySeriesProvider::fetch_daily) performs
/// exactly one GET request. Nothing is retried and no timeout is set on the
/// default client.
#[derive(Clone)]
pub struct AlphaVantageProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    output_size: OutputSize,
}

impl fmt::Debug for AlphaVantageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphaVantageProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("output_size", &self.output_size)
            .finish()
    }
}

impl AlphaVantageProvider {
    /// Create a new provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), Some(api_key.into()))
    }

    /// Create a provider that sends no `apikey` parameter.
    ///
    /// Alpha Vantage answers such requests with an `Error Message` body.
    #[must_use]
    pub fn without_key() -> Self {
        Self::with_client(Client::new(), None)
    }

    /// Create a new provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: ALPHA_VANTAGE_URL.to_string(),
            output_size: OutputSize::default(),
        }
    }

    /// Point the provider at a different query endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request a different amount of history.
    #[must_use]
    pub const fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    /// Returns the configured query endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured output size.
    #[must_use]
    pub const fn output_size(&self) -> OutputSize {
        self.output_size
    }

    /// Returns true if requests carry an API key.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Query parameters for a daily series request. `apikey` is left out when unset.
    fn query_params<'a>(&'a self, symbol: &'a Symbol) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("function", TIME_SERIES_DAILY), ("symbol", symbol.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.as_str()));
        }
        params.push(("outputsize", self.output_size.as_param()));
        params
    }
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    fn description(&self) -> &str {
        "Alpha Vantage - daily time series for equities and ETFs"
    }
}

#[async_trait]
impl DailySeriesProvider for AlphaVantageProvider {
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Option<DailyResponse>> {
        debug!(
            symbol = %symbol,
            output_size = %self.output_size,
            keyed = self.has_api_key(),
            "Alpha Vantage request"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_params(symbol))
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("Error fetching {symbol} data: {}", status.as_u16());
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let body: DailyResponse =
            serde_json::from_str(&text).map_err(|e| DataError::Parse(e.to_string()))?;

        for (label, message) in body.advisories() {
            warn!(symbol = %symbol, "Alpha Vantage {label}: {message}");
        }

        if body.time_series.is_none() {
            warn!(symbol = %symbol, "Response has no \"Time Series (Daily)\" key");
        }

        Ok(Some(body))
    }
}
