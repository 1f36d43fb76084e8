//! Provider traits for fetching market data.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`DailySeriesProvider`] - Daily OHLCV series for a single symbol

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{DailyResponse, Symbol},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Alpha Vantage").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for daily price series.
#[async_trait]
pub trait DailySeriesProvider: DataProvider {
    /// Fetches the daily series for a symbol in a single request.
    ///
    /// Returns `Ok(None)` when the provider answered with a non-success HTTP
    /// status; the status has already been reported to the operator and the
    /// request is not retried.
    ///
    /// # Errors
    /// Network failures and undecodable bodies are returned as errors.
    async fn fetch_daily(&self, symbol: &Symbol) -> Result<Option<DailyResponse>>;
}
